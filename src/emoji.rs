//! GitHub emoji short-code substitution for PR titles.
//!
//! The name-to-emoji table comes from the `emojis` REST endpoint (reached
//! through `gh api` so gh's auth applies) and is cached on disk for a week.
//! Endpoint values are image URLs whose file names encode the code points,
//! e.g. `.../unicode/1f1ef-1f1f5.png?v8`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use etcetera::base_strategy::{BaseStrategy as _, choose_base_strategy};
use regex::Regex;

static EMOJI_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+):").expect("valid regex"));

const CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Lookup table from short code (without colons) to rendered emoji.
#[derive(Debug, Default)]
pub struct EmojiMap {
    map: HashMap<String, String>,
}

impl EmojiMap {
    /// Load the table from the on-disk cache, refreshing it from GitHub
    /// when missing or older than a week.
    pub fn load() -> Result<Self> {
        let path = cache_path()?;
        if let Some(map) = read_cache(&path) {
            return Ok(Self { map });
        }

        let map = fetch_emoji()?;
        // A failed cache write only costs a refetch next run.
        write_cache(&path, &map);
        Ok(Self { map })
    }

    /// Substitute every known `:code:` in `text`; unknown codes stay as-is.
    pub fn replace(&self, text: &str) -> String {
        EMOJI_CODE_RE
            .replace_all(text, |caps: &regex::Captures| {
                self.map
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn cache_path() -> Result<PathBuf> {
    let strategy = choose_base_strategy().context("failed to locate cache directory")?;
    Ok(strategy
        .cache_dir()
        .join("gh")
        .join("gh-list-pr")
        .join("emoji.json"))
}

/// Cached table, if present, fresh, and well-formed.
fn read_cache(path: &std::path::Path) -> Option<HashMap<String, String>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    if modified.elapsed().ok()? >= CACHE_TTL {
        return None;
    }
    serde_json::from_slice(&fs::read(path).ok()?).ok()
}

fn write_cache(path: &std::path::Path, map: &HashMap<String, String>) {
    let Some(parent) = path.parent() else {
        return;
    };
    if fs::create_dir_all(parent).is_err() {
        return;
    }
    if let Ok(data) = serde_json::to_vec(map) {
        let _ = fs::write(path, data);
    }
}

/// Fetch the emoji table via `gh api emojis` and decode the URLs.
fn fetch_emoji() -> Result<HashMap<String, String>> {
    log::debug!("running gh api emojis");
    let output = Command::new("gh")
        .args(["api", "emojis"])
        .output()
        .context("failed to run gh")?;
    if !output.status.success() {
        bail!(
            "gh api emojis failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let raw: HashMap<String, String> =
        serde_json::from_slice(&output.stdout).context("failed to decode emoji list")?;
    Ok(raw
        .into_iter()
        .map(|(name, url)| {
            let emoji = emoji_url_to_unicode(&url);
            (name, emoji)
        })
        .collect())
}

/// Decode an emoji image URL into its character sequence.
///
/// The file name before the first dot is one or more hex code points joined
/// by dashes. Anything that fails to decode is passed through unchanged so
/// a surprising URL degrades to visible text rather than an error.
fn emoji_url_to_unicode(url: &str) -> String {
    let Some((_, filename)) = url.rsplit_once('/') else {
        return url.to_string();
    };
    let Some((hex, _)) = filename.split_once('.') else {
        return url.to_string();
    };

    let mut decoded = String::new();
    for part in hex.split('-') {
        let Some(ch) = u32::from_str_radix(part, 16)
            .ok()
            .and_then(char::from_u32)
        else {
            return url.to_string();
        };
        decoded.push(ch);
    }
    decoded
}
