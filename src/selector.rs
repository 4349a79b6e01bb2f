//! Drive fzf over the rendered lines and act on the selection.
//!
//! fzf draws chrome (pointer column, border, padding) inside the terminal,
//! so the layout must budget for it up front. [`fzf_margin`] estimates that
//! overhead from `FZF_DEFAULT_OPTS` plus the user's extra options; the
//! estimate only has to be close enough that lines don't wrap.
//!
//! A selection is parsed back out of the styled line itself. The number and
//! `+a/-d` columns are always rendered for exactly this reason.

use std::io::Write as _;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

static BORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--border(?:=(\S+))?").expect("valid regex"));
static PADDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"--padding[= ]'?([^'"\s]+)'?"#).expect("valid regex"));
static SELECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(\d+).*\s+(\S+)\s+\+\s*\d+/-\s*\d+").expect("valid regex"));

/// Horizontal cells fzf's chrome will consume, 0 in print mode.
pub fn fzf_margin(print: bool, fzf_options: &str) -> usize {
    if print {
        return 0;
    }
    let default_opts = std::env::var("FZF_DEFAULT_OPTS").unwrap_or_default();
    margin_from_options(&format!("{default_opts} {fzf_options}"))
}

/// Margin implied by a flattened fzf option string.
///
/// The base of 2 covers the pointer/indicator column. `--border` adds the
/// frame's side cells (last occurrence wins, a bare `--border` means
/// rounded); `--padding` adds its left and right components. Unparseable
/// values contribute nothing.
fn margin_from_options(opts: &str) -> usize {
    let mut margin = 2;

    let mut style = "";
    for caps in BORDER_RE.captures_iter(opts) {
        style = caps.get(1).map_or("rounded", |m| m.as_str());
    }
    match style {
        "rounded" | "sharp" | "bold" | "double" | "block" | "thinblock" | "vertical" => margin += 2,
        "left" | "right" => margin += 1,
        _ => {}
    }

    if let Some(caps) = PADDING_RE.captures(opts) {
        let parts: Vec<&str> = caps[1].split(',').collect();
        match parts.len() {
            1 => {
                if let Ok(v) = parts[0].parse::<usize>() {
                    margin += v * 2;
                }
            }
            2 => {
                if let Ok(v) = parts[1].parse::<usize>() {
                    margin += v * 2;
                }
            }
            _ => {
                if parts.len() >= 4
                    && let (Ok(right), Ok(left)) =
                        (parts[1].parse::<usize>(), parts[3].parse::<usize>())
                {
                    margin += right + left;
                }
            }
        }
    }

    margin
}

/// Run fzf over `lines` and return the selected line.
///
/// `--ansi` is always passed (the lines carry color); a user-supplied
/// `--ansi` is dropped rather than duplicated. Aborting the picker (escape,
/// ctrl-c) surfaces as an error.
pub fn run_fzf(lines: &str, fzf_options: &str) -> Result<String> {
    let mut args = vec!["--ansi".to_string()];
    if !fzf_options.is_empty() {
        let extra = fzf_options.replace("--ansi", "");
        if let Some(fields) = shlex::split(&extra) {
            args.extend(fields);
        }
    }

    log::debug!("running fzf {}", args.join(" "));
    let mut child = Command::new("fzf")
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .context("failed to run fzf")?;

    child
        .stdin
        .take()
        .context("failed to open fzf stdin")?
        .write_all(lines.as_bytes())
        .context("failed to write to fzf")?;

    let output = child.wait_with_output().context("failed to wait for fzf")?;
    if !output.status.success() {
        bail!("cancelled");
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Act on a line picked in fzf.
///
/// Number 0 marks a synthetic default-branch row, checked out directly via
/// git. Real PRs go through `gh pr view -w` (web mode) or `gh co`. On
/// success the chosen command replaces this process.
pub fn handle_selection(selected: &str, web: bool) -> Result<()> {
    let caps = SELECTION_RE
        .captures(selected)
        .with_context(|| format!("failed to parse selection: {selected}"))?;
    let number = &caps[1];
    let branch = &caps[2];

    if number == "0" {
        let script = format!(
            "git checkout {branch} && git pull origin {branch} && git submodule update --init --recursive"
        );
        return exec_command("sh", &["-c", &script]);
    }
    if web {
        return exec_command("gh", &["pr", "view", "-w", number]);
    }
    exec_command("gh", &["co", "--recurse-submodules", number])
}

/// Replace the current process with `name args...`.
#[cfg(unix)]
fn exec_command(name: &str, args: &[&str]) -> Result<()> {
    use std::os::unix::process::CommandExt as _;

    let bin = which::which(name).with_context(|| format!("{name} not found"))?;
    log::debug!("exec {name} {}", args.join(" "));
    let err = Command::new(bin).args(args).exec();
    Err(err).with_context(|| format!("failed to exec {name}"))
}

#[cfg(not(unix))]
fn exec_command(name: &str, args: &[&str]) -> Result<()> {
    let bin = which::which(name).with_context(|| format!("{name} not found"))?;
    let status = Command::new(bin)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {name}"))?;
    std::process::exit(status.code().unwrap_or(1));
}
