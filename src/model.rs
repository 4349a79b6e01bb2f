//! Pull-request records and their retrieval.
//!
//! Records come from two places: `gh pr list` (real pull requests) and
//! `git branch -r` (synthetic rows for well-known default branches, number 0,
//! shown so they can be checked out through the same selector).

use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Default branches offered as synthetic rows when no search filter is set.
const DEFAULT_BRANCH_NAMES: [&str; 4] = ["develop", "main", "master", "staging"];

const PR_JSON_FIELDS: &str =
    "number,title,headRefName,author,createdAt,isDraft,additions,deletions,changedFiles";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub login: String,
}

/// One displayable row. Field names mirror the `gh pr list --json` payload;
/// records are read-only once constructed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// PR number; 0 marks a synthetic default-branch row.
    pub number: u64,
    pub title: String,
    pub head_ref_name: String,
    /// `null` for deleted accounts.
    #[serde(default)]
    pub author: Option<Author>,
    /// Opaque timestamp text, passed through to the date column.
    pub created_at: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,

    /// Resolved display name; populated after fetch (see [`Self::resolve_author`]).
    #[serde(skip)]
    pub author_name: String,
}

impl PullRequest {
    /// Fill `author_name` from the author login, defaulting to "unknown"
    /// for missing or deleted accounts.
    pub fn resolve_author(&mut self) {
        let login = self
            .author
            .as_ref()
            .map(|a| a.login.as_str())
            .filter(|login| !login.is_empty())
            .unwrap_or("unknown");
        self.author_name = login.to_string();
    }
}

/// Fetch pull requests via `gh pr list`.
///
/// `search_options` is passed through to `gh` (e.g. `--author=@me`,
/// `--limit 100`); gh's defaults apply when empty (30 open PRs).
pub fn fetch_prs(search_options: &str) -> Result<Vec<PullRequest>> {
    let mut args = vec!["pr".to_string(), "list".to_string()];
    if !search_options.is_empty() {
        let extra = shlex::split(search_options)
            .with_context(|| format!("malformed search options: {search_options}"))?;
        args.extend(extra);
    }
    args.push("--json".to_string());
    args.push(PR_JSON_FIELDS.to_string());

    log::debug!("running gh {}", args.join(" "));
    let output = Command::new("gh")
        .args(&args)
        .output()
        .context("failed to run gh")?;
    if !output.status.success() {
        bail!(
            "gh pr list failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    serde_json::from_slice(&output.stdout).context("failed to decode gh pr list output")
}

/// Synthetic records for remote default branches, sorted by name.
///
/// Branches whose first-commit time cannot be determined are skipped.
pub fn default_branches() -> Result<Vec<PullRequest>> {
    let output = Command::new("git")
        .args(["branch", "-r"])
        .output()
        .context("failed to run git")?;
    if !output.status.success() {
        bail!(
            "git branch -r failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut branches: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("origin/"))
        .filter(|name| DEFAULT_BRANCH_NAMES.contains(name))
        .collect();
    branches.sort_unstable();
    branches.dedup();

    let mut records = Vec::with_capacity(branches.len());
    for branch in branches {
        let Ok(created_at) = branch_first_commit_time(branch) else {
            continue;
        };
        records.push(PullRequest {
            number: 0,
            title: branch.to_string(),
            head_ref_name: branch.to_string(),
            author: Some(Author {
                login: "system".to_string(),
            }),
            created_at,
            ..PullRequest::default()
        });
    }
    Ok(records)
}

/// Timestamp of the first commit on `origin/<branch>`, RFC 3339 UTC.
fn branch_first_commit_time(branch: &str) -> Result<String> {
    let output = Command::new("git")
        .args([
            "log",
            &format!("origin/{branch}"),
            "--reverse",
            "--pretty=format:%ct",
        ])
        .output()
        .context("failed to run git log")?;
    if !output.status.success() {
        bail!("git log failed for origin/{branch}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .with_context(|| format!("no commits for origin/{branch}"))?;
    let epoch: i64 = first
        .trim()
        .parse()
        .with_context(|| format!("unexpected git log output: {first}"))?;
    let time = chrono::DateTime::from_timestamp(epoch, 0)
        .with_context(|| format!("commit time out of range: {epoch}"))?;
    Ok(time.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gh_pr_list_payload() {
        let json = r#"[
          {
            "number": 42,
            "title": "Fix critical bug",
            "headRefName": "feature-branch",
            "author": {"login": "alice"},
            "createdAt": "2025-01-15T10:00:00Z",
            "isDraft": false,
            "additions": 10,
            "deletions": 5,
            "changedFiles": 3
          },
          {
            "number": 7,
            "title": "Ghost PR",
            "headRefName": "orphan",
            "author": null,
            "createdAt": "2025-01-16T10:00:00Z",
            "isDraft": true,
            "additions": 0,
            "deletions": 0,
            "changedFiles": 0
          }
        ]"#;

        let mut prs: Vec<PullRequest> = serde_json::from_str(json).unwrap();
        for pr in &mut prs {
            pr.resolve_author();
        }

        assert_eq!(prs.len(), 2);
        assert_eq!(prs[0].number, 42);
        assert_eq!(prs[0].head_ref_name, "feature-branch");
        assert_eq!(prs[0].author_name, "alice");
        assert!(!prs[0].is_draft);

        assert_eq!(prs[1].author_name, "unknown");
        assert!(prs[1].is_draft);
    }

    #[test]
    fn resolve_author_handles_empty_login() {
        let mut pr = PullRequest {
            author: Some(Author::default()),
            ..PullRequest::default()
        };
        pr.resolve_author();
        assert_eq!(pr.author_name, "unknown");
    }
}
