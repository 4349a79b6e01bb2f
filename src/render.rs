//! Render pull-request records into styled, column-aligned lines.
//!
//! Colors use the anstyle ecosystem. Lines are built with escape codes
//! unconditionally; callers decide whether to strip them (`anstream` does
//! so automatically for plain output, fzf consumes them via `--ansi`).

use std::fmt::Write as _;

use anstyle::{AnsiColor, Style};

use crate::display::truncate_pad;
use crate::layout::ColumnPlan;
use crate::model::PullRequest;

const GREEN: Style = AnsiColor::Green.on_default();
const RED: Style = AnsiColor::Red.on_default();
const CYAN: Style = AnsiColor::Cyan.on_default();
const MAGENTA: Style = AnsiColor::Magenta.on_default();
/// Draft numbers and dates render dimmed.
const DIM: Style = AnsiColor::BrightBlack.on_default();

/// One styled line for `pr` under `plan`, without a trailing newline.
///
/// Column order is fixed: number, author, title, branch, +/- counts, file
/// count, date. The number and +/- columns are always present so a selected
/// line can be parsed back; the rest follow the plan's `show_*` flags.
pub fn build_line(pr: &PullRequest, plan: &ColumnPlan) -> String {
    let mut line = String::new();

    let num_style = if pr.is_draft { DIM } else { GREEN };
    let _ = write!(
        line,
        "{num_style}#{:<width$}  {num_style:#}",
        pr.number,
        width = plan.number_width
    );

    if plan.show_author {
        let author = truncate_pad(&pr.author_name, plan.author_width);
        let _ = write!(line, "{MAGENTA}{author}  {MAGENTA:#}");
    }

    if plan.show_title {
        let _ = write!(line, "{}  ", truncate_pad(&pr.title, plan.title_width));
    }

    let branch = truncate_pad(&pr.head_ref_name, plan.branch_width);
    let _ = write!(line, "{CYAN}{branch}  {CYAN:#}");

    let _ = write!(
        line,
        "{GREEN}+{:>aw$}{GREEN:#}/{RED}-{:>dw$}{RED:#}",
        pr.additions,
        pr.deletions,
        aw = plan.added_width,
        dw = plan.deleted_width
    );

    if plan.show_files {
        let _ = write!(
            line,
            "  {:>width$} files",
            pr.changed_files,
            width = plan.files_width
        );
    }

    if plan.show_date {
        let _ = write!(line, "  {DIM}{}{DIM:#}", pr.created_at);
    }

    line
}

/// All records as newline-terminated lines.
pub fn format_lines(prs: &[PullRequest], plan: &ColumnPlan) -> String {
    let mut out = String::new();
    for pr in prs {
        out.push_str(&build_line(pr, plan));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::display_width;
    use crate::layout::compute_layout;

    fn sample_pr() -> PullRequest {
        PullRequest {
            number: 42,
            title: "Fix critical bug".to_string(),
            head_ref_name: "feature-branch".to_string(),
            author_name: "alice".to_string(),
            created_at: "2025-01-15T10:00:00Z".to_string(),
            additions: 10,
            deletions: 5,
            changed_files: 3,
            ..PullRequest::default()
        }
    }

    fn full_plan() -> ColumnPlan {
        compute_layout(&[sample_pr()], 200)
    }

    fn stripped(line: &str) -> String {
        String::from_utf8_lossy(&strip_ansi_escapes::strip(line)).to_string()
    }

    #[test]
    fn line_contains_all_fields() {
        let line = build_line(&sample_pr(), &full_plan());
        let plain = stripped(&line);
        assert!(plain.contains("#42"));
        assert!(plain.contains("alice"));
        assert!(plain.contains("Fix critical bug"));
        assert!(plain.contains("feature-branch"));
        assert!(plain.contains("+10"));
        assert!(plain.contains("-5"));
        assert!(plain.contains("3 files"));
        assert!(plain.contains("2025-01-15T10:00:00Z"));
    }

    #[test]
    fn number_color_follows_draft_state() {
        let pr = sample_pr();
        assert!(build_line(&pr, &full_plan()).starts_with("\x1b[32m#42"));

        let draft = PullRequest {
            is_draft: true,
            ..sample_pr()
        };
        assert!(build_line(&draft, &full_plan()).starts_with("\x1b[90m#42"));
    }

    #[test]
    fn hidden_columns_are_omitted() {
        let mut plan = full_plan();
        plan.show_author = false;
        plan.show_title = false;
        plan.show_files = false;
        plan.show_date = false;

        let plain = stripped(&build_line(&sample_pr(), &plan));
        assert!(!plain.contains("alice"));
        assert!(!plain.contains("Fix critical bug"));
        assert!(!plain.contains("files"));
        assert!(!plain.contains("2025-01-15"));
        assert!(plain.contains("#42"));
        assert!(plain.contains("feature-branch"));
        assert!(plain.contains("+10"));
    }

    #[test]
    fn format_lines_terminates_each_record() {
        let prs = [sample_pr(), sample_pr()];
        let plan = full_plan();
        let out = format_lines(&prs, &plan);
        assert_eq!(out.matches('\n').count(), 2);
        assert!(out.ends_with('\n'));

        assert_eq!(format_lines(&[], &plan), "");
    }

    #[test]
    fn lines_fit_the_planned_width() {
        let prs = [
            PullRequest {
                number: 1,
                title: "Add new feature".to_string(),
                head_ref_name: "feature/add-new".to_string(),
                author_name: "alice".to_string(),
                created_at: "2025-01-01T00:00:00Z".to_string(),
                additions: 42,
                deletions: 10,
                changed_files: 5,
                ..PullRequest::default()
            },
            PullRequest {
                number: 23,
                title: "Draft: WIP refactor".to_string(),
                head_ref_name: "refactor/cleanup".to_string(),
                author_name: "bob".to_string(),
                created_at: "2025-02-01T00:00:00Z".to_string(),
                is_draft: true,
                additions: 150,
                deletions: 200,
                changed_files: 15,
                ..PullRequest::default()
            },
            PullRequest {
                number: 456,
                title: "日本語のタイトル".to_string(),
                head_ref_name: "fix/i18n-support".to_string(),
                author_name: "charlie".to_string(),
                created_at: "2025-03-01T00:00:00Z".to_string(),
                additions: 5,
                deletions: 3,
                changed_files: 2,
                ..PullRequest::default()
            },
            PullRequest {
                number: 7890,
                title: "Big changes everywhere".to_string(),
                head_ref_name: "release/v2.0".to_string(),
                author_name: "dave".to_string(),
                created_at: "2025-04-01T00:00:00Z".to_string(),
                additions: 1234,
                deletions: 567,
                changed_files: 89,
                ..PullRequest::default()
            },
        ];

        for width in [120usize, 80, 50] {
            let plan = compute_layout(&prs, width as isize);
            let out = format_lines(&prs, &plan);
            let lines: Vec<&str> = out.lines().collect();
            assert_eq!(lines.len(), prs.len());
            for line in lines {
                assert!(
                    display_width(&stripped(line)) <= width,
                    "line overflows {width} columns: {line:?}"
                );
            }
        }
    }
}
