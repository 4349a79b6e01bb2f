//! Terminal display-width helpers.
//!
//! This module provides utility functions for:
//! - Measuring the number of terminal cells a string occupies
//! - Padding/truncating text to an exact column width
//! - Terminal width detection

use unicode_width::UnicodeWidthChar;

/// Width of a single code point in terminal cells.
///
/// Combining marks measure 0, East-Asian wide characters and most emoji
/// measure 2. Code points unicode-width has no answer for (control
/// characters) default to 1 rather than failing.
fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

/// Number of terminal cells `text` occupies.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Fit `text` to exactly `width` cells for column alignment.
///
/// Short text is right-padded with spaces to exactly `width`. Overlong text
/// is truncated to the longest prefix that leaves room for a trailing `…`
/// (one cell). A double-width character is never split: if including it
/// would overshoot, truncation stops before it even when a cell of budget
/// remains, so a truncated result may measure one cell under `width`.
pub fn truncate_pad(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let current = display_width(text);
    if current <= width {
        let mut out = String::with_capacity(text.len() + (width - current));
        out.push_str(text);
        for _ in current..width {
            out.push(' ');
        }
        return out;
    }

    let target = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > target {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Current terminal width in columns.
///
/// `COLUMNS` takes precedence so callers (and tests) can override detection;
/// otherwise the controlling terminal is probed, falling back to 80.
pub fn terminal_width() -> usize {
    let probed = terminal_size::terminal_size().map(|(w, _)| w.0 as usize);
    terminal_width_impl(std::env::var("COLUMNS").ok().as_deref(), probed)
}

fn terminal_width_impl(columns_env: Option<&str>, probed: Option<usize>) -> usize {
    if let Some(cols) = columns_env
        && let Ok(width) = cols.parse::<usize>()
        && width > 0
    {
        return width;
    }
    probed.filter(|width| *width > 0).unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", 0)]
    #[case::ascii("hello", 5)]
    #[case::fullwidth("日本語", 6)]
    #[case::mixed("Hi日本", 6)]
    #[case::emoji("👍", 2)]
    #[case::space(" ", 1)]
    fn test_display_width(#[case] input: &str, #[case] want: usize) {
        assert_eq!(display_width(input), want);
    }

    #[rstest]
    #[case::width_zero("hello", 0, "")]
    #[case::short_pad("hi", 5, "hi   ")]
    #[case::exact_fit("hello", 5, "hello")]
    #[case::truncate("hello world", 5, "hell…")]
    #[case::width_one("hello", 1, "…")]
    #[case::empty_pad("", 5, "     ")]
    #[case::fullwidth_truncate("日本語テスト", 5, "日本…")]
    #[case::fullwidth_pad("日本", 6, "日本  ")]
    #[case::fullwidth_exact("日本語", 6, "日本語")]
    #[case::fullwidth_boundary("日本語", 5, "日本…")]
    #[case::single_char_exact("a", 1, "a")]
    fn test_truncate_pad(#[case] input: &str, #[case] width: usize, #[case] want: &str) {
        let got = truncate_pad(input, width);
        assert_eq!(got, want);
        if width > 0 {
            // Every case above fills its budget exactly; only a double-width
            // boundary can leave a cell unused, and none of these do.
            assert_eq!(display_width(&got), width);
        }
    }

    #[test]
    fn truncate_never_splits_wide_char() {
        // "ab日" at width 4: 日 costs 2 but only 1 cell remains after "ab…"
        // budget math, so the result stops a cell short of the target.
        let got = truncate_pad("ab日本", 4);
        assert_eq!(got, "ab…");
        assert!(display_width(&got) <= 4);
    }

    #[test]
    fn truncate_contains_ellipsis_iff_truncated() {
        assert!(truncate_pad("hello world", 5).ends_with('…'));
        assert!(!truncate_pad("hi", 10).contains('…'));
    }

    #[rstest]
    #[case::env_wins(Some("120"), Some(999), 120)]
    #[case::invalid_env(Some("abc"), Some(100), 100)]
    #[case::empty_env(Some(""), Some(100), 100)]
    #[case::zero_env(Some("0"), Some(100), 100)]
    #[case::negative_env(Some("-1"), Some(100), 100)]
    #[case::probe_only(None, Some(132), 132)]
    #[case::fallback(None, None, 80)]
    #[case::zero_probe(None, Some(0), 80)]
    fn test_terminal_width_impl(
        #[case] env: Option<&str>,
        #[case] probed: Option<usize>,
        #[case] want: usize,
    ) {
        assert_eq!(terminal_width_impl(env, probed), want);
    }
}
