//! Normalisation: deterministic cleanup of raw extracted page text.
//!
//! ## Why is normalisation necessary?
//!
//! Text pulled out of a PDF content stream is *semantically* the page text
//! but *structurally* a mess — for example:
//!
//! - Runs of spaces and tabs where the layout engine justified text
//! - Control characters and mojibake bytes from encoding fallbacks
//! - Bare line numbers and `Page 3 of 17` footers interleaved with content
//! - The same line emitted twice when it appears in overlapping text objects
//!
//! This module applies five cheap, deterministic passes that fix extraction
//! quirks without judging content (that is the content filter's job). Each
//! pass is a pure function (`&str → String`) with no shared state, applied
//! in a fixed order, and independently testable.
//!
//! ## Pass Order
//!
//! Whitespace collapsing must run first so the numeric-line and dedup passes
//! see trimmed lines; the ASCII strip runs before them for the same reason;
//! the dedup pass runs last because the marker passes can leave behind empty
//! lines it is responsible for sweeping up.
//!
//! ## Known limitation
//!
//! Pass 2 drops every character outside printable ASCII, accented letters
//! and non-Latin scripts included. That is a deliberate bias toward
//! plain-ASCII technical documentation, not an oversight: the encoding noise
//! this pass removes overwhelmingly outweighs the legitimate non-ASCII
//! content in the target documents.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation passes to one page's raw text.
///
/// Passes (applied in order):
/// 1. Collapse whitespace runs within each line to a single space
/// 2. Strip control characters and everything outside printable ASCII
/// 3. Drop lines consisting solely of a numeric token (page numbers)
/// 4. Remove literal `Page <n> of <m>` markers
/// 5. Drop blank lines and duplicate adjacent lines
pub fn normalize_page(input: &str) -> String {
    let s = collapse_whitespace(input);
    let s = strip_non_ascii(&s);
    let s = strip_numeric_lines(&s);
    let s = strip_page_markers(&s);
    dedup_adjacent_lines(&s)
}

// ── Pass 1: Collapse whitespace runs ─────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Pass 2: Strip non-printable-ASCII characters ─────────────────────────────

fn strip_non_ascii(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c == '\n' || matches!(c, ' '..='~'))
        .collect()
}

// ── Pass 3: Drop numeric-only lines ──────────────────────────────────────────

static RE_NUMERIC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

fn strip_numeric_lines(input: &str) -> String {
    input
        .lines()
        .filter(|line| !RE_NUMERIC_LINE.is_match(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Pass 4: Remove "Page N of M" markers ─────────────────────────────────────

static RE_PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Page \d+ of \d+").unwrap());

fn strip_page_markers(input: &str) -> String {
    RE_PAGE_MARKER.replace_all(input, "").to_string()
}

// ── Pass 5: Drop blank lines and duplicate adjacent lines ────────────────────
//
// Adjacent-only by design: a line is compared (whitespace-trimmed) against
// the previous *retained* line, so duplicates separated by other content
// survive. Blank lines are dropped here too — after passes 3 and 4 they
// carry no content, only the holes those passes left behind.

fn dedup_adjacent_lines(input: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if kept.last().is_some_and(|prev| prev.trim() == trimmed) {
            continue;
        }
        kept.push(line);
    }
    kept.join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace_within_lines() {
        assert_eq!(
            collapse_whitespace("Hello   World\tagain"),
            "Hello World again"
        );
        assert_eq!(collapse_whitespace("  leading and trailing  "), "leading and trailing");
    }

    #[test]
    fn test_collapse_preserves_line_breaks() {
        assert_eq!(collapse_whitespace("a  b\nc\td"), "a b\nc d");
    }

    #[test]
    fn test_strip_non_ascii() {
        assert_eq!(strip_non_ascii("caf\u{00E9} r\u{00E9}sum\u{00E9}"), "caf rsum");
        assert_eq!(strip_non_ascii("bell\u{0007}tab ok"), "belltab ok");
        assert_eq!(strip_non_ascii("keep\nnewlines"), "keep\nnewlines");
    }

    #[test]
    fn test_strip_numeric_lines() {
        assert_eq!(strip_numeric_lines("12\nHello\n3"), "Hello");
        // A number inside a sentence is not a numeric-only line.
        assert_eq!(strip_numeric_lines("port 8080 open"), "port 8080 open");
    }

    #[test]
    fn test_strip_page_markers() {
        assert_eq!(strip_page_markers("before Page 3 of 17 after"), "before  after");
        assert_eq!(strip_page_markers("Page 1 of 2"), "");
        // Marker without both numbers is left alone.
        assert_eq!(strip_page_markers("Page 3 follows"), "Page 3 follows");
    }

    #[test]
    fn test_dedup_adjacent_lines() {
        assert_eq!(dedup_adjacent_lines("a\na\nb"), "a\nb");
        // Non-adjacent duplicates survive.
        assert_eq!(dedup_adjacent_lines("a\nb\na"), "a\nb\na");
    }

    #[test]
    fn test_dedup_compares_trimmed_content() {
        assert_eq!(dedup_adjacent_lines("a\n  a  \nb"), "a\nb");
    }

    #[test]
    fn test_dedup_drops_blank_lines() {
        assert_eq!(dedup_adjacent_lines("a\n\n\nb"), "a\nb");
        // A blank line does not shield an adjacent duplicate.
        assert_eq!(dedup_adjacent_lines("a\n\na"), "a");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let inputs = [
            "a\na\nb\n\nb\na",
            "1\n1\nHello   World\n\nHello   World\n",
            "",
            "single line",
        ];
        for input in inputs {
            let once = dedup_adjacent_lines(input);
            let twice = dedup_adjacent_lines(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_normalize_page_full_pipeline() {
        let input = "1\n1\nHello   World\n\nHello   World\n";
        assert_eq!(normalize_page(input), "Hello World");
    }

    #[test]
    fn test_normalize_page_header_artifact() {
        let input = "Page 1 of 2\n\nTechnical details about widgets and gadgets follow here for testing.";
        assert_eq!(
            normalize_page(input),
            "Technical details about widgets and gadgets follow here for testing."
        );
    }

    #[test]
    fn test_normalize_page_is_idempotent() {
        let input = "7\ncaf\u{00E9}   menu\nPage 2 of 9\ncaf\u{00E9}   menu\n\n\n42\n";
        let once = normalize_page(input);
        assert_eq!(normalize_page(&once), once);
    }

    #[test]
    fn test_normalize_empty_page() {
        assert_eq!(normalize_page(""), "");
        assert_eq!(normalize_page("\n\n  \n"), "");
    }
}
