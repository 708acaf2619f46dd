//! Content filtering: drop paragraph units that carry no substance.
//!
//! The normaliser fixes *form*; this stage judges *content*. A page is split
//! on blank-line boundaries into paragraph units, each unit is kept or
//! discarded by three predicates, and the survivors are rejoined in their
//! original order. The predicates are deliberately blunt — a ten-character
//! floor, an any-letter check, and a short boilerplate list — because at
//! this point in the pipeline anything that short or that symbol-heavy is
//! navigation chrome, not prose.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum trimmed length for a paragraph to survive.
const MIN_PARAGRAPH_CHARS: usize = 10;

static RE_PARAGRAPH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Navigation tokens and bare numbers, matched case-insensitively against
/// the whole trimmed paragraph.
static RE_BOILERPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(next|previous|page|chapter|\d+)\s*$").unwrap());

/// Filter one page's normalised text down to its substantive paragraphs.
///
/// Retained paragraphs keep their original relative order and are rejoined
/// with a blank-line separator.
pub fn filter_page(text: &str) -> String {
    RE_PARAGRAPH_SPLIT
        .split(text)
        .filter(|p| is_substantive(p))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A paragraph survives when it is long enough, contains at least one
/// letter, and is not a known boilerplate token.
fn is_substantive(paragraph: &str) -> bool {
    let trimmed = paragraph.trim();

    if trimmed.chars().count() < MIN_PARAGRAPH_CHARS {
        return false;
    }

    if !trimmed.chars().any(char::is_alphabetic) {
        return false;
    }

    if RE_BOILERPLATE.is_match(trimmed) {
        return false;
    }

    true
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_paragraph_discarded() {
        assert!(!is_substantive("too short"));
        assert!(!is_substantive("   a   "));
        assert!(!is_substantive(""));
    }

    #[test]
    fn test_length_counts_trimmed_chars() {
        // Nine letters padded with whitespace is still nine.
        assert!(!is_substantive("  ninechars  "));
        assert!(is_substantive("exactly ten"));
    }

    #[test]
    fn test_no_alphabetic_content_discarded() {
        assert!(!is_substantive("123 456 789 000"));
        assert!(!is_substantive("--- *** === !!! ???"));
    }

    #[test]
    fn test_boilerplate_tokens_discarded() {
        for token in ["next", "Next", "NEXT", "previous", "page", "Chapter", "42"] {
            assert!(!is_substantive(token), "{token:?} should be discarded");
            assert!(
                !is_substantive(&format!("  {token}  ")),
                "{token:?} with padding should be discarded"
            );
        }
    }

    #[test]
    fn test_substantive_paragraph_retained() {
        assert!(is_substantive(
            "This section explains the rate-limit header."
        ));
    }

    #[test]
    fn test_filter_page_drops_and_rejoins() {
        let input = "Introduction to the widget assembly process.\n\n42\n\nNext\n\nThe gadget requires calibration before first use.";
        assert_eq!(
            filter_page(input),
            "Introduction to the widget assembly process.\n\nThe gadget requires calibration before first use."
        );
    }

    #[test]
    fn test_filter_page_preserves_order() {
        let input = "First substantive paragraph here.\n\nSecond substantive paragraph here.\n\nThird substantive paragraph here.";
        let result = filter_page(input);
        let first = result.find("First").unwrap();
        let second = result.find("Second").unwrap();
        let third = result.find("Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_filter_page_splits_on_whitespace_blank_lines() {
        // A "blank" line containing spaces still separates paragraphs.
        let input = "One paragraph of real content.\n   \nAnother paragraph of real content.";
        assert_eq!(
            filter_page(input),
            "One paragraph of real content.\n\nAnother paragraph of real content."
        );
    }

    #[test]
    fn test_filter_page_all_discarded_yields_empty() {
        assert_eq!(filter_page("42\n\npage\n\n---"), "");
        assert_eq!(filter_page(""), "");
    }
}
