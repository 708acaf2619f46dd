//! Integration tests for the cleanup pipeline's core stages.
//!
//! These run the deterministic stages end-to-end on in-memory pages — no
//! PDF file, no network — so they execute on every `cargo test`. The
//! real-PDF path is covered by the gated tests in `e2e.rs`.

use pdf2text::pipeline::{filter, llm, normalize, write};
use pdf2text::{PageText, PipelineStats};

fn page(n: usize, text: &str) -> PageText {
    PageText {
        page_num: n,
        text: text.to_string(),
    }
}

fn total_chars(pages: &[PageText]) -> usize {
    pages.iter().map(|p| p.text.chars().count()).sum()
}

/// The two-page scenario: artifacts removed, substance retained, stats
/// non-increasing.
#[test]
fn two_page_document_cleans_as_expected() {
    let raw = vec![
        page(1, "1\n1\nHello   World\n\nHello   World\n"),
        page(
            2,
            "Page 1 of 2\n\nTechnical details about widgets and gadgets follow here for testing.",
        ),
    ];
    let original_chars = total_chars(&raw);

    let normalized: Vec<PageText> = raw
        .iter()
        .map(|p| page(p.page_num, &normalize::normalize_page(&p.text)))
        .collect();

    assert_eq!(normalized[0].text, "Hello World");
    assert_eq!(
        normalized[1].text,
        "Technical details about widgets and gadgets follow here for testing."
    );

    let filtered: Vec<PageText> = normalized
        .iter()
        .map(|p| page(p.page_num, &filter::filter_page(&p.text)))
        .collect();

    // Both pages survive the content filter: long enough, contain letters.
    assert_eq!(filtered[0].text, "Hello World");
    assert_eq!(
        filtered[1].text,
        "Technical details about widgets and gadgets follow here for testing."
    );

    let after_content_analysis_chars = total_chars(&filtered);
    assert!(after_content_analysis_chars <= original_chars);

    let annotated = write::annotated(&filtered);
    assert!(annotated.contains("=== Page 1 ==="));
    assert!(annotated.contains("=== Page 2 ==="));
    assert!(annotated.contains("Hello World"));
    assert!(annotated.contains("widgets and gadgets"));
}

/// Cleanup only removes content, so counts shrink monotonically through the
/// deterministic stages.
#[test]
fn deterministic_stages_never_grow_text() {
    let raw = "  Page 3 of 9  \n42\nSetup   instructions   for   the   relay\n\nSetup   instructions   for   the   relay\nnext\n\nConfigure the timeout before enabling the watchdog.";

    let normalized = normalize::normalize_page(raw);
    assert!(normalized.chars().count() <= raw.chars().count());

    let filtered = filter::filter_page(&normalized);
    assert!(filtered.chars().count() <= normalized.chars().count());

    assert!(filtered.contains("Configure the timeout"));
    assert!(!filtered.contains("Page 3 of 9"));
    assert!(!filtered.contains("42"));
}

/// Chunking feeds the polish stage; its reconstruction guarantee must hold
/// for realistic page sizes.
#[test]
fn polish_chunking_round_trips_page_text() {
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(300); // 13,500 chars
    let chunks = llm::chunk_text(&text, 4000);

    assert_eq!(chunks.concat(), text);
    assert_eq!(chunks.len(), 4);
    assert!(chunks[..3].iter().all(|c| c.chars().count() == 4000));
    assert!(chunks[3].chars().count() < 4000);
}

/// The annotated file and the stats sidecar land on disk together, and the
/// sidecar omits the LLM key when the stage did not run.
#[tokio::test]
async fn outputs_written_with_stats_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc_cleaned.txt");

    let pages = vec![page(1, "Hello World"), page(2, "Technical details here.")];
    let stats = PipelineStats {
        original_chars: 100,
        after_initial_cleanup_chars: 60,
        after_content_analysis_chars: 34,
        after_llm_cleanup_chars: None,
    };

    let failures = write::write_outputs(&out, &pages, &stats).await;
    assert!(failures.is_empty());

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "\n=== Page 1 ===\n\nHello World\n\n=== Page 2 ===\n\nTechnical details here.\n"
    );

    let sidecar = std::fs::read_to_string(write::stats_path(&out)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&sidecar).unwrap();
    assert_eq!(parsed["original_chars"], 100);
    assert_eq!(parsed["after_content_analysis_chars"], 34);
    assert!(parsed.get("after_llm_cleanup_chars").is_none());
}

/// Normalisation is idempotent over its own output, page by page.
#[test]
fn normalization_is_stable_under_reapplication() {
    let samples = [
        "1\n1\nHello   World\n\nHello   World\n",
        "Page 1 of 2\n\nTechnical details about widgets and gadgets follow here for testing.",
        "caf\u{00E9}\u{00E9}\u{00E9}\n\n\n7\n7\n7\n",
        "",
    ];
    for raw in samples {
        let once = normalize::normalize_page(raw);
        assert_eq!(normalize::normalize_page(&once), once, "input: {raw:?}");
    }
}
