//! Output types: per-page text, pipeline statistics, and run summaries.
//!
//! The statistics design follows one rule: stages never mutate shared state.
//! Each stage hands its pages back to the driver, the driver sums character
//! counts at the boundary, and [`PipelineStats`] is assembled once, as a
//! plain value. The struct serialises directly into the
//! `<output>.stats.json` sidecar, so its field names *are* the file format.

use serde::{Deserialize, Serialize};

/// One page of the document as it moves through the pipeline.
///
/// Identity is the 1-based `page_num`; `text` is replaced wholesale at each
/// stage, never appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number, stable across all stages.
    pub page_num: usize,
    /// Current text content for this page.
    pub text: String,
}

impl PageText {
    /// Unicode scalar count of the current text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Sum of per-page character counts — the quantity tracked at every stage
/// boundary.
pub fn total_chars(pages: &[PageText]) -> usize {
    pages.iter().map(PageText::char_count).sum()
}

// ── Stages ───────────────────────────────────────────────────────────────

/// The pipeline stages, in execution order.
///
/// `as_str` returns the stable names used in logs and progress events;
/// the `_chars` suffixed forms appear as keys in the stats sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Raw text as extracted from the PDF.
    Original,
    /// After the deterministic normalisation passes.
    InitialCleanup,
    /// After paragraph-level content filtering.
    ContentAnalysis,
    /// After the optional LLM polish stage.
    LlmCleanup,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Original => "original",
            Stage::InitialCleanup => "after_initial_cleanup",
            Stage::ContentAnalysis => "after_content_analysis",
            Stage::LlmCleanup => "after_llm_cleanup",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Statistics ───────────────────────────────────────────────────────────

/// Total character count across all pages after each completed stage.
///
/// `after_llm_cleanup_chars` is `None` (and absent from the serialised JSON)
/// unless the polish stage ran to completion — a skipped or fallen-back
/// stage records nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub original_chars: usize,
    pub after_initial_cleanup_chars: usize,
    pub after_content_analysis_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_llm_cleanup_chars: Option<usize>,
}

impl PipelineStats {
    /// `chars` as a percentage of the original character count.
    ///
    /// Returns `None` when the original count is zero (e.g. extraction
    /// failed), so callers render "n/a" instead of dividing by zero.
    pub fn percent_of_original(&self, chars: usize) -> Option<f64> {
        if self.original_chars == 0 {
            None
        } else {
            Some(chars as f64 * 100.0 / self.original_chars as f64)
        }
    }

    /// `(stage, count)` rows in pipeline order, for summary tables.
    pub fn rows(&self) -> Vec<(Stage, usize)> {
        let mut rows = vec![
            (Stage::Original, self.original_chars),
            (Stage::InitialCleanup, self.after_initial_cleanup_chars),
            (Stage::ContentAnalysis, self.after_content_analysis_chars),
        ];
        if let Some(n) = self.after_llm_cleanup_chars {
            rows.push((Stage::LlmCleanup, n));
        }
        rows
    }
}

// ── LLM stage status ─────────────────────────────────────────────────────

/// Explicit outcome of the optional polish stage.
///
/// `FellBack` means the external service errored part-way through; the
/// pipeline kept the pre-stage text for *every* page, not just the failed
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmStageStatus {
    /// Every page was polished by the external service.
    Completed,
    /// The stage was disabled by configuration; text passed through.
    Skipped,
    /// The external service failed; pre-stage text passed through.
    FellBack { reason: String },
}

impl LlmStageStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, LlmStageStatus::Completed)
    }
}

// ── Run results ──────────────────────────────────────────────────────────

/// Result of [`crate::clean`]: the final pages plus everything the operator
/// needs to judge the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupOutput {
    /// Final per-page text, in page order.
    pub pages: Vec<PageText>,
    /// Character counts at each stage boundary.
    pub stats: PipelineStats,
    /// What happened to the optional polish stage.
    pub llm: LlmStageStatus,
    /// Set when page extraction failed and the pipeline ran with zero pages.
    pub extraction_error: Option<String>,
}

/// A single failed output write, reported alongside the sibling file that
/// may still have succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFailure {
    pub path: std::path::PathBuf,
    pub detail: String,
}

/// Result of [`crate::clean_to_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSummary {
    /// Number of pages in the final document.
    pub page_count: usize,
    pub stats: PipelineStats,
    pub llm: LlmStageStatus,
    pub extraction_error: Option<String>,
    /// Output files that could not be written. Empty on full success; one
    /// entry still leaves the other file on disk.
    pub failed_writes: Vec<WriteFailure>,
}

/// Document facts available without running the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub pdf_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize, text: &str) -> PageText {
        PageText {
            page_num: n,
            text: text.to_string(),
        }
    }

    #[test]
    fn total_chars_sums_pages() {
        let pages = vec![page(1, "abc"), page(2, ""), page(3, "de")];
        assert_eq!(total_chars(&pages), 5);
    }

    #[test]
    fn percent_of_original_guards_zero() {
        let stats = PipelineStats::default();
        assert_eq!(stats.percent_of_original(0), None);
        assert_eq!(stats.percent_of_original(100), None);
    }

    #[test]
    fn percent_of_original_normal_case() {
        let stats = PipelineStats {
            original_chars: 200,
            ..Default::default()
        };
        assert_eq!(stats.percent_of_original(50), Some(25.0));
        assert_eq!(stats.percent_of_original(200), Some(100.0));
    }

    #[test]
    fn llm_key_absent_when_stage_did_not_run() {
        let stats = PipelineStats {
            original_chars: 10,
            after_initial_cleanup_chars: 8,
            after_content_analysis_chars: 6,
            after_llm_cleanup_chars: None,
        };
        let json = serde_json::to_string_pretty(&stats).unwrap();
        assert!(json.contains("original_chars"));
        assert!(json.contains("after_content_analysis_chars"));
        assert!(!json.contains("after_llm_cleanup_chars"));
    }

    #[test]
    fn llm_key_present_when_stage_completed() {
        let stats = PipelineStats {
            original_chars: 10,
            after_initial_cleanup_chars: 8,
            after_content_analysis_chars: 6,
            after_llm_cleanup_chars: Some(5),
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"after_llm_cleanup_chars\":5"));
    }

    #[test]
    fn rows_follow_pipeline_order() {
        let stats = PipelineStats {
            original_chars: 4,
            after_initial_cleanup_chars: 3,
            after_content_analysis_chars: 2,
            after_llm_cleanup_chars: Some(1),
        };
        let rows = stats.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (Stage::Original, 4));
        assert_eq!(rows[3], (Stage::LlmCleanup, 1));

        let without_llm = PipelineStats {
            after_llm_cleanup_chars: None,
            ..stats
        };
        assert_eq!(without_llm.rows().len(), 3);
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(Stage::Original.as_str(), "original");
        assert_eq!(Stage::InitialCleanup.as_str(), "after_initial_cleanup");
        assert_eq!(Stage::ContentAnalysis.as_str(), "after_content_analysis");
        assert_eq!(Stage::LlmCleanup.as_str(), "after_llm_cleanup");
    }

    #[test]
    fn char_count_is_unicode_scalars() {
        // Raw extractor output may still contain non-ASCII before the
        // normaliser strips it; counts must not be byte lengths.
        let p = page(1, "héllo");
        assert_eq!(p.char_count(), 5);
        assert_eq!(p.text.len(), 6);
    }
}
