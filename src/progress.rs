//! Progress-callback trait for pipeline events.
//!
//! Inject an [`Arc<dyn CleanupProgressCallback>`] via
//! [`crate::config::CleanupConfigBuilder::progress_callback`] to receive
//! events as the pipeline crosses stage boundaries and, during the LLM
//! polish stage, as each page completes.
//!
//! Callbacks are the least-invasive integration point: the CLI forwards them
//! to an `indicatif` bar, a host application can forward them to a channel or
//! a log record, and the library stays ignorant of either. The trait is
//! `Send + Sync`; the pipeline itself is single-threaded, but callbacks may
//! be shared with other threads by the host.

use crate::output::Stage;
use std::sync::Arc;

/// Called by the pipeline as it processes a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait CleanupProgressCallback: Send + Sync {
    /// Called once after page extraction, successful or not.
    ///
    /// # Arguments
    /// * `page_count`  — pages extracted (zero when extraction failed)
    /// * `total_chars` — sum of raw per-page character counts
    fn on_extraction_complete(&self, page_count: usize, total_chars: usize) {
        let _ = (page_count, total_chars);
    }

    /// Called when a deterministic stage finishes for all pages.
    ///
    /// # Arguments
    /// * `stage`       — the stage that just completed
    /// * `total_chars` — character count summed over all pages at this point
    fn on_stage_complete(&self, stage: Stage, total_chars: usize) {
        let _ = (stage, total_chars);
    }

    /// Called once when the LLM polish stage begins.
    fn on_llm_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page finishes the LLM polish stage.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `chars`       — character count of the polished page
    fn on_page_polished(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when the LLM stage aborts and pre-stage text passes through.
    fn on_llm_fallback(&self, reason: &str) {
        let _ = reason;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CleanupProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CleanupConfig`].
pub type ProgressCallback = Arc<dyn CleanupProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        stages: AtomicUsize,
        pages: AtomicUsize,
        fallbacks: AtomicUsize,
    }

    impl CleanupProgressCallback for TrackingCallback {
        fn on_stage_complete(&self, _stage: Stage, _total_chars: usize) {
            self.stages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_polished(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_llm_fallback(&self, _reason: &str) {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_complete(3, 1200);
        cb.on_stage_complete(Stage::InitialCleanup, 1100);
        cb.on_llm_start(3);
        cb.on_page_polished(1, 3, 350);
        cb.on_llm_fallback("rate limited");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            stages: AtomicUsize::new(0),
            pages: AtomicUsize::new(0),
            fallbacks: AtomicUsize::new(0),
        };

        tracker.on_stage_complete(Stage::InitialCleanup, 100);
        tracker.on_stage_complete(Stage::ContentAnalysis, 90);
        tracker.on_page_polished(1, 2, 40);
        tracker.on_llm_fallback("boom");

        assert_eq!(tracker.stages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.fallbacks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn CleanupProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_extraction_complete(10, 5000);
        cb.on_page_polished(1, 10, 512);
    }
}
