//! Pipeline driver: sequence the stages and account for each boundary.
//!
//! The driver owns the statistics: stages hand back transformed pages, and
//! character counts are summed here, at the boundaries, into one
//! [`PipelineStats`] value. Nothing downstream can mutate a stat after the
//! stage that produced it has finished.
//!
//! Extraction failure is deliberately not an `Err`: the pipeline runs to
//! completion with zero pages, the error string rides along in
//! [`CleanupOutput::extraction_error`], and the operator still gets a
//! (empty) output file plus a stats sidecar full of zeros. See the error
//! module docs for the full non-fatality story.

use crate::config::CleanupConfig;
use crate::error::Pdf2TextError;
use crate::output::{
    total_chars, CleanupOutput, CleanupSummary, DocumentInfo, LlmStageStatus, PageText,
    PipelineStats, Stage,
};
use crate::pipeline::{extract, filter, llm, normalize, write};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file into cleaned per-page text.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — path to a local PDF file
/// * `config` — cleanup configuration
///
/// # Returns
/// `Ok(CleanupOutput)` in every normal case, including extraction failure
/// (zero pages, `extraction_error` set) and LLM-stage fallback (pre-stage
/// text, `llm` is `FellBack`).
///
/// # Errors
/// Only unexpected internal failures are returned as `Err`.
pub async fn clean(
    input: impl AsRef<Path>,
    config: &CleanupConfig,
) -> Result<CleanupOutput, Pdf2TextError> {
    let input = input.as_ref();
    info!("Starting cleanup: {}", input.display());
    let extracted = extract::extract_pages(input);
    run_pipeline(extracted, config).await
}

/// Convert PDF bytes in memory into cleaned per-page text.
///
/// The recommended API when PDF data comes from a database or network
/// stream rather than a file on disk.
pub async fn clean_from_bytes(
    bytes: &[u8],
    config: &CleanupConfig,
) -> Result<CleanupOutput, Pdf2TextError> {
    let extracted = extract::extract_pages_from_bytes(bytes);
    run_pipeline(extracted, config).await
}

/// Convert a PDF and write the annotated text file plus the stats sidecar.
///
/// Write failures are collected in [`CleanupSummary::failed_writes`] rather
/// than returned as `Err` — one file failing never prevents the other from
/// being written.
pub async fn clean_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CleanupConfig,
) -> Result<CleanupSummary, Pdf2TextError> {
    let output = clean(input, config).await?;
    let failed_writes = write::write_outputs(output_path.as_ref(), &output.pages, &output.stats).await;

    Ok(CleanupSummary {
        page_count: output.pages.len(),
        stats: output.stats,
        llm: output.llm,
        extraction_error: output.extraction_error,
        failed_writes,
    })
}

/// Synchronous wrapper around [`clean`].
///
/// Creates a temporary tokio runtime internally.
pub fn clean_sync(
    input: impl AsRef<Path>,
    config: &CleanupConfig,
) -> Result<CleanupOutput, Pdf2TextError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TextError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(clean(input, config))
}

/// Read page count and PDF version without running the pipeline.
///
/// Does not require an LLM provider or API key.
pub fn inspect(input: impl AsRef<Path>) -> Result<DocumentInfo, Pdf2TextError> {
    extract::document_info(input.as_ref())
}

// ── Internal: the pipeline proper ────────────────────────────────────────

async fn run_pipeline(
    extracted: Result<Vec<PageText>, Pdf2TextError>,
    config: &CleanupConfig,
) -> Result<CleanupOutput, Pdf2TextError> {
    let total_start = Instant::now();

    // ── Stage 0: extraction result, degraded on failure ──────────────────
    let (pages, extraction_error) = match extracted {
        Ok(pages) => (pages, None),
        Err(e) => {
            warn!("Extraction failed, continuing with zero pages: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };

    let original_chars = total_chars(&pages);
    info!(
        "Extracted {} pages, {} chars",
        pages.len(),
        original_chars
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(pages.len(), original_chars);
    }

    // ── Stage 1: normalisation ───────────────────────────────────────────
    let pages: Vec<PageText> = pages
        .into_iter()
        .map(|p| PageText {
            page_num: p.page_num,
            text: normalize::normalize_page(&p.text),
        })
        .collect();
    let after_initial_cleanup_chars = total_chars(&pages);
    info!(
        "{}: {} chars",
        Stage::InitialCleanup,
        after_initial_cleanup_chars
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(Stage::InitialCleanup, after_initial_cleanup_chars);
    }

    // ── Stage 2: content filtering ───────────────────────────────────────
    let pages: Vec<PageText> = pages
        .into_iter()
        .map(|p| PageText {
            page_num: p.page_num,
            text: filter::filter_page(&p.text),
        })
        .collect();
    let after_content_analysis_chars = total_chars(&pages);
    info!(
        "{}: {} chars",
        Stage::ContentAnalysis,
        after_content_analysis_chars
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(Stage::ContentAnalysis, after_content_analysis_chars);
    }

    // ── Stage 3: optional LLM polish ─────────────────────────────────────
    let (pages, llm_status) = run_llm_stage(pages, config).await;

    let after_llm_cleanup_chars = if llm_status.is_completed() {
        let n = total_chars(&pages);
        info!("{}: {} chars", Stage::LlmCleanup, n);
        if let Some(ref cb) = config.progress_callback {
            cb.on_stage_complete(Stage::LlmCleanup, n);
        }
        Some(n)
    } else {
        None
    };

    let stats = PipelineStats {
        original_chars,
        after_initial_cleanup_chars,
        after_content_analysis_chars,
        after_llm_cleanup_chars,
    };

    info!(
        "Cleanup complete: {} pages in {}ms",
        pages.len(),
        total_start.elapsed().as_millis()
    );

    Ok(CleanupOutput {
        pages,
        stats,
        llm: llm_status,
        extraction_error,
    })
}

/// Run (or skip) the polish stage, keeping the pre-stage pages on fallback.
async fn run_llm_stage(
    pages: Vec<PageText>,
    config: &CleanupConfig,
) -> (Vec<PageText>, LlmStageStatus) {
    if !config.llm_cleanup {
        debug!("LLM polish disabled; passing text through unchanged");
        return (pages, LlmStageStatus::Skipped);
    }
    if pages.is_empty() {
        debug!("No pages to polish; skipping LLM stage");
        return (pages, LlmStageStatus::Skipped);
    }

    let provider = match resolve_provider(config) {
        Ok(p) => p,
        Err(e) => {
            let reason = e.to_string();
            warn!("LLM polish unavailable, falling back: {}", reason);
            if let Some(ref cb) = config.progress_callback {
                cb.on_llm_fallback(&reason);
            }
            return (pages, LlmStageStatus::FellBack { reason });
        }
    };

    match llm::polish_pages(&provider, &pages, config).await {
        Ok(polished) => (polished, LlmStageStatus::Completed),
        Err(reason) => (pages, LlmStageStatus::FellBack { reason }),
    }
}

/// Instantiate a named provider with the given model.
fn create_text_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, Pdf2TextError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        Pdf2TextError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; used as-is. Useful in tests or
///    when the caller needs custom middleware.
///
/// 2. **Named provider + model** (`config.provider_name`) — reads the
///    corresponding API key (`OPENAI_API_KEY`, etc.) from the environment.
///
/// 3. **OpenAI key present** — users with multiple provider keys default to
///    OpenAI unless they explicitly request another provider.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans all known API key variables and picks the first available.
fn resolve_provider(config: &CleanupConfig) -> Result<Arc<dyn LLMProvider>, Pdf2TextError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        return create_text_provider(name, model);
    }

    // 3) Prefer OpenAI explicitly when an OpenAI API key is present.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            return create_text_provider("openai", model);
        }
    }

    // 4) Full auto-detection
    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| Pdf2TextError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, or configure a provider explicitly.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
