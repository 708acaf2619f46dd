//! LLM polish stage: submit cleaned page text to the provider in chunks.
//!
//! This module converts page text into chat-completion calls and returns the
//! rewritten text. It is intentionally thin — the instruction lives in
//! [`crate::prompts`] so it can be changed without touching chunking or
//! fallback logic here.
//!
//! ## Fallback Strategy
//!
//! There is no retry and no per-chunk recovery: the first provider error
//! aborts the stage for *every* page and the driver keeps the pre-stage
//! text. Partial polishing would leave the output half-rewritten with no way
//! for the operator to tell which pages the model touched; all-or-nothing
//! keeps the output file self-consistent.
//!
//! Calls are issued strictly sequentially, one chunk at a time — the chunks
//! of one page must be rejoined in order, and the stage makes no attempt to
//! trade that simplicity for wall-clock time.

use crate::config::CleanupConfig;
use crate::output::PageText;
use crate::prompts::CLEANUP_SYSTEM_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use tracing::{debug, warn};

/// Split `text` into non-overlapping chunks of at most `chunk_chars`
/// Unicode scalar values.
///
/// Concatenating the returned chunks reproduces `text` exactly; only the
/// final chunk may be shorter than `chunk_chars`.
pub fn chunk_text(text: &str, chunk_chars: usize) -> Vec<&str> {
    debug_assert!(chunk_chars > 0);
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(chunk_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(split);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Polish every page through the external service.
///
/// Returns the rewritten pages on success. Pages that are empty after
/// trimming are passed through without a request. Any provider error aborts
/// the whole stage, returning the failure reason; the caller then keeps its
/// pre-stage pages and records
/// [`crate::output::LlmStageStatus::FellBack`].
pub async fn polish_pages(
    provider: &Arc<dyn LLMProvider>,
    pages: &[PageText],
    config: &CleanupConfig,
) -> Result<Vec<PageText>, String> {
    let options = build_options(config);
    let total_pages = pages.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_llm_start(total_pages);
    }

    let mut polished = Vec::with_capacity(total_pages);
    for page in pages {
        if page.text.trim().is_empty() {
            debug!("Page {}: empty, skipping polish", page.page_num);
            polished.push(page.clone());
            continue;
        }

        let chunks = chunk_text(&page.text, config.chunk_chars);
        debug!(
            "Page {}: {} chars in {} chunk(s)",
            page.page_num,
            page.char_count(),
            chunks.len()
        );

        let mut parts = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let messages = vec![
                ChatMessage::system(CLEANUP_SYSTEM_PROMPT),
                ChatMessage::user(*chunk),
            ];

            match provider.chat(&messages, Some(&options)).await {
                Ok(response) => {
                    debug!(
                        "Page {} chunk {}: {} in / {} out tokens",
                        page.page_num,
                        i + 1,
                        response.prompt_tokens,
                        response.completion_tokens
                    );
                    parts.push(response.content);
                }
                Err(e) => {
                    let reason = format!(
                        "page {} chunk {}/{}: {}",
                        page.page_num,
                        i + 1,
                        chunks.len(),
                        e
                    );
                    warn!("LLM polish aborted: {}", reason);
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_llm_fallback(&reason);
                    }
                    return Err(reason);
                }
            }
        }

        let text = parts.join("\n");
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_polished(page.page_num, total_pages, text.chars().count());
        }
        polished.push(PageText {
            page_num: page.page_num,
            text,
        });
    }

    Ok(polished)
}

/// Deterministic completion: the polish stage must produce the same output
/// for the same input.
fn build_options(config: &CleanupConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(0.0),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
