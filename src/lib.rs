//! # pdf2text
//!
//! Convert PDF documents into cleaned plain text, with optional LLM polishing.
//!
//! ## Why this crate?
//!
//! Raw PDF text extraction produces noisy output — justified-whitespace runs,
//! encoding junk, bare page numbers, `Page 3 of 17` footers, duplicated
//! lines, navigation boilerplate. This crate runs each page through a
//! deterministic cleanup pipeline and (optionally) hands the result to a
//! language model for a final polish, then writes an annotated text file
//! plus a statistics sidecar showing how much each stage removed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract    per-page text via lopdf
//!  ├─ 2. Normalize  whitespace / ASCII / page-number / dedup passes
//!  ├─ 3. Filter     drop non-substantive paragraphs
//!  ├─ 4. Polish     optional LLM cleanup, whole-stage fallback on error
//!  └─ 5. Write      `<stem>_cleaned.txt` + `<output>.stats.json`
//! ```
//!
//! Execution is fully sequential: every page finishes a stage before the
//! next stage begins, and statistics are recorded at each stage boundary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2text::{clean_to_file, CleanupConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CleanupConfig::default(); // LLM polish off by default
//!     let summary = clean_to_file("manual.pdf", "manual_cleaned.txt", &config).await?;
//!     for (stage, chars) in summary.stats.rows() {
//!         println!("{stage}: {chars} chars");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2text = { version = "0.3", default-features = false }
//! ```
//!
//! ## Known limitation
//!
//! The normaliser strips everything outside printable ASCII, accented
//! characters included. The cleanup is biased toward plain-ASCII technical
//! documentation; see [`pipeline::normalize`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clean;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use clean::{clean, clean_from_bytes, clean_sync, clean_to_file, inspect};
pub use config::{CleanupConfig, CleanupConfigBuilder, DEFAULT_CHUNK_CHARS};
pub use error::Pdf2TextError;
pub use output::{
    CleanupOutput, CleanupSummary, DocumentInfo, LlmStageStatus, PageText, PipelineStats, Stage,
    WriteFailure,
};
pub use progress::{CleanupProgressCallback, NoopProgressCallback, ProgressCallback};
