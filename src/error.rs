//! Error types for the pdf2text library.
//!
//! Almost nothing in the pipeline is fatal. Extraction failures degrade to a
//! zero-page document (the error string is carried in
//! [`crate::output::CleanupOutput::extraction_error`]), an external-service
//! failure makes the optional polish stage fall back to its input, and output
//! write failures are collected per file in
//! [`crate::output::CleanupSummary::failed_writes`]. The variants below are
//! what remains: caller mistakes (bad configuration) plus the error values
//! the extractor and writer produce *before* the driver degrades them.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pdf2text library.
#[derive(Debug, Error)]
pub enum Pdf2TextError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF structure could not be parsed.
    #[error("PDF '{path}' could not be parsed: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    PdfParseFailed { path: PathBuf, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
