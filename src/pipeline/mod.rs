//! Pipeline stages for PDF-to-cleaned-text conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ normalize ──▶ filter ──▶ llm ──▶ write
//! (lopdf)     (regex rules) (paragraphs) (optional) (txt + stats)
//! ```
//!
//! 1. [`extract`]   — pull raw per-page text out of the PDF
//! 2. [`normalize`] — deterministic cleanup passes applied to each page
//! 3. [`filter`]    — split pages into paragraphs and drop non-substantive ones
//! 4. [`llm`]       — optional polish via an external language model; the
//!    only stage with network I/O, and the only one that can fall back
//! 5. [`write`]     — annotated text file plus the stats sidecar

pub mod extract;
pub mod filter;
pub mod llm;
pub mod normalize;
pub mod write;
