//! Output writing: the annotated text file and the stats sidecar.
//!
//! The two files are written independently: a failure on one is recorded
//! and the other is still attempted, so a read-only stats path never costs
//! the operator the cleaned text (or vice versa). The text file goes
//! through a temp-file + rename so a crash mid-write can't leave a
//! truncated output behind; the small stats sidecar is written directly.

use crate::error::Pdf2TextError;
use crate::output::{PageText, PipelineStats, WriteFailure};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Render the final document as annotated text.
///
/// Each page is emitted as a `=== Page <n> ===` delimiter line surrounded by
/// blank lines, followed by the page's text and a trailing newline.
pub fn annotated(pages: &[PageText]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!("\n=== Page {} ===\n\n", page.page_num));
        out.push_str(&page.text);
        out.push('\n');
    }
    out
}

/// Sidecar path for a given output path: `<output>.stats.json`.
pub fn stats_path(output_path: &Path) -> PathBuf {
    let mut s = output_path.as_os_str().to_os_string();
    s.push(".stats.json");
    PathBuf::from(s)
}

/// Write the annotated text file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_text(path: &Path, pages: &[PageText]) -> Result<(), Pdf2TextError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2TextError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, annotated(pages))
        .await
        .map_err(|e| Pdf2TextError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Pdf2TextError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Wrote cleaned text to {}", path.display());
    Ok(())
}

/// Write the stats sidecar next to the output file.
pub async fn write_stats(output_path: &Path, stats: &PipelineStats) -> Result<(), Pdf2TextError> {
    let path = stats_path(output_path);
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| Pdf2TextError::Internal(format!("stats serialisation: {e}")))?;

    tokio::fs::write(&path, json)
        .await
        .map_err(|e| Pdf2TextError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote pipeline stats to {}", path.display());
    Ok(())
}

/// Write both output files, collecting failures instead of short-circuiting.
pub async fn write_outputs(
    output_path: &Path,
    pages: &[PageText],
    stats: &PipelineStats,
) -> Vec<WriteFailure> {
    let mut failures = Vec::new();

    if let Err(e) = write_text(output_path, pages).await {
        error!("{e}");
        failures.push(WriteFailure {
            path: output_path.to_path_buf(),
            detail: e.to_string(),
        });
    }

    if let Err(e) = write_stats(output_path, stats).await {
        error!("{e}");
        failures.push(WriteFailure {
            path: stats_path(output_path),
            detail: e.to_string(),
        });
    }

    failures
}
