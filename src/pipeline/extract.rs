//! Page extraction: pull raw per-page text out of a PDF via lopdf.
//!
//! The extractor is the pipeline's only contact with the PDF binary format,
//! and it is treated as best-effort throughout: a page whose content stream
//! cannot be decoded yields an empty string (the page keeps its slot so
//! numbering stays stable), and a document that cannot be opened at all is
//! an error the driver degrades to a zero-page run. We validate the `%PDF`
//! magic bytes before handing the file to lopdf so callers get a meaningful
//! error rather than a parser failure deep inside the xref machinery.

use crate::error::Pdf2TextError;
use crate::output::{DocumentInfo, PageText};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Extract raw text for every page of the PDF at `path`.
///
/// Pages come back in ascending page-number order, 1-based. A page that
/// fails to decode is returned with empty text rather than dropped.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>, Pdf2TextError> {
    validate_pdf_file(path)?;

    let doc = Document::load(path).map_err(|e| Pdf2TextError::PdfParseFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(pages_from_document(&doc))
}

/// Extract raw text for every page of a PDF held in memory.
pub fn extract_pages_from_bytes(bytes: &[u8]) -> Result<Vec<PageText>, Pdf2TextError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2TextError::NotAPdf {
            path: "<memory>".into(),
            magic,
        });
    }

    let doc = Document::load_mem(bytes).map_err(|e| Pdf2TextError::PdfParseFailed {
        path: "<memory>".into(),
        detail: e.to_string(),
    })?;

    Ok(pages_from_document(&doc))
}

/// Page count and PDF version without extracting any text.
pub fn document_info(path: &Path) -> Result<DocumentInfo, Pdf2TextError> {
    validate_pdf_file(path)?;

    let doc = Document::load(path).map_err(|e| Pdf2TextError::PdfParseFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(DocumentInfo {
        page_count: doc.get_pages().len(),
        pdf_version: doc.version.clone(),
    })
}

fn pages_from_document(doc: &Document) -> Vec<PageText> {
    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::with_capacity(page_numbers.len());
    for (i, num) in page_numbers.iter().enumerate() {
        let text = match doc.extract_text(&[*num]) {
            Ok(t) => t,
            Err(e) => {
                warn!("Page {}: text extraction failed: {}", i + 1, e);
                String::new()
            }
        };
        debug!("Extracted page {}: {} chars", i + 1, text.chars().count());
        pages.push(PageText {
            page_num: i + 1,
            text,
        });
    }
    pages
}

/// Validate existence, readability, and PDF magic bytes.
fn validate_pdf_file(path: &Path) -> Result<(), Pdf2TextError> {
    if !path.exists() {
        return Err(Pdf2TextError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2TextError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Pdf2TextError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(Pdf2TextError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let err = extract_pages(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, Pdf2TextError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "This is plain text, not a PDF.").unwrap();

        let err = extract_pages(&path).unwrap_err();
        assert!(matches!(err, Pdf2TextError::NotAPdf { .. }), "got: {err}");
    }

    #[test]
    fn bytes_with_wrong_magic_are_rejected() {
        let err = extract_pages_from_bytes(b"HELLO WORLD, definitely not a pdf").unwrap_err();
        assert!(matches!(err, Pdf2TextError::NotAPdf { .. }));
    }

    #[test]
    fn garbage_after_valid_magic_is_a_parse_error() {
        let err = extract_pages_from_bytes(b"%PDF-1.7 but nothing else").unwrap_err();
        assert!(matches!(err, Pdf2TextError::PdfParseFailed { .. }));
    }
}
