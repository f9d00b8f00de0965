//! Text extraction from uploaded documents.
//!
//! Images go straight to Tesseract; PDFs are rasterised page by page with
//! `pdftoppm` (Poppler) first. The HTTP layer only sees the [`TextExtractor`]
//! trait, so tests can swap in a fixed-text implementation.

mod tesseract;

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub use tesseract::TesseractExtractor;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("could not read document: {0}")]
    Unreadable(String),
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OcrError {
    /// Problems with the uploaded file itself, as opposed to the server.
    pub fn is_input_error(&self) -> bool {
        matches!(self, OcrError::UnsupportedFormat(_) | OcrError::Unreadable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl DocumentKind {
    /// Classify by file extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, OcrError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            e if IMAGE_EXTENSIONS.contains(&e) => Ok(DocumentKind::Image),
            _ => Err(OcrError::UnsupportedFormat(filename.to_string())),
        }
    }
}

fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}
fn default_pdftoppm_cmd() -> String {
    "pdftoppm".to_string()
}
fn default_language() -> String {
    "eng".to_string()
}
fn default_dpi() -> u32 {
    300
}

/// The `[ocr]` config section.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,
    #[serde(default = "default_pdftoppm_cmd")]
    pub pdftoppm_cmd: String,
    /// Tesseract language code.
    #[serde(default = "default_language")]
    pub language: String,
    /// Rasterisation resolution for PDF pages.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: default_tesseract_cmd(),
            pdftoppm_cmd: default_pdftoppm_cmd(),
            language: default_language(),
            dpi: default_dpi(),
        }
    }
}

#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path, kind: DocumentKind) -> Result<String, OcrError>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(DocumentKind::from_filename("scan.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("photo.jpeg").unwrap(), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("a.b.tiff").unwrap(), DocumentKind::Image);
    }

    #[test]
    fn rejects_unknown_types() {
        for name in ["notes.docx", "README", "archive.tar.gz"] {
            let err = DocumentKind::from_filename(name).unwrap_err();
            assert!(err.is_input_error(), "{name}");
        }
    }

    #[test]
    fn backend_errors_are_not_input_errors() {
        assert!(!OcrError::BackendNotAvailable("tesseract".into()).is_input_error());
    }
}
