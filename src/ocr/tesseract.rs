//! Tesseract OCR via the command line.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

use super::{DocumentKind, OcrConfig, OcrError, TextExtractor};

pub struct TesseractExtractor {
    config: OcrConfig,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self::with_config(OcrConfig::default())
    }

    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    async fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.config.tesseract_cmd)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", self.config.language.as_str()])
            .output()
            .await
            .map_err(|e| not_found_as_unavailable(e, &self.config.tesseract_cmd, "tesseract-ocr"))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(OcrError::Unreadable(format!("tesseract failed: {}", stderr.trim())))
        }
    }

    /// Render every page of `pdf_path` as PNG into `out_dir`, returning page images in order.
    async fn rasterize_pdf(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, OcrError> {
        let dpi = self.config.dpi.to_string();
        let output = Command::new(&self.config.pdftoppm_cmd)
            .args(["-png", "-r", dpi.as_str()])
            .arg(pdf_path)
            .arg(out_dir.join("page"))
            .output()
            .await
            .map_err(|e| not_found_as_unavailable(e, &self.config.pdftoppm_cmd, "poppler-utils"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Unreadable(format!("pdftoppm failed: {}", stderr.trim())));
        }

        // pdftoppm zero-pads page numbers consistently within one run,
        // so name order is page order.
        let mut pages: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        if pages.is_empty() {
            return Err(OcrError::Unreadable("PDF has no renderable pages".to_string()));
        }
        Ok(pages)
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract_text(&self, path: &Path, kind: DocumentKind) -> Result<String, OcrError> {
        let start = Instant::now();
        let text = match kind {
            DocumentKind::Image => self.run_tesseract(path).await?,
            DocumentKind::Pdf => {
                let temp_dir = TempDir::new()?;
                let pages = self.rasterize_pdf(path, temp_dir.path()).await?;
                let mut text = String::new();
                for page in &pages {
                    text.push_str(&self.run_tesseract(page).await?);
                    text.push('\n');
                }
                text
            }
        };
        debug!(
            target: "ocr",
            ?kind,
            chars = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "text extracted"
        );
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "tesseract"
    }
}

fn not_found_as_unavailable(e: io::Error, cmd: &str, package: &str) -> OcrError {
    if e.kind() == io::ErrorKind::NotFound {
        OcrError::BackendNotAvailable(format!("{cmd} not found (install {package})"))
    } else {
        OcrError::Io(e)
    }
}
