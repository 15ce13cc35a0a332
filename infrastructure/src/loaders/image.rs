//! Image OCR through the `tesseract` executable

use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

const TESSERACT: &str = "tesseract";

pub struct ImageLoader {
    language: String,
}

impl ImageLoader {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub async fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LoadError::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("png")
            .to_ascii_lowercase();
        let text = self.recognize(&bytes, &extension).await?;
        Ok(Document::new(SourceKind::Image, text))
    }

    /// OCR an in-memory image; tesseract only reads files, so it is staged in a temp file
    pub async fn recognize(&self, bytes: &[u8], extension: &str) -> Result<String, LoadError> {
        let mut staged = tempfile::Builder::new()
            .prefix("sofia-ocr-")
            .suffix(&format!(".{}", extension))
            .tempfile()
            .map_err(|e| LoadError::OcrFailed(format!("Failed to create temp file: {}", e)))?;
        staged
            .write_all(bytes)
            .and_then(|()| staged.flush())
            .map_err(|e| LoadError::OcrFailed(format!("Failed to write temp file: {}", e)))?;

        debug!(path = %staged.path().display(), language = %self.language, "running tesseract");
        let output = Command::new(TESSERACT)
            .arg(staged.path())
            .arg("stdout")
            .args(["-l", &self.language])
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoadError::OcrUnavailable(
                    "tesseract not found on PATH. Install it with: apt install tesseract-ocr".to_string(),
                ),
                _ => LoadError::OcrFailed(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoadError::OcrFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
