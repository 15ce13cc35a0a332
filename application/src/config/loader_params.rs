//! Loader parameters: document ingestion control.
//!
//! [`LoaderParams`] groups the static parameters used by the document
//! loaders. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Document loading parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderParams {
    /// Maximum fetch-and-parse attempts for web pages.
    pub site_max_attempts: u32,
    /// Fixed pause between web page attempts.
    pub site_retry_delay: Duration,
    /// Caption languages accepted for video transcripts, in preference order.
    pub youtube_languages: Vec<String>,
    /// Tesseract language code for image OCR.
    pub ocr_language: String,
    /// Timeout for each HTTP request made by a loader.
    pub http_timeout: Option<Duration>,
}

impl Default for LoaderParams {
    fn default() -> Self {
        Self {
            site_max_attempts: 5,
            site_retry_delay: Duration::from_secs(3),
            youtube_languages: vec!["pt".to_string()],
            ocr_language: "eng".to_string(),
            http_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl LoaderParams {
    // ==================== Builder Methods ====================

    pub fn with_site_max_attempts(mut self, attempts: u32) -> Self {
        self.site_max_attempts = attempts.max(1);
        self
    }

    pub fn with_site_retry_delay(mut self, delay: Duration) -> Self {
        self.site_retry_delay = delay;
        self
    }

    pub fn with_youtube_languages(mut self, languages: Vec<String>) -> Self {
        self.youtube_languages = languages;
        self
    }

    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }
}
