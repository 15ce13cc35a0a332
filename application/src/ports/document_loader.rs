//! Document loader port
//!
//! Defines the interface for turning a [`DocumentSource`] into a [`Document`].

use super::progress::LoadProgressNotifier;
use async_trait::async_trait;
use sofia_domain::{Document, DocumentSource, SourceKind};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a document
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Response too large: {0} bytes")]
    TooLarge(u64),

    #[error("Failed to parse {kind} document: {message}")]
    Parse { kind: SourceKind, message: String },

    #[error("Invalid video URL or id: {0}")]
    InvalidVideo(String),

    #[error("No transcript for video {video_id} in languages [{languages}]")]
    NoTranscript { video_id: String, languages: String },

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Could not load the site {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Unsupported input for {kind}: {message}")]
    Unsupported { kind: SourceKind, message: String },
}

impl LoadError {
    pub fn parse(kind: SourceKind, message: impl std::fmt::Display) -> Self {
        LoadError::Parse {
            kind,
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Port for document loading
///
/// Implementations dispatch on [`SourceKind`] and delegate to a parser,
/// scraper or OCR engine.
#[async_trait]
pub trait DocumentLoaderPort: Send + Sync {
    /// Load and normalize the document at `source`
    async fn load(
        &self,
        source: &DocumentSource,
        progress: &dyn LoadProgressNotifier,
    ) -> Result<Document, LoadError>;
}
