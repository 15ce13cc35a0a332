//! PDF text extraction, one part per page

use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::path::Path;
use tracing::debug;

pub async fn load_pdf(path: &Path) -> Result<Document, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;

    let pages = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .await
        .map_err(|e| LoadError::parse(SourceKind::Pdf, format!("extraction task failed: {}", e)))?
        .map_err(|e| LoadError::parse(SourceKind::Pdf, e))?;

    debug!(path = %path.display(), pages = pages.len(), "pdf extracted");
    Ok(Document::from_parts(
        SourceKind::Pdf,
        pages.iter().map(|page| page.trim_end()),
    ))
}
