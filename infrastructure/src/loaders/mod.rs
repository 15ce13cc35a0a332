//! Document loaders
//!
//! [`LocalDocumentLoader`] dispatches a [`DocumentSource`] to the loader for
//! its kind:
//!
//! | kind    | loader |
//! |---------|--------|
//! | site    | [`SiteLoader`] with User-Agent rotation and retries |
//! | youtube | [`YoutubeLoader`] caption transcript |
//! | pdf     | page text via `pdf-extract` |
//! | csv     | `header: value` rows |
//! | txt     | UTF-8 file contents |
//! | excel   | every sheet as an aligned table via `calamine` |
//! | image   | OCR via [`ImageLoader`] |

mod delimited;
mod excel;
mod html;
mod image;
mod pdf;
mod site;
mod text;
mod user_agent;
mod youtube;

pub use excel::render_table;
pub use html::html_to_text;
pub use image::ImageLoader;
pub use site::{FetchedPage, HttpPageFetcher, PageFetcher, SiteLoader};
pub use user_agent::{USER_AGENTS, random_user_agent};
pub use youtube::{YoutubeLoader, video_id};

use async_trait::async_trait;
use sofia_application::{DocumentLoaderPort, LoadError, LoaderParams, LoadProgressNotifier};
use sofia_domain::{Document, DocumentSource, SourceKind};
use std::path::Path;
use tracing::{info, warn};

/// Loads documents from the network and the local filesystem
pub struct LocalDocumentLoader {
    site: SiteLoader,
    youtube: YoutubeLoader,
    image: ImageLoader,
}

impl LocalDocumentLoader {
    pub fn new(params: &LoaderParams) -> Result<Self, LoadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LoadError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            site: SiteLoader::new(
                HttpPageFetcher::new(client.clone()),
                params.site_max_attempts,
                params.site_retry_delay,
            ),
            youtube: YoutubeLoader::new(client, params.youtube_languages.clone()),
            image: ImageLoader::new(params.ocr_language.clone()),
        })
    }
}

#[async_trait]
impl DocumentLoaderPort for LocalDocumentLoader {
    async fn load(
        &self,
        source: &DocumentSource,
        progress: &dyn LoadProgressNotifier,
    ) -> Result<Document, LoadError> {
        if !source.kind.is_remote() {
            check_extension(source);
        }
        let path = Path::new(source.location.trim());

        let document = match source.kind {
            SourceKind::Site => self.site.load(&source.location, progress).await?,
            SourceKind::Youtube => self.youtube.load(&source.location).await?,
            SourceKind::Pdf => pdf::load_pdf(path).await?,
            SourceKind::Csv => delimited::load_csv(path).await?,
            SourceKind::Txt => text::load_text(path).await?,
            SourceKind::Excel => excel::load_excel(path).await?,
            SourceKind::Image => self.image.load(path).await?,
        };

        info!(
            kind = %source.kind,
            location = %source.location,
            bytes = document.len(),
            "document loaded"
        );
        Ok(document)
    }
}

fn check_extension(source: &DocumentSource) {
    let extension = Path::new(&source.location)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !source.kind.extensions().contains(&extension.as_str()) {
        warn!(
            kind = %source.kind,
            location = %source.location,
            expected = ?source.kind.extensions(),
            "file extension does not match the source kind"
        );
    }
}
