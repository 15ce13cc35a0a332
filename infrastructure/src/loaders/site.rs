//! Web page loader with User-Agent rotation and fixed-delay retries

use super::html::{html_title, html_to_text};
use super::user_agent::random_user_agent;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use sofia_application::{LoadError, LoadProgressNotifier};
use sofia_domain::{Document, SourceKind};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024;

/// Raw response of one page fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub content_type: String,
}

impl FetchedPage {
    fn is_html(&self) -> bool {
        self.content_type.is_empty()
            || self.content_type.contains("text/html")
            || self.content_type.contains("application/xhtml")
    }
}

/// One HTTP GET presenting the given client identity
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<FetchedPage, LoadError>;
}

/// [`PageFetcher`] backed by reqwest
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<FetchedPage, LoadError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let length = response.content_length().unwrap_or(0);
        if length > MAX_BODY_SIZE {
            return Err(LoadError::TooLarge(length));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Http(format!("Failed to read response body: {}", e)))?;
        if body.len() as u64 > MAX_BODY_SIZE {
            return Err(LoadError::TooLarge(body.len() as u64));
        }

        Ok(FetchedPage {
            body: String::from_utf8_lossy(&body).into_owned(),
            content_type,
        })
    }
}

/// Loads a web page as readable text, retrying with a fresh identity
pub struct SiteLoader<F = HttpPageFetcher> {
    fetcher: F,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<F: PageFetcher> SiteLoader<F> {
    pub fn new(fetcher: F, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            fetcher,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub async fn load(
        &self,
        location: &str,
        progress: &dyn LoadProgressNotifier,
    ) -> Result<Document, LoadError> {
        let url = normalize_url(location)?;
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            let user_agent = random_user_agent();
            debug!(attempt, user_agent, url = %url, "fetching site");

            match self.attempt(&url, user_agent).await {
                Ok(text) => {
                    info!(attempt, url = %url, chars = text.len(), "site loaded");
                    return Ok(Document::new(SourceKind::Site, text));
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(attempt, error = %last_error, "failed to load site (attempt {})", attempt);
                    if attempt < self.max_attempts {
                        progress.on_attempt_failed(attempt, self.max_attempts, &last_error);
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(LoadError::RetriesExhausted {
            url,
            attempts: self.max_attempts,
            last_error,
        })
    }

    async fn attempt(&self, url: &str, user_agent: &str) -> Result<String, LoadError> {
        let page = self.fetcher.fetch(url, user_agent).await?;

        let text = if page.is_html() {
            if let Some(title) = html_title(&page.body) {
                debug!(title = %title, "page title");
            }
            html_to_text(&page.body)
        } else {
            page.body.trim().to_string()
        };

        if text.trim().is_empty() {
            return Err(LoadError::parse(SourceKind::Site, "page has no readable text"));
        }
        Ok(text)
    }
}

/// Accept bare hosts by assuming https
fn normalize_url(location: &str) -> Result<String, LoadError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(LoadError::Unsupported {
            kind: SourceKind::Site,
            message: "empty URL".to_string(),
        });
    }
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(location.to_string())
    } else if location.contains("://") {
        Err(LoadError::Unsupported {
            kind: SourceKind::Site,
            message: format!("only http(s) URLs are supported: {}", location),
        })
    } else {
        Ok(format!("https://{}", location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::user_agent::USER_AGENTS;
    use sofia_application::NoProgress;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays scripted responses and records the identities it was given
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<FetchedPage, LoadError>>>,
        user_agents: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Result<FetchedPage, LoadError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                user_agents: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, _url: &str, user_agent: &str) -> Result<FetchedPage, LoadError> {
            self.user_agents.lock().unwrap().push(user_agent.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LoadError::Http("no more responses".to_string())))
        }
    }

    struct CountingProgress(AtomicU32);

    impl LoadProgressNotifier for CountingProgress {
        fn on_load_start(&self, _source: &sofia_domain::DocumentSource) {}
        fn on_attempt_failed(&self, _attempt: u32, _max: u32, _error: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn on_load_complete(&self, _result: Result<&Document, &str>) {}
    }

    fn html(body: &str) -> Result<FetchedPage, LoadError> {
        Ok(FetchedPage {
            body: format!("<html><body>{}</body></html>", body),
            content_type: "text/html; charset=utf-8".to_string(),
        })
    }

    fn status(code: u16) -> Result<FetchedPage, LoadError> {
        Err(LoadError::Status {
            url: "https://example.com".to_string(),
            status: code,
        })
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let fetcher = ScriptedFetcher::new(vec![status(503), html(""), html("<p>Hello</p>")]);
        let loader = SiteLoader::new(fetcher, 5, Duration::ZERO);
        let progress = CountingProgress(AtomicU32::new(0));

        let doc = loader.load("https://example.com", &progress).await.unwrap();
        assert_eq!(doc.kind, SourceKind::Site);
        assert_eq!(doc.content, "Hello");
        assert_eq!(progress.0.load(Ordering::SeqCst), 2);

        let agents = loader.fetcher.user_agents.lock().unwrap();
        assert_eq!(agents.len(), 3);
        assert!(agents.iter().all(|ua| USER_AGENTS.contains(&ua.as_str())));
    }

    #[tokio::test]
    async fn test_exhausts_retries() {
        let fetcher = ScriptedFetcher::new(vec![status(403), status(403), status(403)]);
        let loader = SiteLoader::new(fetcher, 3, Duration::ZERO);

        let err = loader.load("https://example.com", &NoProgress).await.unwrap_err();
        match err {
            LoadError::RetriesExhausted { attempts, last_error, .. } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("403"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(loader.fetcher.user_agents.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let fetcher = ScriptedFetcher::new(vec![Ok(FetchedPage {
            body: "  plain body \n".to_string(),
            content_type: "text/plain".to_string(),
        })]);
        let loader = SiteLoader::new(fetcher, 1, Duration::ZERO);
        let doc = loader.load("example.com/robots.txt", &NoProgress).await.unwrap();
        assert_eq!(doc.content, "plain body");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(normalize_url("HTTP://a.b").unwrap(), "HTTP://a.b");
        assert!(normalize_url("ftp://a.b").is_err());
        assert!(normalize_url("  ").is_err());
    }
}
