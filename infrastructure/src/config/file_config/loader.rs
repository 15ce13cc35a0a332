//! Document loader configuration from TOML (`[loader]` section)

use super::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use sofia_application::LoaderParams;
use std::time::Duration;

/// Raw loader configuration from TOML
///
/// # Example
///
/// ```toml
/// [loader]
/// site_max_attempts = 5
/// site_retry_delay_ms = 3000
/// youtube_languages = ["pt", "en"]
/// ocr_language = "por"
/// http_timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoaderConfig {
    pub site_max_attempts: u32,
    pub site_retry_delay_ms: u64,
    pub youtube_languages: Vec<String>,
    pub ocr_language: String,
    /// `0` disables the timeout
    pub http_timeout_secs: u64,
}

impl Default for FileLoaderConfig {
    fn default() -> Self {
        let defaults = LoaderParams::default();
        Self {
            site_max_attempts: defaults.site_max_attempts,
            site_retry_delay_ms: defaults.site_retry_delay.as_millis() as u64,
            youtube_languages: defaults.youtube_languages,
            ocr_language: defaults.ocr_language,
            http_timeout_secs: defaults.http_timeout.map(|t| t.as_secs()).unwrap_or(0),
        }
    }
}

impl FileLoaderConfig {
    pub fn to_loader_params(&self) -> (LoaderParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.site_max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroAttempts {
                    field: "loader.site_max_attempts".to_string(),
                },
                "loader.site_max_attempts: must be at least 1",
            ));
        }

        let languages: Vec<String> = self
            .youtube_languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let languages = if languages.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "loader.youtube_languages".to_string(),
                    value: "[]".to_string(),
                },
                "loader.youtube_languages: empty list, falling back to the defaults",
            ));
            LoaderParams::default().youtube_languages
        } else {
            languages
        };

        let timeout = match self.http_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let params = LoaderParams::default()
            .with_site_max_attempts(self.site_max_attempts)
            .with_site_retry_delay(Duration::from_millis(self.site_retry_delay_ms))
            .with_youtube_languages(languages)
            .with_ocr_language(match self.ocr_language.trim() {
                "" => LoaderParams::default().ocr_language,
                lang => lang.to_string(),
            })
            .with_http_timeout(timeout);

        (params, issues)
    }
}
