//! Chat configuration from TOML (`[chat]` section)

use super::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use sofia_application::ChatParams;
use sofia_domain::{ModelSelection, Provider};
use std::path::PathBuf;
use std::time::Duration;

/// Raw chat configuration from TOML
///
/// # Example
///
/// ```toml
/// [chat]
/// provider = "groq"
/// model = "llama-3.1-70b-versatile"
/// assistant_name = "Sofia"
/// temperature = 0.7
/// max_tokens = 2048
/// timeout_secs = 120
/// transcript = "sofia.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Provider tag or display name
    pub provider: Option<String>,
    /// Model name; defaults to the provider's first catalog model
    pub model: Option<String>,
    pub assistant_name: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Wait for the provider to start answering; `0` disables the limit
    pub timeout_secs: Option<u64>,
    /// JSONL transcript path
    pub transcript: Option<PathBuf>,
}

impl FileChatConfig {
    pub fn parse_provider(&self) -> (Option<Provider>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let Some(raw) = self.provider.as_deref() else {
            return (None, issues);
        };
        match raw.parse::<Provider>() {
            Ok(provider) => (Some(provider), issues),
            Err(_) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownProvider {
                        field: "chat.provider".to_string(),
                        value: raw.to_string(),
                    },
                    format!(
                        "chat.provider: unknown provider '{}' (expected one of: groq, openai, gemini)",
                        raw
                    ),
                ));
                (None, issues)
            }
        }
    }

    /// Resolve the configured selection, if the file names a provider or model.
    pub fn parse_selection(&self) -> (Option<ModelSelection>, Vec<ConfigIssue>) {
        let (provider, mut issues) = self.parse_provider();
        if self.provider.is_some() && provider.is_none() {
            return (None, issues);
        }

        match self.model.as_deref() {
            Some(model) if model.trim().is_empty() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: "chat.model".to_string(),
                    },
                    "chat.model: model name cannot be empty",
                ));
                (None, issues)
            }
            Some(model) => {
                let provider = provider.unwrap_or_default();
                (ModelSelection::new(provider, model).ok(), issues)
            }
            None => (provider.map(ModelSelection::default_for), issues),
        }
    }

    pub fn to_chat_params(&self) -> (ChatParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = ChatParams::default().with_max_tokens(self.max_tokens);

        if let Some(name) = self.assistant_name.as_deref().filter(|n| !n.trim().is_empty()) {
            params = params.with_assistant_name(name.trim());
        }

        match self.temperature {
            Some(t) if !(0.0..=2.0).contains(&t) => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: "chat.temperature".to_string(),
                        value: t.to_string(),
                    },
                    format!("chat.temperature: {} is outside 0.0..=2.0, ignoring", t),
                ));
            }
            t => params = params.with_temperature(t),
        }

        match self.timeout_secs {
            Some(0) => params = params.with_request_timeout(None),
            Some(secs) => params = params.with_request_timeout(Some(Duration::from_secs(secs))),
            None => {}
        }

        (params, issues)
    }
}
