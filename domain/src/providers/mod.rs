//! Chat model providers and their model catalog.
//!
//! The provider settings types are serde-free; the infrastructure layer maps
//! its TOML shapes onto them.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// A hosted chat model provider (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    Groq,
    OpenAi,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Groq, Provider::OpenAi, Provider::Gemini];

    /// Stable tag used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Google Gemini",
        }
    }

    /// Models offered for this provider
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::Groq => &["llama-3.1-70b-versatile", "gemma2-9b-it", "mixtral-8x7b-32768"],
            Provider::OpenAi => &["gpt-4o-mini", "gpt-4o", "o1-preview", "o1-mini"],
            Provider::Gemini => &["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro"],
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }

    pub fn offers(&self, model: &str) -> bool {
        self.models().contains(&model)
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Base URL of the provider's OpenAI-compatible chat API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openai" | "open-ai" => Ok(Provider::OpenAi),
            "gemini" | "google" | "google gemini" | "google-gemini" => Ok(Provider::Gemini),
            _ => Err(DomainError::UnknownProvider(s.to_string())),
        }
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A provider plus the model name to use with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: Provider,
    pub model: String,
}

impl ModelSelection {
    pub fn new(provider: Provider, model: impl Into<String>) -> Result<Self, DomainError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::InvalidModel("model name is empty".to_string()));
        }
        Ok(Self { provider, model })
    }

    /// The provider's first catalog model
    pub fn default_for(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
        }
    }

    /// Whether the model is outside the provider's catalog
    pub fn is_custom(&self) -> bool {
        !self.provider.offers(&self.model)
    }
}

impl std::fmt::Display for ModelSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.provider.display_name(), self.model)
    }
}

/// Per-provider connection settings.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Override for [`Provider::default_base_url`].
    pub base_url: Option<String>,
}

/// Settings for all providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub settings: HashMap<Provider, ProviderSettings>,
}

impl ProviderConfig {
    pub fn settings(&self, provider: Provider) -> ProviderSettings {
        self.settings.get(&provider).cloned().unwrap_or_default()
    }

    pub fn base_url(&self, provider: Provider) -> String {
        self.settings
            .get(&provider)
            .and_then(|s| s.base_url.clone())
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }
}
