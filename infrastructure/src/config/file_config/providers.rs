//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use sofia_domain::{Provider, ProviderConfig, ProviderSettings};

/// Connection settings for one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL override for the chat completions API.
    pub base_url: Option<String>,
}

impl FileProviderConfig {
    fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: self
                .base_url
                .as_deref()
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
        }
    }
}

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [providers.groq]
/// api_key = "gsk_..."
///
/// [providers.openai]
/// base_url = "http://localhost:11434/v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub groq: FileProviderConfig,
    pub openai: FileProviderConfig,
    pub gemini: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, provider: Provider) -> &FileProviderConfig {
        match provider {
            Provider::Groq => &self.groq,
            Provider::OpenAi => &self.openai,
            Provider::Gemini => &self.gemini,
        }
    }

    pub fn to_provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::default();
        for provider in Provider::ALL {
            config
                .settings
                .insert(provider, self.get(provider).to_settings());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_provider_config_normalizes_values() {
        let providers = FileProvidersConfig {
            openai: FileProviderConfig {
                api_key: Some("  ".to_string()),
                base_url: Some("http://localhost:11434/v1/".to_string()),
            },
            ..Default::default()
        };
        let config = providers.to_provider_config();
        let openai = config.settings(Provider::OpenAi);
        assert!(openai.api_key.is_none());
        assert_eq!(config.base_url(Provider::OpenAi), "http://localhost:11434/v1");
        assert_eq!(
            config.base_url(Provider::Gemini),
            Provider::Gemini.default_base_url()
        );
    }
}
