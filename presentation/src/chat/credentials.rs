//! Per-provider API keys, remembered for the life of the process

use sofia_domain::{Provider, ProviderConfig};
use std::collections::HashMap;

/// Resolves the API key for a provider.
///
/// Order: a key given during this run (`--api-key`, `/key`), then the
/// config file, then the provider's environment variable.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    given: HashMap<Provider, String>,
    configured: HashMap<Provider, String>,
}

impl Credentials {
    pub fn new(config: &ProviderConfig) -> Self {
        let configured = Provider::ALL
            .into_iter()
            .filter_map(|p| config.settings(p).api_key.map(|key| (p, key)))
            .collect();
        Self {
            given: HashMap::new(),
            configured,
        }
    }

    /// Remember a key for `provider`; blank keys are ignored
    pub fn set(&mut self, provider: Provider, key: impl Into<String>) {
        let key = key.into().trim().to_string();
        if !key.is_empty() {
            self.given.insert(provider, key);
        }
    }

    pub fn resolve(&self, provider: Provider) -> Option<String> {
        self.resolve_with(provider, |name| std::env::var(name).ok())
    }

    fn resolve_with(&self, provider: Provider, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.given
            .get(&provider)
            .or_else(|| self.configured.get(&provider))
            .cloned()
            .or_else(|| env(provider.api_key_env()))
            .filter(|key| !key.trim().is_empty())
    }
}
