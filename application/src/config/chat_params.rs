//! Chat parameters: how each model call is shaped.

use serde::{Deserialize, Serialize};
use sofia_domain::DEFAULT_ASSISTANT_NAME;
use std::time::Duration;

/// Chat model call parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParams {
    /// Name the assistant uses in its system prompt.
    pub assistant_name: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Longest wait for the provider to start answering; `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            temperature: None,
            max_tokens: None,
            request_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ChatParams {
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
