//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application parameters
//! with the issues found along the way.

mod chat;
mod issue;
mod loader;
mod providers;
mod repl;

pub use chat::FileChatConfig;
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::FileLoaderConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use repl::{FileLogConfig, FileReplConfig};

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider, model and persona
    pub chat: FileChatConfig,
    /// Document loader tuning
    pub loader: FileLoaderConfig,
    /// Per-provider keys and endpoints
    pub providers: FileProvidersConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// File logging
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.chat.parse_selection().1);
        issues.extend(self.chat.to_chat_params().1);
        issues.extend(self.loader.to_loader_params().1);
        issues
    }
}
