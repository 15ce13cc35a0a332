//! Configuration file loading for sofia
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SOFIA_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sofia.toml` or `./.sofia.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sofia/config.toml`
//! 5. Default values
//!
//! Command line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, FileChatConfig, FileConfig, FileLoaderConfig, FileLogConfig,
    FileProviderConfig, FileProvidersConfig, FileReplConfig, Severity,
};
pub use loader::ConfigLoader;
