//! Infrastructure layer for sofia
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod loaders;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use loaders::LocalDocumentLoader;
pub use logging::JsonlConversationLogger;
pub use providers::{HttpChatModel, OpenAiCompatibleGateway};
