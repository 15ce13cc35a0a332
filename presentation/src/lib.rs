//! Presentation layer for sofia
//!
//! This crate contains the CLI definition, the interactive chat REPL,
//! console formatting and document loading progress.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, Credentials, ReplCommand};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
