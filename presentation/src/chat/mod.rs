//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over a loaded
//! document, plus the credential store shared with one-shot mode.

mod command;
mod credentials;
mod repl;

pub use command::ReplCommand;
pub use credentials::Credentials;
pub use repl::ChatRepl;
