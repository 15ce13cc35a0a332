//! Prompt domain
//!
//! The system prompt that grounds the assistant in a document, and the
//! `[system, history..., user]` message layout sent on every turn.

mod template;

pub use template::{DEFAULT_ASSISTANT_NAME, PromptTemplate};
