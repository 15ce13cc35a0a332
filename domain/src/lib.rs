//! Domain layer for sofia
//!
//! This crate contains the core entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Document**: text normalized from one of seven source kinds
//! - **Provider / ModelSelection**: which hosted chat model answers
//! - **ConversationMemory**: past turns replayed to the model on every call
//! - **PromptTemplate**: the system prompt that grounds answers in the document

pub mod core;
pub mod document;
pub mod prompt;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use core::error::DomainError;
pub use document::entities::{Document, DocumentSource, PART_SEPARATOR, SourceKind, join_parts};
pub use prompt::{DEFAULT_ASSISTANT_NAME, PromptTemplate};
pub use providers::{ModelSelection, Provider, ProviderConfig, ProviderSettings};
pub use session::{
    entities::{ConversationMemory, Message, Role},
    stream::StreamEvent,
};
