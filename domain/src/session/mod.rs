//! Chat session domain.
//!
//! - [`entities::Message`]: a single turn within a conversation
//! - [`entities::ConversationMemory`]: the buffer replayed to the model each turn
//! - [`stream::StreamEvent`]: incremental model output

pub mod entities;
pub mod stream;
