//! Application layer for sofia
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ChatParams, LoaderParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    document_loader::{DocumentLoaderPort, LoadError},
    llm_gateway::{ChatModel, GatewayError, LlmGateway, StreamHandle},
    progress::{LoadProgressNotifier, NoProgress},
};
pub use use_cases::chat_session::{ChatError, ChatSession};
pub use use_cases::start_chat::{ChatChain, StartChatError, StartChatInput, StartChatUseCase};
