//! Chat session: the bound chain plus the conversation memory.
//!
//! Every turn replays the whole memory buffer to the model, streams the
//! answer, and only then appends both sides of the turn.

use super::start_chat::ChatChain;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::GatewayError;
use sofia_domain::{ConversationMemory, Message};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during a chat turn.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Load Sofia before starting to chat (use /load <kind> <location>)")]
    NotLoaded,

    #[error("Empty message")]
    EmptyInput,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// State of one interactive chat
pub struct ChatSession {
    chain: Option<ChatChain>,
    memory: ConversationMemory,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            chain: None,
            memory: ConversationMemory::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Store a freshly bound chain, replacing any previous one.
    ///
    /// Memory is kept so the conversation can continue with a new document
    /// or model; call [`clear_history`](Self::clear_history) to start over.
    pub fn bind(&mut self, chain: ChatChain) {
        self.conversation_logger.log(ConversationEvent::chat_started(
            chain.selection(),
            chain.source(),
            chain.document_bytes(),
        ));
        info!(selection = %chain.selection(), source = %chain.source(), "Chain bound");
        self.chain = Some(chain);
    }

    pub fn is_loaded(&self) -> bool {
        self.chain.is_some()
    }

    pub fn chain(&self) -> Option<&ChatChain> {
        self.chain.as_ref()
    }

    /// Prior turns, oldest first
    pub fn history(&self) -> &[Message] {
        self.memory.messages()
    }

    /// Drop all prior turns
    pub fn clear_history(&mut self) {
        let dropped = self.memory.len();
        self.memory.clear();
        self.conversation_logger
            .log(ConversationEvent::history_cleared(dropped));
        debug!(dropped, "History cleared");
    }

    /// Send one user turn, streaming each delta to `on_delta`.
    ///
    /// On success the user message and the full answer are appended to the
    /// memory and the transcript; on failure both are left untouched.
    pub async fn send<F>(&mut self, input: &str, on_delta: F) -> Result<String, ChatError>
    where
        F: FnMut(&str) + Send,
    {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let chain = self.chain.as_ref().ok_or(ChatError::NotLoaded)?;

        let handle = chain.stream(self.memory.messages(), input).await?;
        let answer = handle.forward(on_delta).await?;

        // Both sides are recorded only once the turn is in memory
        self.conversation_logger
            .log(ConversationEvent::user_message(input));
        self.conversation_logger.log(ConversationEvent::ai_message(
            &chain.selection().model,
            &answer,
        ));
        self.memory.add_user_message(input);
        self.memory.add_ai_message(answer.clone());
        debug!(
            turns = self.memory.turns(),
            answer_bytes = answer.len(),
            "Turn complete"
        );

        Ok(answer)
    }
}
