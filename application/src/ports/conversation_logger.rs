//! Port for the chat transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! diagnostic messages, while this port records every turn in a
//! machine-readable form (JSONL).

use serde_json::{Value, json};
use sofia_domain::{DocumentSource, ModelSelection};

/// A structured transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "chat_started", "user_message").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A chain was bound to a model and document
    pub fn chat_started(selection: &ModelSelection, source: &DocumentSource, document_bytes: usize) -> Self {
        Self::new(
            "chat_started",
            json!({
                "provider": selection.provider.as_str(),
                "model": selection.model,
                "source_kind": source.kind.as_str(),
                "source": source.location,
                "document_bytes": document_bytes,
            }),
        )
    }

    pub fn user_message(text: &str) -> Self {
        Self::new("user_message", json!({ "text": text }))
    }

    pub fn ai_message(model: &str, text: &str) -> Self {
        Self::new(
            "ai_message",
            json!({ "model": model, "bytes": text.len(), "text": text }),
        )
    }

    pub fn history_cleared(dropped_messages: usize) -> Self {
        Self::new("history_cleared", json!({ "dropped_messages": dropped_messages }))
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and non-fallible so that a broken transcript never
/// interrupts a chat; failures are ignored by implementations.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use sofia_domain::{Provider, SourceKind};

    #[test]
    fn test_chat_started_payload() {
        let selection = ModelSelection::default_for(Provider::OpenAi);
        let source = DocumentSource::new(SourceKind::Csv, "sales.csv");
        let event = ConversationEvent::chat_started(&selection, &source, 120);
        assert_eq!(event.event_type, "chat_started");
        assert_eq!(event.payload["provider"], "openai");
        assert_eq!(event.payload["model"], "gpt-4o-mini");
        assert_eq!(event.payload["source_kind"], "csv");
        assert_eq!(event.payload["document_bytes"], 120);
    }
}
