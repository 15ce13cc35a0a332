//! LLM Gateway port
//!
//! Defines the interface for communicating with chat model providers.

use async_trait::async_trait;
use sofia_domain::{Message, ModelSelection, Provider, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Missing API key for {provider}: pass --api-key or set {key_env}")]
    MissingApiKey {
        provider: Provider,
        key_env: &'static str,
    },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("{0} returned an empty response")]
    EmptyResponse(Provider),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for chat model communication
///
/// This port defines how the application layer obtains chat models.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Bind a chat model for the selected provider/model and credential
    async fn create_chat_model(
        &self,
        selection: &ModelSelection,
        api_key: &str,
    ) -> Result<Box<dyn ChatModel>, GatewayError>;
}

/// Handle for receiving streaming events from a chat model.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream, passing each text delta to `on_delta`, and return
    /// the full text.
    pub async fn forward<F>(mut self, mut on_delta: F) -> Result<String, GatewayError>
    where
        F: FnMut(&str) + Send,
    {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_delta(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        on_delta(&text);
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed; return what we have
        Ok(full_text)
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        self.forward(|_| {}).await
    }
}

/// A chat model bound to a provider, model and credential
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Get the provider/model this chat model talks to
    fn selection(&self) -> &ModelSelection;

    /// Send the full message list and get the complete response
    async fn send(&self, messages: &[Message]) -> Result<String, GatewayError>;

    /// Send the full message list and get a streaming response.
    ///
    /// Default implementation calls `send()` and wraps the result in a single
    /// `Completed` event.
    async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let result = self.send(messages).await?;
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forward_collects_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".to_string())).await.unwrap();
        tx.send(StreamEvent::Completed("Hello".to_string())).await.unwrap();
        drop(tx);

        let mut seen = Vec::new();
        let text = StreamHandle::new(rx)
            .forward(|chunk| seen.push(chunk.to_string()))
            .await
            .unwrap();
        assert_eq!(text, "Hello");
        assert_eq!(seen, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_forward_completed_only() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(StreamEvent::Completed("whole".to_string())).await.unwrap();
        let mut seen = String::new();
        let text = StreamHandle::new(rx)
            .forward(|chunk| seen.push_str(chunk))
            .await
            .unwrap();
        assert_eq!(text, "whole");
        assert_eq!(seen, "whole");
    }

    #[tokio::test]
    async fn test_forward_error() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
        tx.send(StreamEvent::Error("boom".to_string())).await.unwrap();
        let result = StreamHandle::new(rx).collect_text().await;
        assert!(matches!(result, Err(GatewayError::RequestFailed(e)) if e == "boom"));
    }

    #[tokio::test]
    async fn test_channel_closed_returns_partial() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(StreamEvent::Delta("cut".to_string())).await.unwrap();
        drop(tx);
        assert_eq!(StreamHandle::new(rx).collect_text().await.unwrap(), "cut");
    }
}
