//! Chat completions client for OpenAI-compatible APIs
//!
//! Groq, OpenAI and Gemini (through its OpenAI compatibility endpoint) share
//! the `/chat/completions` request and SSE response shapes, so one adapter
//! serves all three.

use super::sse::{SseData, SseLineBuffer, data_payload};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use sofia_application::{ChatModel, ChatParams, GatewayError, LlmGateway, StreamHandle};
use sofia_domain::{Message, ModelSelection, Provider, ProviderConfig, StreamEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of the delta channel between the HTTP task and the consumer
const STREAM_CHANNEL_CAPACITY: usize = 64;

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Human-readable part of an API error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .or_else(|_| {
            // Gemini wraps errors in a one-element array
            serde_json::from_str::<Vec<ErrorBody>>(body)
                .map_err(|_| ())
                .and_then(|mut v| v.pop().map(|b| b.error.message).ok_or(()))
        })
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Text delta carried by one stream chunk
fn chunk_delta(json: &str) -> Result<Option<String>, serde_json::Error> {
    let chunk: ChatChunk = serde_json::from_str(json)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|c| !c.is_empty()))
}

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

// ==================== Chat model ====================

/// A chat model bound to one provider endpoint and credential
pub struct HttpChatModel {
    client: reqwest::Client,
    selection: ModelSelection,
    endpoint: String,
    api_key: String,
    params: ChatParams,
}

impl HttpChatModel {
    pub fn new(
        client: reqwest::Client,
        selection: ModelSelection,
        base_url: &str,
        api_key: impl Into<String>,
        params: ChatParams,
    ) -> Self {
        Self {
            client,
            selection,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            params,
        }
    }

    fn request_body<'a>(&'a self, messages: &'a [Message], stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.selection.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream,
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }

    async fn post(&self, messages: &[Message], stream: bool) -> Result<reqwest::Response, GatewayError> {
        debug!(
            provider = self.selection.provider.as_str(),
            model = %self.selection.model,
            messages = messages.len(),
            stream,
            "chat completion request"
        );

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, stream))
            .send();
        // Limits the wait for response headers; the body stream is unbounded
        let response = match self.params.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| GatewayError::Timeout)?,
            None => request.await,
        }
        .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                provider: self.selection.provider,
                status: status.as_u16(),
                body: error_message(&body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    async fn send(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let completion: ChatCompletion = self
            .post(messages, false)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("Invalid response body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(GatewayError::EmptyResponse(self.selection.provider))
    }

    async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let response = self.post(messages, true).await?;
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let provider = self.selection.provider;

        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut lines = SseLineBuffer::new();
            let mut full_text = String::new();

            'stream: while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(format!("Stream error: {}", e))).await;
                        return;
                    }
                };
                for line in lines.push(&chunk) {
                    match data_payload(&line) {
                        Some(SseData::Done) => break 'stream,
                        Some(SseData::Json(json)) => match chunk_delta(json) {
                            Ok(Some(delta)) => {
                                full_text.push_str(&delta);
                                if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                                    // Receiver dropped
                                    return;
                                }
                            }
                            Ok(None) => {}
                            Err(e) => warn!(error = %e, "skipping malformed stream chunk"),
                        },
                        None => {}
                    }
                }
            }

            let trailing = lines.finish();
            if let Some(SseData::Json(json)) = trailing.as_deref().and_then(data_payload) {
                if let Ok(Some(delta)) = chunk_delta(json) {
                    full_text.push_str(&delta);
                    let _ = tx.send(StreamEvent::Delta(delta)).await;
                }
            }

            let event = if full_text.is_empty() {
                StreamEvent::Error(GatewayError::EmptyResponse(provider).to_string())
            } else {
                StreamEvent::Completed(full_text)
            };
            let _ = tx.send(event).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

// ==================== Gateway ====================

/// [`LlmGateway`] for every provider speaking the OpenAI chat completions API
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    providers: ProviderConfig,
    params: ChatParams,
}

impl OpenAiCompatibleGateway {
    pub fn new(providers: ProviderConfig, params: ChatParams) -> Result<Self, GatewayError> {
        Self::with_connect_timeout(providers, params, None)
    }

    pub fn with_connect_timeout(
        providers: ProviderConfig,
        params: ChatParams,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            providers,
            params,
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn create_chat_model(
        &self,
        selection: &ModelSelection,
        api_key: &str,
    ) -> Result<Box<dyn ChatModel>, GatewayError> {
        let provider: Provider = selection.provider;
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey {
                provider,
                key_env: provider.api_key_env(),
            });
        }

        let base_url = self.providers.base_url(provider);
        debug!(provider = provider.as_str(), model = %selection.model, base_url = %base_url, "binding chat model");

        Ok(Box::new(HttpChatModel::new(
            self.client.clone(),
            selection.clone(),
            &base_url,
            api_key.trim(),
            self.params.clone(),
        )))
    }
}
