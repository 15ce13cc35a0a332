//! Start Chat use case.
//!
//! Binds a document to a chat model: loads the source, embeds its text in
//! the system prompt and pairs that prompt with a chat model for the chosen
//! provider. The resulting [`ChatChain`] is what [`ChatSession`] sends every
//! turn through.
//!
//! [`ChatSession`]: super::chat_session::ChatSession

use crate::config::ChatParams;
use crate::ports::document_loader::{DocumentLoaderPort, LoadError};
use crate::ports::llm_gateway::{ChatModel, GatewayError, LlmGateway, StreamHandle};
use crate::ports::progress::LoadProgressNotifier;
use sofia_domain::{DocumentSource, Message, ModelSelection, PromptTemplate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while starting a chat.
#[derive(Error, Debug)]
pub enum StartChatError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Input for the [`StartChatUseCase`].
#[derive(Debug, Clone)]
pub struct StartChatInput {
    pub selection: ModelSelection,
    pub api_key: String,
    pub source: DocumentSource,
}

impl StartChatInput {
    pub fn new(selection: ModelSelection, api_key: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            selection,
            api_key: api_key.into(),
            source,
        }
    }
}

/// A system prompt bound to a chat model
pub struct ChatChain {
    source: DocumentSource,
    system_prompt: String,
    document_bytes: usize,
    model: Box<dyn ChatModel>,
}

impl ChatChain {
    pub fn new(source: DocumentSource, system_prompt: String, document_bytes: usize, model: Box<dyn ChatModel>) -> Self {
        Self {
            source,
            system_prompt,
            document_bytes,
            model,
        }
    }

    pub fn selection(&self) -> &ModelSelection {
        self.model.selection()
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn document_bytes(&self) -> usize {
        self.document_bytes
    }

    /// Stream the answer to `input` given the prior `history`
    pub async fn stream(&self, history: &[Message], input: &str) -> Result<StreamHandle, GatewayError> {
        let messages = PromptTemplate::chat_messages(&self.system_prompt, history, input);
        debug!(
            model = %self.selection().model,
            messages = messages.len(),
            "Sending chat turn"
        );
        self.model.send_streaming(&messages).await
    }
}

/// Use case for binding a document and a chat model into a [`ChatChain`].
pub struct StartChatUseCase {
    loader: Arc<dyn DocumentLoaderPort>,
    gateway: Arc<dyn LlmGateway>,
    params: ChatParams,
}

impl Clone for StartChatUseCase {
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            gateway: self.gateway.clone(),
            params: self.params.clone(),
        }
    }
}

impl StartChatUseCase {
    pub fn new(loader: Arc<dyn DocumentLoaderPort>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            loader,
            gateway,
            params: ChatParams::default(),
        }
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    /// Load the document, build the system prompt and bind the chat model.
    pub async fn execute(
        &self,
        input: StartChatInput,
        progress: &dyn LoadProgressNotifier,
    ) -> Result<ChatChain, StartChatError> {
        info!(source = %input.source, selection = %input.selection, "Starting chat");

        if input.selection.is_custom() {
            warn!(
                "Model '{}' is not in the {} catalog",
                input.selection.model, input.selection.provider
            );
        }

        progress.on_load_start(&input.source);
        let document = match self.loader.load(&input.source, progress).await {
            Ok(document) => {
                progress.on_load_complete(Ok(&document));
                document
            }
            Err(e) => {
                progress.on_load_complete(Err(&e.to_string()));
                return Err(e.into());
            }
        };

        let system_prompt = PromptTemplate::system(&document, &self.params.assistant_name);
        debug!("System prompt:\n{}", system_prompt);

        let model = self
            .gateway
            .create_chat_model(&input.selection, &input.api_key)
            .await?;

        info!(
            document_bytes = document.len(),
            "Bound {} document to {}",
            document.kind.label(),
            input.selection
        );

        Ok(ChatChain::new(input.source, system_prompt, document.len(), model))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use sofia_domain::{Document, Provider, SourceKind, StreamEvent};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    pub(crate) struct FixedLoader {
        pub content: Result<String, String>,
    }

    #[async_trait]
    impl DocumentLoaderPort for FixedLoader {
        async fn load(
            &self,
            source: &DocumentSource,
            _progress: &dyn LoadProgressNotifier,
        ) -> Result<Document, LoadError> {
            match &self.content {
                Ok(text) => Ok(Document::new(source.kind, text.clone())),
                Err(e) => Err(LoadError::Http(e.clone())),
            }
        }
    }

    /// Chat model that answers with canned chunks and records each request
    pub(crate) struct ScriptedModel {
        pub selection: ModelSelection,
        pub chunks: Vec<String>,
        pub fail: bool,
        pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn selection(&self) -> &ModelSelection {
            &self.selection
        }

        async fn send(&self, messages: &[Message]) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            Ok(self.chunks.concat())
        }

        async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err(GatewayError::ConnectionError("refused".to_string()));
            }
            let (tx, rx) = mpsc::channel(self.chunks.len() + 1);
            for chunk in &self.chunks {
                tx.send(StreamEvent::Delta(chunk.clone())).await.unwrap();
            }
            tx.send(StreamEvent::Completed(self.chunks.concat())).await.unwrap();
            Ok(StreamHandle::new(rx))
        }
    }

    pub(crate) struct ScriptedGateway {
        pub chunks: Vec<String>,
        pub fail_stream: bool,
        pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
        pub keys: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        pub fn new(chunks: &[&str]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                fail_stream: false,
                requests: Arc::new(Mutex::new(Vec::new())),
                keys: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn create_chat_model(
            &self,
            selection: &ModelSelection,
            api_key: &str,
        ) -> Result<Box<dyn ChatModel>, GatewayError> {
            if api_key.is_empty() {
                return Err(GatewayError::MissingApiKey {
                    provider: selection.provider,
                    key_env: selection.provider.api_key_env(),
                });
            }
            self.keys.lock().unwrap().push(api_key.to_string());
            Ok(Box::new(ScriptedModel {
                selection: selection.clone(),
                chunks: self.chunks.clone(),
                fail: self.fail_stream,
                requests: self.requests.clone(),
            }))
        }
    }

    fn input(key: &str) -> StartChatInput {
        StartChatInput::new(
            ModelSelection::default_for(Provider::Groq),
            key,
            DocumentSource::new(SourceKind::Txt, "notes.txt"),
        )
    }

    #[tokio::test]
    async fn test_execute_embeds_document_in_system_prompt() {
        let loader = Arc::new(FixedLoader {
            content: Ok("The meeting is on Friday.".to_string()),
        });
        let gateway = Arc::new(ScriptedGateway::new(&["ok"]));
        let use_case = StartChatUseCase::new(loader, gateway.clone());

        let chain = use_case.execute(input("key-1"), &NoProgress).await.unwrap();

        assert!(chain.system_prompt().contains("The meeting is on Friday."));
        assert!(chain.system_prompt().contains("from a Txt document"));
        assert_eq!(chain.selection().model, "llama-3.1-70b-versatile");
        assert_eq!(chain.document_bytes(), "The meeting is on Friday.".len());
        assert_eq!(*gateway.keys.lock().unwrap(), vec!["key-1".to_string()]);
    }

    #[tokio::test]
    async fn test_execute_uses_assistant_name() {
        let loader = Arc::new(FixedLoader {
            content: Ok("doc".to_string()),
        });
        let gateway = Arc::new(ScriptedGateway::new(&["ok"]));
        let use_case = StartChatUseCase::new(loader, gateway)
            .with_params(ChatParams::default().with_assistant_name("Clara"));

        let chain = use_case.execute(input("k"), &NoProgress).await.unwrap();
        assert!(chain.system_prompt().contains("named Clara"));
    }

    #[tokio::test]
    async fn test_execute_propagates_load_error() {
        let loader = Arc::new(FixedLoader {
            content: Err("unreachable".to_string()),
        });
        let gateway = Arc::new(ScriptedGateway::new(&[]));
        let use_case = StartChatUseCase::new(loader, gateway.clone());

        let result = use_case.execute(input("k"), &NoProgress).await;
        assert!(matches!(result, Err(StartChatError::Load(LoadError::Http(_)))));
        assert!(gateway.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_missing_key() {
        let loader = Arc::new(FixedLoader {
            content: Ok("doc".to_string()),
        });
        let gateway = Arc::new(ScriptedGateway::new(&[]));
        let use_case = StartChatUseCase::new(loader, gateway);

        let result = use_case.execute(input(""), &NoProgress).await;
        assert!(matches!(
            result,
            Err(StartChatError::Gateway(GatewayError::MissingApiKey { .. }))
        ));
    }

    #[tokio::test]
    async fn test_chain_stream_sends_system_history_and_input() {
        let loader = Arc::new(FixedLoader {
            content: Ok("doc".to_string()),
        });
        let gateway = Arc::new(ScriptedGateway::new(&["a", "b"]));
        let use_case = StartChatUseCase::new(loader, gateway.clone());
        let chain = use_case.execute(input("k"), &NoProgress).await.unwrap();

        let history = vec![Message::user("q1"), Message::assistant("a1")];
        let text = chain.stream(&history, "q2").await.unwrap().collect_text().await.unwrap();
        assert_eq!(text, "ab");

        let requests = gateway.requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].content, chain.system_prompt());
        assert_eq!(sent[3], Message::user("q2"));
    }
}
