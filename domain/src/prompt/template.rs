//! Prompt templates for document-grounded chat

use crate::document::entities::Document;
use crate::session::entities::Message;

/// Name the assistant introduces itself with
pub const DEFAULT_ASSISTANT_NAME: &str = "Sofia";

/// Delimiter surrounding the document text inside the system prompt
const DOCUMENT_FENCE: &str = "####";

/// Templates for generating prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt embedding the document text as grounding context
    pub fn system(document: &Document, assistant_name: &str) -> String {
        format!(
            r#"You are a friendly assistant named {name}. If anyone asks why you are called {name}, it is because your creator really likes software and artificial intelligence, and since you are an AI model the name comes from SOF = SOFtware and IA = Inteligência Artificial.
You have access to the following information coming from a {kind} document:

{fence}
{content}
{fence}

Use the information provided to ground your answers.

Whenever there is a $ in your output, replace it with S. and if you identify special characters, try to handle them correctly.

If the document information looks like "Just a moment...Enable JavaScript and cookies to continue", suggest that the user load {name} again!"#,
            name = assistant_name,
            kind = document.kind.label(),
            fence = DOCUMENT_FENCE,
            content = document.content,
        )
    }

    /// Messages for one turn: system prompt, then history, then the new input
    pub fn chat_messages(system_prompt: &str, history: &[Message], input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(input));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::entities::SourceKind;
    use crate::session::entities::Role;

    #[test]
    fn test_system_prompt_embeds_document() {
        let doc = Document::new(SourceKind::Pdf, "Quarterly revenue grew 12%.");
        let prompt = PromptTemplate::system(&doc, DEFAULT_ASSISTANT_NAME);
        assert!(prompt.contains("named Sofia"));
        assert!(prompt.contains("from a Pdf document"));
        assert!(prompt.contains("####\nQuarterly revenue grew 12%.\n####"));
        assert!(prompt.contains("replace it with S."));
        assert!(prompt.contains("Enable JavaScript and cookies to continue"));
    }

    #[test]
    fn test_system_prompt_custom_name() {
        let doc = Document::new(SourceKind::Site, "text");
        let prompt = PromptTemplate::system(&doc, "Ana");
        assert!(prompt.contains("named Ana"));
        assert!(prompt.contains("load Ana again"));
    }

    #[test]
    fn test_chat_messages_layout() {
        let history = vec![Message::user("q1"), Message::assistant("a1")];
        let messages = PromptTemplate::chat_messages("sys", &history, "q2");
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn test_chat_messages_empty_history() {
        let messages = PromptTemplate::chat_messages("sys", &[], "hello");
        assert_eq!(messages.len(), 2);
    }
}
