//! Chat model providers
//!
//! Groq, OpenAI and Google Gemini are all reached through the OpenAI chat
//! completions wire format; see [`openai_compatible`].

pub mod openai_compatible;
pub mod sse;

pub use openai_compatible::{HttpChatModel, OpenAiCompatibleGateway};
pub use sse::SseLineBuffer;
