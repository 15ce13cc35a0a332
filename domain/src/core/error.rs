//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown source kind: {0} (expected one of site, youtube, pdf, csv, txt, excel, image)")]
    UnknownSourceKind(String),

    #[error("Unknown provider: {0} (expected one of groq, openai, gemini)")]
    UnknownProvider(String),

    #[error("Cannot infer source kind from '{0}', pass --kind explicitly")]
    UninferableSource(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_display() {
        let error = DomainError::UnknownProvider("anthropic".to_string());
        assert!(error.to_string().contains("anthropic"));
        assert!(error.to_string().contains("groq"));
    }
}
