//! Slash commands understood by the REPL

use sofia_domain::{DocumentSource, Provider, SourceKind};

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    History,
    Clear,
    Load(DocumentSource),
    Model {
        provider: Provider,
        model: Option<String>,
    },
    Key(String),
    Models,
    Sources,
    System,
    Quit,
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/help" | "/h" | "/?" => Ok(ReplCommand::Help),
            "/history" => Ok(ReplCommand::History),
            "/clear" => Ok(ReplCommand::Clear),
            "/models" => Ok(ReplCommand::Models),
            "/sources" => Ok(ReplCommand::Sources),
            "/system" => Ok(ReplCommand::System),
            "/quit" | "/exit" | "/q" => Ok(ReplCommand::Quit),
            "/load" => Self::parse_load(rest),
            "/model" => Self::parse_model(rest),
            "/key" if rest.is_empty() => Err("Usage: /key <api-key>".to_string()),
            "/key" => Ok(ReplCommand::Key(rest.to_string())),
            _ => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                name
            )),
        }
    }

    /// `/load <kind> <location>` or `/load <location>` with the kind inferred
    fn parse_load(rest: &str) -> Result<Self, String> {
        if rest.is_empty() {
            return Err("Usage: /load <kind> <location>".to_string());
        }

        if let Some((first, location)) = rest.split_once(char::is_whitespace)
            && let Ok(kind) = first.parse::<SourceKind>()
        {
            let location = location.trim();
            if location.is_empty() {
                return Err("Usage: /load <kind> <location>".to_string());
            }
            return Ok(ReplCommand::Load(DocumentSource::new(kind, location)));
        }

        DocumentSource::resolve(None, rest)
            .map(ReplCommand::Load)
            .map_err(|e| format!("{} (use /load <kind> <location>)", e))
    }

    fn parse_model(rest: &str) -> Result<Self, String> {
        let mut parts = rest.split_whitespace();
        let provider = parts
            .next()
            .ok_or_else(|| "Usage: /model <provider> [model]".to_string())?
            .parse::<Provider>()
            .map_err(|e| e.to_string())?;
        let model = parts.next().map(str::to_string);
        Ok(ReplCommand::Model { provider, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(ReplCommand::parse("/help").unwrap(), ReplCommand::Help);
        assert_eq!(ReplCommand::parse(" /q ").unwrap(), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/exit").unwrap(), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/clear").unwrap(), ReplCommand::Clear);
        assert!(ReplCommand::parse("/frobnicate").is_err());
    }

    #[test]
    fn test_load_with_kind_keeps_spaces_in_location() {
        let cmd = ReplCommand::parse("/load pdf /home/me/My Report.pdf").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Load(DocumentSource::new(SourceKind::Pdf, "/home/me/My Report.pdf"))
        );
    }

    #[test]
    fn test_load_infers_kind() {
        let cmd = ReplCommand::parse("/load https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Load(DocumentSource::new(
                SourceKind::Youtube,
                "https://youtu.be/dQw4w9WgXcQ"
            ))
        );
        assert!(ReplCommand::parse("/load").is_err());
        assert!(ReplCommand::parse("/load notes.docx").is_err());
    }

    #[test]
    fn test_model_and_key() {
        assert_eq!(
            ReplCommand::parse("/model openai gpt-4o").unwrap(),
            ReplCommand::Model {
                provider: Provider::OpenAi,
                model: Some("gpt-4o".to_string())
            }
        );
        assert_eq!(
            ReplCommand::parse("/model gemini").unwrap(),
            ReplCommand::Model {
                provider: Provider::Gemini,
                model: None
            }
        );
        assert!(ReplCommand::parse("/model").is_err());
        assert_eq!(
            ReplCommand::parse("/key gsk_123").unwrap(),
            ReplCommand::Key("gsk_123".to_string())
        );
        assert!(ReplCommand::parse("/key").is_err());
    }
}
