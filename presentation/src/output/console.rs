//! Console output formatting for the chat

use colored::Colorize;
use sofia_application::ChatChain;
use sofia_domain::{Message, ModelSelection, Provider, Role, SourceKind};

/// Formats chat state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner shown when the REPL starts
    pub fn welcome(assistant_name: &str, selection: &ModelSelection) -> String {
        let title = format!("{} - chat with your documents", assistant_name);
        let width = title.chars().count() + 8;
        let mut output = String::new();
        output.push('\n');
        output.push_str(&format!("╭{}╮\n", "─".repeat(width)));
        output.push_str(&format!("│    {}    │\n", title.bold()));
        output.push_str(&format!("╰{}╯\n", "─".repeat(width)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), selection));
        output.push('\n');
        output.push_str(&Self::help());
        output
    }

    pub fn help() -> String {
        let commands = [
            ("/load <kind> <location>", "Load a document (kind inferred when omitted)"),
            ("/model <provider> [model]", "Switch provider and model"),
            ("/key <api-key>", "Set the API key for the current provider"),
            ("/history", "Show the conversation so far"),
            ("/clear", "Clear the conversation history"),
            ("/models", "List the model catalog"),
            ("/sources", "List the supported source kinds"),
            ("/system", "Show the current system prompt"),
            ("/help, /h, /?", "Show this help"),
            ("/quit, /exit, /q", "Exit chat"),
        ];
        let mut output = format!("{}\n", "Commands:".cyan().bold());
        for (command, description) in commands {
            output.push_str(&format!("  {:<27} {}\n", command, description.dimmed()));
        }
        output
    }

    /// One line per prior message, colored by speaker
    pub fn history(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", "(no messages yet)".dimmed());
        }
        messages
            .iter()
            .map(|m| format!("{} {}\n", Self::speaker(m.role), m.content))
            .collect()
    }

    /// Prefix printed before a streamed answer
    pub fn ai_prefix() -> String {
        Self::speaker(Role::Assistant)
    }

    fn speaker(role: Role) -> String {
        let label = format!("{}:", role.speaker());
        match role {
            Role::User => label.green().bold().to_string(),
            Role::Assistant => label.magenta().bold().to_string(),
            Role::System => label.dimmed().to_string(),
        }
    }

    /// The model catalog, marking the active selection
    pub fn models(current: Option<&ModelSelection>) -> String {
        let mut output = String::new();
        for provider in Provider::ALL {
            output.push_str(&format!(
                "{} {}\n",
                provider.display_name().cyan().bold(),
                format!("({}, key: {})", provider.as_str(), provider.api_key_env()).dimmed()
            ));
            for model in provider.models() {
                let active = current.is_some_and(|s| s.provider == provider && s.model == *model);
                let marker = if active { "*".green().bold().to_string() } else { " ".to_string() };
                output.push_str(&format!("  {} {}\n", marker, model));
            }
        }
        if let Some(selection) = current.filter(|s| s.is_custom()) {
            output.push_str(&format!(
                "\n{} {} (not in the catalog)\n",
                "Custom:".yellow().bold(),
                selection
            ));
        }
        output
    }

    /// Supported source kinds with what each expects
    pub fn sources() -> String {
        let mut output = format!("{}\n", "Sources:".cyan().bold());
        for kind in SourceKind::ALL {
            output.push_str(&format!("  {:<8} {}\n", kind.as_str(), kind.location_hint().dimmed()));
        }
        output
    }

    /// Confirmation after a chain is bound
    pub fn loaded(chain: &ChatChain) -> String {
        format!(
            "{} {} document ({} bytes) with {}\n",
            "Loaded".green().bold(),
            chain.source().kind.label(),
            chain.document_bytes(),
            chain.selection()
        )
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn notice(message: &str) -> String {
        format!("{} {}", "->".cyan(), message)
    }
}
