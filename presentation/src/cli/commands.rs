//! CLI command definitions

use clap::Parser;
use sofia_domain::{Provider, SourceKind};
use std::path::PathBuf;

fn parse_kind(s: &str) -> Result<SourceKind, String> {
    s.parse().map_err(|e: sofia_domain::DomainError| e.to_string())
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse().map_err(|e: sofia_domain::DomainError| e.to_string())
}

/// CLI arguments for sofia
#[derive(Parser, Debug)]
#[command(name = "sofia")]
#[command(author, version, about = "Chat with a document: sites, videos, PDFs, spreadsheets and images")]
#[command(long_about = r#"
Sofia loads one document, puts its text in front of a chat model and lets you
ask questions about it.

Sources: site (URL), youtube (URL or video id), pdf, csv, txt, excel (.xlsx/.xls)
and image (.png/.jpg/.jpeg, OCR through tesseract).

Providers: groq (GROQ_API_KEY), openai (OPENAI_API_KEY), gemini (GOOGLE_API_KEY).

Configuration files are loaded from (in priority order):
1. SOFIA_* environment variables (e.g. SOFIA_CHAT__PROVIDER=openai)
2. --config <path>     Explicit config file
3. ./sofia.toml        Project-level config
4. ~/.config/sofia/config.toml   Global config

Example:
  sofia --source https://example.com/article
  sofia -s report.pdf -p openai -m gpt-4o "Summarize the conclusions"
  sofia -s https://youtu.be/dQw4w9WgXcQ -p gemini
"#)]
pub struct Cli {
    /// Ask one question, print the answer and exit (requires --source)
    pub question: Option<String>,

    /// Document to load: URL, video id or file path
    #[arg(short, long, value_name = "LOCATION")]
    pub source: Option<String>,

    /// Source kind (site, youtube, pdf, csv, txt, excel, image); inferred when omitted
    #[arg(short, long, value_name = "KIND", value_parser = parse_kind)]
    pub kind: Option<SourceKind>,

    /// Chat model provider (groq, openai, gemini)
    #[arg(short, long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<Provider>,

    /// Model name; defaults to the provider's first catalog model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// API key for the selected provider (overrides config and environment)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Append the chat transcript to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Print the system prompt after loading the document
    #[arg(long)]
    pub print_system_prompt: bool,

    /// List the model catalog and exit
    #[arg(long)]
    pub list_models: bool,

    /// List the supported source kinds and exit
    #[arg(long)]
    pub list_sources: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
