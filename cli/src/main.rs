//! CLI entrypoint for sofia
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use sofia_application::{
    ChatSession, LoadProgressNotifier, NoProgress, StartChatInput, StartChatUseCase,
};
use sofia_domain::{DocumentSource, ModelSelection};
use sofia_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalDocumentLoader,
    OpenAiCompatibleGateway,
};
use sofia_presentation::{ChatRepl, Cli, ConsoleFormatter, Credentials, SimpleProgress};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }
    if cli.list_models {
        print!("{}", ConsoleFormatter::models(None));
        return Ok(());
    }
    if cli.list_sources {
        print!("{}", ConsoleFormatter::sources());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Kept alive until exit so buffered file logs are flushed
    let _log_guard = init_logging(cli.verbose, config.log.dir.as_deref())?;

    info!("Starting sofia");
    check_config(&config)?;

    let selection = resolve_selection(&cli, &config)?;
    let (chat_params, _) = config.chat.to_chat_params();
    let (loader_params, _) = config.loader.to_loader_params();
    let provider_config = config.providers.to_provider_config();

    let mut credentials = Credentials::new(&provider_config);
    if let Some(key) = &cli.api_key {
        credentials.set(selection.provider, key.as_str());
    }

    let source = cli
        .source
        .as_deref()
        .map(|location| DocumentSource::resolve(cli.kind, location))
        .transpose()?;
    if source.is_none() && cli.kind.is_some() {
        warn!("--kind has no effect without --source");
    }

    // === Dependency Injection ===
    let loader = Arc::new(LocalDocumentLoader::new(&loader_params)?);
    let gateway = Arc::new(OpenAiCompatibleGateway::with_connect_timeout(
        provider_config,
        chat_params.clone(),
        loader_params.http_timeout,
    )?);
    let use_case = StartChatUseCase::new(loader, gateway).with_params(chat_params);

    let mut session = ChatSession::new();
    if let Some(path) = cli.transcript.as_ref().or(config.chat.transcript.as_ref()) {
        let logger = JsonlConversationLogger::open(path)
            .with_context(|| format!("Failed to open transcript {}", path.display()))?;
        info!(path = %path.display(), "Writing chat transcript");
        session = session.with_conversation_logger(Arc::new(logger));
    }

    // Single question mode
    if let Some(question) = cli.question.as_deref() {
        let Some(source) = source else {
            bail!("A question needs a document: use --source <LOCATION>");
        };
        let provider = selection.provider;
        let api_key = credentials.resolve(provider).ok_or_else(|| {
            anyhow!(
                "No API key for {}: set {} or pass --api-key",
                provider.display_name(),
                provider.api_key_env()
            )
        })?;

        let progress: Box<dyn LoadProgressNotifier> = if cli.quiet {
            Box::new(NoProgress)
        } else {
            Box::new(SimpleProgress)
        };
        let chain = use_case
            .execute(StartChatInput::new(selection, api_key, source), progress.as_ref())
            .await?;
        if cli.print_system_prompt {
            println!("{}\n", chain.system_prompt());
        }
        session.bind(chain);

        session
            .send(question, |delta| {
                print!("{}", delta);
                let _ = std::io::stdout().flush();
            })
            .await?;
        println!();
        return Ok(());
    }

    // Chat mode
    let mut repl = ChatRepl::new(use_case, session, selection, credentials)
        .with_source(source)
        .with_progress(!cli.quiet && config.repl.show_progress)
        .with_print_system_prompt(cli.print_system_prompt)
        .with_history_file(config.repl.history_file.clone());
    repl.run().await?;

    Ok(())
}

/// Stderr logging from `-v`, overridden by `RUST_LOG`, plus an optional daily file
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "sofia.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_ansi(false).with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}

/// Log warnings and fail on errors found in the merged configuration
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

/// CLI flags win over `[chat]`; a provider without a model uses its first catalog model
fn resolve_selection(cli: &Cli, config: &FileConfig) -> Result<ModelSelection> {
    let (configured, _) = config.chat.parse_selection();

    let selection = match (cli.provider, cli.model.as_deref()) {
        (Some(provider), Some(model)) => ModelSelection::new(provider, model)?,
        (Some(provider), None) => match configured {
            Some(selection) if selection.provider == provider => selection,
            _ => ModelSelection::default_for(provider),
        },
        (None, Some(model)) => {
            let provider = configured.map(|s| s.provider).unwrap_or_default();
            ModelSelection::new(provider, model)?
        }
        (None, None) => {
            configured.unwrap_or_else(|| ModelSelection::default_for(Default::default()))
        }
    };
    Ok(selection)
}
