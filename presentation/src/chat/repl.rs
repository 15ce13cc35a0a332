//! REPL (Read-Eval-Print Loop) for chatting with a loaded document

use super::command::ReplCommand;
use super::credentials::Credentials;
use crate::ConsoleFormatter;
use crate::ProgressReporter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use sofia_application::{
    ChatError, ChatSession, LoadProgressNotifier, NoProgress, StartChatInput, StartChatUseCase,
};
use sofia_domain::{DocumentSource, ModelSelection};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: StartChatUseCase,
    session: ChatSession,
    selection: ModelSelection,
    credentials: Credentials,
    source: Option<DocumentSource>,
    show_progress: bool,
    print_system_prompt: bool,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(
        use_case: StartChatUseCase,
        session: ChatSession,
        selection: ModelSelection,
        credentials: Credentials,
    ) -> Self {
        Self {
            use_case,
            session,
            selection,
            credentials,
            source: None,
            show_progress: true,
            print_system_prompt: false,
            history_file: None,
        }
    }

    /// Document to load before the first prompt
    pub fn with_source(mut self, source: Option<DocumentSource>) -> Self {
        self.source = source;
        self
    }

    /// Set whether to show a spinner while loading
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Print the system prompt after every successful load
    pub fn with_print_system_prompt(mut self, print: bool) -> Self {
        self.print_system_prompt = print;
        self
    }

    /// Override where line history is kept
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("sofia").join("history.txt")))
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!(
            "{}",
            ConsoleFormatter::welcome(&self.use_case.params().assistant_name, &self.selection)
        );

        if let Some(source) = self.source.take() {
            let selection = self.selection.clone();
            self.rebind(source, selection).await;
        }
        if !self.session.history().is_empty() {
            print!("{}", ConsoleFormatter::history(self.session.history()));
        }

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path
            && let Err(e) = rl.save_history(path)
        {
            warn!(path = %path.display(), error = %e, "failed to save line history");
        }

        Ok(())
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        let command = match ReplCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                return false;
            }
        };
        debug!(?command, "REPL command");

        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                print!("{}", ConsoleFormatter::help());
                println!();
            }
            ReplCommand::History => {
                print!("{}", ConsoleFormatter::history(self.session.history()));
            }
            ReplCommand::Clear => {
                self.session.clear_history();
                println!("{}", ConsoleFormatter::notice("History cleared"));
            }
            ReplCommand::Models => {
                print!("{}", ConsoleFormatter::models(Some(&self.selection)));
            }
            ReplCommand::Sources => {
                print!("{}", ConsoleFormatter::sources());
            }
            ReplCommand::System => match self.session.chain() {
                Some(chain) => println!("{}", chain.system_prompt()),
                None => println!("{}", ConsoleFormatter::error(&ChatError::NotLoaded.to_string())),
            },
            ReplCommand::Load(source) => {
                let selection = self.selection.clone();
                self.rebind(source, selection).await;
            }
            ReplCommand::Model { provider, model } => {
                let selection = match model {
                    Some(model) => match ModelSelection::new(provider, model) {
                        Ok(selection) => selection,
                        Err(e) => {
                            println!("{}", ConsoleFormatter::error(&e.to_string()));
                            return false;
                        }
                    },
                    None => ModelSelection::default_for(provider),
                };
                match self.source.clone() {
                    Some(source) => {
                        if !self.rebind(source, selection).await {
                            println!(
                                "{}",
                                ConsoleFormatter::notice(&format!("Keeping {}", self.selection))
                            );
                        }
                    }
                    None => {
                        self.selection = selection;
                        println!(
                            "{}",
                            ConsoleFormatter::notice(&format!("Model set to {}", self.selection))
                        );
                    }
                }
            }
            ReplCommand::Key(key) => {
                self.credentials.set(self.selection.provider, key);
                println!(
                    "{}",
                    ConsoleFormatter::notice(&format!(
                        "API key set for {}",
                        self.selection.provider.display_name()
                    ))
                );
                if let Some(source) = self.source.clone() {
                    let selection = self.selection.clone();
                    self.rebind(source, selection).await;
                }
            }
        }
        false
    }

    /// Build a chain for `source` and `selection`.
    ///
    /// Both are committed, and the chain replaces the bound one, only when
    /// the load and the model binding succeed. Returns whether they did.
    async fn rebind(&mut self, source: DocumentSource, selection: ModelSelection) -> bool {
        let provider = selection.provider;
        let Some(api_key) = self.credentials.resolve(provider) else {
            println!(
                "{}",
                ConsoleFormatter::error(&format!(
                    "No API key for {}: set {} or use /key <api-key>",
                    provider.display_name(),
                    provider.api_key_env()
                ))
            );
            return false;
        };

        let input = StartChatInput::new(selection.clone(), api_key, source.clone());
        let progress: Box<dyn LoadProgressNotifier> = if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(NoProgress)
        };

        match self.use_case.execute(input, progress.as_ref()).await {
            Ok(chain) => {
                print!("{}", ConsoleFormatter::loaded(&chain));
                if self.print_system_prompt {
                    println!("{}", chain.system_prompt());
                }
                self.session.bind(chain);
                self.source = Some(source);
                self.selection = selection;
                true
            }
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                false
            }
        }
    }

    async fn process_message(&mut self, message: &str) {
        if !self.session.is_loaded() {
            println!("{}", ConsoleFormatter::error(&ChatError::NotLoaded.to_string()));
            return;
        }

        print!("{} ", ConsoleFormatter::ai_prefix());
        let _ = std::io::stdout().flush();

        let result = self
            .session
            .send(message, |delta| {
                print!("{}", delta);
                let _ = std::io::stdout().flush();
            })
            .await;

        println!();
        if let Err(e) = result {
            println!("{}", ConsoleFormatter::error(&e.to_string()));
        }
        println!();
    }
}
