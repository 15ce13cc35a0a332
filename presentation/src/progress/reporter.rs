//! Progress reporting while a document loads

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sofia_application::LoadProgressNotifier;
use sofia_domain::{Document, DocumentSource};
use std::sync::Mutex;
use std::time::Duration;

/// Reports loading progress with a spinner
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadProgressNotifier for ProgressReporter {
    fn on_load_start(&self, source: &DocumentSource) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Loading {}", source.kind.label()));
        pb.set_message(source.location.clone());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_attempt_failed(&self, attempt: u32, max_attempts: u32, error: &str) {
        self.with_spinner(|pb| {
            pb.set_message(format!(
                "attempt {}/{} failed ({}), retrying",
                attempt,
                max_attempts,
                error.yellow()
            ));
        });
    }

    fn on_load_complete(&self, result: Result<&Document, &str>) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        if let Some(pb) = guard.take() {
            match result {
                Ok(document) => pb.finish_with_message(format!(
                    "{} ({} bytes)",
                    "done".green(),
                    document.len()
                )),
                Err(error) => pb.abandon_with_message(format!("{} {}", "failed:".red(), error)),
            }
        }
    }
}

/// Line-based progress on stderr, for one-shot answers
pub struct SimpleProgress;

impl LoadProgressNotifier for SimpleProgress {
    fn on_load_start(&self, source: &DocumentSource) {
        eprintln!(
            "{} Loading {} {}",
            "->".cyan(),
            source.kind.label().bold(),
            source.location
        );
    }

    fn on_attempt_failed(&self, attempt: u32, max_attempts: u32, error: &str) {
        eprintln!(
            "  {} attempt {}/{} failed: {}",
            "!".yellow(),
            attempt,
            max_attempts,
            error
        );
    }

    fn on_load_complete(&self, result: Result<&Document, &str>) {
        match result {
            Ok(document) => eprintln!("  {} {} bytes", "v".green(), document.len()),
            Err(error) => eprintln!("  {} {}", "x".red(), error),
        }
    }
}
