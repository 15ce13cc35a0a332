//! Progress notification port
//!
//! Defines the interface for reporting progress while a document loads.

use sofia_domain::{Document, DocumentSource};

/// Callback for progress updates during document loading
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text, etc.)
pub trait LoadProgressNotifier: Send + Sync {
    /// Called when loading starts
    fn on_load_start(&self, source: &DocumentSource);

    /// Called when one fetch attempt fails and another will follow
    fn on_attempt_failed(&self, _attempt: u32, _max_attempts: u32, _error: &str) {}

    /// Called when loading finishes
    fn on_load_complete(&self, result: Result<&Document, &str>);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl LoadProgressNotifier for NoProgress {
    fn on_load_start(&self, _source: &DocumentSource) {}
    fn on_load_complete(&self, _result: Result<&Document, &str>) {}
}
