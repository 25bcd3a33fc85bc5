//! Diagnostics collaborator injected into the engine and registry.

use log::{debug, error, info, warn};

/// Log target used by [`LogDiagnostics`].
pub const LOG_TARGET: &str = "moonstone";

/// Sink for non-fatal notices.
///
/// Nothing in the engine depends on a diagnostic being delivered.
pub trait Diagnostics: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn debug(&self, message: &str) {
        debug!(target: LOG_TARGET, "{}", message);
    }

    fn info(&self, message: &str) {
        info!(target: LOG_TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: LOG_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: LOG_TARGET, "{}", message);
    }
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
