//! Notifier port for user-visible messages.

/// Surfaces messages to the person driving the tool.
///
/// Only conditions the user can act on go through here (a missing
/// credentials file, for instance); everything else is logged.
pub trait Notifier: Send + Sync {
    /// Shows a warning.
    fn warn(&self, message: &str);
}
