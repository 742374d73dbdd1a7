//! Notifier that prints to standard error.

use crate::ports::notifier::Notifier;

/// Prints warnings to stderr, where the command-line user sees them.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}
