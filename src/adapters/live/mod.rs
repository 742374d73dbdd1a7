//! Live adapters for real external interactions.

pub mod aws_cli;
pub mod credentials;
pub mod filesystem;
pub mod notifier;

pub use aws_cli::AwsCliLookup;
pub use filesystem::LiveFileSystem;
pub use notifier::StderrNotifier;
