//! Environment-driven settings.

use std::env;
use std::path::PathBuf;

/// Default page size for paginated AWS listings.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Runtime settings resolved from `AWSTOOLS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// INI file whose section names are the credential profiles.
    pub credentials_file: PathBuf,
    /// Program invoked for live AWS lookups.
    pub aws_cli: String,
    /// Items requested per page from paginated listings.
    pub page_size: u32,
    /// Directory to write AWS lookup cassettes into, when recording.
    pub record_dir: Option<PathBuf>,
    /// Cassette to serve AWS lookups from instead of calling AWS.
    pub replay_cassette: Option<PathBuf>,
}

impl Settings {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credentials_file = lookup("AWSTOOLS_CREDENTIALS_FILE")
            .map_or_else(default_credentials_file, PathBuf::from);
        let aws_cli = lookup("AWSTOOLS_AWS_CLI").unwrap_or_else(|| "aws".to_string());
        let page_size = match lookup("AWSTOOLS_PAGE_SIZE").map(|raw| raw.parse::<u32>()) {
            Some(Ok(size)) if size > 0 => size,
            Some(_) => {
                tracing::warn!("AWSTOOLS_PAGE_SIZE is not a positive integer; using default");
                DEFAULT_PAGE_SIZE
            }
            None => DEFAULT_PAGE_SIZE,
        };
        Self {
            credentials_file,
            aws_cli,
            page_size,
            record_dir: lookup("AWSTOOLS_RECORD").map(PathBuf::from),
            replay_cassette: lookup("AWSTOOLS_REPLAY").map(PathBuf::from),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn default_credentials_file() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".aws").join("credentials")
}
