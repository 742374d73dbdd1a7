//! AWS lookup port: live names and browsable children from AWS.
//!
//! Lookups that AWS paginates return one [`Page`] per call and are driven
//! by a [`Pager`], which follows continuation tokens until they run out.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`AwsLookup`] to keep the trait dyn-compatible.
pub type LookupFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, LookupError>> + Send + 'a>>;

/// Failure of a single lookup. Lookups are never retried.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The credentials file does not exist.
    #[error("{} is not found", .0.display())]
    CredentialsMissing(PathBuf),
    /// The credentials file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The lookup program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The lookup program ran and reported failure.
    #[error("`{command}` exited with status {status}: {stderr}")]
    Command {
        /// Command that failed, without credentials.
        command: String,
        /// Exit status, `-1` when killed by a signal.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },
    /// The response could not be understood.
    #[error("malformed response from `{command}`: {message}")]
    Malformed {
        /// Command or cassette entry that produced the response.
        command: String,
        /// Parser message.
        message: String,
    },
    /// An error captured in a cassette and replayed.
    #[error("{0}")]
    Replayed(String),
}

/// Profile and region an API call runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AwsScope {
    /// Credentials profile name.
    pub profile: String,
    /// Region identifier.
    pub region: String,
}

impl AwsScope {
    /// Creates a scope.
    #[must_use]
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self { profile: profile.into(), region: region.into() }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in service order.
    pub items: Vec<T>,
    /// Token for the following page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `items`.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_token: None }
    }
}

/// An EC2 instance or security group: identifier plus its `Name` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Instance id or group id.
    pub id: String,
    /// Value of the `Name` tag, empty when untagged.
    pub display_name: String,
}

impl ResourceSummary {
    /// Label shown when offering this resource for adding.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.display_name, self.id)
    }
}

/// Metadata of one S3 object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Object {
    /// Full object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    /// Storage class, e.g. `STANDARD`.
    #[serde(default)]
    pub storage_class: Option<String>,
}

/// One entry of a delimited S3 listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum S3Entry {
    /// An object directly under the listed prefix.
    Object(S3Object),
    /// A common prefix one level down.
    Folder {
        /// Full prefix including the trailing delimiter.
        prefix: String,
    },
}

/// A published Lambda function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaVersion {
    /// Function name.
    pub function_name: String,
    /// Version label, `$LATEST` or a number.
    pub version: String,
    /// Version description.
    #[serde(default)]
    pub description: String,
}

/// A Lambda function alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaAlias {
    /// Alias name.
    pub name: String,
    /// Version the alias points to.
    pub function_version: String,
    /// Alias description.
    #[serde(default)]
    pub description: String,
}

/// Queries live AWS state.
///
/// Every method is a single-shot asynchronous call that may fail; callers
/// await completion with no timeout. Paginated methods take the token from
/// the previous page (`None` for the first).
pub trait AwsLookup: Send + Sync {
    /// Profile names from the local credentials store.
    fn list_credential_profiles(&self) -> LookupFuture<'_, Vec<String>>;

    /// Region identifiers visible to `profile`.
    fn list_regions(&self, profile: &str) -> LookupFuture<'_, Vec<String>>;

    /// Bucket names visible in `scope`.
    fn list_bucket_names(&self, scope: &AwsScope) -> LookupFuture<'_, Vec<String>>;

    /// One page of Lambda function names.
    fn list_function_names(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<String>>;

    /// One page of EC2 instances.
    fn list_instance_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>>;

    /// One page of EC2 security groups.
    fn list_security_group_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>>;

    /// One page of a function's published versions.
    fn list_function_versions(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaVersion>>;

    /// One page of a function's aliases.
    fn list_function_aliases(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaAlias>>;

    /// One page of objects and folders directly under `prefix` in `bucket`.
    fn list_objects_and_folders(
        &self,
        scope: &AwsScope,
        bucket: &str,
        prefix: Option<&str>,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<S3Entry>>;
}

type FetchPage<'a, T> = Box<dyn FnMut(Option<String>) -> LookupFuture<'a, Page<T>> + Send + 'a>;

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazy, finite sequence of pages from a paginated lookup.
///
/// Each [`next_page`](Self::next_page) issues one call. The pager ends after
/// a page without a continuation token or after the first error, and cannot
/// be restarted. Dropping it mid-stream stops further calls.
pub struct Pager<'a, T> {
    fetch: FetchPage<'a, T>,
    cursor: Cursor,
}

impl<'a, T> Pager<'a, T> {
    /// Creates a pager; `fetch` receives the token for the page to load.
    pub fn new<F>(fetch: F) -> Self
    where
        F: FnMut(Option<String>) -> LookupFuture<'a, Page<T>> + Send + 'a,
    {
        Self { fetch: Box::new(fetch), cursor: Cursor::Start }
    }

    /// Loads the next page, or returns `None` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Vec<T>, LookupError>> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
        };
        match (self.fetch)(token).await {
            Ok(page) => {
                if let Some(next) = page.next_token.filter(|t| !t.is_empty()) {
                    self.cursor = Cursor::Next(next);
                }
                Some(Ok(page.items))
            }
            Err(err) => Some(Err(err)),
        }
    }

    /// Drains every remaining page into one list.
    ///
    /// # Errors
    ///
    /// Returns the first lookup error; items already fetched are discarded.
    pub async fn collect_all(mut self) -> Result<Vec<T>, LookupError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page?);
        }
        Ok(items)
    }
}
