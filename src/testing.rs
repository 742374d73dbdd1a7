//! In-memory port fakes shared by unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::context::ServiceContext;
use crate::ports::aws::{LambdaAlias, LambdaVersion, ResourceSummary, S3Entry};
use crate::ports::{AwsLookup, AwsScope, FileSystem, LookupError, LookupFuture, Notifier, Page};

/// Filesystem backed by a shared map; clones see the same files.
#[derive(Clone, Default)]
pub struct MemFs {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemFs {
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.lock().unwrap().insert(path.into(), contents.to_string());
        self
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_optional(
        &self,
        path: &Path,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.contents(path))
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Notifier that keeps every message.
#[derive(Clone, Default)]
pub struct CollectingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// AWS lookup answering from fixed data.
///
/// Paged listings hand out one inner `Vec` per page, using the page index
/// as continuation token. `fail` turns every AWS call into an error.
#[derive(Clone, Default)]
pub struct ScriptedAws {
    pub profiles: Option<Vec<String>>,
    pub regions: Vec<String>,
    pub buckets: Vec<String>,
    pub functions: Vec<Vec<String>>,
    pub instances: Vec<ResourceSummary>,
    pub security_groups: Vec<ResourceSummary>,
    pub versions: Vec<Vec<LambdaVersion>>,
    pub aliases: Vec<LambdaAlias>,
    pub objects: HashMap<String, Vec<Vec<S3Entry>>>,
    pub fail: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedAws {
    /// Names of the methods called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T: Send + 'static>(&self, method: &str, value: T) -> LookupFuture<'_, T> {
        self.calls.lock().unwrap().push(method.to_string());
        let failure = self.fail.clone();
        Box::pin(async move {
            match failure {
                Some(message) => Err(LookupError::Replayed(message)),
                None => Ok(value),
            }
        })
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], token: Option<&str>) -> Page<T> {
    let index: usize = token.and_then(|t| t.parse().ok()).unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Page { items, next_token }
}

impl AwsLookup for ScriptedAws {
    fn list_credential_profiles(&self) -> LookupFuture<'_, Vec<String>> {
        self.calls.lock().unwrap().push("list_credential_profiles".to_string());
        let profiles = self.profiles.clone();
        Box::pin(async move {
            profiles
                .ok_or_else(|| LookupError::CredentialsMissing("/home/u/.aws/credentials".into()))
        })
    }

    fn list_regions(&self, _profile: &str) -> LookupFuture<'_, Vec<String>> {
        self.answer("list_regions", self.regions.clone())
    }

    fn list_bucket_names(&self, _scope: &AwsScope) -> LookupFuture<'_, Vec<String>> {
        self.answer("list_bucket_names", self.buckets.clone())
    }

    fn list_function_names(
        &self,
        _scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<String>> {
        self.answer("list_function_names", page_of(&self.functions, token))
    }

    fn list_instance_summaries(
        &self,
        _scope: &AwsScope,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        self.answer("list_instance_summaries", Page::last(self.instances.clone()))
    }

    fn list_security_group_summaries(
        &self,
        _scope: &AwsScope,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        self.answer("list_security_group_summaries", Page::last(self.security_groups.clone()))
    }

    fn list_function_versions(
        &self,
        _scope: &AwsScope,
        _function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaVersion>> {
        self.answer("list_function_versions", page_of(&self.versions, token))
    }

    fn list_function_aliases(
        &self,
        _scope: &AwsScope,
        _function: &str,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaAlias>> {
        self.answer("list_function_aliases", Page::last(self.aliases.clone()))
    }

    fn list_objects_and_folders(
        &self,
        _scope: &AwsScope,
        _bucket: &str,
        prefix: Option<&str>,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<S3Entry>> {
        let pages = self.objects.get(prefix.unwrap_or_default()).cloned().unwrap_or_default();
        self.answer("list_objects_and_folders", page_of(&pages, token))
    }
}

/// Context wired to the given fakes.
pub fn context(fs: &MemFs, aws: &ScriptedAws, notifier: &CollectingNotifier) -> ServiceContext {
    ServiceContext::new(Box::new(fs.clone()), Box::new(aws.clone()), Box::new(notifier.clone()))
}
