//! Replaying adapter for the `AwsLookup` port.

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::aws::{
    AwsLookup, AwsScope, LambdaAlias, LambdaVersion, LookupError, LookupFuture, Page,
    ResourceSummary, S3Entry,
};

/// Answers lookups from a cassette instead of calling AWS.
///
/// Arguments are ignored; each method returns the next recorded outcome
/// for that method.
pub struct ReplayingAwsLookup {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingAwsLookup {
    /// Creates a replaying lookup from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn replay<T>(&self, method: &'static str) -> LookupFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction("aws", method).output
        };
        Box::pin(async move { decode_output(method, &output) })
    }
}

/// Reads `{"ok": value}` or `{"err": "message"}` back into a `Result`.
fn decode_output<T: DeserializeOwned>(
    method: &str,
    output: &serde_json::Value,
) -> Result<T, LookupError> {
    if let Some(err) = output.get("err") {
        let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
        return Err(LookupError::Replayed(message));
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone()).map_err(|e| LookupError::Malformed {
        command: format!("cassette aws::{method}"),
        message: e.to_string(),
    })
}

impl AwsLookup for ReplayingAwsLookup {
    fn list_credential_profiles(&self) -> LookupFuture<'_, Vec<String>> {
        self.replay("list_credential_profiles")
    }

    fn list_regions(&self, _profile: &str) -> LookupFuture<'_, Vec<String>> {
        self.replay("list_regions")
    }

    fn list_bucket_names(&self, _scope: &AwsScope) -> LookupFuture<'_, Vec<String>> {
        self.replay("list_bucket_names")
    }

    fn list_function_names(
        &self,
        _scope: &AwsScope,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<String>> {
        self.replay("list_function_names")
    }

    fn list_instance_summaries(
        &self,
        _scope: &AwsScope,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        self.replay("list_instance_summaries")
    }

    fn list_security_group_summaries(
        &self,
        _scope: &AwsScope,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        self.replay("list_security_group_summaries")
    }

    fn list_function_versions(
        &self,
        _scope: &AwsScope,
        _function: &str,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaVersion>> {
        self.replay("list_function_versions")
    }

    fn list_function_aliases(
        &self,
        _scope: &AwsScope,
        _function: &str,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaAlias>> {
        self.replay("list_function_aliases")
    }

    fn list_objects_and_folders(
        &self,
        _scope: &AwsScope,
        _bucket: &str,
        _prefix: Option<&str>,
        _token: Option<&str>,
    ) -> LookupFuture<'_, Page<S3Entry>> {
        self.replay("list_objects_and_folders")
    }
}
