//! Recording adapter for the `AwsLookup` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::aws::{
    AwsLookup, AwsScope, LambdaAlias, LambdaVersion, LookupError, LookupFuture, Page,
    ResourceSummary, S3Entry,
};

const PORT: &str = "aws";

/// Delegates to an inner lookup and records every call and its outcome.
pub struct RecordingAwsLookup {
    inner: Box<dyn AwsLookup>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingAwsLookup {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn AwsLookup>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn recorded<'a, T>(
        &'a self,
        method: &'static str,
        input: serde_json::Value,
        call: LookupFuture<'a, T>,
    ) -> LookupFuture<'a, T>
    where
        T: Serialize + Send + 'a,
    {
        Box::pin(async move {
            let result: Result<T, LookupError> = call.await;
            record_result(&self.recorder, PORT, method, input, &result);
            result
        })
    }
}

impl AwsLookup for RecordingAwsLookup {
    fn list_credential_profiles(&self) -> LookupFuture<'_, Vec<String>> {
        self.recorded("list_credential_profiles", json!({}), self.inner.list_credential_profiles())
    }

    fn list_regions(&self, profile: &str) -> LookupFuture<'_, Vec<String>> {
        let input = json!({ "profile": profile });
        self.recorded("list_regions", input, self.inner.list_regions(profile))
    }

    fn list_bucket_names(&self, scope: &AwsScope) -> LookupFuture<'_, Vec<String>> {
        let input = json!({ "scope": scope });
        self.recorded("list_bucket_names", input, self.inner.list_bucket_names(scope))
    }

    fn list_function_names(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<String>> {
        let input = json!({ "scope": scope, "token": token });
        self.recorded("list_function_names", input, self.inner.list_function_names(scope, token))
    }

    fn list_instance_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        let input = json!({ "scope": scope, "token": token });
        self.recorded(
            "list_instance_summaries",
            input,
            self.inner.list_instance_summaries(scope, token),
        )
    }

    fn list_security_group_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        let input = json!({ "scope": scope, "token": token });
        self.recorded(
            "list_security_group_summaries",
            input,
            self.inner.list_security_group_summaries(scope, token),
        )
    }

    fn list_function_versions(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaVersion>> {
        let input = json!({ "scope": scope, "function": function, "token": token });
        self.recorded(
            "list_function_versions",
            input,
            self.inner.list_function_versions(scope, function, token),
        )
    }

    fn list_function_aliases(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaAlias>> {
        let input = json!({ "scope": scope, "function": function, "token": token });
        self.recorded(
            "list_function_aliases",
            input,
            self.inner.list_function_aliases(scope, function, token),
        )
    }

    fn list_objects_and_folders(
        &self,
        scope: &AwsScope,
        bucket: &str,
        prefix: Option<&str>,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<S3Entry>> {
        let input = json!({ "scope": scope, "bucket": bucket, "prefix": prefix, "token": token });
        self.recorded(
            "list_objects_and_folders",
            input,
            self.inner.list_objects_and_folders(scope, bucket, prefix, token),
        )
    }
}
