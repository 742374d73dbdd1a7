//! Live adapter for the `AwsLookup` port using the `aws` command-line client.
//!
//! Each lookup runs one `aws ... --output json` invocation. Paginated
//! listings pass `--max-items` and `--starting-token`; the client reports
//! the continuation as `NextToken` in its JSON output.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::process::Command;

use super::credentials;
use crate::config::Settings;
use crate::ports::aws::{
    AwsLookup, AwsScope, LambdaAlias, LambdaVersion, LookupError, LookupFuture, Page,
    ResourceSummary, S3Entry, S3Object,
};

/// Region used for account-wide calls such as listing regions.
const GLOBAL_REGION: &str = "us-east-1";

/// Live lookup backed by the `aws` program.
pub struct AwsCliLookup {
    program: String,
    credentials_file: PathBuf,
    page_size: u32,
}

impl AwsCliLookup {
    /// Creates a lookup from resolved settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            program: settings.aws_cli.clone(),
            credentials_file: settings.credentials_file.clone(),
            page_size: settings.page_size,
        }
    }

    async fn invoke<T: DeserializeOwned>(&self, args: Vec<String>) -> Result<T, LookupError> {
        let command = describe(&self.program, &args);
        tracing::debug!(%command, "running aws lookup");
        let output = Command::new(&self.program)
            .args(&args)
            .args(["--output", "json"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| LookupError::Spawn { program: self.program.clone(), source })?;

        if !output.status.success() {
            let err = LookupError::Command {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            };
            tracing::error!(error = %err, "aws lookup failed");
            return Err(err);
        }
        decode(&command, &String::from_utf8_lossy(&output.stdout))
    }

    fn paged(&self, mut args: Vec<String>, token: Option<&str>) -> Vec<String> {
        args.push("--max-items".to_string());
        args.push(self.page_size.to_string());
        if let Some(token) = token {
            args.push("--starting-token".to_string());
            args.push(token.to_string());
        }
        args
    }
}

/// `service operation` plus profile and region flags.
fn scoped(scope: &AwsScope, service: &str, operation: &str) -> Vec<String> {
    vec![
        service.to_string(),
        operation.to_string(),
        "--profile".to_string(),
        scope.profile.clone(),
        "--region".to_string(),
        scope.region.clone(),
    ]
}

/// Short form of a command for logs and errors, e.g. `aws lambda list-functions`.
fn describe(program: &str, args: &[String]) -> String {
    let mut parts = vec![program];
    parts.extend(args.iter().take(2).map(String::as_str));
    parts.join(" ")
}

fn decode<T: DeserializeOwned>(command: &str, stdout: &str) -> Result<T, LookupError> {
    // The client prints nothing at all for some empty listings.
    let body = if stdout.trim().is_empty() { "{}" } else { stdout };
    serde_json::from_str(body)
        .map_err(|e| LookupError::Malformed {
            command: command.to_string(),
            message: e.to_string(),
        })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Tag {
    key: String,
    value: String,
}

fn name_tag(tags: &[Tag]) -> String {
    tags.iter().find(|t| t.key == "Name").map(|t| t.value.clone()).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RegionsResponse {
    regions: Vec<RegionInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RegionInfo {
    region_name: Option<String>,
}

impl RegionsResponse {
    fn into_names(self) -> Vec<String> {
        self.regions.into_iter().filter_map(|r| r.region_name).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct BucketsResponse {
    buckets: Vec<BucketInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct BucketInfo {
    name: Option<String>,
}

impl BucketsResponse {
    fn into_names(self) -> Vec<String> {
        self.buckets.into_iter().filter_map(|b| b.name).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct FunctionsResponse {
    functions: Vec<FunctionInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct FunctionInfo {
    function_name: Option<String>,
}

impl From<FunctionsResponse> for Page<String> {
    fn from(r: FunctionsResponse) -> Self {
        Page {
            items: r.functions.into_iter().filter_map(|f| f.function_name).collect(),
            next_token: r.next_token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstancesResponse {
    reservations: Vec<Reservation>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Reservation {
    instances: Vec<InstanceInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstanceInfo {
    instance_id: Option<String>,
    tags: Vec<Tag>,
}

impl From<InstancesResponse> for Page<ResourceSummary> {
    fn from(r: InstancesResponse) -> Self {
        let items = r
            .reservations
            .into_iter()
            .flat_map(|res| res.instances)
            .filter_map(|i| {
                let display_name = name_tag(&i.tags);
                i.instance_id.map(|id| ResourceSummary { id, display_name })
            })
            .collect();
        Page { items, next_token: r.next_token }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct SecurityGroupsResponse {
    security_groups: Vec<SecurityGroupInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct SecurityGroupInfo {
    group_id: Option<String>,
    tags: Vec<Tag>,
}

impl From<SecurityGroupsResponse> for Page<ResourceSummary> {
    fn from(r: SecurityGroupsResponse) -> Self {
        let items = r
            .security_groups
            .into_iter()
            .filter_map(|g| {
                let display_name = name_tag(&g.tags);
                g.group_id.map(|id| ResourceSummary { id, display_name })
            })
            .collect();
        Page { items, next_token: r.next_token }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct VersionsResponse {
    versions: Vec<VersionInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct VersionInfo {
    function_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
}

impl From<VersionsResponse> for Page<LambdaVersion> {
    fn from(r: VersionsResponse) -> Self {
        let items = r
            .versions
            .into_iter()
            .filter_map(|v| {
                Some(LambdaVersion {
                    function_name: v.function_name?,
                    version: v.version.unwrap_or_default(),
                    description: v.description.unwrap_or_default(),
                })
            })
            .collect();
        Page { items, next_token: r.next_token }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AliasesResponse {
    aliases: Vec<AliasInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AliasInfo {
    name: Option<String>,
    function_version: Option<String>,
    description: Option<String>,
}

impl From<AliasesResponse> for Page<LambdaAlias> {
    fn from(r: AliasesResponse) -> Self {
        let items = r
            .aliases
            .into_iter()
            .filter_map(|a| {
                Some(LambdaAlias {
                    name: a.name?,
                    function_version: a.function_version.unwrap_or_default(),
                    description: a.description.unwrap_or_default(),
                })
            })
            .collect();
        Page { items, next_token: r.next_token }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ObjectsResponse {
    contents: Vec<ObjectInfo>,
    common_prefixes: Vec<PrefixInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ObjectInfo {
    key: Option<String>,
    size: u64,
    last_modified: Option<chrono::DateTime<chrono::Utc>>,
    storage_class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct PrefixInfo {
    prefix: Option<String>,
}

impl From<ObjectsResponse> for Page<S3Entry> {
    fn from(r: ObjectsResponse) -> Self {
        let objects = r.contents.into_iter().map(|o| {
            S3Entry::Object(S3Object {
                key: o.key.unwrap_or_default(),
                size: o.size,
                last_modified: o.last_modified,
                storage_class: o.storage_class,
            })
        });
        let folders = r
            .common_prefixes
            .into_iter()
            .filter_map(|p| p.prefix)
            .map(|prefix| S3Entry::Folder { prefix });
        Page { items: objects.chain(folders).collect(), next_token: r.next_token }
    }
}

impl AwsLookup for AwsCliLookup {
    fn list_credential_profiles(&self) -> LookupFuture<'_, Vec<String>> {
        Box::pin(async move {
            let path = &self.credentials_file;
            match tokio::fs::read_to_string(path).await {
                Ok(text) => Ok(credentials::profile_names(&text)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    Err(LookupError::CredentialsMissing(path.clone()))
                }
                Err(source) => Err(LookupError::Read { path: path.clone(), source }),
            }
        })
    }

    fn list_regions(&self, profile: &str) -> LookupFuture<'_, Vec<String>> {
        let args = scoped(&AwsScope::new(profile, GLOBAL_REGION), "ec2", "describe-regions");
        Box::pin(async move { Ok(self.invoke::<RegionsResponse>(args).await?.into_names()) })
    }

    fn list_bucket_names(&self, scope: &AwsScope) -> LookupFuture<'_, Vec<String>> {
        let args = scoped(scope, "s3api", "list-buckets");
        Box::pin(async move { Ok(self.invoke::<BucketsResponse>(args).await?.into_names()) })
    }

    fn list_function_names(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<String>> {
        let args = self.paged(scoped(scope, "lambda", "list-functions"), token);
        Box::pin(async move { Ok(self.invoke::<FunctionsResponse>(args).await?.into()) })
    }

    fn list_instance_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        let args = self.paged(scoped(scope, "ec2", "describe-instances"), token);
        Box::pin(async move { Ok(self.invoke::<InstancesResponse>(args).await?.into()) })
    }

    fn list_security_group_summaries(
        &self,
        scope: &AwsScope,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<ResourceSummary>> {
        let args = self.paged(scoped(scope, "ec2", "describe-security-groups"), token);
        Box::pin(async move { Ok(self.invoke::<SecurityGroupsResponse>(args).await?.into()) })
    }

    fn list_function_versions(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaVersion>> {
        let mut args = scoped(scope, "lambda", "list-versions-by-function");
        args.extend(["--function-name".to_string(), function.to_string()]);
        let args = self.paged(args, token);
        Box::pin(async move { Ok(self.invoke::<VersionsResponse>(args).await?.into()) })
    }

    fn list_function_aliases(
        &self,
        scope: &AwsScope,
        function: &str,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<LambdaAlias>> {
        let mut args = scoped(scope, "lambda", "list-aliases");
        args.extend(["--function-name".to_string(), function.to_string()]);
        let args = self.paged(args, token);
        Box::pin(async move { Ok(self.invoke::<AliasesResponse>(args).await?.into()) })
    }

    fn list_objects_and_folders(
        &self,
        scope: &AwsScope,
        bucket: &str,
        prefix: Option<&str>,
        token: Option<&str>,
    ) -> LookupFuture<'_, Page<S3Entry>> {
        let mut args = scoped(scope, "s3api", "list-objects-v2");
        args.extend(["--bucket".to_string(), bucket.to_string()]);
        args.extend(["--delimiter".to_string(), "/".to_string()]);
        if let Some(prefix) = prefix {
            args.extend(["--prefix".to_string(), prefix.to_string()]);
        }
        let args = self.paged(args, token);
        Box::pin(async move { Ok(self.invoke::<ObjectsResponse>(args).await?.into()) })
    }
}
