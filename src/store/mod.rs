//! Catalog store: persistence codec and per-folder document I/O.
//!
//! Each workspace folder holds one pretty-printed JSON document:
//!
//! ```text
//! <folder>/
//!   └── .aws-tools.json
//! ```
//!
//! Decoding tolerates damage below the top level. A record that cannot be
//! read is skipped with a warning and its siblings still load.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::catalog::model::{Profile, Region, Resource, Service, Workspace};
use crate::catalog::resource::ResourceKind;
use crate::context::ServiceContext;

/// File name of the catalog document inside a workspace folder.
pub const DOCUMENT_NAME: &str = ".aws-tools.json";

/// Failure to read, parse or write a catalog document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The document is not JSON at all.
    #[error("failed to parse {name}: {source}")]
    Parse {
        /// Workspace name.
        name: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The workspace could not be serialized.
    #[error("failed to encode {name}: {source}")]
    Encode {
        /// Workspace name.
        name: String,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// The document could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A folder that owns one catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    /// Workspace name, the folder's final path component.
    pub name: String,
    /// Folder path.
    pub path: PathBuf,
}

impl WorkspaceFolder {
    /// Describes the folder at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, path }
    }

    /// Location of the folder's catalog document.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.path.join(DOCUMENT_NAME)
    }
}

/// Reads and writes catalog documents.
///
/// All I/O goes through `ctx.fs` so tests can run against memory.
pub struct CatalogStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogStore<'a> {
    /// Creates a store over the context's filesystem.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Loads the workspace stored in `folder`.
    ///
    /// A missing document yields an empty workspace and is created on the
    /// spot; failing to create it is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or is not JSON.
    pub fn load(&self, folder: &WorkspaceFolder) -> Result<Workspace, StoreError> {
        let path = folder.document_path();
        let contents = self
            .ctx
            .fs
            .read_optional(&path)
            .map_err(|source| StoreError::Read { path: path.clone(), source })?;
        let Some(contents) = contents else {
            tracing::info!(path = %path.display(), "catalog document not found; creating it");
            let workspace = Workspace::new(&folder.name);
            if let Err(err) = self.save(folder, &workspace) {
                tracing::error!(error = %err, "could not create catalog document");
            }
            return Ok(workspace);
        };
        decode(&contents, &folder.name)
    }

    /// Writes `workspace` to `folder`, replacing the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, folder: &WorkspaceFolder, workspace: &Workspace) -> Result<(), StoreError> {
        let path = folder.document_path();
        let text = encode(workspace)?;
        self.ctx.fs.write(&path, &text).map_err(|source| StoreError::Write { path, source })
    }
}

/// Serializes a workspace to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(workspace: &Workspace) -> Result<String, StoreError> {
    serde_json::to_string_pretty(workspace)
        .map_err(|source| StoreError::Encode { name: workspace.name.clone(), source })
}

/// Decodes a document into the workspace named `name`.
///
/// Only unparseable JSON is an error. A top level that is not a workspace
/// record loads as an empty workspace; damaged nested records are skipped.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] if `text` is not JSON.
pub fn decode(text: &str, name: &str) -> Result<Workspace, StoreError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|source| StoreError::Parse { name: name.to_string(), source })?;
    let mut workspace = Workspace::new(name);
    let Some(record) = record_from::<WorkspaceRecord>(value, "workspace") else {
        return Ok(workspace);
    };
    workspace.expanded = record.expanded;
    let profiles = decode_each(record.profiles, "profile", |r: ProfileRecord| {
        let mut profile = Profile::new(placeholder(r.name, "profile"));
        profile.expanded = r.expanded;
        let regions = decode_each(r.regions, "region", |r: RegionRecord| {
            let mut region = Region::new(placeholder(r.name, "region"));
            region.expanded = r.expanded;
            let services = decode_each(r.services, "service", decode_service);
            region.services = unique(services, "service", |s| s.name.as_str());
            region
        });
        profile.regions = unique(regions, "region", |r| r.name.as_str());
        profile
    });
    workspace.profiles = unique(profiles, "profile", |p| p.name.as_str());
    Ok(workspace)
}

fn decode_service(record: ServiceRecord) -> Service {
    let mut service = Service::new(placeholder(record.name, "service"));
    service.expanded = record.expanded;
    let kind = ResourceKind::resolve(&service.name);
    let resources = decode_each(record.resources, "resource", |r: ResourceRecord| {
        let mut resource = Resource::new(kind, placeholder(r.name, "resource"), r.id);
        resource.expanded = r.expanded;
        resource
    });
    service.resources = unique(resources, "resource", Resource::identity);
    service
}

fn placeholder(name: Option<String>, level: &str) -> String {
    name.filter(|n| !n.is_empty()).unwrap_or_else(|| format!("no name ({level})"))
}

fn record_from<T: DeserializeOwned>(value: Value, level: &'static str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(level, error = %err, "skipping malformed record");
            None
        }
    }
}

fn decode_each<R: DeserializeOwned, T>(
    values: Vec<Value>,
    level: &'static str,
    build: impl Fn(R) -> T,
) -> Vec<T> {
    values.into_iter().filter_map(|v| record_from(v, level)).map(build).collect()
}

/// Keeps the first of any siblings sharing a key.
fn unique<T>(items: Vec<T>, level: &'static str, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if kept.iter().any(|k| key(k) == key(&item)) {
            tracing::warn!(level, name = key(&item), "dropping duplicate record");
            continue;
        }
        kept.push(item);
    }
    kept
}

/// Accepts any JSON value; only arrays contribute children.
fn lenient_children<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

#[derive(Deserialize)]
struct WorkspaceRecord {
    #[serde(default)]
    expanded: bool,
    #[serde(default, deserialize_with = "lenient_children")]
    profiles: Vec<Value>,
}

#[derive(Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    expanded: bool,
    #[serde(default, deserialize_with = "lenient_children")]
    regions: Vec<Value>,
}

#[derive(Deserialize)]
struct RegionRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    expanded: bool,
    #[serde(default, deserialize_with = "lenient_children")]
    services: Vec<Value>,
}

#[derive(Deserialize)]
struct ServiceRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    expanded: bool,
    #[serde(default, deserialize_with = "lenient_children")]
    resources: Vec<Value>,
}

#[derive(Deserialize)]
struct ResourceRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    expanded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::testing::{context, CollectingNotifier, MemFs, ScriptedAws};

    fn sample() -> Workspace {
        let mut ws = Workspace::new("proj");
        ws.expanded = true;
        ws.add_profile("dev");
        ws.add_profile("prod");
        let dev = ws.find_profile_mut("dev").unwrap();
        dev.expanded = true;
        dev.add_region("us-east-1");
        let region = dev.find_region_mut("us-east-1").unwrap();
        region.add_service("Lambda");
        region.add_service("EC2 - Security groups");
        region.find_service_mut("Lambda").unwrap().add_resource("handler");
        region.find_service_mut("EC2 - Security groups").unwrap().resources.push(
            Resource::new(ResourceKind::Unknown, "web", Some("sg-1".to_string())),
        );
        ws
    }

    #[test]
    fn encode_then_decode_preserves_structure() {
        let ws = sample();
        let decoded = decode(&encode(&ws).unwrap(), "proj").unwrap();
        assert_eq!(decoded, ws);
        let region = &decoded.profiles[0].regions[0];
        assert_eq!(region.services[0].resources[0].kind, ResourceKind::Lambda);
        assert_eq!(region.services[1].resources[0].identity(), "sg-1");
    }

    #[test]
    fn encoding_omits_missing_ids_and_the_workspace_name() {
        let text = encode(&sample()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("name").is_none());
        let lambda = &value["profiles"][0]["regions"][0]["services"][0]["resources"][0];
        assert_eq!(lambda, &serde_json::json!({"name": "handler", "expanded": false}));
        assert!(text.contains("\n  \"profiles\""));
    }

    #[test]
    fn malformed_profile_is_skipped() {
        let text = r#"{"expanded": true, "profiles": [
            {"name": "a"},
            {"name": 42, "regions": []},
            {"name": "c", "expanded": true}
        ]}"#;
        let ws = decode(text, "proj").unwrap();
        let names: Vec<&str> = ws.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(ws.profiles[1].expanded);
    }

    #[test]
    fn duplicate_siblings_keep_the_first() {
        let text = r#"{"profiles": [
            {"name": "dev", "expanded": true, "regions": [
                {"name": "us-east-1", "services": [
                    {"name": "EC2 - Instances", "resources": [
                        {"name": "web", "id": "i-1"},
                        {"name": "web", "id": "i-2"},
                        {"name": "api", "id": "i-1"}
                    ]}
                ]},
                {"name": "us-east-1"}
            ]},
            {"name": "dev"}
        ]}"#;
        let ws = decode(text, "proj").unwrap();
        assert_eq!(ws.profiles.len(), 1);
        assert!(ws.profiles[0].expanded);
        let regions = &ws.profiles[0].regions;
        assert_eq!(regions.len(), 1);
        let ids: Vec<&str> =
            regions[0].services[0].resources.iter().map(Resource::identity).collect();
        assert_eq!(ids, vec!["i-1", "i-2"]);
    }

    #[test]
    fn missing_fields_default() {
        let text = r#"{"profiles": [{"regions": [{"name": "", "services": "oops"}, 7]}]}"#;
        let ws = decode(text, "proj").unwrap();
        assert!(!ws.expanded);
        assert_eq!(ws.profiles[0].name, "no name (profile)");
        assert_eq!(ws.profiles[0].regions.len(), 1);
        assert_eq!(ws.profiles[0].regions[0].name, "no name (region)");
        assert!(ws.profiles[0].regions[0].services.is_empty());
    }

    #[test]
    fn non_object_document_loads_empty() {
        let ws = decode("[]", "proj").unwrap();
        assert_eq!(ws, Workspace::new("proj"));
        assert!(matches!(decode("{not json", "proj"), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn resource_variant_follows_service_name() {
        let text = r#"{"profiles": [{"name": "dev", "regions": [{"name": "r", "services": [
            {"name": "S3", "resources": [{"name": "bucket"}]},
            {"name": "DynamoDB", "resources": [{"name": "table"}]}
        ]}]}]}"#;
        let ws = decode(text, "proj").unwrap();
        let services = &ws.profiles[0].regions[0].services;
        assert_eq!(services[0].resources[0].kind, ResourceKind::S3);
        assert_eq!(services[1].resources[0].kind, ResourceKind::Unknown);
    }

    #[test]
    fn absent_document_is_created_empty() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let store = CatalogStore::new(&ctx);
        let folder = WorkspaceFolder::new("/work/proj");

        let ws = store.load(&folder).unwrap();
        assert_eq!(ws.name, "proj");
        assert!(ws.profiles.is_empty());

        let written = fs.contents("/work/proj/.aws-tools.json").unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, serde_json::json!({"expanded": false, "profiles": []}));
    }

    #[test]
    fn save_then_load_round_trips() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let store = CatalogStore::new(&ctx);
        let folder = WorkspaceFolder::new("/work/proj");

        store.save(&folder, &sample()).unwrap();
        assert_eq!(store.load(&folder).unwrap(), sample());
    }

    #[test]
    fn folder_name_is_last_component() {
        let folder = WorkspaceFolder::new("/home/me/projects/shop");
        assert_eq!(folder.name, "shop");
        assert_eq!(folder.document_path(), Path::new("/home/me/projects/shop/.aws-tools.json"));
    }
}
