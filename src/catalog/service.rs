//! Catalog service: owns the workspace forest and its mutation API.
//!
//! Paths are resolved by exact name (or resource identity) at every level.
//! A path that does not resolve is a logged no-op, never an error. Every
//! applied mutation rewrites all catalog documents and bumps the refresh
//! generation.

use tokio::sync::watch;

use crate::context::ServiceContext;
use crate::ports::aws::{LookupError, Pager, ResourceSummary, S3Entry};
use crate::store::{CatalogStore, StoreError, WorkspaceFolder};

use super::model::{MoveDirection, Profile, Region, Resource, Service, Workspace};
use super::path::NodePath;
use super::resource::ResourceKind;
use super::tree::{CatalogNode, LambdaGroup, Placeholder, TreeNode};

/// Services offered when adding to a region.
pub const SERVICE_MENU: [&str; 8] = [
    "API Gateway",
    "CloudWatch Logs",
    "DynamoDB",
    "EC2 - Instances",
    "EC2 - Security groups",
    "Lambda",
    "S3",
    "VPC",
];

/// An addable entry: what to show and what to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text offered to the user.
    pub label: String,
    /// Name passed to [`CatalogService::add_entity`].
    pub value: String,
}

impl Candidate {
    fn named(name: String) -> Self {
        Self { label: name.clone(), value: name }
    }
}

impl From<ResourceSummary> for Candidate {
    fn from(summary: ResourceSummary) -> Self {
        Self { label: summary.label(), value: summary.id }
    }
}

/// Outcome of a catalog mutation. Only `Applied` persists and refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The catalog changed.
    Applied,
    /// The name already exists at that level.
    Duplicate,
    /// The path or name did not resolve.
    Missing,
    /// Nothing to do.
    Unchanged,
}

enum NodeRef<'w> {
    Workspace(&'w Workspace),
    Profile(&'w Profile),
    Region(&'w Region),
    Service(&'w Service),
    Resource(&'w Resource),
}

enum NodeMut<'w> {
    Workspace(&'w mut Workspace),
    Profile(&'w mut Profile),
    Region(&'w mut Region),
    Service(&'w mut Service),
    Resource(&'w mut Resource),
}

fn resolve<'w>(workspaces: &'w [Workspace], path: &NodePath) -> Option<NodeRef<'w>> {
    let ws = workspaces.iter().find(|w| w.name == path.workspace_name())?;
    Some(match path {
        NodePath::Workspace { .. } => NodeRef::Workspace(ws),
        NodePath::Profile { profile, .. } => NodeRef::Profile(ws.find_profile(profile)?),
        NodePath::Region { profile, region, .. } => {
            NodeRef::Region(ws.find_profile(profile)?.find_region(region)?)
        }
        NodePath::Service { profile, region, service, .. } => NodeRef::Service(
            ws.find_profile(profile)?.find_region(region)?.find_service(service)?,
        ),
        NodePath::Resource { profile, region, service, resource, .. } => NodeRef::Resource(
            ws.find_profile(profile)?
                .find_region(region)?
                .find_service(service)?
                .find_resource(resource)?,
        ),
    })
}

fn resolve_mut<'w>(workspaces: &'w mut [Workspace], path: &NodePath) -> Option<NodeMut<'w>> {
    let ws = workspaces.iter_mut().find(|w| w.name == path.workspace_name())?;
    Some(match path {
        NodePath::Workspace { .. } => NodeMut::Workspace(ws),
        NodePath::Profile { profile, .. } => NodeMut::Profile(ws.find_profile_mut(profile)?),
        NodePath::Region { profile, region, .. } => {
            NodeMut::Region(ws.find_profile_mut(profile)?.find_region_mut(region)?)
        }
        NodePath::Service { profile, region, service, .. } => NodeMut::Service(
            ws.find_profile_mut(profile)?.find_region_mut(region)?.find_service_mut(service)?,
        ),
        NodePath::Resource { profile, region, service, resource, .. } => NodeMut::Resource(
            ws.find_profile_mut(profile)?
                .find_region_mut(region)?
                .find_service_mut(service)?
                .find_resource_mut(resource)?,
        ),
    })
}

fn catalog_node(
    parent: &NodePath,
    key: &str,
    label: &str,
    expanded: bool,
    kind: Option<ResourceKind>,
) -> Option<TreeNode> {
    let path = parent.child(key)?;
    Some(TreeNode::Catalog(CatalogNode { path, label: label.to_string(), expanded, kind }))
}

fn subtract(names: Vec<String>, present: impl Fn(&str) -> bool) -> Vec<Candidate> {
    names.into_iter().filter(|n| !present(n)).map(Candidate::named).collect()
}

fn logged<T>(result: Result<T, LookupError>, path: &NodePath) -> Result<T, LookupError> {
    if let Err(err) = &result {
        tracing::error!(%path, error = %err, "AWS lookup failed");
    }
    result
}

/// The in-memory catalog of every open workspace folder.
pub struct CatalogService<'a> {
    ctx: &'a ServiceContext,
    folders: Vec<WorkspaceFolder>,
    workspaces: Vec<Workspace>,
    /// Per folder, whether its document loaded and may be rewritten.
    writable: Vec<bool>,
    generation: watch::Sender<u64>,
}

impl<'a> CatalogService<'a> {
    /// Loads one workspace per folder.
    ///
    /// A document that cannot be read or parsed is logged and its workspace
    /// starts empty and read-only, so the file on disk is never replaced.
    /// Folders whose name is already taken are skipped.
    #[must_use]
    pub fn load(ctx: &'a ServiceContext, folders: Vec<WorkspaceFolder>) -> Self {
        let store = CatalogStore::new(ctx);
        let mut loaded: Vec<WorkspaceFolder> = Vec::new();
        let mut workspaces = Vec::new();
        let mut writable = Vec::new();
        for folder in folders {
            if loaded.iter().any(|f| f.name == folder.name) {
                tracing::warn!(name = %folder.name, "workspace name already taken; skipping");
                continue;
            }
            match store.load(&folder) {
                Ok(workspace) => {
                    workspaces.push(workspace);
                    writable.push(true);
                }
                Err(err) => {
                    tracing::error!(error = %err, "starting with an empty, read-only catalog");
                    workspaces.push(Workspace::new(&folder.name));
                    writable.push(false);
                }
            }
            loaded.push(folder);
        }
        let (generation, _) = watch::channel(0);
        Self { ctx, folders: loaded, workspaces, writable, generation }
    }

    /// Loaded workspaces, in folder order.
    #[must_use]
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Receiver that observes every refresh as a new generation number.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Invalidates the whole tree.
    pub fn refresh(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    /// Display node for the catalog entity at `path`.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<TreeNode> {
        let (label, expanded, kind) = match resolve(&self.workspaces, path)? {
            NodeRef::Workspace(ws) => (&ws.name, ws.expanded, None),
            NodeRef::Profile(p) => (&p.name, p.expanded, None),
            NodeRef::Region(r) => (&r.name, r.expanded, None),
            NodeRef::Service(s) => (&s.name, s.expanded, None),
            NodeRef::Resource(r) => (&r.name, r.expanded, Some(r.kind)),
        };
        Some(TreeNode::Catalog(CatalogNode {
            path: path.clone(),
            label: label.clone(),
            expanded,
            kind,
        }))
    }

    /// Children of `node`, or the workspaces when `node` is `None`.
    ///
    /// An empty catalog level yields its placeholder. Lambda and S3
    /// resources are listed live and never persisted.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when a live listing fails.
    pub async fn get_children(
        &self,
        node: Option<&TreeNode>,
    ) -> Result<Vec<TreeNode>, LookupError> {
        let Some(node) = node else {
            return Ok(self
                .workspaces
                .iter()
                .map(|ws| {
                    TreeNode::Catalog(CatalogNode {
                        path: NodePath::workspace(&ws.name),
                        label: ws.name.clone(),
                        expanded: ws.expanded,
                        kind: None,
                    })
                })
                .collect());
        };
        match node {
            TreeNode::Catalog(node) => self.catalog_children(&node.path).await,
            TreeNode::LambdaGroup { function, group } => {
                self.lambda_children(function, *group).await
            }
            TreeNode::S3Folder { bucket, prefix } => self.s3_children(bucket, Some(prefix)).await,
            TreeNode::Placeholder(_)
            | TreeNode::LambdaVersion { .. }
            | TreeNode::LambdaAlias { .. }
            | TreeNode::S3Object { .. } => Ok(Vec::new()),
        }
    }

    async fn catalog_children(&self, path: &NodePath) -> Result<Vec<TreeNode>, LookupError> {
        let Some(node) = resolve(&self.workspaces, path) else {
            tracing::info!(%path, "node not found");
            return Ok(Vec::new());
        };
        let children: Vec<TreeNode> = match node {
            NodeRef::Workspace(ws) => ws
                .profiles
                .iter()
                .filter_map(|p| catalog_node(path, &p.name, &p.name, p.expanded, None))
                .collect(),
            NodeRef::Profile(profile) => profile
                .regions
                .iter()
                .filter_map(|r| catalog_node(path, &r.name, &r.name, r.expanded, None))
                .collect(),
            NodeRef::Region(region) => region
                .services
                .iter()
                .filter_map(|s| catalog_node(path, &s.name, &s.name, s.expanded, None))
                .collect(),
            NodeRef::Service(service) => service
                .resources
                .iter()
                .filter_map(|r| catalog_node(path, r.identity(), &r.name, r.expanded, Some(r.kind)))
                .collect(),
            NodeRef::Resource(resource) => match resource.kind {
                ResourceKind::Lambda => [LambdaGroup::Versions, LambdaGroup::Aliases]
                    .into_iter()
                    .map(|group| TreeNode::LambdaGroup { function: path.clone(), group })
                    .collect(),
                ResourceKind::S3 => self.s3_children(path, None).await?,
                ResourceKind::Unknown => Vec::new(),
            },
        };
        if children.is_empty() {
            return Ok(vec![TreeNode::Placeholder(Placeholder::for_level(path.level()))]);
        }
        Ok(children)
    }

    async fn lambda_children(
        &self,
        function: &NodePath,
        group: LambdaGroup,
    ) -> Result<Vec<TreeNode>, LookupError> {
        let Some(scope) = function.scope() else {
            return Ok(Vec::new());
        };
        let name = function.name();
        let aws = self.ctx.aws.as_ref();
        let nodes: Result<Vec<TreeNode>, LookupError> = match group {
            LambdaGroup::Versions => {
                Pager::new(|token: Option<String>| {
                    aws.list_function_versions(&scope, name, token.as_deref())
                })
                .collect_all()
                .await
                .map(|versions| {
                    versions
                        .into_iter()
                        .map(|version| TreeNode::LambdaVersion {
                            function: function.clone(),
                            version,
                        })
                        .collect()
                })
            }
            LambdaGroup::Aliases => {
                Pager::new(|token: Option<String>| {
                    aws.list_function_aliases(&scope, name, token.as_deref())
                })
                .collect_all()
                .await
                .map(|aliases| {
                    aliases
                        .into_iter()
                        .map(|alias| TreeNode::LambdaAlias { function: function.clone(), alias })
                        .collect()
                })
            }
        };
        logged(nodes, function)
    }

    async fn s3_children(
        &self,
        bucket: &NodePath,
        prefix: Option<&str>,
    ) -> Result<Vec<TreeNode>, LookupError> {
        let Some(scope) = bucket.scope() else {
            return Ok(Vec::new());
        };
        let name = bucket.name();
        let aws = self.ctx.aws.as_ref();
        let entries = Pager::new(|token: Option<String>| {
            aws.list_objects_and_folders(&scope, name, prefix, token.as_deref())
        })
        .collect_all()
        .await;
        let entries = logged(entries, bucket)?;

        let mut objects = Vec::new();
        let mut folders = Vec::new();
        for entry in entries {
            match entry {
                S3Entry::Object(object) if Some(object.key.as_str()) == prefix => {}
                S3Entry::Object(object) => objects.push(TreeNode::S3Object {
                    bucket: bucket.clone(),
                    prefix: prefix.map(str::to_string),
                    object,
                }),
                S3Entry::Folder { prefix } => {
                    folders.push(TreeNode::S3Folder { bucket: bucket.clone(), prefix });
                }
            }
        }
        objects.extend(folders);
        Ok(objects)
    }

    /// Names that can be added under `parent`, minus those already there.
    ///
    /// A missing credentials file is reported through the notifier and
    /// yields no candidates. Unresolved paths and unsupported services also
    /// yield none.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when a live AWS listing fails.
    pub async fn get_candidates(&self, parent: &NodePath) -> Result<Vec<Candidate>, LookupError> {
        let Some(node) = resolve(&self.workspaces, parent) else {
            tracing::info!(%parent, "node not found");
            return Ok(Vec::new());
        };
        match node {
            NodeRef::Workspace(ws) => match self.ctx.aws.list_credential_profiles().await {
                Ok(names) => Ok(subtract(names, |n| ws.find_profile(n).is_some())),
                Err(err) => {
                    tracing::error!(error = %err, "cannot list credential profiles");
                    self.ctx.notifier.warn(&err.to_string());
                    Ok(Vec::new())
                }
            },
            NodeRef::Profile(profile) => {
                let names = logged(self.ctx.aws.list_regions(&profile.name).await, parent)?;
                Ok(subtract(names, |n| profile.find_region(n).is_some()))
            }
            NodeRef::Region(region) => Ok(subtract(
                SERVICE_MENU.iter().map(|s| (*s).to_string()).collect(),
                |n| region.find_service(n).is_some(),
            )),
            NodeRef::Service(service) => self.resource_candidates(parent, service).await,
            NodeRef::Resource(_) => Ok(Vec::new()),
        }
    }

    async fn resource_candidates(
        &self,
        path: &NodePath,
        service: &Service,
    ) -> Result<Vec<Candidate>, LookupError> {
        let Some(scope) = path.scope() else {
            return Ok(Vec::new());
        };
        let aws = self.ctx.aws.as_ref();
        let candidates: Result<Vec<Candidate>, LookupError> = match service.name.as_str() {
            "EC2 - Instances" => {
                Pager::new(|token: Option<String>| {
                    aws.list_instance_summaries(&scope, token.as_deref())
                })
                .collect_all()
                .await
                .map(|items| items.into_iter().map(Candidate::from).collect())
            }
            "EC2 - Security groups" => {
                Pager::new(|token: Option<String>| {
                    aws.list_security_group_summaries(&scope, token.as_deref())
                })
                .collect_all()
                .await
                .map(|items| items.into_iter().map(Candidate::from).collect())
            }
            "Lambda" => {
                Pager::new(|token: Option<String>| {
                    aws.list_function_names(&scope, token.as_deref())
                })
                .collect_all()
                .await
                .map(|names| names.into_iter().map(Candidate::named).collect())
            }
            "S3" => aws
                .list_bucket_names(&scope)
                .await
                .map(|names| names.into_iter().map(Candidate::named).collect()),
            other => {
                tracing::warn!(service = other, "resource candidates are not supported");
                return Ok(Vec::new());
            }
        };
        let candidates = logged(candidates, path)?;
        Ok(candidates.into_iter().filter(|c| !service.contains_resource(&c.value)).collect())
    }

    /// Adds `name` as a child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be saved.
    pub fn add_entity(&mut self, parent: &NodePath, name: &str) -> Result<Mutation, StoreError> {
        if name.trim().is_empty() {
            tracing::info!(%parent, "refusing to add an empty name");
            return Ok(Mutation::Unchanged);
        }
        let Some(node) = resolve_mut(&mut self.workspaces, parent) else {
            tracing::info!(%parent, name, "parent not found");
            return Ok(Mutation::Missing);
        };
        let added = match node {
            NodeMut::Workspace(ws) => ws.add_profile(name),
            NodeMut::Profile(profile) => profile.add_region(name),
            NodeMut::Region(region) => region.add_service(name),
            NodeMut::Service(service) => service.add_resource(name),
            NodeMut::Resource(_) => {
                tracing::info!(%parent, "resources have no cataloged children");
                return Ok(Mutation::Unchanged);
            }
        };
        if !added {
            return Ok(Mutation::Duplicate);
        }
        self.commit()?;
        Ok(Mutation::Applied)
    }

    /// Removes the child of `parent` named (or identified by) `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be saved.
    pub fn remove_entity(&mut self, parent: &NodePath, name: &str) -> Result<Mutation, StoreError> {
        let Some(node) = resolve_mut(&mut self.workspaces, parent) else {
            tracing::info!(%parent, name, "parent not found");
            return Ok(Mutation::Missing);
        };
        let removed = match node {
            NodeMut::Workspace(ws) => ws.remove_profile(name),
            NodeMut::Profile(profile) => profile.remove_region(name),
            NodeMut::Region(region) => region.remove_service(name),
            NodeMut::Service(service) => service.remove_resource(name),
            NodeMut::Resource(_) => false,
        };
        if !removed {
            tracing::info!(%parent, name, "nothing to remove");
            return Ok(Mutation::Missing);
        }
        self.commit()?;
        Ok(Mutation::Applied)
    }

    /// Records whether `node` is shown expanded.
    ///
    /// Only catalog nodes carry the flag; live nodes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be saved.
    pub fn set_expansion(
        &mut self,
        node: &TreeNode,
        expanded: bool,
    ) -> Result<Mutation, StoreError> {
        match node {
            TreeNode::Catalog(node) => self.set_path_expansion(&node.path, expanded),
            TreeNode::Placeholder(_)
            | TreeNode::LambdaGroup { .. }
            | TreeNode::LambdaVersion { .. }
            | TreeNode::LambdaAlias { .. }
            | TreeNode::S3Folder { .. }
            | TreeNode::S3Object { .. } => Ok(Mutation::Unchanged),
        }
    }

    /// Records whether the catalog entity at `path` is shown expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be saved.
    pub fn set_path_expansion(
        &mut self,
        path: &NodePath,
        expanded: bool,
    ) -> Result<Mutation, StoreError> {
        let Some(node) = resolve_mut(&mut self.workspaces, path) else {
            tracing::info!(%path, "node not found");
            return Ok(Mutation::Missing);
        };
        let flag = match node {
            NodeMut::Workspace(ws) => &mut ws.expanded,
            NodeMut::Profile(p) => &mut p.expanded,
            NodeMut::Region(r) => &mut r.expanded,
            NodeMut::Service(s) => &mut s.expanded,
            NodeMut::Resource(r) => &mut r.expanded,
        };
        if *flag == expanded {
            return Ok(Mutation::Unchanged);
        }
        *flag = expanded;
        self.save()?;
        Ok(Mutation::Applied)
    }

    /// Swaps the service at `path` with its neighbour in `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be saved.
    pub fn move_service(
        &mut self,
        path: &NodePath,
        direction: MoveDirection,
    ) -> Result<Mutation, StoreError> {
        let NodePath::Service { workspace, profile, region, service } = path else {
            tracing::info!(%path, "only services can be moved");
            return Ok(Mutation::Unchanged);
        };
        let region_path = NodePath::Region {
            workspace: workspace.clone(),
            profile: profile.clone(),
            region: region.clone(),
        };
        let Some(NodeMut::Region(region)) = resolve_mut(&mut self.workspaces, &region_path) else {
            tracing::info!(%path, "region not found");
            return Ok(Mutation::Missing);
        };
        if region.find_service(service).is_none() {
            tracing::info!(%path, "service not found");
            return Ok(Mutation::Missing);
        }
        if !region.move_service(service, direction) {
            return Ok(Mutation::Unchanged);
        }
        self.commit()?;
        Ok(Mutation::Applied)
    }

    /// Writes every workspace back to its folder.
    ///
    /// Workspaces whose document failed to load are left untouched on disk.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    pub fn save(&self) -> Result<(), StoreError> {
        let store = CatalogStore::new(self.ctx);
        let entries = self.folders.iter().zip(&self.workspaces).zip(&self.writable);
        for ((folder, workspace), writable) in entries {
            if !writable {
                tracing::warn!(
                    document = %folder.document_path().display(),
                    "document failed to load; not overwriting it"
                );
                continue;
            }
            store.save(folder, workspace)?;
        }
        Ok(())
    }

    fn commit(&self) -> Result<(), StoreError> {
        self.save()?;
        self.refresh();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::aws::{LambdaAlias, LambdaVersion, S3Object};
    use crate::testing::{context, CollectingNotifier, MemFs, ScriptedAws};
    use serde_json::Value;

    const DOC: &str = "/work/proj/.aws-tools.json";

    fn path(segments: &[&str]) -> NodePath {
        NodePath::from_segments(segments).unwrap()
    }

    fn folders() -> Vec<WorkspaceFolder> {
        vec![WorkspaceFolder::new("/work/proj")]
    }

    fn labels(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(TreeNode::label).collect()
    }

    fn values(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.value.as_str()).collect()
    }

    fn seeded(fs: MemFs) -> MemFs {
        fs.with_file(
            DOC,
            r#"{"expanded": true, "profiles": [{"name": "dev", "regions": [
                {"name": "us-east-1", "services": [
                    {"name": "Lambda", "resources": [{"name": "handler"}]},
                    {"name": "S3", "resources": [{"name": "logs"}]},
                    {"name": "EC2 - Instances", "resources": [{"name": "web", "id": "i-1"}]}
                ]}
            ]}]}"#,
        )
    }

    #[tokio::test]
    async fn add_and_remove_scenario() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        let proj = catalog.node(&path(&["proj"])).unwrap();

        assert_eq!(catalog.add_entity(&path(&["proj"]), "dev").unwrap(), Mutation::Applied);
        assert_eq!(labels(&catalog.get_children(Some(&proj)).await.unwrap()), vec!["dev"]);

        let dev_path = path(&["proj", "dev"]);
        catalog.add_entity(&dev_path, "us-east-1").unwrap();
        let dev = catalog.node(&dev_path).unwrap();
        assert_eq!(labels(&catalog.get_children(Some(&dev)).await.unwrap()), vec!["us-east-1"]);

        assert_eq!(catalog.remove_entity(&path(&["proj"]), "dev").unwrap(), Mutation::Applied);
        assert_eq!(
            catalog.get_children(Some(&proj)).await.unwrap(),
            vec![TreeNode::Placeholder(Placeholder::NoProfiles)]
        );
        assert!(!fs.contents(DOC).unwrap().contains("dev"));
    }

    #[tokio::test]
    async fn root_children_are_workspaces() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let catalog = CatalogService::load(
            &ctx,
            vec![
                WorkspaceFolder::new("/work/proj"),
                WorkspaceFolder::new("/work/site"),
                WorkspaceFolder::new("/other/proj"),
            ],
        );
        assert_eq!(labels(&catalog.get_children(None).await.unwrap()), vec!["proj", "site"]);
    }

    #[test]
    fn duplicate_names_are_rejected_at_every_level() {
        let fs = MemFs::default();
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        let mut refreshes = catalog.subscribe();

        let steps: [(&[&str], &str); 4] = [
            (&["proj"], "dev"),
            (&["proj", "dev"], "us-east-1"),
            (&["proj", "dev", "us-east-1"], "Lambda"),
            (&["proj", "dev", "us-east-1", "Lambda"], "handler"),
        ];
        for (parent, name) in steps {
            assert_eq!(catalog.add_entity(&path(parent), name).unwrap(), Mutation::Applied);
            assert_eq!(catalog.add_entity(&path(parent), name).unwrap(), Mutation::Duplicate);
        }
        assert_eq!(*refreshes.borrow_and_update(), 4);

        let ws = &catalog.workspaces()[0];
        let service = &ws.profiles[0].regions[0].services[0];
        assert_eq!(ws.profiles.len(), 1);
        assert_eq!(service.resources.len(), 1);
        assert_eq!(service.resources[0].kind, ResourceKind::Lambda);
    }

    #[test]
    fn unresolved_paths_are_noops() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        let before = fs.contents(DOC);

        let missing = path(&["proj", "prod", "us-east-1"]);
        assert_eq!(catalog.add_entity(&missing, "S3").unwrap(), Mutation::Missing);
        assert_eq!(catalog.remove_entity(&missing, "S3").unwrap(), Mutation::Missing);
        assert_eq!(catalog.remove_entity(&path(&["proj"]), "prod").unwrap(), Mutation::Missing);
        assert_eq!(catalog.set_path_expansion(&missing, true).unwrap(), Mutation::Missing);
        assert_eq!(catalog.add_entity(&path(&["elsewhere"]), "dev").unwrap(), Mutation::Missing);
        assert_eq!(fs.contents(DOC), before);
        assert_eq!(*catalog.subscribe().borrow(), 0);
    }

    #[tokio::test]
    async fn region_candidates_exclude_cataloged_regions() {
        let fs = seeded(MemFs::default());
        let aws = ScriptedAws {
            regions: vec!["us-east-1".into(), "us-west-2".into()],
            ..ScriptedAws::default()
        };
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let candidates = catalog.get_candidates(&path(&["proj", "dev"])).await.unwrap();
        assert_eq!(values(&candidates), vec!["us-west-2"]);
    }

    #[tokio::test]
    async fn missing_credentials_warn_and_yield_nothing() {
        let fs = MemFs::default();
        let notifier = CollectingNotifier::default();
        let ctx = context(&fs, &ScriptedAws::default(), &notifier);
        let catalog = CatalogService::load(&ctx, folders());

        assert!(catalog.get_candidates(&path(&["proj"])).await.unwrap().is_empty());
        assert_eq!(notifier.messages(), vec!["/home/u/.aws/credentials is not found"]);
    }

    #[tokio::test]
    async fn profile_candidates_come_from_credentials() {
        let fs = seeded(MemFs::default());
        let aws = ScriptedAws {
            profiles: Some(vec!["default".into(), "dev".into()]),
            ..ScriptedAws::default()
        };
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());
        let candidates = catalog.get_candidates(&path(&["proj"])).await.unwrap();
        assert_eq!(values(&candidates), vec!["default"]);
    }

    #[tokio::test]
    async fn service_menu_skips_existing_services() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let region = path(&["proj", "dev", "us-east-1"]);
        let candidates = catalog.get_candidates(&region).await.unwrap();
        assert_eq!(
            values(&candidates),
            vec!["API Gateway", "CloudWatch Logs", "DynamoDB", "EC2 - Security groups", "VPC"]
        );
        let unknown = path(&["proj", "dev", "eu-west-1"]);
        assert!(catalog.get_candidates(&unknown).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resource_candidates_per_service() {
        let fs = seeded(MemFs::default());
        let aws = ScriptedAws {
            functions: vec![vec!["handler".into(), "worker".into()], vec!["cron".into()]],
            buckets: vec!["logs".into(), "assets".into()],
            instances: vec![
                ResourceSummary { id: "i-1".into(), display_name: "web".into() },
                ResourceSummary { id: "i-2".into(), display_name: "db".into() },
            ],
            ..ScriptedAws::default()
        };
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());
        let service = |name| path(&["proj", "dev", "us-east-1", name]);

        let lambda = catalog.get_candidates(&service("Lambda")).await.unwrap();
        assert_eq!(values(&lambda), vec!["worker", "cron"]);

        let s3 = catalog.get_candidates(&service("S3")).await.unwrap();
        assert_eq!(values(&s3), vec!["assets"]);

        let ec2 = catalog.get_candidates(&service("EC2 - Instances")).await.unwrap();
        assert_eq!(
            ec2,
            vec![Candidate { label: "db - i-2".into(), value: "i-2".into() }]
        );
        assert_eq!(aws.calls().iter().filter(|c| *c == "list_function_names").count(), 2);
    }

    #[tokio::test]
    async fn unsupported_service_has_no_candidates() {
        let fs = MemFs::default();
        let aws = ScriptedAws::default();
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        for (parent, name) in [
            (path(&["proj"]), "dev"),
            (path(&["proj", "dev"]), "us-east-1"),
            (path(&["proj", "dev", "us-east-1"]), "DynamoDB"),
        ] {
            catalog.add_entity(&parent, name).unwrap();
        }
        let dynamo = path(&["proj", "dev", "us-east-1", "DynamoDB"]);
        assert!(catalog.get_candidates(&dynamo).await.unwrap().is_empty());
        assert!(aws.calls().is_empty());
    }

    #[tokio::test]
    async fn live_lookup_failures_are_returned() {
        let fs = seeded(MemFs::default());
        let aws = ScriptedAws { fail: Some("AccessDenied".into()), ..ScriptedAws::default() };
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let err = catalog.get_candidates(&path(&["proj", "dev"])).await.unwrap_err();
        assert_eq!(err.to_string(), "AccessDenied");
        let bucket = catalog.node(&path(&["proj", "dev", "us-east-1", "S3", "logs"])).unwrap();
        assert!(catalog.get_children(Some(&bucket)).await.is_err());
    }

    #[tokio::test]
    async fn lambda_functions_list_versions_and_aliases() {
        let fs = seeded(MemFs::default());
        let version = |v: &str| LambdaVersion {
            function_name: "handler".into(),
            version: v.into(),
            description: String::new(),
        };
        let aws = ScriptedAws {
            versions: vec![vec![version("$LATEST"), version("1")], vec![version("2")]],
            aliases: vec![LambdaAlias {
                name: "live".into(),
                function_version: "2".into(),
                description: String::new(),
            }],
            ..ScriptedAws::default()
        };
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let function = catalog.node(&path(&["proj", "dev", "us-east-1", "Lambda", "handler"]));
        let groups = catalog.get_children(function.as_ref()).await.unwrap();
        assert_eq!(labels(&groups), vec!["Versions", "Aliases"]);

        let versions = catalog.get_children(Some(&groups[0])).await.unwrap();
        assert_eq!(labels(&versions), vec!["$LATEST", "1", "2"]);
        let aliases = catalog.get_children(Some(&groups[1])).await.unwrap();
        assert_eq!(labels(&aliases), vec!["live"]);
        assert_eq!(aliases[0].detail().as_deref(), Some("-> 2"));
    }

    #[tokio::test]
    async fn buckets_list_objects_before_folders() {
        let fs = seeded(MemFs::default());
        let object = |key: &str| {
            S3Entry::Object(S3Object {
                key: key.into(),
                size: 1,
                last_modified: None,
                storage_class: None,
            })
        };
        let mut aws = ScriptedAws::default();
        aws.objects.insert(
            String::new(),
            vec![
                vec![S3Entry::Folder { prefix: "2024/".into() }, object("readme.md")],
                vec![object("z.txt")],
            ],
        );
        aws.objects.insert(
            "2024/".into(),
            vec![vec![object("2024/"), object("2024/app.log"), S3Entry::Folder {
                prefix: "2024/01/".into(),
            }]],
        );
        let ctx = context(&fs, &aws, &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let bucket = catalog.node(&path(&["proj", "dev", "us-east-1", "S3", "logs"]));
        let root = catalog.get_children(bucket.as_ref()).await.unwrap();
        assert_eq!(labels(&root), vec!["readme.md", "z.txt", "2024"]);

        let nested = catalog.get_children(Some(&root[2])).await.unwrap();
        assert_eq!(labels(&nested), vec!["app.log", "01"]);
    }

    #[tokio::test]
    async fn empty_bucket_shows_placeholder() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let bucket = catalog.node(&path(&["proj", "dev", "us-east-1", "S3", "logs"]));
        let root = catalog.get_children(bucket.as_ref()).await.unwrap();
        assert_eq!(root, vec![TreeNode::Placeholder(Placeholder::NoResources)]);
    }

    #[test]
    fn unreadable_documents_are_never_overwritten() {
        let corrupt = r#"{"profiles": [{"name": "dev"},]}"#;
        let fs = MemFs::default().with_file(DOC, corrupt);
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(
            &ctx,
            vec![WorkspaceFolder::new("/work/proj"), WorkspaceFolder::new("/work/site")],
        );

        assert_eq!(catalog.add_entity(&path(&["site"]), "ops").unwrap(), Mutation::Applied);
        assert_eq!(catalog.add_entity(&path(&["proj"]), "dev").unwrap(), Mutation::Applied);

        assert_eq!(fs.contents(DOC).as_deref(), Some(corrupt));
        assert!(fs.contents("/work/site/.aws-tools.json").unwrap().contains("ops"));
    }

    #[tokio::test]
    async fn id_keyed_resources_have_no_children() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let catalog = CatalogService::load(&ctx, folders());

        let ec2 = catalog.node(&path(&["proj", "dev", "us-east-1", "EC2 - Instances"]));
        let instances = catalog.get_children(ec2.as_ref()).await.unwrap();
        assert_eq!(labels(&instances), vec!["web"]);
        assert_eq!(instances[0].catalog_path().unwrap().name(), "i-1");
        assert!(!instances[0].is_expandable());

        let children = catalog.get_children(Some(&instances[0])).await.unwrap();
        assert_eq!(children, vec![TreeNode::Placeholder(Placeholder::NoResources)]);
    }

    #[test]
    fn expansion_is_persisted() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        let region = catalog.node(&path(&["proj", "dev", "us-east-1"])).unwrap();

        assert_eq!(catalog.set_expansion(&region, true).unwrap(), Mutation::Applied);
        assert_eq!(catalog.set_expansion(&region, true).unwrap(), Mutation::Unchanged);
        let placeholder = TreeNode::Placeholder(Placeholder::NoRegions);
        assert_eq!(catalog.set_expansion(&placeholder, true).unwrap(), Mutation::Unchanged);

        let doc: Value = serde_json::from_str(&fs.contents(DOC).unwrap()).unwrap();
        assert_eq!(doc["profiles"][0]["regions"][0]["expanded"], Value::Bool(true));
        assert_eq!(*catalog.subscribe().borrow(), 0);
    }

    #[test]
    fn services_move_one_step_at_a_time() {
        let fs = seeded(MemFs::default());
        let ctx = context(&fs, &ScriptedAws::default(), &CollectingNotifier::default());
        let mut catalog = CatalogService::load(&ctx, folders());
        let service = |name| path(&["proj", "dev", "us-east-1", name]);

        assert_eq!(
            catalog.move_service(&service("Lambda"), MoveDirection::Up).unwrap(),
            Mutation::Unchanged
        );
        assert_eq!(
            catalog.move_service(&service("Lambda"), MoveDirection::Down).unwrap(),
            Mutation::Applied
        );
        assert_eq!(
            catalog.move_service(&service("VPC"), MoveDirection::Down).unwrap(),
            Mutation::Missing
        );

        let doc: Value = serde_json::from_str(&fs.contents(DOC).unwrap()).unwrap();
        let order: Vec<&str> = doc["profiles"][0]["regions"][0]["services"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(order, vec!["S3", "Lambda", "EC2 - Instances"]);
    }
}
