//! Catalog entities: workspace, profile, region, service and resource.
//!
//! Every level keeps its children in insertion order, which is also display
//! order. Sibling names are unique; adding a name that already exists is a
//! logged no-op rather than an error.

use serde::Serialize;

use super::path::Level;
use super::resource::{IdentityKey, ResourceKind};

/// Direction for [`Region::move_service`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the front of the list.
    Up,
    /// Towards the back of the list.
    Down,
}

/// Root of one catalog document, one per workspace folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workspace {
    /// Folder name; not persisted.
    #[serde(skip)]
    pub name: String,
    /// Whether the node was last shown expanded.
    pub expanded: bool,
    /// Cataloged profiles.
    pub profiles: Vec<Profile>,
}

/// An AWS credentials profile within a workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// Profile name as it appears in the credentials file.
    pub name: String,
    /// Whether the node was last shown expanded.
    pub expanded: bool,
    /// Cataloged regions.
    pub regions: Vec<Region>,
}

/// An AWS region within a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Region identifier, e.g. `us-east-1`.
    pub name: String,
    /// Whether the node was last shown expanded.
    pub expanded: bool,
    /// Cataloged services.
    pub services: Vec<Service>,
}

/// An AWS service entry within a region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    /// Service menu name, e.g. `Lambda`.
    pub name: String,
    /// Whether the node was last shown expanded.
    pub expanded: bool,
    /// Cataloged resources.
    pub resources: Vec<Resource>,
}

/// A single cataloged resource (function, bucket, instance, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Display name.
    pub name: String,
    /// Separate identifier for variants keyed by id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether the node was last shown expanded.
    pub expanded: bool,
    /// Variant resolved from the owning service's name at construction.
    #[serde(skip)]
    pub kind: ResourceKind,
}

trait Entry {
    fn matches(&self, key: &str) -> bool;
}

macro_rules! named_entry {
    ($($ty:ty),*) => {
        $(impl Entry for $ty {
            fn matches(&self, key: &str) -> bool {
                self.name == key
            }
        })*
    };
}

named_entry!(Profile, Region, Service);

impl Entry for Resource {
    fn matches(&self, key: &str) -> bool {
        match (self.kind.identity(), self.id.as_deref()) {
            (IdentityKey::Id, Some(id)) => id == key,
            _ => self.name == key,
        }
    }
}

fn insert_unique<T: Entry>(
    children: &mut Vec<T>,
    key: &str,
    level: Level,
    make: impl FnOnce() -> T,
) -> bool {
    if children.iter().any(|c| c.matches(key)) {
        tracing::info!(level = level.noun(), name = key, "already added");
        return false;
    }
    children.push(make());
    true
}

fn remove_matching<T: Entry>(children: &mut Vec<T>, key: &str) -> bool {
    let before = children.len();
    children.retain(|c| !c.matches(key));
    children.len() != before
}

impl Workspace {
    /// Creates an empty, collapsed workspace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanded: false, profiles: Vec::new() }
    }

    /// Appends a profile unless one with the same name exists.
    pub fn add_profile(&mut self, name: &str) -> bool {
        insert_unique(&mut self.profiles, name, Level::Profile, || Profile::new(name))
    }

    /// Drops every profile named `name`.
    pub fn remove_profile(&mut self, name: &str) -> bool {
        remove_matching(&mut self.profiles, name)
    }

    /// Finds a profile by name.
    #[must_use]
    pub fn find_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.matches(name))
    }

    /// Finds a profile by name for mutation.
    pub fn find_profile_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.matches(name))
    }
}

impl Profile {
    /// Creates an empty, collapsed profile.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanded: false, regions: Vec::new() }
    }

    /// Appends a region unless one with the same name exists.
    pub fn add_region(&mut self, name: &str) -> bool {
        insert_unique(&mut self.regions, name, Level::Region, || Region::new(name))
    }

    /// Drops every region named `name`.
    pub fn remove_region(&mut self, name: &str) -> bool {
        remove_matching(&mut self.regions, name)
    }

    /// Finds a region by name.
    #[must_use]
    pub fn find_region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.matches(name))
    }

    /// Finds a region by name for mutation.
    pub fn find_region_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.matches(name))
    }
}

impl Region {
    /// Creates an empty, collapsed region.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanded: false, services: Vec::new() }
    }

    /// Appends a service unless one with the same name exists.
    pub fn add_service(&mut self, name: &str) -> bool {
        insert_unique(&mut self.services, name, Level::Service, || Service::new(name))
    }

    /// Drops every service named `name`.
    pub fn remove_service(&mut self, name: &str) -> bool {
        remove_matching(&mut self.services, name)
    }

    /// Finds a service by name.
    #[must_use]
    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.matches(name))
    }

    /// Finds a service by name for mutation.
    pub fn find_service_mut(&mut self, name: &str) -> Option<&mut Service> {
        self.services.iter_mut().find(|s| s.matches(name))
    }

    /// Swaps the named service with its neighbour in `direction`.
    ///
    /// Returns `false` when the service is missing or already at the edge.
    pub fn move_service(&mut self, name: &str, direction: MoveDirection) -> bool {
        let Some(index) = self.services.iter().position(|s| s.matches(name)) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.services.len()),
        };
        match target {
            Some(target) => {
                self.services.swap(index, target);
                true
            }
            None => false,
        }
    }
}

impl Service {
    /// Creates an empty, collapsed service.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), expanded: false, resources: Vec::new() }
    }

    /// Variant that resources created under this service resolve to.
    #[must_use]
    pub fn resource_kind(&self) -> ResourceKind {
        ResourceKind::resolve(&self.name)
    }

    /// Appends a resource unless one with the same identity exists.
    pub fn add_resource(&mut self, name: &str) -> bool {
        let kind = self.resource_kind();
        insert_unique(&mut self.resources, name, Level::Resource, || {
            Resource::new(kind, name, None)
        })
    }

    /// Drops every resource whose identity matches `key`.
    pub fn remove_resource(&mut self, key: &str) -> bool {
        remove_matching(&mut self.resources, key)
    }

    /// Finds a resource by its identity key.
    #[must_use]
    pub fn find_resource(&self, key: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.matches(key))
    }

    /// Finds a resource by its identity key for mutation.
    pub fn find_resource_mut(&mut self, key: &str) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.matches(key))
    }

    /// Whether a candidate with `key` is already cataloged under this service.
    #[must_use]
    pub fn contains_resource(&self, key: &str) -> bool {
        self.find_resource(key).is_some()
    }
}

impl Resource {
    /// Creates a collapsed resource of the given variant.
    #[must_use]
    pub fn new(kind: ResourceKind, name: impl Into<String>, id: Option<String>) -> Self {
        Self { name: name.into(), id, expanded: false, kind }
    }

    /// The string this resource is matched by among its siblings.
    #[must_use]
    pub fn identity(&self) -> &str {
        match (self.kind.identity(), self.id.as_deref()) {
            (IdentityKey::Id, Some(id)) => id,
            _ => &self.name,
        }
    }
}
