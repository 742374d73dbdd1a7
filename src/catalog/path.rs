//! Name-chain paths addressing catalog nodes.

use std::fmt;

use crate::ports::aws::AwsScope;

/// Depth of a node in the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// One workspace folder.
    Workspace,
    /// A credentials profile.
    Profile,
    /// A region.
    Region,
    /// A service entry.
    Service,
    /// A resource.
    Resource,
}

impl Level {
    /// Lower-case noun for log and user messages.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Profile => "profile",
            Self::Region => "region",
            Self::Service => "service",
            Self::Resource => "resource",
        }
    }
}

/// Full path context of a catalog node, from its workspace down.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodePath {
    /// A workspace.
    Workspace {
        /// Workspace name.
        workspace: String,
    },
    /// A profile.
    Profile {
        /// Workspace name.
        workspace: String,
        /// Profile name.
        profile: String,
    },
    /// A region.
    Region {
        /// Workspace name.
        workspace: String,
        /// Profile name.
        profile: String,
        /// Region name.
        region: String,
    },
    /// A service.
    Service {
        /// Workspace name.
        workspace: String,
        /// Profile name.
        profile: String,
        /// Region name.
        region: String,
        /// Service name.
        service: String,
    },
    /// A resource.
    Resource {
        /// Workspace name.
        workspace: String,
        /// Profile name.
        profile: String,
        /// Region name.
        region: String,
        /// Service name.
        service: String,
        /// Resource identity.
        resource: String,
    },
}

impl NodePath {
    /// Path of the workspace named `name`.
    #[must_use]
    pub fn workspace(name: impl Into<String>) -> Self {
        Self::Workspace { workspace: name.into() }
    }

    /// Builds a path from one to five name segments.
    #[must_use]
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Option<Self> {
        let (first, rest) = segments.split_first()?;
        let mut path = Self::workspace(first.as_ref());
        for segment in rest {
            path = path.child(segment.as_ref())?;
        }
        Some(path)
    }

    /// Path of the child named `name`, or `None` below the resource level.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Some(match self.clone() {
            Self::Workspace { workspace } => Self::Profile { workspace, profile: name },
            Self::Profile { workspace, profile } => {
                Self::Region { workspace, profile, region: name }
            }
            Self::Region { workspace, profile, region } => {
                Self::Service { workspace, profile, region, service: name }
            }
            Self::Service { workspace, profile, region, service } => {
                Self::Resource { workspace, profile, region, service, resource: name }
            }
            Self::Resource { .. } => return None,
        })
    }

    /// Depth of the addressed node.
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            Self::Workspace { .. } => Level::Workspace,
            Self::Profile { .. } => Level::Profile,
            Self::Region { .. } => Level::Region,
            Self::Service { .. } => Level::Service,
            Self::Resource { .. } => Level::Resource,
        }
    }

    /// Name segments from the workspace down.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Workspace { workspace } => vec![workspace.as_str()],
            Self::Profile { workspace, profile } => vec![workspace.as_str(), profile.as_str()],
            Self::Region { workspace, profile, region } => {
                vec![workspace.as_str(), profile.as_str(), region.as_str()]
            }
            Self::Service { workspace, profile, region, service } => {
                vec![workspace.as_str(), profile.as_str(), region.as_str(), service.as_str()]
            }
            Self::Resource { workspace, profile, region, service, resource } => vec![
                workspace.as_str(),
                profile.as_str(),
                region.as_str(),
                service.as_str(),
                resource.as_str(),
            ],
        }
    }

    /// Name of the addressed node itself.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Workspace { workspace } => workspace,
            Self::Profile { profile, .. } => profile,
            Self::Region { region, .. } => region,
            Self::Service { service, .. } => service,
            Self::Resource { resource, .. } => resource,
        }
    }

    /// Workspace this path lives under.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        self.segments()[0]
    }

    /// Profile and region for API calls, once the path is deep enough.
    #[must_use]
    pub fn scope(&self) -> Option<AwsScope> {
        match self {
            Self::Region { profile, region, .. }
            | Self::Service { profile, region, .. }
            | Self::Resource { profile, region, .. } => Some(AwsScope::new(profile, region)),
            Self::Workspace { .. } | Self::Profile { .. } => None,
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join(" / "))
    }
}
