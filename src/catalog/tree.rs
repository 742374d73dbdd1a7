//! Display nodes handed to the tree view.
//!
//! Catalog nodes mirror persisted entities. Everything else (placeholders,
//! Lambda groups, versions, aliases and S3 listings) exists only for display
//! and is rebuilt on every expansion.

use crate::ports::aws::{LambdaAlias, LambdaVersion, S3Object};

use super::path::{Level, NodePath};
use super::resource::ResourceKind;

/// Informational entry shown when a catalog level has no children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Workspace without profiles.
    NoProfiles,
    /// Profile without regions.
    NoRegions,
    /// Region without services.
    NoServices,
    /// Service or resource without children.
    NoResources,
}

impl Placeholder {
    /// Placeholder for an empty node at `level`.
    #[must_use]
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Workspace => Self::NoProfiles,
            Level::Profile => Self::NoRegions,
            Level::Region => Self::NoServices,
            Level::Service | Level::Resource => Self::NoResources,
        }
    }

    /// Text shown in the tree.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::NoProfiles => "No profiles added",
            Self::NoRegions => "No regions added",
            Self::NoServices => "No services added",
            Self::NoResources => "No resources added",
        }
    }
}

/// The two groups listed under a Lambda function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaGroup {
    /// Published versions.
    Versions,
    /// Aliases.
    Aliases,
}

impl LambdaGroup {
    /// Group label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Versions => "Versions",
            Self::Aliases => "Aliases",
        }
    }
}

/// A persisted catalog entity as shown in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogNode {
    /// Full path; the last segment is the entity's identity.
    pub path: NodePath,
    /// Display name.
    pub label: String,
    /// Persisted expansion flag.
    pub expanded: bool,
    /// Variant, for resource nodes only.
    pub kind: Option<ResourceKind>,
}

/// Any node the tree view can show.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// A persisted entity.
    Catalog(CatalogNode),
    /// An empty-level marker.
    Placeholder(Placeholder),
    /// `Versions` or `Aliases` under a Lambda function.
    LambdaGroup {
        /// Path of the function resource.
        function: NodePath,
        /// Which group.
        group: LambdaGroup,
    },
    /// One published version.
    LambdaVersion {
        /// Path of the function resource.
        function: NodePath,
        /// Version details.
        version: LambdaVersion,
    },
    /// One alias.
    LambdaAlias {
        /// Path of the function resource.
        function: NodePath,
        /// Alias details.
        alias: LambdaAlias,
    },
    /// A common prefix inside a bucket.
    S3Folder {
        /// Path of the bucket resource.
        bucket: NodePath,
        /// Full prefix, ending in `/`.
        prefix: String,
    },
    /// An object inside a bucket.
    S3Object {
        /// Path of the bucket resource.
        bucket: NodePath,
        /// Prefix the object was listed under.
        prefix: Option<String>,
        /// Object metadata.
        object: S3Object,
    },
}

impl TreeNode {
    /// Text shown for the node.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Catalog(node) => &node.label,
            Self::Placeholder(placeholder) => placeholder.text(),
            Self::LambdaGroup { group, .. } => group.label(),
            Self::LambdaVersion { version, .. } => &version.version,
            Self::LambdaAlias { alias, .. } => &alias.name,
            Self::S3Folder { prefix, .. } => {
                prefix.trim_end_matches('/').rsplit('/').next().unwrap_or(prefix)
            }
            Self::S3Object { prefix, object, .. } => {
                let prefix = prefix.as_deref().unwrap_or_default();
                object.key.strip_prefix(prefix).unwrap_or(&object.key)
            }
        }
    }

    /// Secondary text, when the node has any.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::LambdaVersion { version, .. } if !version.description.is_empty() => {
                Some(version.description.clone())
            }
            Self::LambdaAlias { alias, .. } => Some(format!("-> {}", alias.function_version)),
            Self::S3Object { object, .. } => Some(format!("{} bytes", object.size)),
            Self::Catalog(CatalogNode { path, label, .. }) if path.name() != label.as_str() => {
                Some(path.name().to_string())
            }
            _ => None,
        }
    }

    /// Whether expanding the node can yield children.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        match self {
            Self::Catalog(node) => node.kind.map_or(true, ResourceKind::is_browsable),
            Self::LambdaGroup { .. } | Self::S3Folder { .. } => true,
            Self::Placeholder(_)
            | Self::LambdaVersion { .. }
            | Self::LambdaAlias { .. }
            | Self::S3Object { .. } => false,
        }
    }

    /// Catalog path, for persisted nodes.
    #[must_use]
    pub fn catalog_path(&self) -> Option<&NodePath> {
        match self {
            Self::Catalog(node) => Some(&node.path),
            _ => None,
        }
    }
}
