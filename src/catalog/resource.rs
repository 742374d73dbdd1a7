//! Resource variants and the resolver that picks one from a service name.

use serde::{Deserialize, Serialize};

/// Runtime variant of a cataloged resource.
///
/// The variant is never persisted. It is derived from the owning service's
/// name every time a [`Resource`](super::model::Resource) is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A Lambda function; browses versions and aliases.
    Lambda,
    /// An S3 bucket; browses objects and folders.
    S3,
    /// Any other service; no browsable children.
    Unknown,
}

/// Which field identifies a resource among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey {
    /// Siblings are matched by `name`.
    Name,
    /// Siblings are matched by `id`, falling back to `name` when no id is stored.
    Id,
}

impl ResourceKind {
    /// Resolves the variant for a resource owned by a service named `service_name`.
    #[must_use]
    pub fn resolve(service_name: &str) -> Self {
        match service_name {
            "Lambda" => Self::Lambda,
            "S3" => Self::S3,
            _ => Self::Unknown,
        }
    }

    /// The identity key used when matching resources of this variant.
    #[must_use]
    pub fn identity(self) -> IdentityKey {
        match self {
            Self::Lambda | Self::S3 => IdentityKey::Name,
            Self::Unknown => IdentityKey::Id,
        }
    }

    /// Whether nodes of this variant have lazily fetched children.
    #[must_use]
    pub fn is_browsable(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}
