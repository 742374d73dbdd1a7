//! The AWS catalog: entities, node paths, display nodes and the service
//! that owns the in-memory forest.

pub mod model;
pub mod path;
pub mod resource;
pub mod service;
pub mod tree;

pub use model::{MoveDirection, Profile, Region, Resource, Service, Workspace};
pub use path::{Level, NodePath};
pub use resource::{IdentityKey, ResourceKind};
pub use service::{Candidate, CatalogService, Mutation, SERVICE_MENU};
pub use tree::{CatalogNode, LambdaGroup, Placeholder, TreeNode};
