//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the catalog core and something
//! it does not control: the disk holding catalog documents, the AWS APIs
//! that supply candidate names and browsable children, and the user who
//! receives warnings. Implementations live in `src/adapters/`.

pub mod aws;
pub mod filesystem;
pub mod notifier;

pub use aws::{AwsLookup, AwsScope, LookupError, LookupFuture, Page, Pager};
pub use filesystem::FileSystem;
pub use notifier::Notifier;
