//! Replaying adapters that answer from recorded interactions.

pub mod aws;

pub use aws::ReplayingAwsLookup;
