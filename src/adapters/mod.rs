//! Port implementations.
//!
//! - `live`: real disk, the `aws` command-line client, stderr.
//! - `recording`: wraps a live lookup and captures every call to a cassette.
//! - `replaying`: answers lookups from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
