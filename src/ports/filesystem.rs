//! Filesystem port for catalog document I/O.

use std::path::Path;

/// Reads and writes whole catalog documents.
///
/// Abstracting the filesystem lets the store run against an in-memory map
/// in tests without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads a file as UTF-8, returning `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_optional(
        &self,
        path: &Path,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces the file's contents, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
