//! File system helpers: existence checks, permission bits, temporary files.

pub mod temp;

pub use temp::TempFile;

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Whether `path` exists.
///
/// Returns `Ok(false)` only for "not found"; any other stat failure, such
/// as permission denied on a parent directory, is returned as an error.
pub fn path_exists(path: impl AsRef<Path>) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Whether the metadata describes something executable.
///
/// On Unix any of the owner/group/other execute bits counts. Windows has no
/// execute bit, so everything is considered executable there.
#[must_use]
pub fn is_executable(metadata: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        true
    }
}
