//! Installing a new binary over the running executable.
//!
//! [`SelfInstaller::install`] resolves the destination from argv[0] (see
//! [`resolve_executable_path`]), truncates it, marks it `0755`, and streams
//! the new content in. The mode is set before any byte is written, so even a
//! partially written file stays executable.
//!
//! # Failure window
//!
//! Once the destination is truncated, a failure leaves the on-disk binary
//! corrupt. The running process is unaffected until the next launch. Use
//! [`BackupManager`] to keep a copy to restore from; the CLI does this by
//! default.

pub mod backup;

pub use backup::BackupManager;

use anyhow::Result;
use std::fs::{File, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::GitkitError;
use crate::utils::path::resolve_executable_path;

/// `errno` for "text file busy", returned when opening a running executable for writing.
#[cfg(unix)]
const ETXTBSY: i32 = 26;

/// Path of the currently running program, resolved from argv[0].
pub fn current_executable_path() -> Result<PathBuf> {
    let argv0 = std::env::args_os().next().ok_or_else(|| GitkitError::PathResolutionError {
        reference: String::new(),
        reason: "argv[0] is not available".to_string(),
    })?;
    resolve_executable_path(argv0)
}

/// Overwrites an executable in place with new content.
#[derive(Debug, Clone, Default)]
pub struct SelfInstaller {
    destination: Option<PathBuf>,
}

impl SelfInstaller {
    /// Installer targeting the currently running executable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installer targeting an explicit path instead of the running executable.
    pub fn with_destination(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: Some(destination.into()),
        }
    }

    /// The path that [`install`](Self::install) will overwrite.
    pub fn destination(&self) -> Result<PathBuf> {
        match &self.destination {
            Some(path) => Ok(path.clone()),
            None => current_executable_path(),
        }
    }

    /// Replace the destination's content with `new_binary` and mark it executable.
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// [`GitkitError::InstallError`] if the source cannot be opened or read,
    /// or the destination cannot be created, chmod'ed, or written.
    /// Path resolution errors propagate unchanged.
    pub fn install(&self, new_binary: &Path) -> Result<PathBuf> {
        let dest = self.destination()?;
        let install_error = |reason: String| GitkitError::InstallError {
            path: dest.display().to_string(),
            reason,
        };

        // Open the source first so a missing file never truncates the destination
        let mut src = File::open(new_binary).map_err(|e| {
            install_error(format!("cannot open new binary {}: {e}", new_binary.display()))
        })?;

        info!("Installing {} to {}", new_binary.display(), dest.display());
        let written = overwrite(&mut src, &dest, executable_permissions())
            .map_err(|e| install_error(e.to_string()))?;

        debug!("Wrote {} bytes to {}", written, dest.display());
        Ok(dest)
    }
}

/// Replace `dest`'s content with everything read from `src`.
///
/// `permissions` are applied before the first byte is written. Shared by
/// install and backup restore so both can replace a running executable.
fn overwrite(src: &mut File, dest: &Path, permissions: Option<Permissions>) -> io::Result<u64> {
    let mut out =
        create_destination(dest).map_err(|e| annotate("cannot create destination", e))?;
    if let Some(permissions) = permissions {
        out.set_permissions(permissions).map_err(|e| annotate("cannot set permissions", e))?;
    }

    let written = io::copy(src, &mut out).map_err(|e| annotate("cannot write content", e))?;
    out.flush()?;
    out.sync_all()?;
    Ok(written)
}

fn annotate(what: &str, e: io::Error) -> io::Error {
    io::Error::new(e.kind(), format!("{what}: {e}"))
}

/// Create or truncate `dest`.
///
/// Unix refuses to open a running executable for writing; in that case the
/// file is unlinked first (the running image keeps its inode) and recreated.
fn create_destination(dest: &Path) -> io::Result<File> {
    match File::create(dest) {
        #[cfg(unix)]
        Err(e) if e.raw_os_error() == Some(ETXTBSY) => {
            warn!("{} is busy, replacing it instead of truncating", dest.display());
            std::fs::remove_file(dest)?;
            File::create(dest)
        }
        result => result,
    }
}

#[cfg(unix)]
fn executable_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn executable_permissions() -> Option<Permissions> {
    None
}
