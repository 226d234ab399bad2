//! The `<exe>.backup` copy kept around self-install.
//!
//! Taking and restoring a backup both go through the installer's overwrite
//! path, so `gitkit self-update --rollback` can put the old binary back while
//! the new one is running.

use anyhow::Result;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::overwrite;
use crate::core::GitkitError;

/// Copies an executable to `<exe>.backup` and back.
#[derive(Debug, Clone)]
pub struct BackupManager {
    executable: PathBuf,
    backup: PathBuf,
}

impl BackupManager {
    /// Manager for `executable`. Nothing is touched until a method is called.
    pub fn new(executable: PathBuf) -> Self {
        let mut name = executable.file_name().unwrap_or_default().to_os_string();
        name.push(".backup");
        let backup = executable.with_file_name(name);

        Self {
            executable,
            backup,
        }
    }

    /// Copy the executable to the backup path with its permissions.
    ///
    /// An older backup is unlinked first, so a read-only copy from an earlier
    /// update does not get in the way.
    ///
    /// # Errors
    ///
    /// [`GitkitError::InstallError`] naming the backup path when the
    /// executable cannot be read or the backup cannot be written.
    pub fn create_backup(&self) -> Result<()> {
        match std::fs::remove_file(&self.backup) {
            Ok(()) => debug!("Removed previous backup {}", self.backup.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(backup_error(&self.backup, format!("cannot remove old backup: {e}")));
            }
        }

        let written = copy_with_permissions(&self.executable, &self.backup)?;
        info!(
            "Backed up {} ({} bytes) to {}",
            self.executable.display(),
            written,
            self.backup.display()
        );
        Ok(())
    }

    /// Write the backup over the executable, restoring its permissions.
    ///
    /// The backup itself is kept.
    ///
    /// # Errors
    ///
    /// [`GitkitError::InstallError`] naming the executable when there is no
    /// backup or it cannot be copied back.
    pub fn restore_backup(&self) -> Result<()> {
        if !self.backup_exists() {
            return Err(backup_error(
                &self.executable,
                format!("no backup found at {}", self.backup.display()),
            ));
        }

        let written = copy_with_permissions(&self.backup, &self.executable)?;
        info!(
            "Restored {} ({} bytes) from {}",
            self.executable.display(),
            written,
            self.backup.display()
        );
        Ok(())
    }

    /// Whether a backup file is present.
    pub fn backup_exists(&self) -> bool {
        self.backup.is_file()
    }

    /// Path of the backup file.
    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Path of the protected executable.
    pub fn executable_path(&self) -> &Path {
        &self.executable
    }
}

fn copy_with_permissions(from: &Path, to: &Path) -> Result<u64> {
    let mut src = File::open(from)
        .map_err(|e| backup_error(to, format!("cannot open {}: {e}", from.display())))?;
    let permissions = src
        .metadata()
        .map_err(|e| backup_error(to, format!("cannot stat {}: {e}", from.display())))?
        .permissions();

    overwrite(&mut src, to, Some(permissions)).map_err(|e| backup_error(to, e.to_string()))
}

fn backup_error(path: &Path, reason: String) -> anyhow::Error {
    GitkitError::InstallError {
        path: path.display().to_string(),
        reason,
    }
    .into()
}
