//! Self-update: download a release archive, extract it, and install it over
//! the running executable.
//!
//! The steps run strictly in sequence:
//!
//! 1. [`Fetcher::download`] fetches the archive into a temp file
//! 2. [`ArchiveExtractor::extract`] pulls the payload into a second temp file
//! 3. [`BackupManager::create_backup`] copies the current binary aside (optional)
//! 4. [`SelfInstaller::install`] overwrites the executable
//!
//! Both temp files are dropped, and therefore deleted, on every exit path.
//! If the install step fails after a backup was taken, the backup is restored
//! and the install error is returned. A successful update keeps the backup so
//! `gitkit self-update --rollback` can undo it.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitkit::config::GlobalConfig;
//! use gitkit::upgrade::SelfUpdate;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::default();
//! let updater = SelfUpdate::from_config(&config)?;
//! let installed = updater.run("https://example.com/gitkit-linux-x86_64.tar.gz").await?;
//! println!("updated {}", installed.display());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::archive::ArchiveExtractor;
use crate::config::GlobalConfig;
use crate::core::GitkitError;
use crate::fetch::Fetcher;
use crate::install::{BackupManager, SelfInstaller};
use crate::utils::fs::path_exists;

/// Runs the download → extract → install sequence.
pub struct SelfUpdate {
    fetcher: Fetcher,
    extractor: ArchiveExtractor,
    installer: SelfInstaller,
    backup: bool,
}

impl SelfUpdate {
    /// Update flow from explicit parts, with backups enabled.
    pub fn new(fetcher: Fetcher, extractor: ArchiveExtractor, installer: SelfInstaller) -> Self {
        Self {
            fetcher,
            extractor,
            installer,
            backup: true,
        }
    }

    /// Update flow for the running executable, using the temp, timeout and
    /// backup settings from `config`.
    pub fn from_config(config: &GlobalConfig) -> Result<Self> {
        let temp = config.temp_config();
        let fetcher = Fetcher::with_timeout(temp.clone(), config.http_timeout())?;
        Ok(Self::new(fetcher, ArchiveExtractor::new(temp), SelfInstaller::new())
            .backup(config.backup))
    }

    /// Enable or disable the backup step.
    #[must_use]
    pub fn backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Download `url`, extract its payload, and install it.
    ///
    /// Returns the path of the replaced executable.
    ///
    /// # Errors
    ///
    /// The first failing step's error. An archive without payload is refused
    /// with [`GitkitError::ArchiveError`] before anything is installed.
    pub async fn run(&self, url: &str) -> Result<PathBuf> {
        let archive = self.fetcher.download(url).await?;
        let binary = self.extractor.extract(archive.path())?;
        drop(archive);

        if binary.is_empty()? {
            return Err(GitkitError::ArchiveError {
                path: url.to_string(),
                reason: "archive contains no payload".to_string(),
            }
            .into());
        }

        let destination = self.installer.destination()?;
        let backup = if self.backup && path_exists(&destination)? {
            let manager = BackupManager::new(destination.clone());
            manager.create_backup().context("Failed to create backup")?;
            Some(manager)
        } else {
            debug!("Skipping backup of {}", destination.display());
            None
        };

        match self.installer.install(binary.path()) {
            Ok(installed) => {
                info!("Updated {} from {}", installed.display(), url);
                Ok(installed)
            }
            Err(e) => {
                if let Some(manager) = backup {
                    warn!("Install failed, restoring {}", manager.executable_path().display());
                    if let Err(restore_err) = manager.restore_backup() {
                        warn!("Failed to restore backup: {}", restore_err);
                    }
                }
                Err(e)
            }
        }
    }

    /// Put `<exe>.backup` back in place of the executable.
    ///
    /// Returns the path of the restored executable.
    ///
    /// # Errors
    ///
    /// [`GitkitError::InstallError`] when there is no backup or it cannot be
    /// written over the executable.
    pub fn rollback(&self) -> Result<PathBuf> {
        let destination = self.installer.destination()?;
        BackupManager::new(destination.clone()).restore_backup()?;
        Ok(destination)
    }
}
