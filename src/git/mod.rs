//! Repository location queries backed by the system `git` binary.
//!
//! gitkit never links a git library; it shells out to whatever `git` is on
//! the search path through [`ProcessCommand`], so user configuration such as
//! `safe.directory` or `GIT_DIR` is honoured exactly as on the command line.
//!
//! Both queries must run inside a working tree. Outside one, git exits with
//! status 128 and the query fails with [`GitkitError::CommandFailed`].
//!
//! ```rust,no_run
//! # async fn example() -> anyhow::Result<()> {
//! let root = gitkit::git::repo_root().await?;
//! let git_dir = gitkit::git::git_dir().await?;
//! println!("{} ({})", root.display(), git_dir.display());
//! # Ok(())
//! # }
//! ```
//!
//! [`GitkitError::CommandFailed`]: crate::core::GitkitError::CommandFailed

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::process::ProcessCommand;

/// Name of the git executable for this platform.
pub const fn git_command() -> &'static str {
    if cfg!(windows) { "git.exe" } else { "git" }
}

/// Runs repository queries from a fixed directory.
#[derive(Debug, Clone)]
pub struct RepoLocator {
    dir: PathBuf,
}

impl RepoLocator {
    /// Locator that queries from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    /// Locator that queries from the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        let dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::new(dir))
    }

    /// Top-level directory of the working tree (`git rev-parse --show-toplevel`).
    pub async fn repo_root(&self) -> Result<PathBuf> {
        self.query(&["rev-parse", "--show-toplevel"]).await.map(PathBuf::from)
    }

    /// Metadata directory (`git rev-parse --git-dir`).
    ///
    /// Git prints this relative to the query directory when run from the top
    /// of the tree (usually `.git`) and absolute otherwise; the output is
    /// returned as printed. Use [`git_dir_absolute`](Self::git_dir_absolute)
    /// when an absolute path is needed.
    pub async fn git_dir(&self) -> Result<PathBuf> {
        self.query(&["rev-parse", "--git-dir"]).await.map(PathBuf::from)
    }

    /// [`git_dir`](Self::git_dir), joined onto the query directory when relative.
    pub async fn git_dir_absolute(&self) -> Result<PathBuf> {
        let git_dir = self.git_dir().await?;
        if git_dir.is_absolute() {
            Ok(git_dir)
        } else {
            Ok(self.dir.join(git_dir))
        }
    }

    async fn query(&self, args: &[&str]) -> Result<String> {
        ProcessCommand::new(git_command())
            .args(args.iter().copied())
            .current_dir(&self.dir)
            .with_context("repo")
            .execute_stdout()
            .await
    }
}

/// Working tree root for the current directory.
pub async fn repo_root() -> Result<PathBuf> {
    RepoLocator::from_current_dir()?.repo_root().await
}

/// Git metadata directory for the current directory, as printed by git.
pub async fn git_dir() -> Result<PathBuf> {
    RepoLocator::from_current_dir()?.git_dir().await
}
