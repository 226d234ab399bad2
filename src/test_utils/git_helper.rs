//! Git test helper utilities
//!
//! Synchronous wrapper around the `git` binary for setting up fixture
//! repositories. Deliberately independent of [`crate::process`] so tests of
//! that module do not depend on the code under test.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A fixture repository at a fixed path.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    pub fn init(&self) -> Result<()> {
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        Ok(())
    }

    pub fn config_user(&self) -> Result<()> {
        self.run_git_command(
            &["config", "user.email", "test@gitkit.example"],
            "Failed to configure git user email",
        )?;

        self.run_git_command(
            &["config", "user.name", "Test User"],
            "Failed to configure git user name",
        )?;
        Ok(())
    }

    pub fn add_all(&self) -> Result<()> {
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git_command(&["commit", "-m", message], "Failed to create git commit")?;
        Ok(())
    }

    /// `git init` plus user config and one commit containing `README.md`.
    pub fn init_with_commit(&self) -> Result<()> {
        self.init()?;
        self.config_user()?;
        std::fs::write(self.repo_path.join("README.md"), "# fixture\n")
            .context("Failed to write README.md")?;
        self.add_all()?;
        self.commit("Initial commit")
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}
