//! `gitkit self-update`: replace the running binary with a released one.
//!
//! The URL must point at a `.tar.gz` holding the new binary as its only
//! file. Without a URL argument, `update_url` from the config is used.
//!
//! ```bash
//! gitkit self-update https://example.com/gitkit-x86_64-unknown-linux-gnu.tar.gz
//! gitkit self-update --no-backup
//! gitkit self-update --rollback
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::GlobalConfig;
use crate::core::{ErrorContext, GitkitError};
use crate::upgrade::SelfUpdate;

#[derive(Args, Debug)]
pub struct SelfUpdateCommand {
    /// Release archive URL (defaults to `update_url` from the config)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Do not keep a `.backup` copy of the current binary
    #[arg(long)]
    no_backup: bool,

    /// Restore the binary saved by the previous update
    #[arg(long, conflicts_with_all = ["url", "no_backup"])]
    rollback: bool,
}

impl SelfUpdateCommand {
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let config = GlobalConfig::load_with_optional(config_path).await?;
        let updater = SelfUpdate::from_config(&config)?.backup(config.backup && !self.no_backup);

        if self.rollback {
            println!("{}", "Rolling back to previous version...".yellow());
            let restored = updater.rollback()?;
            println!("{} {}", "Restored".green(), restored.display());
            return Ok(());
        }

        let url = self.resolve_url(&config)?;
        println!("{} {}", "Updating from".cyan(), url);
        let installed = updater.run(&url).await?;
        println!("{} {}", "Updated".green(), installed.display());
        Ok(())
    }

    fn resolve_url(&self, config: &GlobalConfig) -> Result<String> {
        match self.url.as_ref().or(config.update_url.as_ref()) {
            Some(url) => Ok(url.clone()),
            None => Err(ErrorContext::new(GitkitError::ConfigError {
                message: "no update URL given".to_string(),
            })
            .with_suggestion(
                "Pass the archive URL, or set `update_url` in ~/.gitkit/config.toml",
            )
            .into()),
        }
    }
}
