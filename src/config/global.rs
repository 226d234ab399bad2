//! Global configuration file (`~/.gitkit/config.toml`).
//!
//! ```toml
//! # Prefix for temporary download/extraction files
//! temp_prefix = "gitkit"
//! # Directory for temporary files (defaults to the OS temp dir)
//! temp_dir = "/var/tmp"
//! # Archive used by `gitkit self-update` when no URL is given
//! update_url = "https://example.com/releases/gitkit-linux-amd64.tar.gz"
//! # Request timeout for downloads; unset waits indefinitely
//! http_timeout_secs = 120
//! # Copy the current binary to `<exe>.backup` before self-update
//! backup = true
//! ```
//!
//! The location can be overridden with `--config` or `GITKIT_CONFIG_PATH`.
//! A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use super::{DEFAULT_TEMP_PREFIX, TempConfig};
use crate::core::GitkitError;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "GITKIT_CONFIG_PATH";

fn default_temp_prefix() -> String {
    DEFAULT_TEMP_PREFIX.to_string()
}

const fn default_backup() -> bool {
    true
}

/// User-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Prefix for temporary file names
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,

    /// Directory for temporary files; OS temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,

    /// Default archive URL for `self-update`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,

    /// Download timeout in seconds; none by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,

    /// Back up the executable before self-update
    #[serde(default = "default_backup")]
    pub backup: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            temp_prefix: default_temp_prefix(),
            temp_dir: None,
            update_url: None,
            http_timeout_secs: None,
            backup: default_backup(),
        }
    }
}

impl GlobalConfig {
    /// Load from `path`, else `GITKIT_CONFIG_PATH`, else the default location.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(env_path) => PathBuf::from(env_path),
                None => Self::default_path()?,
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from an explicit file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            GitkitError::ConfigError {
                message: format!("{}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Write as pretty TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// `~/.gitkit/config.toml`, or `%LOCALAPPDATA%\gitkit\config.toml` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("gitkit")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".gitkit")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Temp-file settings derived from this config.
    #[must_use]
    pub fn temp_config(&self) -> TempConfig {
        TempConfig {
            dir: self.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
            prefix: self.temp_prefix.clone(),
        }
    }

    /// Download timeout, if configured.
    #[must_use]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.temp_prefix, "gitkit");
        assert!(config.backup);
        assert!(config.update_url.is_none());
        assert!(config.http_timeout().is_none());
        assert_eq!(config.temp_config(), TempConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: GlobalConfig = toml::from_str("update_url = \"http://x/y.tar.gz\"").unwrap();
        assert_eq!(config.update_url.as_deref(), Some("http://x/y.tar.gz"));
        assert_eq!(config.temp_prefix, "gitkit");
        assert!(config.backup);
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = GlobalConfig {
            temp_prefix: "custom".to_string(),
            temp_dir: Some(temp.path().to_path_buf()),
            update_url: Some("https://example.com/a.tar.gz".to_string()),
            http_timeout_secs: Some(30),
            backup: false,
        };
        config.save_to(&path).await.unwrap();

        let loaded = GlobalConfig::load_from(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.http_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(loaded.temp_config().dir, temp.path());
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "backup = \"not a bool\"").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitkitError>(),
            Some(GitkitError::ConfigError { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("absent.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_env_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.toml");
        std::fs::write(&path, "temp_prefix = \"from-env\"").unwrap();

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &path);
        }
        let config = GlobalConfig::load_with_optional(None).await;
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(config.unwrap().temp_prefix, "from-env");
    }
}
