//! Temporary files with RAII cleanup.
//!
//! A [`TempFile`] owns a freshly created file under the configured temp
//! directory. The file is deleted when the handle is dropped, on every exit
//! path, unless ownership is handed over with [`TempFile::persist`].

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::TempConfig;

/// A uniquely named temporary file that is removed on drop.
///
/// Names look like `{prefix}_{uuid}` inside [`TempConfig::dir`], so
/// concurrent handles never collide.
///
/// ```rust,no_run
/// use gitkit::config::TempConfig;
/// use gitkit::utils::fs::TempFile;
///
/// # fn example() -> anyhow::Result<()> {
/// let path = {
///     let temp = TempFile::create(&TempConfig::default())?;
///     std::fs::write(temp.path(), b"scratch")?;
///     temp.path().to_path_buf()
/// }; // dropped here, file removed
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    keep: bool,
}

impl TempFile {
    /// Create a new empty file in the configured directory.
    pub fn create(config: &TempConfig) -> Result<Self> {
        let unique_name = format!("{}_{}", config.prefix, uuid::Uuid::new_v4());
        let path = config.dir.join(unique_name);

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create temporary file {}", path.display()))?;

        tracing::trace!("Created temporary file {}", path.display());
        Ok(Self {
            path,
            keep: false,
        })
    }

    /// Path of the file; valid for as long as the handle lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file for writing, truncating any previous content.
    pub fn open_write(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open temporary file {}", self.path.display()))
    }

    /// Current size of the file in bytes.
    pub fn len(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Keep the file on disk and return its path; the caller now owns cleanup.
    #[must_use]
    pub fn persist(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path, prefix: &str) -> TempConfig {
        TempConfig {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    #[test]
    fn test_temp_file_removed_on_drop() {
        let dir = tempfile::TempDir::new().unwrap();
        let temp = TempFile::create(&config(dir.path(), "test")).unwrap();
        let path = temp.path().to_path_buf();

        assert!(path.is_file());
        assert!(temp.is_empty().unwrap());
        std::fs::write(&path, "data").unwrap();
        assert_eq!(temp.len().unwrap(), 4);

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_file_prefix_and_uniqueness() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = config(dir.path(), "isolated");
        let a = TempFile::create(&cfg).unwrap();
        let b = TempFile::create(&cfg).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(dir.path()));
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("isolated_"));
    }

    #[test]
    fn test_persist_keeps_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let temp = TempFile::create(&config(dir.path(), "keep")).unwrap();
        let path = temp.persist();
        assert!(path.is_file());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(TempFile::create(&config(&missing, "x")).is_err());
    }
}
