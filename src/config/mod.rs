//! Configuration for gitkit.
//!
//! Two layers:
//! - [`GlobalConfig`]: the user's `~/.gitkit/config.toml`, read by the CLI.
//! - [`TempConfig`]: the explicit temp-file settings handed to
//!   [`Fetcher`](crate::fetch::Fetcher) and
//!   [`ArchiveExtractor`](crate::archive::ArchiveExtractor). Library code never
//!   reads the environment or config files itself.

mod global;

pub use global::GlobalConfig;

use std::path::PathBuf;

/// Default prefix for temporary file names.
pub const DEFAULT_TEMP_PREFIX: &str = "gitkit";

/// Where temporary files go and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempConfig {
    /// Directory temporary files are created in
    pub dir: PathBuf,
    /// File name prefix, followed by `_` and a UUID
    pub prefix: String,
}

impl Default for TempConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl TempConfig {
    /// Temp files in `dir` named with `prefix`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }
}
