//! Test utilities for gitkit
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`init_test_logging`] for opt-in tracing output
//! - [`TestGit`] for building fixture repositories
//! - [`archives`] for building `.tar.gz` fixtures in memory
//!
//! ```rust,no_run
//! use gitkit::test_utils::TestGit;
//!
//! # fn example() -> anyhow::Result<()> {
//! let dir = tempfile::TempDir::new()?;
//! let git = TestGit::new(dir.path());
//! git.init()?;
//! # Ok(())
//! # }
//! ```

pub mod archives;
pub mod git_helper;

pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` if given, otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=process=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
