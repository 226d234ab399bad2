//! gitkit - git queries, program execution, and self-update in one small tool
//!
//! gitkit bundles the glue a developer CLI tends to need:
//!
//! - locate the current repository's working-tree root and metadata
//!   directory by asking the system `git`
//! - run an external program with a discrete argument list and capture its
//!   output
//! - download a release archive, extract its single payload, and install it
//!   over the running executable
//!
//! Every operation is a sequential, one-shot utility; the first error
//! propagates to the caller.
//!
//! # Modules
//!
//! - [`git`] - working-tree root and git directory lookup
//! - [`process`] - external program execution
//! - [`fetch`] - HTTP downloads into temp files
//! - [`archive`] - `.tar.gz` payload extraction
//! - [`install`] - in-place executable replacement and backups
//! - [`upgrade`] - the download → extract → install sequence
//! - [`utils`] - executable path resolution, temp files, stat helpers
//! - [`config`] - `~/.gitkit/config.toml` and temp-file settings
//! - [`core`] - error types and user-facing error formatting
//! - [`cli`] - the `gitkit` command line
//!
//! # Example
//!
//! ```rust,no_run
//! use gitkit::process::run;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let root = gitkit::git::repo_root().await?;
//! let branch = run(&root, "git", ["branch", "--show-current"]).await?;
//! println!("{} on {}", root.display(), branch);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod fetch;
pub mod git;
pub mod install;
pub mod process;
pub mod upgrade;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
