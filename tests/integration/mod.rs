//! Integration test suite for gitkit
//!
//! End-to-end tests that drive the compiled `gitkit` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **repo**: `root` and `git-dir` inside and outside a repository
//! - **exec**: running programs and reporting their failures
//! - **which**: executable path resolution
//! - **self_update**: download, extract, install and rollback against a mock server

use assert_cmd::Command;

mod exec;
mod repo;
// Replacing a running executable in place is Unix-only
#[cfg(unix)]
mod self_update;
mod which;

/// `gitkit` with default logging and no colors, so stderr only carries what the test expects.
pub fn gitkit() -> Command {
    let mut cmd = Command::cargo_bin("gitkit").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("GITKIT_CONFIG_PATH").env("NO_COLOR", "1");
    cmd
}
