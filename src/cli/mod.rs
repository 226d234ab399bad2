//! Command-line interface for gitkit.
//!
//! Each subcommand lives in its own module with a `clap` args struct and an
//! async `execute` method. [`Cli::execute`] sets up logging, then dispatches
//! on [`Commands`] with a plain `match`.
//!
//! # Commands
//!
//! - `root` - print the working-tree root
//! - `git-dir` - print the git metadata directory
//! - `exec` - run a program and print its trimmed stdout
//! - `which` - print the path an argv[0]-style reference resolves to
//! - `self-update` - download, extract and install a new gitkit binary
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: config file instead of `~/.gitkit/config.toml`
//!
//! `RUST_LOG`, when set, overrides the level chosen by the flags.

mod exec;
mod repo;
mod self_update;
mod which;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level parser.
#[derive(Parser, Debug)]
#[command(
    name = "gitkit",
    about = "Small helper for git queries, running programs, and self-update",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the root of the current git working tree
    Root(repo::RootCommand),

    /// Print the git metadata directory of the current repository
    GitDir(repo::GitDirCommand),

    /// Run a program and print its standard output
    Exec(exec::ExecCommand),

    /// Resolve an executable reference the way self-update does
    Which(which::WhichCommand),

    /// Replace the gitkit binary with one downloaded from a URL
    SelfUpdate(self_update::SelfUpdateCommand),
}

impl Cli {
    /// Initialise logging and run the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Root(cmd) => cmd.execute().await,
            Commands::GitDir(cmd) => cmd.execute().await,
            Commands::Exec(cmd) => cmd.execute().await,
            Commands::Which(cmd) => cmd.execute(),
            Commands::SelfUpdate(cmd) => cmd.execute(self.config).await,
        }
    }

    /// Log level implied by `--verbose` / `--quiet`.
    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level())
        };

        // A subscriber may already be installed when running under tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(self.verbose)
            .try_init();
    }
}
