//! `gitkit root` and `gitkit git-dir`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::git::RepoLocator;

/// Print the absolute path of the working-tree root.
#[derive(Args, Debug)]
pub struct RootCommand {
    /// Directory to query from instead of the current one
    #[arg(short = 'C', long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl RootCommand {
    pub async fn execute(self) -> Result<()> {
        let root = locator(self.dir)?.repo_root().await?;
        println!("{}", root.display());
        Ok(())
    }
}

/// Print the git metadata directory, as git reports it.
///
/// At the top of a working tree this is usually the relative path `.git`.
#[derive(Args, Debug)]
pub struct GitDirCommand {
    /// Directory to query from instead of the current one
    #[arg(short = 'C', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Print an absolute path
    #[arg(long)]
    absolute: bool,
}

impl GitDirCommand {
    pub async fn execute(self) -> Result<()> {
        let locator = locator(self.dir)?;
        let git_dir = if self.absolute {
            locator.git_dir_absolute().await?
        } else {
            locator.git_dir().await?
        };
        println!("{}", git_dir.display());
        Ok(())
    }
}

fn locator(dir: Option<PathBuf>) -> Result<RepoLocator> {
    match dir {
        Some(dir) => Ok(RepoLocator::new(dir)),
        None => RepoLocator::from_current_dir(),
    }
}
