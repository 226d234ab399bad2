//! `gitkit which`: show where an argv[0]-style reference resolves.
//!
//! Uses the same rules self-update uses to find its own binary, which makes
//! it handy for checking what `self-update` would overwrite.

use anyhow::Result;
use clap::Args;
use std::ffi::OsString;

use crate::utils::path::resolve_executable_path;

#[derive(Args, Debug)]
pub struct WhichCommand {
    /// Program name, `./relative` path, or absolute path
    #[arg(value_name = "REFERENCE")]
    reference: OsString,
}

impl WhichCommand {
    pub fn execute(self) -> Result<()> {
        let path = resolve_executable_path(&self.reference)?;
        println!("{}", path.display());
        Ok(())
    }
}
