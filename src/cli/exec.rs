//! `gitkit exec`: run a program and print its standard output.
//!
//! Everything from the program name on is passed through as discrete tokens,
//! so `gitkit exec printf '%s\n' "a b"` reaches `printf` with `a b` intact.
//! Trailing newlines are stripped from the output; the program's stderr is
//! only shown when it fails.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::process::ProcessCommand;

#[derive(Args, Debug)]
pub struct ExecCommand {
    /// Working directory for the program (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Kill the program after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Program to run, looked up on PATH, followed by its arguments
    #[arg(
        value_name = "PROGRAM",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

impl ExecCommand {
    pub async fn execute(self) -> Result<()> {
        let stdout = self.build().execute_stdout().await?;
        if !stdout.is_empty() {
            println!("{stdout}");
        }
        Ok(())
    }

    fn build(&self) -> ProcessCommand {
        // clap guarantees at least one token
        let (program, args) = match self.command.split_first() {
            Some((program, args)) => (program.as_str(), args),
            None => ("", &[][..]),
        };
        let mut cmd = ProcessCommand::new(program)
            .args(args.iter().cloned())
            .with_timeout(self.timeout.map(Duration::from_secs))
            .with_context("exec");
        if let Some(dir) = &self.dir {
            cmd = cmd.current_dir(dir);
        }
        cmd
    }
}
