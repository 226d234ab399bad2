//! External process execution with captured output.
//!
//! [`ProcessCommand`] is a small builder around [`tokio::process::Command`]
//! that runs a program with a discrete argument list in a chosen working
//! directory, captures standard output, and maps failures onto
//! [`GitkitError`]. Standard error is captured for diagnostics only; it is
//! never part of the returned output.
//!
//! ```rust,no_run
//! use gitkit::process::ProcessCommand;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let head = ProcessCommand::new("git")
//!     .args(["rev-parse", "HEAD"])
//!     .current_dir("/path/to/repo")
//!     .execute_stdout()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::GitkitError;

/// Builder for a single external program invocation.
///
/// Arguments are passed through verbatim; nothing is split or re-quoted, so
/// an argument containing spaces reaches the program as one token.
///
/// Defaults: no working directory override (the process cwd is used), no
/// timeout, inherited environment.
#[derive(Debug, Clone)]
pub struct ProcessCommand {
    /// Program name or path
    program: String,

    /// Arguments, in order
    args: Vec<String>,

    /// Working directory for the child (defaults to the current directory)
    current_dir: Option<PathBuf>,

    /// Extra environment variables for the child
    env_vars: Vec<(String, String)>,

    /// Maximum time to wait (None = wait forever)
    timeout_duration: Option<Duration>,

    /// Optional label included in log lines
    context: Option<String>,
}

/// Captured output of a successful command.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output, untrimmed
    pub stdout: String,
    /// Standard error, untrimmed
    pub stderr: String,
}

impl ProcessCommand {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: None,
            context: None,
        }
    }

    /// Build a command from a single command-line string by splitting on whitespace.
    ///
    /// Quoting is not understood: `echo "a b"` becomes the three tokens
    /// `echo`, `"a`, `b"`. Prefer [`ProcessCommand::new`] with [`args`](Self::args)
    /// whenever arguments may contain spaces.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let program = tokens.next().ok_or_else(|| GitkitError::Other {
            message: "Empty command line".to_string(),
        })?;
        Ok(Self::new(program).args(tokens))
    }

    /// Set the working directory of the child process.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a timeout (None waits indefinitely, which is the default).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Label log lines for this command.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The program this command will run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments this command will pass.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run the command to completion and return its captured output.
    ///
    /// # Errors
    ///
    /// - [`GitkitError::ToolNotFound`] if the program cannot be found
    /// - [`GitkitError::CommandFailed`] on a non-zero exit
    /// - [`GitkitError::CommandTimedOut`] if the timeout elapses
    /// - IO errors if the working directory is missing or spawning fails otherwise
    pub async fn execute(self) -> Result<ProcessOutput> {
        let start = std::time::Instant::now();
        let line = self.display_line();

        if let Some(ref dir) = self.current_dir
            && !dir.is_dir()
        {
            return Err(GitkitError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Working directory does not exist: {}", dir.display()),
            ))
            .into());
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env_vars {
            // Values can carry credentials
            tracing::trace!(target: "process", "Setting env var: {}", key);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        match (&self.context, &self.current_dir) {
            (Some(ctx), Some(dir)) => {
                tracing::debug!(target: "process", "({}) Executing command in {}: {}", ctx, dir.display(), line);
            }
            (Some(ctx), None) => {
                tracing::debug!(target: "process", "({}) Executing command: {}", ctx, line);
            }
            (None, Some(dir)) => {
                tracing::debug!(target: "process", "Executing command in {}: {}", dir.display(), line);
            }
            (None, None) => tracing::debug!(target: "process", "Executing command: {}", line),
        }

        let output_future = cmd.output();
        let result = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result
            } else {
                tracing::warn!(
                    target: "process",
                    "Command timed out after {} seconds: {}",
                    duration.as_secs(),
                    line
                );
                return Err(GitkitError::CommandTimedOut {
                    program: self.program,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await
        };

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GitkitError::ToolNotFound {
                    program: self.program,
                }
                .into());
            }
            Err(e) => {
                return Err(GitkitError::Io(e))
                    .with_context(|| format!("Failed to execute {line}"));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "process",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "process", "Error: {}", stderr.trim());
            }
            return Err(GitkitError::CommandFailed {
                program: self.program,
                args: self.args,
                code: output.status.code(),
                stderr,
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::trace!(target: "process", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 {
            tracing::debug!(target: "process::perf", "{} took {}ms", self.program, elapsed.as_millis());
        }

        Ok(ProcessOutput {
            stdout,
            stderr,
        })
    }

    /// Run the command and return stdout with trailing newlines removed.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(trim_trailing_newlines(&output.stdout).to_string())
    }
}

/// Run `program` with `args` in `working_dir` and return its trimmed stdout.
///
/// Shorthand for the common case of [`ProcessCommand`].
pub async fn run<I, S>(working_dir: impl AsRef<Path>, program: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ProcessCommand::new(program).args(args).current_dir(working_dir).execute_stdout().await
}

/// Strip trailing `\n` and `\r\n` sequences, leaving everything else intact.
#[must_use]
pub fn trim_trailing_newlines(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}
