//! Error handling for gitkit
//!
//! Every fallible operation returns [`anyhow::Result`] whose root cause is a
//! [`GitkitError`]. The CLI converts whatever bubbles up into an
//! [`ErrorContext`] via [`user_friendly_error`], which adds details and an
//! actionable suggestion before printing.
//!
//! # Error Categories
//!
//! - **External tools**: [`GitkitError::ToolNotFound`], [`GitkitError::CommandFailed`],
//!   [`GitkitError::CommandTimedOut`]
//! - **Network**: [`GitkitError::NetworkError`]
//! - **Archives**: [`GitkitError::ArchiveError`]
//! - **Installation**: [`GitkitError::InstallError`]
//! - **Path lookup**: [`GitkitError::PathResolutionError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use gitkit::core::{GitkitError, user_friendly_error};
//!
//! let err = anyhow::Error::from(GitkitError::ToolNotFound {
//!     program: "git".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The error taxonomy shared by every gitkit component.
#[derive(Error, Debug)]
pub enum GitkitError {
    /// The external program could not be found on the search path.
    #[error("'{program}' is not installed or not found in PATH")]
    ToolNotFound {
        /// Program that was requested
        program: String,
    },

    /// The external program ran and exited unsuccessfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("Command failed: {program} {}", args.join(" "))]
    CommandFailed {
        /// Program that was executed
        program: String,
        /// Arguments passed to the program
        args: Vec<String>,
        /// Exit code, if any
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The external program did not finish within the configured timeout.
    #[error("Command timed out after {seconds} seconds: {program}")]
    CommandTimedOut {
        /// Program that was executed
        program: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// Connection or transfer failure, including non-success HTTP statuses.
    #[error("Network error while fetching {url}: {reason}")]
    NetworkError {
        /// URL being fetched
        url: String,
        /// What went wrong
        reason: String,
    },

    /// Malformed gzip or tar data, or a read failure mid-stream.
    #[error("Failed to extract archive {path}: {reason}")]
    ArchiveError {
        /// Archive being read
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The destination executable could not be prepared or written.
    #[error("Failed to install binary to {path}: {reason}")]
    InstallError {
        /// Destination path
        path: String,
        /// What went wrong
        reason: String,
    },

    /// The executable reference could not be resolved to a path.
    #[error("Cannot resolve executable path for '{reference}': {reason}")]
    PathResolutionError {
        /// The argv[0]-style reference
        reference: String,
        /// What went wrong
        reason: String,
    },

    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// IO error passthrough.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for GitkitError {
    fn clone(&self) -> Self {
        match self {
            Self::ToolNotFound {
                program,
            } => Self::ToolNotFound {
                program: program.clone(),
            },
            Self::CommandFailed {
                program,
                args,
                code,
                stderr,
            } => Self::CommandFailed {
                program: program.clone(),
                args: args.clone(),
                code: *code,
                stderr: stderr.clone(),
            },
            Self::CommandTimedOut {
                program,
                seconds,
            } => Self::CommandTimedOut {
                program: program.clone(),
                seconds: *seconds,
            },
            Self::NetworkError {
                url,
                reason,
            } => Self::NetworkError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::ArchiveError {
                path,
                reason,
            } => Self::ArchiveError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::InstallError {
                path,
                reason,
            } => Self::InstallError {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::PathResolutionError {
                reference,
                reason,
            } => Self::PathResolutionError {
                reference: reference.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // io::Error is not Clone; keep the kind and message
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl GitkitError {
    /// Whether this error came from an external program (absent, failed, or hung).
    #[must_use]
    pub const fn is_external_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound { .. } | Self::CommandFailed { .. } | Self::CommandTimedOut { .. }
        )
    }
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GitkitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    #[must_use]
    pub const fn new(error: GitkitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// [`GitkitError`] anywhere in the chain wins over IO errors; anything else is
/// reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(gitkit_error) = error.chain().find_map(|e| e.downcast_ref::<GitkitError>()) {
        return create_error_context(gitkit_error.clone());
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(GitkitError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check file ownership or re-run with sufficient permissions")
                .with_details("gitkit could not read or write a file it needs");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(GitkitError::Other {
                    message: chain_message(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    ErrorContext::new(GitkitError::Other {
        message: chain_message(&error),
    })
}

/// The error message followed by its numbered causes.
fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

fn create_error_context(error: GitkitError) -> ErrorContext {
    let (suggestion, details): (Option<&str>, Option<String>) = match &error {
        GitkitError::ToolNotFound {
            program,
        } if program == crate::git::git_command() => (
            Some(
                "Install git from https://git-scm.com/ or your package manager (brew install git, apt install git)",
            ),
            Some("Repository queries shell out to the git executable".to_string()),
        ),
        GitkitError::ToolNotFound {
            ..
        } => (Some("Install the program or add its directory to PATH"), None),
        GitkitError::CommandFailed {
            program,
            args,
            stderr,
            ..
        } => {
            let repo_query = program == crate::git::git_command()
                && args.first().is_some_and(|a| a == "rev-parse");
            let details = (!stderr.trim().is_empty()).then(|| stderr.trim().to_string());
            if repo_query {
                (Some("Run this command from inside a git working tree"), details)
            } else {
                (None, details)
            }
        }
        GitkitError::CommandTimedOut {
            ..
        } => (Some("The command may be waiting for input; try running it manually"), None),
        GitkitError::NetworkError {
            ..
        } => (Some("Check your network connection and that the URL is correct"), None),
        GitkitError::ArchiveError {
            ..
        } => (
            Some("Make sure the URL points to a .tar.gz release archive"),
            Some("The download is expected to be a gzip-compressed tar with a single file".to_string()),
        ),
        GitkitError::InstallError {
            ..
        } => (
            Some(
                "If the binary was partially overwritten, run `gitkit self-update --rollback` or reinstall",
            ),
            Some(
                "Once the destination is truncated a failed install leaves the on-disk binary unusable"
                    .to_string(),
            ),
        ),
        GitkitError::PathResolutionError {
            ..
        } => (Some("Invoke gitkit by an absolute path or make sure it is on PATH"), None),
        GitkitError::ConfigError {
            ..
        } => (
            Some("Check the TOML syntax of your config file (~/.gitkit/config.toml or --config)"),
            None,
        ),
        GitkitError::Io(_)
        | GitkitError::Other {
            ..
        } => (None, None),
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    ctx
}
