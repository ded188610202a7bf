//! Build error taxonomy.
//!
//! Every pipeline stage reports one of these instead of raising; the
//! orchestrator maps them onto a [`BuildOutcome`](crate::ops::apphost_build::BuildOutcome).

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Error raised by a pipeline stage.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    /// Missing or malformed template file, bad request, unsupported toolchain.
    #[error("{message}")]
    #[diagnostic(code(apphost::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Copy, delete or write failure.
    #[error("{message}")]
    #[diagnostic(code(apphost::io))]
    Io { message: String },

    /// A subprocess exited unsuccessfully.
    #[error("`{command}` failed with exit code {}\n{stderr}", display_code(.exit_code))]
    #[diagnostic(
        code(apphost::process),
        help("Run the command by hand inside the workspace to see the full toolchain output")
    )]
    Process {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The user declined a prompt or never selected a host directory.
    #[error("{reason}")]
    #[diagnostic(code(apphost::cancelled))]
    Cancelled { reason: String },

    /// Nothing matched where something was expected.
    #[error("{message}")]
    #[diagnostic(code(apphost::not_found))]
    NotFound { message: String },

    /// Anything else bubbling up from below the stage boundary.
    #[error("{0:#}")]
    #[diagnostic(code(apphost::other))]
    Other(#[from] anyhow::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

impl BuildError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        BuildError::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a validation error with a help line.
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        BuildError::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an I/O error about `path`.
    pub fn io(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        BuildError::Io {
            message: format!("{}: {}", path.into().display(), err),
        }
    }

    /// Create a cancellation.
    pub fn cancelled(reason: impl Into<String>) -> Self {
        BuildError::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        BuildError::NotFound {
            message: message.into(),
        }
    }

    /// The flat kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Validation { .. } => ErrorKind::Validation,
            BuildError::Io { .. } => ErrorKind::Io,
            BuildError::Process { .. } => ErrorKind::Process,
            BuildError::Cancelled { .. } => ErrorKind::UserCancelled,
            BuildError::NotFound { .. } => ErrorKind::NotFound,
            BuildError::Other(_) => ErrorKind::Unexpected,
        }
    }
}

/// Error kind carried by a failed [`BuildOutcome`](crate::ops::apphost_build::BuildOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Validation,
    Io,
    Process,
    UserCancelled,
    NotFound,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Io => "io",
            ErrorKind::Process => "process",
            ErrorKind::UserCancelled => "user-cancelled",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
