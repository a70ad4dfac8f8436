//! Structured error types for cliwrap-core.
//!
//! Three kinds, one per recovery path: fix the configuration, look at the
//! failed command, or fix the environment the binary is launched in.
//! The binary crate (cliwrap-cli) wraps these with `anyhow` context.

use std::io;
use thiserror::Error;

/// Main error type for cliwrap-core operations
#[derive(Error, Debug)]
pub enum CliError {
    /// The CLI identity is not usable (binary path unset)
    #[error("{reason}")]
    Configuration { reason: String },

    /// The child process ran and exited with a non-zero code.
    ///
    /// The captured output is only written to the log, never carried here.
    #[error("Unable to execute {binary} CLI, error={code}")]
    CommandFailed { binary: String, code: i32 },

    /// The process could not be started at all
    #[error(transparent)]
    Launch(#[from] io::Error),
}

/// Result type alias for cliwrap-core operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a command failure for `binary` exiting with `code`
    pub fn command_failed(binary: impl Into<String>, code: i32) -> Self {
        Self::CommandFailed {
            binary: binary.into(),
            code,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    pub fn is_launch(&self) -> bool {
        matches!(self, Self::Launch(_))
    }

    /// Exit code of the failed child, if this is a `CommandFailed`
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The untouched OS error of a launch failure
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Launch(err) => Some(err),
            _ => None,
        }
    }
}
