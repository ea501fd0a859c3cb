// ============================================================================
// barcrop-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types and Helpers
//
// This module defines the error type shared by the whole library, the result
// alias used by every fallible operation, and small constructors for the
// errors produced when running external commands.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by barcrop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("No processable video files found")]
    NoFilesFound,

    #[error("Required dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{cmd} exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("JSON error: {0}")]
    JsonParseError(String),

    #[error("Video info error: {0}")]
    VideoInfoError(String),

    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for barcrop-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds the error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds the error for a command whose exit status could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds the error for a command that ran but exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonParseError(err.to_string())
    }
}
