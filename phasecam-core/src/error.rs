//! Error types for the phasecam-core library.
//!
//! All fallible library operations return [`CoreResult`], with [`CoreError`]
//! covering IO, external command execution, decoding, and the frame-geometry
//! contract of the detector.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for all phasecam-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// IO error from file system operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Still-image decoding or encoding failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// External command could not be spawned
    #[error("Failed to start {0}: {1}")]
    CommandStart(String, std::io::Error),

    /// External command ran but did not succeed
    #[error("Command {0} failed ({1}): {2}")]
    CommandFailed(String, std::process::ExitStatus, String),

    /// The two frames of a comparison have different dimensions
    #[error("Incompatible frame sizes: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    IncompatibleFrameSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Raw frame data does not match the declared geometry or pixel format
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// Input container is not one the analyzer accepts
    #[error("Unsupported container '{0}' (expected .mp4 or .avi)")]
    UnsupportedContainer(PathBuf),

    /// The input video has no usable video stream
    #[error("No video stream found in {0}")]
    NoStreamsFound(PathBuf),

    /// Path manipulation or lookup failure
    #[error("Path error: {0}")]
    PathError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic operation failure with a descriptive message
    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type alias for phasecam-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a `CommandFailed` error for a command that ran but failed.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: std::process::ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

/// Creates an `IncompatibleFrameSize` error from the two mismatched geometries.
pub fn frame_size_error(expected: (u32, u32), actual: (u32, u32)) -> CoreError {
    CoreError::IncompatibleFrameSize {
        expected_width: expected.0,
        expected_height: expected.1,
        actual_width: actual.0,
        actual_height: actual.1,
    }
}
