// ============================================================================
// ffcompose-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the ffcompose Core Library
//
// Three families of failure exist in this crate:
// - validation errors raised by session setters and presets before any
//   external invocation happens,
// - external engine failures (spawn, non-zero exit, timeout) carrying the
//   engine's raw diagnostic text,
// - plain I/O errors from the filesystem collaborator.
//
// Probe parsing never produces an error; unmatched fields fall back to
// defaults.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for ffcompose
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file path is empty")]
    EmptyInputPath,

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Codec '{0}' is not supported by the installed ffmpeg")]
    CodecNotSupported(String),

    #[error("Format '{0}' is not supported by the installed ffmpeg")]
    FormatNotSupported(String),

    #[error("Watermark source not found: {}", .0.display())]
    InvalidWatermark(PathBuf),

    #[error("Invalid watermark position '{0}' (expected one of NE, NC, NW, SE, SC, SW, C, CE, CW)")]
    InvalidWatermarkPosition(String),

    #[error("Invalid size format '{0}' (expected WxH, Wx?, ?xH or N%)")]
    SizeFormat(String),

    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid aspect ratio '{0}'")]
    InvalidAspect(String),

    #[error("Command flag '{0}' was already added to this session")]
    DuplicateCommand(String),

    #[error("Only one sampling interval may be set, got: {}", .0.join(", "))]
    ConflictingSampling(Vec<&'static str>),

    #[error("Invalid audio channel layout '{0}'")]
    InvalidAudioChannel(String),

    #[error("Invalid percentage {0} (expected 1-100)")]
    InvalidPercentage(u32),

    #[error("Invalid frame rate {0} (expected a finite, non-negative number)")]
    InvalidFrameRate(f64),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("'{cmd}' exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("'{cmd}' timed out after {secs}s")]
    CommandTimeout { cmd: String, secs: u64 },
}

/// Result type for ffcompose operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Wraps a spawn failure of an external command.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Wraps a non-zero exit of an external command together with its diagnostics.
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
