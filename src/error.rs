//! Error types for the `qhist` crate.
//!
//! This module defines [`QhistError`], the unified error type returned by all
//! fallible operations in the crate. Variants carry enough context to
//! diagnose the problem without additional logging at the call site.

use std::path::PathBuf;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `qhist` operations.
///
/// Every public method that can fail returns `Result<T, QhistError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QhistError {
    /// The media file could not be opened or probed.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// A per-frame quantizer grid was malformed: zero dimensions, a stride
    /// smaller than the macroblock row, or too few cells for the implied
    /// extent. Fatal to that frame's contribution only; the analyzer skips
    /// the frame and continues.
    #[error("Invalid quantizer grid: {reason}")]
    InvalidGrid {
        /// What made the grid unusable.
        reason: String,
    },

    /// A non-finite qvalue (NaN or infinity) was offered to the frequency
    /// table. NaN is not reflexively equal to itself, so admitting one would
    /// silently duplicate entries and break the table's ordering.
    #[error("Non-finite qvalue rejected: {0}")]
    NonFiniteQvalue(f64),

    /// A report was requested after zero frames were recorded.
    #[error("No frames processed")]
    NoFramesProcessed,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),
}

impl From<FfmpegError> for QhistError {
    fn from(error: FfmpegError) -> Self {
        QhistError::FfmpegError(error.to_string())
    }
}
