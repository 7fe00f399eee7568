//! Video stream metadata.
//!
//! This module defines [`VideoMetadata`], the cached description of the
//! analyzed video stream returned by
//! [`VideoFile::metadata`](crate::VideoFile::metadata). Metadata is
//! extracted once when the file is opened and never re-read.

use std::time::Duration;

/// Metadata for the analyzed video stream and its container.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Coded frame width in pixels.
    pub width: u32,
    /// Coded frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame
    /// rate. Zero when either is unknown.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"mpeg2video"`, `"vp9"`).
    pub codec: String,
    /// Container format name (e.g. `"mp4"`, `"matroska"`, `"avi"`).
    pub format: String,
    /// Total duration of the media file.
    pub duration: Duration,
}
