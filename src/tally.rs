//! Frame-type counters.
//!
//! This module provides [`FrameKind`], the four-way classification of a
//! decoded frame, and [`FrameTally`], the per-category counters updated once
//! per frame during analysis.

use ffmpeg_next::util::picture::Type as PictureType;

/// The encoder-assigned category of a coded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Intra-coded frame (no temporal prediction).
    Intra,
    /// Bidirectionally predicted frame.
    BiPredicted,
    /// Frame predicted from prior frames.
    Predicted,
    /// Any other or unspecified picture type.
    Unknown,
}

impl From<PictureType> for FrameKind {
    fn from(kind: PictureType) -> Self {
        match kind {
            PictureType::I => FrameKind::Intra,
            PictureType::B => FrameKind::BiPredicted,
            PictureType::P => FrameKind::Predicted,
            _ => FrameKind::Unknown,
        }
    }
}

/// Per-category frame counters plus a grand total.
///
/// Each decoded frame increments exactly one category and the total, so
/// `total_frames()` always equals the sum of the four category counts.
/// Counters are monotonic within a run; nothing decrements or resets them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTally {
    total_frames: u64,
    intra: u64,
    bi_predicted: u64,
    predicted: u64,
    unknown: u64,
}

impl FrameTally {
    /// Create a tally with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of the given kind.
    pub fn record(&mut self, kind: FrameKind) {
        self.total_frames += 1;
        match kind {
            FrameKind::Intra => self.intra += 1,
            FrameKind::BiPredicted => self.bi_predicted += 1,
            FrameKind::Predicted => self.predicted += 1,
            FrameKind::Unknown => self.unknown += 1,
        }
    }

    /// Total number of frames recorded.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Number of frames recorded with the given kind.
    pub fn count(&self, kind: FrameKind) -> u64 {
        match kind {
            FrameKind::Intra => self.intra,
            FrameKind::BiPredicted => self.bi_predicted,
            FrameKind::Predicted => self.predicted,
            FrameKind::Unknown => self.unknown,
        }
    }

    /// Percentage of recorded frames with the given kind, or `None` if no
    /// frames have been recorded.
    pub fn percentage(&self, kind: FrameKind) -> Option<f64> {
        if self.total_frames == 0 {
            return None;
        }
        Some(self.count(kind) as f64 / self.total_frames as f64 * 100.0)
    }
}
