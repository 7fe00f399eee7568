//! Progress reporting and cancellation support.
//!
//! This module provides [`ProgressCallback`] for monitoring a running
//! analysis, [`ProgressInfo`] snapshots, and [`CancellationToken`] for
//! cooperative cancellation. Cancelling an analysis stops it from reading
//! further frames; everything recorded up to that point remains in the
//! final statistics.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use qhist::{AnalysisOptions, ProgressCallback, ProgressInfo, QhistError, VideoFile};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("{pct:.1}% ({} frames)", info.current);
//!         }
//!     }
//! }
//!
//! let mut file = VideoFile::open("input.mp4")?;
//! let options = AnalysisOptions::new().with_progress(Arc::new(PrintProgress));
//! let analysis = file.analyze_quantizers(&options)?;
//! # Ok::<(), QhistError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// A snapshot of analysis progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled by
/// [`AnalysisOptions::with_batch_size`](crate::AnalysisOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// How many frames have been decoded so far.
    pub current: u64,
    /// Estimated total frame count, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the analysis started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
}

/// Trait for receiving progress updates during analysis.
///
/// Implementations must be [`Send`] and [`Sync`]. Progress callbacks are
/// **infallible** — they observe but cannot halt the analysis. Use
/// [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals while frames are being decoded.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone the token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to request that the
/// analysis stop reading frames and report what it has.
///
/// # Example
///
/// ```
/// use qhist::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// All clones of this token observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Internal helper that tracks timing and emits batched callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            since_last_report: 0,
        }
    }

    /// Record one decoded frame and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self) {
        self.current += 1;
        self.since_last_report += 1;

        if self.since_last_report >= self.batch_size {
            self.report();
            self.since_last_report = 0;
        }
    }

    /// Unconditionally emit a final progress report.
    pub(crate) fn finish(&mut self) {
        self.report();
    }

    fn report(&self) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|total| {
                let remaining = total.saturating_sub(self.current);
                let per_frame = elapsed / self.current as u32;
                per_frame * remaining as u32
            })
        } else {
            None
        };

        self.callback.on_progress(&ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
        });
    }
}
