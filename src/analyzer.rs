//! The quantizer analysis pass.
//!
//! This module drives the single streaming pass over a video stream:
//! demux packet → decode frame → sample the frame's mean quantizer →
//! record its frame type → record the qvalue in the frequency table, in
//! that order, once per successfully decoded frame. The resulting
//! [`QuantizerAnalysis`] holds the final [`FrameTally`] and
//! [`FrequencyTable`] read by the reporter.
//!
//! # Example
//!
//! ```no_run
//! use qhist::{AnalysisOptions, QhistError, VideoFile};
//!
//! let mut file = VideoFile::open("input.mp4")?;
//! let analysis = file.analyze_quantizers(&AnalysisOptions::new())?;
//! println!("{} frames, {} distinct qvalues",
//!     analysis.tally.total_frames(),
//!     analysis.frequency.distinct_values());
//! # Ok::<(), QhistError>(())
//! ```

use std::sync::Arc;

use ffmpeg_next::{
    Error as FfmpegError, Packet, codec::context::Context as CodecContext,
    frame::Video as VideoFrame,
};
use ffmpeg_sys_next::{AV_CODEC_EXPORT_DATA_VIDEO_ENC_PARAMS, AVCodecContext};

use crate::{
    enc_params,
    error::QhistError,
    frequency::FrequencyTable,
    media::VideoFile,
    progress::{CancellationToken, ProgressCallback, ProgressTracker},
    sampler,
    tally::{FrameKind, FrameTally},
};

/// Options for a quantizer analysis run.
///
/// # Example
///
/// ```
/// use qhist::AnalysisOptions;
///
/// let options = AnalysisOptions::new().with_max_frames(500).with_batch_size(16);
/// ```
#[derive(Clone)]
#[must_use]
pub struct AnalysisOptions {
    pub(crate) max_frames: Option<u64>,
    pub(crate) progress: Option<Arc<dyn ProgressCallback>>,
    pub(crate) batch_size: u64,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOptions {
    /// Default options: analyze every frame, no progress callbacks.
    pub fn new() -> Self {
        Self {
            max_frames: None,
            progress: None,
            batch_size: 32,
            cancellation: None,
        }
    }

    /// Stop after decoding this many frames.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Receive progress snapshots during the analysis.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// How many frames to decode between progress callbacks (default 32).
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Attach a cancellation token. Cancelling stops the analysis from
    /// reading further frames; frames already recorded remain in the
    /// result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Final state of one analysis run.
#[derive(Debug, Clone)]
#[must_use]
pub struct QuantizerAnalysis {
    /// Per-frame-type counters.
    pub tally: FrameTally,
    /// Ordered qvalue → observation count table.
    pub frequency: FrequencyTable,
    /// Frames that decoded but contributed nothing because their quantizer
    /// grid was missing or unusable.
    pub skipped_frames: u64,
}

/// Decode the video stream and aggregate quantizer statistics.
pub(crate) fn analyze_quantizers_impl(
    file: &mut VideoFile,
    options: &AnalysisOptions,
) -> Result<QuantizerAnalysis, QhistError> {
    let stream_index = file.video_stream_index;
    log::debug!("Analyzing quantizers (stream={stream_index})");

    let stream = file
        .input_context
        .stream(stream_index)
        .ok_or(QhistError::NoVideoStream)?;
    let decoder_context = CodecContext::from_parameters(stream.parameters())?;

    // Ask the decoder to export per-block quantizer parameters as frame
    // side data. Must be set before the decoder opens.
    unsafe {
        let context_pointer = decoder_context.as_ptr() as *mut AVCodecContext;
        (*context_pointer).export_side_data |= AV_CODEC_EXPORT_DATA_VIDEO_ENC_PARAMS as i32;
    }

    let mut decoder = decoder_context
        .decoder()
        .video()
        .map_err(|error| QhistError::DecodeError(format!("Failed to open decoder: {error}")))?;

    // Coded picture dimensions, from the codec context like the macroblock
    // grid itself.
    let width = decoder.width();
    let height = decoder.height();

    let total_estimate = (file.metadata.frame_count > 0).then_some(file.metadata.frame_count);
    let mut progress = options
        .progress
        .clone()
        .map(|callback| ProgressTracker::new(callback, total_estimate, options.batch_size));

    let mut tally = FrameTally::new();
    let mut frequency = FrequencyTable::new();
    let mut skipped_frames: u64 = 0;
    let mut decoded_frames: u64 = 0;

    let mut decoded_frame = VideoFrame::empty();
    let mut packet = Packet::empty();
    let mut reached_end = false;

    'demux: loop {
        if options
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            log::debug!("Analysis cancelled after {decoded_frames} frames");
            break;
        }
        if options.max_frames.is_some_and(|max| decoded_frames >= max) {
            break;
        }

        match packet.read(&mut file.input_context) {
            Ok(()) => {
                if packet.stream() as usize != stream_index {
                    continue;
                }

                decoder.send_packet(&packet).map_err(|error| {
                    QhistError::DecodeError(format!("Failed to decode packet: {error}"))
                })?;

                while decoder.receive_frame(&mut decoded_frame).is_ok() {
                    decoded_frames += 1;
                    record_frame(
                        &decoded_frame,
                        width,
                        height,
                        decoded_frames,
                        &mut tally,
                        &mut frequency,
                        &mut skipped_frames,
                    )?;
                    if let Some(tracker) = progress.as_mut() {
                        tracker.advance();
                    }
                    if options.max_frames.is_some_and(|max| decoded_frames >= max) {
                        break 'demux;
                    }
                }
            }
            Err(FfmpegError::Eof) => {
                reached_end = true;
                break;
            }
            Err(error) => return Err(QhistError::from(error)),
        }
    }

    // Flush the decoder so frames it buffered are still counted. Skipped
    // when the run was cut short; "stop" means stop producing frames.
    if reached_end {
        decoder.send_eof().map_err(|error| {
            QhistError::DecodeError(format!("Failed to flush decoder: {error}"))
        })?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            decoded_frames += 1;
            record_frame(
                &decoded_frame,
                width,
                height,
                decoded_frames,
                &mut tally,
                &mut frequency,
                &mut skipped_frames,
            )?;
            if let Some(tracker) = progress.as_mut() {
                tracker.advance();
            }
        }
    }

    if let Some(tracker) = progress.as_mut() {
        tracker.finish();
    }

    if skipped_frames > 0 {
        log::warn!(
            "{skipped_frames} of {decoded_frames} decoded frames had no usable quantizer data"
        );
    }

    Ok(QuantizerAnalysis {
        tally,
        frequency,
        skipped_frames,
    })
}

/// Feed one decoded frame through the pipeline: sample the mean quantizer,
/// then record the frame type, then record the qvalue.
///
/// A frame whose grid is missing or fails sampling is skipped entirely —
/// it touches neither the tally nor the table, so both aggregates always
/// describe the same frame population.
fn record_frame(
    frame: &VideoFrame,
    width: u32,
    height: u32,
    frame_number: u64,
    tally: &mut FrameTally,
    frequency: &mut FrequencyTable,
    skipped_frames: &mut u64,
) -> Result<(), QhistError> {
    let Some(grid) = enc_params::quantizer_grid(frame, width, height) else {
        log::warn!("Skipping frame {frame_number}: no quantizer side data");
        *skipped_frames += 1;
        return Ok(());
    };

    match sampler::mean_quantizer(&grid, width, height) {
        Ok(qvalue) => {
            tally.record(FrameKind::from(frame.kind()));
            frequency.observe(qvalue)?;
            Ok(())
        }
        Err(error) => {
            log::warn!("Skipping frame {frame_number}: {error}");
            *skipped_frames += 1;
            Ok(())
        }
    }
}
