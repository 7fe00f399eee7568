//! Core [`VideoFile`] implementation.
//!
//! `VideoFile` is the entry point for the crate. It opens a media file,
//! requires a video stream, caches [`VideoMetadata`], and drives the
//! quantizer analysis via
//! [`analyze_quantizers`](VideoFile::analyze_quantizers).
//!
//! All FFmpeg resources (demuxer, decoder, frames) are owned wrapper values
//! released by `Drop` on every exit path, including early error returns.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    analyzer::{AnalysisOptions, QuantizerAnalysis, analyze_quantizers_impl},
    error::QhistError,
    metadata::VideoMetadata,
};

/// An opened media file with a video stream, ready for quantizer analysis.
///
/// Created via [`VideoFile::open`]. Holds the demuxer context and cached
/// metadata; the decoder is created per analysis run.
///
/// # Example
///
/// ```no_run
/// use qhist::{AnalysisOptions, QhistError, VideoFile};
///
/// let mut file = VideoFile::open("input.mp4")?;
/// println!("{}x{} [{}]", file.metadata().width, file.metadata().height, file.metadata().codec);
///
/// let analysis = file.analyze_quantizers(&AnalysisOptions::new())?;
/// print!("{}", analysis.report()?);
/// # Ok::<(), QhistError>(())
/// ```
pub struct VideoFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: VideoMetadata,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Path to the opened media file (kept for error messages).
    #[allow(dead_code)]
    pub(crate) file_path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a media file for analysis.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`QhistError::FileOpen`] if the file cannot be opened or its
    /// video codec parameters cannot be read, and
    /// [`QhistError::NoVideoStream`] if the container has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QhistError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening media file: {}", file_path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| QhistError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| QhistError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or(QhistError::NoVideoStream)?;

        // Container-level duration and format name.
        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };
        let format = input_context.format().name().to_string();

        let stream = input_context
            .stream(video_stream_index)
            .ok_or(QhistError::NoVideoStream)?;

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                QhistError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| QhistError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let width = video_decoder.width();
        let height = video_decoder.height();

        // Frames per second from the stream's average frame rate, falling
        // back to the nominal rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let frame_count = if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
            format,
            duration,
        };

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            file_path,
        })
    }

    /// Get a reference to the cached video metadata.
    ///
    /// Metadata is extracted once during [`open`](VideoFile::open) and does
    /// not require additional decoding.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Decode every video frame and aggregate quantizer statistics.
    ///
    /// Runs the single-pass pipeline described in [`crate::analyzer`]. The
    /// demuxer is consumed from its current position, so a `VideoFile`
    /// supports one full analysis per open.
    ///
    /// # Errors
    ///
    /// Returns [`QhistError::DecodeError`] or [`QhistError::FfmpegError`]
    /// when the decoder cannot be constructed or the stream fails to
    /// decode. Individual frames without usable quantizer data are skipped,
    /// not errors; see [`QuantizerAnalysis::skipped_frames`].
    pub fn analyze_quantizers(
        &mut self,
        options: &AnalysisOptions,
    ) -> Result<QuantizerAnalysis, QhistError> {
        analyze_quantizers_impl(self, options)
    }
}
