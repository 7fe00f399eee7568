//! # qhist
//!
//! Per-frame quantizer statistics for video files.
//!
//! `qhist` decodes a video stream once, samples each frame's mean
//! quantizer over its macroblock grid, and aggregates two things: a
//! frame-type tally (intra / bi-predicted / predicted / unknown) and an
//! ordered histogram of distinct qvalues with observation counts. The
//! final report gives per-type percentages, the sorted qvalue table, and a
//! weighted average qvalue — a quick read on how hard the encoder was
//! quantizing and where. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qhist::{AnalysisOptions, VideoFile};
//!
//! let mut file = VideoFile::open("input.mp4").unwrap();
//! let analysis = file.analyze_quantizers(&AnalysisOptions::new()).unwrap();
//! print!("{}", analysis.report().unwrap());
//! ```
//!
//! ### Inspect the aggregates directly
//!
//! ```no_run
//! use qhist::{AnalysisOptions, FrameKind, VideoFile};
//!
//! let mut file = VideoFile::open("input.mp4").unwrap();
//! let analysis = file.analyze_quantizers(&AnalysisOptions::new()).unwrap();
//!
//! println!("intra frames: {}", analysis.tally.count(FrameKind::Intra));
//! for entry in &analysis.frequency {
//!     println!("qvalue {:.4} seen {} times", entry.value, entry.count);
//! }
//! ```
//!
//! ## How qvalues are obtained
//!
//! The decoder is opened with the `export_side_data` flag that makes it
//! attach per-block quantizer parameters to every decoded frame; those
//! blocks are rasterized into a `ceil(width/16) × ceil(height/16)`
//! macroblock grid and averaged into one scalar per frame. Frames whose
//! decoder exports no quantizer data are skipped (and counted in
//! [`QuantizerAnalysis::skipped_frames`]) rather than polluting the
//! statistics.
//!
//! Two qvalues land in the same histogram bucket only when they compare
//! exactly equal as floating-point numbers; there is no epsilon bucketing.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system. Only
//! codecs whose decoders export quantizer parameters (the MPEG family,
//! H.264, VP8/VP9, ...) produce a qvalue histogram.

pub mod analyzer;
mod enc_params;
pub mod error;
pub mod frequency;
pub mod media;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod tally;

pub use analyzer::{AnalysisOptions, QuantizerAnalysis};
pub use error::QhistError;
pub use frequency::{FrequencyEntry, FrequencyTable};
pub use media::VideoFile;
pub use metadata::VideoMetadata;
pub use progress::{CancellationToken, ProgressCallback, ProgressInfo};
pub use report::QuantizerReport;
pub use sampler::{MACROBLOCK_SIZE, QuantizerGrid, mean_quantizer};
pub use tally::{FrameKind, FrameTally};
