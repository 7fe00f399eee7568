//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for the failure
//! conditions a user can hit before any statistics exist.

use std::path::Path;

use qhist::{AnalysisOptions, VideoFile};

#[test]
fn open_nonexistent_file() {
    let result = VideoFile::open("this_file_does_not_exist.mp4");
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    // Create a temporary file with garbage content.
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = VideoFile::open(&invalid_file_path);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn audio_only_file_has_no_video_stream() {
    let path = "tests/fixtures/sample_audio_only.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let result = VideoFile::open(path);
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("No video stream"),
        "Error should mention no video stream: {error_message}",
    );
}

#[test]
fn analysis_of_a_real_video_records_every_frame() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let mut file = VideoFile::open(path).expect("Failed to open test video");
    let analysis = file
        .analyze_quantizers(&AnalysisOptions::new())
        .expect("Analysis failed");

    // Every decoded frame is either recorded in both aggregates or skipped.
    assert_eq!(
        analysis.tally.total_frames(),
        analysis.frequency.total_observations(),
    );
}

#[test]
fn max_frames_caps_the_analysis() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let mut file = VideoFile::open(path).expect("Failed to open test video");
    let analysis = file
        .analyze_quantizers(&AnalysisOptions::new().with_max_frames(5))
        .expect("Analysis failed");

    assert!(analysis.tally.total_frames() + analysis.skipped_frames <= 5);
}
