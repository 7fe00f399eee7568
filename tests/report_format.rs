//! Report formatting integration tests.
//!
//! These build a [`QuantizerAnalysis`] by hand and check the rendered
//! report: layout, decimal places, percentages, the weighted average, and
//! the empty-run guard.

use qhist::{
    FrameKind, FrameTally, FrequencyTable, QhistError, QuantizerAnalysis, QuantizerGrid,
    mean_quantizer,
};

fn analysis(kinds: &[FrameKind], qvalues: &[f64]) -> QuantizerAnalysis {
    let mut tally = FrameTally::new();
    for &kind in kinds {
        tally.record(kind);
    }
    let mut frequency = FrequencyTable::new();
    for &qvalue in qvalues {
        frequency.observe(qvalue).unwrap();
    }
    QuantizerAnalysis {
        tally,
        frequency,
        skipped_frames: 0,
    }
}

#[test]
fn three_frame_scenario_renders_the_full_report() {
    // Three frames of a one-macroblock video, all sampling to qvalue 10.0.
    let grid = QuantizerGrid::new(vec![10, 10, 10, 10], 2);
    let qvalue = mean_quantizer(&grid, 16, 16).unwrap();
    assert_eq!(qvalue, 10.0);

    let analysis = analysis(
        &[FrameKind::Intra, FrameKind::Predicted, FrameKind::Intra],
        &[qvalue, qvalue, qvalue],
    );

    assert_eq!(analysis.tally.total_frames(), 3);
    assert_eq!(analysis.tally.count(FrameKind::Intra), 2);
    assert_eq!(analysis.tally.count(FrameKind::Predicted), 1);
    assert_eq!(analysis.tally.count(FrameKind::BiPredicted), 0);
    assert_eq!(analysis.tally.count(FrameKind::Unknown), 0);
    assert_eq!(analysis.frequency.distinct_values(), 1);

    let report = analysis.report().unwrap();
    let expected = "\
Total:   3
I:       2 (66.67)
B:       0 (0.00)
P:       1 (33.33)
UNKNOWN: 0 (0.00)
==== qvalue statistics ====
10.0000: 3 (100.00)
Avg: 10.0000
";
    assert_eq!(report.to_string(), expected);
}

#[test]
fn weighted_average_uses_observation_counts() {
    let analysis = analysis(&[FrameKind::Intra, FrameKind::Predicted], &[1.0, 3.0]);
    let report = analysis.report().unwrap();
    assert_eq!(report.average_qvalue(), 2.0);
    assert!(report.to_string().ends_with("Avg: 2.0000\n"));
}

#[test]
fn qvalue_rows_are_sorted_and_formatted() {
    let analysis = analysis(
        &[FrameKind::Predicted; 4],
        &[31.25, 2.5, 31.25, 2.5],
    );
    let report = analysis.report().unwrap().to_string();

    let table_start = report
        .find("==== qvalue statistics ====")
        .expect("report must contain the qvalue table header");
    let rows: Vec<&str> = report[table_start..].lines().skip(1).collect();

    assert_eq!(rows[0], "2.5000: 2 (50.00)");
    assert_eq!(rows[1], "31.2500: 2 (50.00)");
    assert_eq!(rows[2], "Avg: 16.8750");
}

#[test]
fn empty_run_is_reported_not_divided() {
    let analysis = analysis(&[], &[]);
    let result = analysis.report();
    assert!(matches!(result, Err(QhistError::NoFramesProcessed)));
    assert_eq!(result.unwrap_err().to_string(), "No frames processed");
}
