//! Quantizer sampler integration tests.
//!
//! The sampler reduces a strided per-macroblock grid to one scalar qvalue.
//! These tests cover the macroblock geometry, stride handling, and the
//! rejection of grids that would otherwise produce a 0 or NaN qvalue.

use qhist::{QhistError, QuantizerGrid, mean_quantizer};

#[test]
fn mean_over_a_full_grid() {
    // 32x32 pixels -> 2x2 macroblocks.
    let grid = QuantizerGrid::new(vec![10, 20, 30, 40], 2);
    assert_eq!(mean_quantizer(&grid, 32, 32).unwrap(), 25.0);
}

#[test]
fn stride_padding_is_skipped() {
    // 2 macroblock columns stored at stride 4; the -1 padding cells must
    // never be read.
    let codes = vec![
        10, 20, -1, -1, //
        30, 40, -1, -1, //
    ];
    let grid = QuantizerGrid::new(codes, 4);
    assert_eq!(mean_quantizer(&grid, 32, 32).unwrap(), 25.0);
}

#[test]
fn partial_macroblocks_round_up() {
    // 33x17 pixels -> 3x2 macroblocks.
    let grid = QuantizerGrid::new(vec![1, 2, 3, 4, 5, 6], 3);
    assert_eq!(mean_quantizer(&grid, 33, 17).unwrap(), 3.5);
}

#[test]
fn zero_dimensions_are_rejected() {
    let grid = QuantizerGrid::new(vec![10], 1);
    for (width, height) in [(0, 16), (16, 0), (0, 0)] {
        let result = mean_quantizer(&grid, width, height);
        assert!(
            matches!(result, Err(QhistError::InvalidGrid { .. })),
            "expected rejection for {width}x{height}",
        );
    }
}

#[test]
fn short_grid_is_rejected() {
    // 2x2 macroblocks need 4 cells at stride 2; 3 is one short.
    let grid = QuantizerGrid::new(vec![10, 20, 30], 2);
    let result = mean_quantizer(&grid, 32, 32);
    assert!(matches!(result, Err(QhistError::InvalidGrid { .. })));
}

#[test]
fn stride_narrower_than_the_row_is_rejected() {
    let grid = QuantizerGrid::new(vec![10, 20, 30, 40], 1);
    let result = mean_quantizer(&grid, 32, 32);
    assert!(matches!(result, Err(QhistError::InvalidGrid { .. })));

    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("Invalid quantizer grid"),
        "error should identify the grid as invalid: {message}",
    );
}

#[test]
fn single_macroblock_frame_reads_one_cell() {
    // A 1x1-macroblock frame samples only the first cell; the rest of the
    // buffer is padding.
    let grid = QuantizerGrid::new(vec![10, 10, 10, 10], 2);
    assert_eq!(mean_quantizer(&grid, 16, 16).unwrap(), 10.0);
}
