//! Per-frame qvalue sampling.
//!
//! This module provides [`QuantizerGrid`], the row-major per-macroblock
//! quantizer codes of one decoded frame, and [`mean_quantizer`], which
//! reduces a grid to the frame's single scalar qvalue.
//!
//! # Example
//!
//! ```
//! use qhist::{QuantizerGrid, mean_quantizer};
//!
//! // A 32x16 frame has a 2x1 macroblock grid.
//! let grid = QuantizerGrid::new(vec![28, 30], 2);
//! assert_eq!(mean_quantizer(&grid, 32, 16)?, 29.0);
//! # Ok::<(), qhist::QhistError>(())
//! ```

use crate::error::QhistError;

/// Width and height of a macroblock in pixels.
pub const MACROBLOCK_SIZE: u32 = 16;

/// Row-major per-macroblock quantizer codes with an explicit row stride.
///
/// The stride is the number of elements per row in `codes` and may exceed
/// the logical macroblock row width when the producer pads rows; indexing
/// must go through the stride, never the logical width.
#[derive(Debug, Clone)]
pub struct QuantizerGrid {
    codes: Vec<i32>,
    stride: usize,
}

impl QuantizerGrid {
    /// Wrap a row-major code buffer with the given row stride.
    pub fn new(codes: Vec<i32>, stride: usize) -> Self {
        Self { codes, stride }
    }

    /// The raw code buffer.
    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    /// Elements per row in the code buffer.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Number of macroblocks covering `pixels` along one dimension.
pub(crate) fn macroblocks(pixels: u32) -> usize {
    pixels.div_ceil(MACROBLOCK_SIZE) as usize
}

/// Compute the arithmetic mean quantizer code over the macroblock grid of a
/// frame with the given coded dimensions in pixels.
///
/// The grid is read once per cell over `ceil(width/16) × ceil(height/16)`
/// macroblocks, with rows indexed through the grid's stride.
///
/// # Errors
///
/// Returns [`QhistError::InvalidGrid`] for zero dimensions, a stride
/// smaller than the macroblock row, or a code buffer shorter than the
/// extent the dimensions imply. These are rejected rather than producing a
/// 0 or NaN qvalue, since a NaN would corrupt the frequency table's
/// ordering downstream.
pub fn mean_quantizer(grid: &QuantizerGrid, width: u32, height: u32) -> Result<f64, QhistError> {
    if width == 0 || height == 0 {
        return Err(QhistError::InvalidGrid {
            reason: format!("zero frame dimensions: {width}x{height}"),
        });
    }

    let columns = macroblocks(width);
    let rows = macroblocks(height);

    if grid.stride() < columns {
        return Err(QhistError::InvalidGrid {
            reason: format!(
                "stride {} is smaller than the {columns}-macroblock row",
                grid.stride(),
            ),
        });
    }

    let required = (rows - 1) * grid.stride() + columns;
    if grid.codes().len() < required {
        return Err(QhistError::InvalidGrid {
            reason: format!(
                "grid has {} cells but {rows}x{columns} macroblocks at stride {} need {required}",
                grid.codes().len(),
                grid.stride(),
            ),
        });
    }

    let mut sum: i64 = 0;
    for row in 0..rows {
        let start = row * grid.stride();
        for &code in &grid.codes()[start..start + columns] {
            sum += i64::from(code);
        }
    }

    Ok(sum as f64 / (rows * columns) as f64)
}
