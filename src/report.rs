//! Report formatting.
//!
//! Provides [`QuantizerAnalysis::report`], which turns the final aggregates
//! into a [`QuantizerReport`] rendered through [`Display`]: frame-type
//! counts with percentages, the sorted qvalue table, and the weighted
//! average qvalue.
//!
//! ```text
//! Total:   250
//! I:       10 (4.00)
//! B:       120 (48.00)
//! P:       118 (47.20)
//! UNKNOWN: 2 (0.80)
//! ==== qvalue statistics ====
//! 26.5000: 200 (80.00)
//! 31.0000: 50 (20.00)
//! Avg: 27.4000
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    analyzer::QuantizerAnalysis,
    error::QhistError,
    tally::{FrameKind, FrameTally},
};

impl QuantizerAnalysis {
    /// Build the printable report for this analysis.
    ///
    /// # Errors
    ///
    /// Returns [`QhistError::NoFramesProcessed`] when zero frames were
    /// recorded — every figure in the report is a ratio over the frame
    /// count, and an empty run must be reported as such rather than
    /// dividing by zero.
    pub fn report(&self) -> Result<QuantizerReport<'_>, QhistError> {
        if self.tally.total_frames() == 0 {
            return Err(QhistError::NoFramesProcessed);
        }
        Ok(QuantizerReport { analysis: self })
    }
}

/// A borrowed, displayable view over a completed [`QuantizerAnalysis`].
///
/// Construction via [`QuantizerAnalysis::report`] guarantees at least one
/// recorded frame, so every percentage below has a nonzero denominator.
#[derive(Debug, Clone, Copy)]
pub struct QuantizerReport<'a> {
    analysis: &'a QuantizerAnalysis,
}

impl QuantizerReport<'_> {
    /// The weighted average qvalue across all recorded frames:
    /// `Σ(qvalue × count) / total_frames`, to match the per-entry
    /// percentages' denominator.
    pub fn average_qvalue(&self) -> f64 {
        let total = self.analysis.tally.total_frames();
        let sum: f64 = self
            .analysis
            .frequency
            .iter()
            .map(|entry| entry.value * entry.count as f64)
            .sum();
        sum / total as f64
    }
}

fn category_line(
    f: &mut Formatter<'_>,
    label: &str,
    tally: &FrameTally,
    kind: FrameKind,
) -> FmtResult {
    let count = tally.count(kind);
    let percentage = count as f64 / tally.total_frames() as f64 * 100.0;
    writeln!(f, "{label} {count} ({percentage:.2})")
}

impl Display for QuantizerReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let tally = &self.analysis.tally;
        let total = tally.total_frames();

        writeln!(f, "Total:   {total}")?;
        category_line(f, "I:      ", tally, FrameKind::Intra)?;
        category_line(f, "B:      ", tally, FrameKind::BiPredicted)?;
        category_line(f, "P:      ", tally, FrameKind::Predicted)?;
        category_line(f, "UNKNOWN:", tally, FrameKind::Unknown)?;

        writeln!(f, "==== qvalue statistics ====")?;
        for entry in &self.analysis.frequency {
            let percentage = entry.count as f64 / total as f64 * 100.0;
            writeln!(f, "{:.4}: {} ({percentage:.2})", entry.value, entry.count)?;
        }
        writeln!(f, "Avg: {:.4}", self.average_qvalue())
    }
}
