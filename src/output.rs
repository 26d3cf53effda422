//! Results output formatting (CSV).

use crate::error::{KnotworkError, Result};
use std::io::Write;

/// Write sampled interpolant values as CSV.
///
/// Format:
/// ```csv
/// x,y
/// 0,999.84
/// 0.5,999.87
/// ```
pub fn write_samples_csv<W: Write>(xs: &[f64], ys: &[f64], writer: &mut W) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(KnotworkError::DimensionMismatch(format!(
            "{} x values but {} y values",
            xs.len(),
            ys.len()
        )));
    }
    writeln!(writer, "x,y")?;
    for (x, y) in xs.iter().zip(ys) {
        writeln!(writer, "{},{}", x, y)?;
    }
    Ok(())
}
