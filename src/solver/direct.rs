//! Direct dense solver using Gaussian elimination with partial pivoting.
//!
//! Always terminates, so it is the default for spline construction. The
//! iterative solver is the alternative for diagonally dominant systems.

use crate::dense::DenseMatrix;
use crate::error::{KnotworkError, Result};

/// Pivots smaller than this are treated as zero.
const PIVOT_EPSILON: f64 = 1e-15;

/// Dense direct linear solver.
pub struct DirectSolver;

impl DirectSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DirectSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl super::LinearSolver for DirectSolver {
    fn solve(&self, a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>> {
        super::check_dimensions(a, b)?;
        let n = a.nrows;
        if n == 0 {
            return Ok(Vec::new());
        }

        // Build augmented matrix [A | b]
        let mut aug: Vec<Vec<f64>> = Vec::with_capacity(n);
        for (i, &rhs) in b.iter().enumerate() {
            let mut row = Vec::with_capacity(n + 1);
            row.extend_from_slice(a.row(i));
            row.push(rhs);
            aug.push(row);
        }

        // Forward elimination with partial pivoting
        for k in 0..n {
            let mut max_val = aug[k][k].abs();
            let mut max_row = k;
            for (i, row) in aug.iter().enumerate().skip(k + 1) {
                let v = row[k].abs();
                if v > max_val {
                    max_val = v;
                    max_row = i;
                }
            }

            if max_val < PIVOT_EPSILON {
                return Err(KnotworkError::Singular(format!(
                    "no usable pivot in column {k}"
                )));
            }

            if max_row != k {
                aug.swap(k, max_row);
            }

            let pivot = aug[k][k];
            let (upper, lower) = aug.split_at_mut(k + 1);
            let pivot_row = &upper[k];
            for row in lower.iter_mut() {
                let factor = row[k] / pivot;
                row[k] = 0.0;
                for j in (k + 1)..=n {
                    row[j] -= factor * pivot_row[j];
                }
            }
        }

        // Back substitution
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = aug[i][n];
            for j in (i + 1)..n {
                sum -= aug[i][j] * x[j];
            }
            x[i] = sum / aug[i][i];
        }

        tracing::trace!(n, "direct solve complete");
        Ok(x)
    }
}
