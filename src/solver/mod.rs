//! Linear system solvers.

pub mod direct;
pub mod iterative;

use crate::dense::DenseMatrix;
use crate::error::{KnotworkError, Result};

pub use direct::DirectSolver;
pub use iterative::{
    iterative_solve, IterativeMethod, IterativeParams, IterativeSolution, IterativeSolver,
};

/// A solver for dense linear systems Ax = b.
pub trait LinearSolver {
    /// Solve Ax = b, returning x.
    fn solve(&self, a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>>;
}

/// Require `a` square and `b` of matching length.
pub(crate) fn check_dimensions(a: &DenseMatrix, b: &[f64]) -> Result<()> {
    if !a.is_square() || b.len() != a.nrows {
        return Err(KnotworkError::DimensionMismatch(format!(
            "matrix is {}x{}, rhs length is {}",
            a.nrows,
            a.ncols,
            b.len()
        )));
    }
    Ok(())
}
