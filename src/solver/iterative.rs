//! Stationary iterative solvers: Jacobi and Gauss-Seidel.
//!
//! Both methods split `A` into its diagonal and off-diagonal parts and
//! refine an iterate row by row until the relative change between sweeps
//! drops below the tolerance. Convergence is guaranteed for strictly
//! diagonally dominant matrices; for anything else it is the caller's
//! responsibility to hand in a convergent system. Zero diagonal entries are
//! not checked.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::dense::{inf_norm, DenseMatrix};
use crate::error::{KnotworkError, Result};

pub const MAX_ITERATIONS: usize = 10_000;
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Jacobi sweeps over at least this many rows update in parallel.
const PARALLEL_JACOBI_ROWS: usize = 256;

/// Update rule used by each sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterativeMethod {
    /// Every off-diagonal term reads the previous sweep.
    Jacobi,
    /// Rows before `i` read values already updated in the current sweep.
    #[default]
    GaussSeidel,
}

impl FromStr for IterativeMethod {
    type Err = KnotworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seidel" | "gauss_seidel" | "gauss-seidel" | "gaussseidel" => {
                Ok(IterativeMethod::GaussSeidel)
            }
            "jacobi" => Ok(IterativeMethod::Jacobi),
            other => Err(KnotworkError::InvalidInput(format!(
                "unknown iterative method '{other}', expected 'seidel' or 'jacobi'"
            ))),
        }
    }
}

impl fmt::Display for IterativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterativeMethod::Jacobi => write!(f, "jacobi"),
            IterativeMethod::GaussSeidel => write!(f, "gauss-seidel"),
        }
    }
}

/// Parameters for the stationary iteration.
#[derive(Debug, Clone)]
pub struct IterativeParams {
    pub method: IterativeMethod,
    /// Relative-change threshold `‖x_new - x‖∞ / ‖x_new‖∞`.
    pub tol: f64,
    pub max_iterations: usize,
}

impl Default for IterativeParams {
    fn default() -> Self {
        Self {
            method: IterativeMethod::default(),
            tol: DEFAULT_TOLERANCE,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// A converged iterate together with how it was reached.
#[derive(Debug, Clone)]
pub struct IterativeSolution {
    pub x: Vec<f64>,
    /// Number of sweeps performed, including the final one.
    pub iterations: usize,
    /// Relative change measured on the final sweep.
    pub relative_change: f64,
}

/// Jacobi / Gauss-Seidel solver for dense systems.
#[derive(Debug, Clone, Default)]
pub struct IterativeSolver {
    params: IterativeParams,
}

impl IterativeSolver {
    pub fn new(params: IterativeParams) -> Self {
        Self { params }
    }

    /// Solver with default tolerance and sweep cap.
    pub fn with_method(method: IterativeMethod) -> Self {
        Self::new(IterativeParams {
            method,
            ..IterativeParams::default()
        })
    }

    pub fn params(&self) -> &IterativeParams {
        &self.params
    }

    /// Solve `A x = b` starting from `x0` (zeros when `None`).
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `A` is not square or `b`/`x0` have the wrong
    /// length, `InvalidInput` for a non-positive tolerance, and
    /// `NonConvergence` if the sweep cap is reached first.
    pub fn solve_from(&self, a: &DenseMatrix, b: &[f64], x0: Option<&[f64]>) -> Result<Vec<f64>> {
        self.solve_with_report(a, b, x0).map(|s| s.x)
    }

    /// Like [`solve_from`](Self::solve_from), also reporting the sweep count.
    pub fn solve_with_report(
        &self,
        a: &DenseMatrix,
        b: &[f64],
        x0: Option<&[f64]>,
    ) -> Result<IterativeSolution> {
        super::check_dimensions(a, b)?;
        let n = a.nrows;
        if let Some(guess) = x0 {
            if guess.len() != n {
                return Err(KnotworkError::DimensionMismatch(format!(
                    "initial guess has length {}, expected {}",
                    guess.len(),
                    n
                )));
            }
        }
        let IterativeParams {
            method,
            tol,
            max_iterations,
        } = self.params;
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(KnotworkError::InvalidInput(format!(
                "tolerance must be positive and finite, got {tol}"
            )));
        }

        let _span = tracing::debug_span!("iterative_solve", n, %method).entered();

        let mut x = x0.map_or_else(|| vec![0.0; n], <[f64]>::to_vec);
        if n == 0 {
            return Ok(IterativeSolution {
                x,
                iterations: 0,
                relative_change: 0.0,
            });
        }

        let mut prev = match method {
            IterativeMethod::Jacobi => vec![0.0; n],
            IterativeMethod::GaussSeidel => Vec::new(),
        };
        let mut relative_change = f64::INFINITY;

        for iter in 0..max_iterations {
            let delta = match method {
                IterativeMethod::GaussSeidel => gauss_seidel_sweep(a, b, &mut x),
                IterativeMethod::Jacobi => {
                    prev.copy_from_slice(&x);
                    jacobi_sweep(a, b, &prev, &mut x)
                }
            };

            if x.iter().any(|v| !v.is_finite()) {
                tracing::warn!(iterations = iter + 1, "iterate became non-finite");
                return Err(KnotworkError::NonConvergence {
                    iterations: iter + 1,
                    residual: f64::NAN,
                });
            }

            let norm = inf_norm(&x);
            relative_change = if norm > 0.0 { delta / norm } else { delta };
            if relative_change < tol {
                tracing::debug!(iterations = iter + 1, relative_change, "iterative solve converged");
                return Ok(IterativeSolution {
                    x,
                    iterations: iter + 1,
                    relative_change,
                });
            }
        }

        tracing::warn!(max_iterations, relative_change, "iterative solve did not converge");
        Err(KnotworkError::NonConvergence {
            iterations: max_iterations,
            residual: relative_change,
        })
    }
}

impl super::LinearSolver for IterativeSolver {
    fn solve(&self, a: &DenseMatrix, b: &[f64]) -> Result<Vec<f64>> {
        self.solve_from(a, b, None)
    }
}

/// Solve `A x = b` with a one-off iterative solver.
///
/// `x0` defaults to zeros. See [`IterativeSolver::solve_from`] for errors.
pub fn iterative_solve(
    a: &DenseMatrix,
    b: &[f64],
    x0: Option<&[f64]>,
    tol: f64,
    method: IterativeMethod,
) -> Result<Vec<f64>> {
    IterativeSolver::new(IterativeParams {
        method,
        tol,
        max_iterations: MAX_ITERATIONS,
    })
    .solve_from(a, b, x0)
}

/// One in-place Gauss-Seidel sweep over `x`. Returns `‖x_new - x_old‖∞`.
///
/// Row `i` sees `x[..i]` from this sweep and `x[i + 1..]` from the previous
/// one, which only holds because the same buffer is read and written.
fn gauss_seidel_sweep(a: &DenseMatrix, b: &[f64], x: &mut [f64]) -> f64 {
    let mut max_delta = 0.0_f64;
    for i in 0..x.len() {
        let row = a.row(i);
        let mut sigma = 0.0;
        for (j, (&a_ij, &x_j)) in row.iter().zip(x.iter()).enumerate() {
            if j != i {
                sigma += a_ij * x_j;
            }
        }
        let updated = (b[i] - sigma) / row[i];
        max_delta = max_delta.max((updated - x[i]).abs());
        x[i] = updated;
    }
    max_delta
}

/// One Jacobi sweep reading `prev` and writing `x`. Returns `‖x - prev‖∞`.
fn jacobi_sweep(a: &DenseMatrix, b: &[f64], prev: &[f64], x: &mut [f64]) -> f64 {
    let update = |i: usize| -> f64 {
        let row = a.row(i);
        let sigma: f64 = row
            .iter()
            .zip(prev)
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, (a_ij, x_j))| a_ij * x_j)
            .sum();
        (b[i] - sigma) / row[i]
    };

    if x.len() >= PARALLEL_JACOBI_ROWS {
        x.par_iter_mut().enumerate().for_each(|(i, xi)| *xi = update(i));
    } else {
        for (i, xi) in x.iter_mut().enumerate() {
            *xi = update(i);
        }
    }

    x.iter()
        .zip(prev)
        .fold(0.0, |acc, (new, old)| acc.max((new - old).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::residual_inf_norm;
    use crate::solver::LinearSolver;
    use approx::assert_abs_diff_eq;

    fn two_by_two() -> DenseMatrix {
        DenseMatrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap()
    }

    /// Symmetric, strictly diagonally dominant tridiagonal matrix.
    fn poisson_like(n: usize) -> DenseMatrix {
        let mut triplets = Vec::new();
        for i in 0..n {
            triplets.push((i, i, 4.0));
            if i > 0 {
                triplets.push((i, i - 1, -1.0));
            }
            if i + 1 < n {
                triplets.push((i, i + 1, -1.0));
            }
        }
        DenseMatrix::from_triplets(n, n, &triplets)
    }

    #[test]
    fn method_tokens() {
        assert_eq!("seidel".parse::<IterativeMethod>().unwrap(), IterativeMethod::GaussSeidel);
        assert_eq!(" Jacobi ".parse::<IterativeMethod>().unwrap(), IterativeMethod::Jacobi);
        assert_eq!(
            "gauss-seidel".parse::<IterativeMethod>().unwrap(),
            IterativeMethod::GaussSeidel
        );
        assert!(matches!(
            "sor".parse::<IterativeMethod>(),
            Err(KnotworkError::InvalidInput(_))
        ));
    }

    #[test]
    fn gauss_seidel_matches_direct_2x2() {
        let x = iterative_solve(&two_by_two(), &[1.0, 2.0], None, 1e-8, IterativeMethod::GaussSeidel)
            .unwrap();
        assert_abs_diff_eq!(x[0], 1.0 / 11.0, epsilon = 1e-5);
        assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-5);
    }

    #[test]
    fn jacobi_matches_direct_2x2() {
        let x = iterative_solve(&two_by_two(), &[1.0, 2.0], None, 1e-8, IterativeMethod::Jacobi)
            .unwrap();
        assert_abs_diff_eq!(x[0], 1.0 / 11.0, epsilon = 1e-5);
        assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-5);
    }

    #[test]
    fn residual_within_tolerance_multiple() {
        let a = poisson_like(20);
        let b: Vec<f64> = (0..20).map(|i| i as f64 + 1.0).collect();
        for method in [IterativeMethod::Jacobi, IterativeMethod::GaussSeidel] {
            let x = IterativeSolver::with_method(method).solve(&a, &b).unwrap();
            let residual = residual_inf_norm(&a, &x, &b).unwrap();
            assert!(residual < 1e-5, "{method}: residual {residual}");
        }
    }

    #[test]
    fn gauss_seidel_needs_no_more_sweeps_than_jacobi() {
        let a = poisson_like(12);
        let b = vec![1.0; 12];
        let jacobi = IterativeSolver::with_method(IterativeMethod::Jacobi)
            .solve_with_report(&a, &b, None)
            .unwrap();
        let seidel = IterativeSolver::with_method(IterativeMethod::GaussSeidel)
            .solve_with_report(&a, &b, None)
            .unwrap();
        assert!(seidel.iterations <= jacobi.iterations);
    }

    #[test]
    fn initial_guess_is_not_aliased() {
        let guess = vec![0.5, 0.5];
        let x = iterative_solve(&two_by_two(), &[1.0, 2.0], Some(&guess), 1e-8, IterativeMethod::GaussSeidel)
            .unwrap();
        assert_eq!(guess, vec![0.5, 0.5]);
        assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-5);
    }

    #[test]
    fn exact_guess_converges_in_one_sweep() {
        let report = IterativeSolver::default()
            .solve_with_report(&two_by_two(), &[1.0, 2.0], Some(&[1.0 / 11.0, 7.0 / 11.0]))
            .unwrap();
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn zero_rhs_converges_to_zero() {
        let report = IterativeSolver::default()
            .solve_with_report(&two_by_two(), &[0.0, 0.0], None)
            .unwrap();
        assert_eq!(report.x, vec![0.0, 0.0]);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn dimension_mismatch_rhs() {
        let result = IterativeSolver::default().solve(&two_by_two(), &[1.0]);
        assert!(matches!(result, Err(KnotworkError::DimensionMismatch(_))));
    }

    #[test]
    fn dimension_mismatch_guess() {
        let result = IterativeSolver::default().solve_from(&two_by_two(), &[1.0, 2.0], Some(&[0.0]));
        assert!(matches!(result, Err(KnotworkError::DimensionMismatch(_))));
    }

    #[test]
    fn dimension_mismatch_nonsquare() {
        let a = DenseMatrix::zeros(2, 3);
        let result = IterativeSolver::default().solve(&a, &[1.0, 2.0]);
        assert!(matches!(result, Err(KnotworkError::DimensionMismatch(_))));
    }

    #[test]
    fn sweep_cap_reports_non_convergence() {
        let solver = IterativeSolver::new(IterativeParams {
            max_iterations: 2,
            ..IterativeParams::default()
        });
        match solver.solve(&two_by_two(), &[1.0, 2.0]) {
            Err(KnotworkError::NonConvergence { iterations, residual }) => {
                assert_eq!(iterations, 2);
                assert!(residual > 1e-8);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn divergent_system_reports_non_convergence() {
        // Not diagonally dominant: Jacobi iteration matrix has eigenvalues ±2.
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        let result = IterativeSolver::with_method(IterativeMethod::Jacobi).solve(&a, &[1.0, 1.0]);
        assert!(matches!(result, Err(KnotworkError::NonConvergence { .. })));
    }

    #[test]
    fn invalid_tolerance() {
        let result = iterative_solve(&two_by_two(), &[1.0, 2.0], None, 0.0, IterativeMethod::Jacobi);
        assert!(matches!(result, Err(KnotworkError::InvalidInput(_))));
    }

    #[test]
    fn parallel_jacobi_matches_sequential_seidel() {
        let n = PARALLEL_JACOBI_ROWS + 4;
        let a = poisson_like(n);
        let b = vec![2.0; n];
        let jacobi = IterativeSolver::with_method(IterativeMethod::Jacobi).solve(&a, &b).unwrap();
        let seidel = IterativeSolver::with_method(IterativeMethod::GaussSeidel).solve(&a, &b).unwrap();
        for (j, s) in jacobi.iter().zip(&seidel) {
            assert_abs_diff_eq!(*j, *s, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_system() {
        let a = DenseMatrix::zeros(0, 0);
        let x = IterativeSolver::default().solve(&a, &[]).unwrap();
        assert!(x.is_empty());
    }
}
