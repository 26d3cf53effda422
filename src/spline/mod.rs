//! Spline interpolation over tabulated samples.
//!
//! [`CubicSplineBuilder`] assembles the second-derivative system for the
//! knots, hands it to a [`LinearSolver`], and packs the resulting
//! per-segment polynomials into an [`Interpolant`].
//!
//! Order 3 is the natural cubic spline. Order 2 reuses the cubic system and
//! drops the cubic term at evaluation time, so it is an approximation of a
//! quadratic spline rather than a separate fit. Order 1 is piecewise linear
//! and needs no solve.

pub mod interpolant;
pub mod system;

use std::fmt;
use std::str::FromStr;

use crate::error::{KnotworkError, Result};
use crate::solver::{DirectSolver, LinearSolver};

pub use interpolant::{linspace, Interpolant};
pub use system::SegmentCoefficients;

/// Polynomial degree used when evaluating each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineOrder {
    Linear,
    Quadratic,
    #[default]
    Cubic,
}

impl SplineOrder {
    pub fn degree(self) -> u8 {
        match self {
            SplineOrder::Linear => 1,
            SplineOrder::Quadratic => 2,
            SplineOrder::Cubic => 3,
        }
    }
}

impl TryFrom<u8> for SplineOrder {
    type Error = KnotworkError;

    fn try_from(order: u8) -> Result<Self> {
        match order {
            1 => Ok(SplineOrder::Linear),
            2 => Ok(SplineOrder::Quadratic),
            3 => Ok(SplineOrder::Cubic),
            other => Err(KnotworkError::InvalidInput(format!(
                "unsupported spline order {other}, expected 1, 2 or 3"
            ))),
        }
    }
}

impl fmt::Display for SplineOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degree())
    }
}

/// End conditions closing the second-derivative system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SplineBoundary {
    /// Second derivative is zero at both ends.
    #[default]
    Natural,
    /// First derivative is prescribed at both ends.
    Clamped { left: f64, right: f64 },
    /// Third derivative is continuous at the second and second-to-last
    /// knots. Falls back to natural ends with fewer than 4 knots.
    NotAKnot,
}

impl FromStr for SplineBoundary {
    type Err = KnotworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(SplineBoundary::Natural),
            "not-a-knot" | "not_a_knot" | "notaknot" => Ok(SplineBoundary::NotAKnot),
            other => Err(KnotworkError::InvalidInput(format!(
                "unknown boundary condition '{other}', expected 'natural' or 'not-a-knot'"
            ))),
        }
    }
}

impl fmt::Display for SplineBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplineBoundary::Natural => write!(f, "natural"),
            SplineBoundary::Clamped { left, right } => write!(f, "clamped({left}, {right})"),
            SplineBoundary::NotAKnot => write!(f, "not-a-knot"),
        }
    }
}

/// Builds an [`Interpolant`] from sample points.
///
/// Defaults to natural boundaries and the direct solver.
pub struct CubicSplineBuilder<'s> {
    order: SplineOrder,
    boundary: SplineBoundary,
    solver: Option<&'s dyn LinearSolver>,
}

impl<'s> CubicSplineBuilder<'s> {
    pub fn new(order: SplineOrder) -> Self {
        Self {
            order,
            boundary: SplineBoundary::default(),
            solver: None,
        }
    }

    pub fn boundary(mut self, boundary: SplineBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Solve the second-derivative system with `solver` instead of the
    /// direct solver.
    pub fn solver(mut self, solver: &'s dyn LinearSolver) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Fit the spline through `(xd[i], yd[i])`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the lengths differ, fewer than two points are given,
    /// a sample is not finite, or `xd` is not strictly increasing. Errors
    /// from the linear solve (e.g. `NonConvergence`) are passed through.
    pub fn build(&self, xd: &[f64], yd: &[f64]) -> Result<Interpolant> {
        let _span = tracing::info_span!(
            "spline_build",
            points = xd.len(),
            order = %self.order,
            boundary = %self.boundary
        )
        .entered();

        validate_samples(xd, yd)?;

        let segments = match self.order {
            SplineOrder::Linear => system::linear_coefficients(xd, yd),
            SplineOrder::Quadratic | SplineOrder::Cubic => {
                let (a, rhs) = system::assemble(xd, yd, &self.boundary);
                let m = match self.solver {
                    Some(solver) => solver.solve(&a, &rhs)?,
                    None => DirectSolver::new().solve(&a, &rhs)?,
                };
                if m.len() != xd.len() {
                    return Err(KnotworkError::DimensionMismatch(format!(
                        "solver returned {} second derivatives for {} knots",
                        m.len(),
                        xd.len()
                    )));
                }
                system::cubic_coefficients(xd, yd, &m)
            }
        };

        tracing::debug!(segments = segments.len(), "spline built");
        Ok(Interpolant::new(xd.to_vec(), self.order, segments))
    }
}

/// Natural spline of the given order through `(xd, yd)`, solved directly.
pub fn build(xd: &[f64], yd: &[f64], order: SplineOrder) -> Result<Interpolant> {
    CubicSplineBuilder::new(order).build(xd, yd)
}

fn validate_samples(xd: &[f64], yd: &[f64]) -> Result<()> {
    if xd.len() != yd.len() {
        return Err(KnotworkError::InvalidInput(format!(
            "xd and yd must have the same length, got {} and {}",
            xd.len(),
            yd.len()
        )));
    }
    if xd.len() < 2 {
        return Err(KnotworkError::InvalidInput(format!(
            "at least 2 sample points are required, got {}",
            xd.len()
        )));
    }
    if let Some(i) = xd.iter().chain(yd).position(|v| !v.is_finite()) {
        let (name, idx) = if i < xd.len() { ("xd", i) } else { ("yd", i - xd.len()) };
        return Err(KnotworkError::InvalidInput(format!(
            "{name}[{idx}] is not finite"
        )));
    }
    if let Some(i) = xd.windows(2).position(|w| w[1] <= w[0]) {
        return Err(KnotworkError::InvalidInput(format!(
            "xd must be strictly increasing: xd[{}] = {} is not greater than xd[{}] = {}",
            i + 1,
            xd[i + 1],
            i,
            xd[i]
        )));
    }
    Ok(())
}
