//! Piecewise polynomial evaluator produced by the spline builder.

use rayon::prelude::*;

use crate::error::{KnotworkError, Result};

use super::system::SegmentCoefficients;
use super::SplineOrder;

/// An immutable piecewise polynomial over `[knots[0], knots[n]]`.
///
/// Built once by [`CubicSplineBuilder`](super::CubicSplineBuilder) and then
/// evaluated any number of times. Queries outside the knot range are
/// rejected; there is no extrapolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant {
    knots: Vec<f64>,
    order: SplineOrder,
    /// One entry per segment, `segments[i]` spans `knots[i]..=knots[i + 1]`.
    segments: Vec<SegmentCoefficients>,
}

impl Interpolant {
    /// `knots.len()` must be `segments.len() + 1` and at least 2.
    pub(crate) fn new(knots: Vec<f64>, order: SplineOrder, segments: Vec<SegmentCoefficients>) -> Self {
        debug_assert!(knots.len() >= 2 && knots.len() == segments.len() + 1);
        Self {
            knots,
            order,
            segments,
        }
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn order(&self) -> SplineOrder {
        self.order
    }

    pub fn segments(&self) -> &[SegmentCoefficients] {
        &self.segments
    }

    /// Interpolation range `(min, max)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Evaluate at every query point, preserving input order.
    ///
    /// # Errors
    ///
    /// `DomainError` for the first query outside the knot range.
    pub fn evaluate(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.evaluate_one(x)).collect()
    }

    /// Parallel [`evaluate`](Self::evaluate) for large query batches.
    pub fn evaluate_par(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.par_iter().map(|&x| self.evaluate_one(x)).collect()
    }

    pub fn evaluate_one(&self, x: f64) -> Result<f64> {
        let i = self.locate(x)?;
        let dx = x - self.knots[i];
        let s = &self.segments[i];
        let y = match self.order {
            SplineOrder::Linear => s.a + s.b * dx,
            // The cubic term of the cubic system is dropped, not refitted.
            SplineOrder::Quadratic => s.a + dx * (s.b + dx * s.c),
            SplineOrder::Cubic => s.a + dx * (s.b + dx * (s.c + dx * s.d)),
        };
        Ok(y)
    }

    /// First derivative of the evaluated polynomial at `x`.
    ///
    /// On an interior knot this is the derivative of the segment starting
    /// there.
    pub fn derivative(&self, x: f64) -> Result<f64> {
        let i = self.locate(x)?;
        let dx = x - self.knots[i];
        let s = &self.segments[i];
        let dy = match self.order {
            SplineOrder::Linear => s.b,
            SplineOrder::Quadratic => s.b + 2.0 * s.c * dx,
            SplineOrder::Cubic => s.b + dx * (2.0 * s.c + 3.0 * s.d * dx),
        };
        Ok(dy)
    }

    /// Index of the segment covering `x`; interior knots map to the segment
    /// starting there, the last knot to the final segment.
    fn locate(&self, x: f64) -> Result<usize> {
        let (min, max) = self.domain();
        // Written to reject NaN as well.
        if !(x >= min && x <= max) {
            return Err(KnotworkError::DomainError { x, min, max });
        }
        let upper = self.knots.partition_point(|&k| k <= x);
        Ok(upper.saturating_sub(1).min(self.segments.len() - 1))
    }
}

/// `count` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            // Pin the endpoint so it never drifts past the domain.
            points[count - 1] = stop;
            points
        }
    }
}
