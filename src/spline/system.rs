//! Second-derivative system and per-segment coefficients.
//!
//! The unknowns `m[i]` are half the second derivative at knot `i`, which is
//! the scaling produced by the `3 * (...)` right-hand side. Each segment is
//! then `a + b*dx + c*dx^2 + d*dx^3` with `c = m[i]`.

use crate::dense::DenseMatrix;

use super::SplineBoundary;

/// Polynomial coefficients of one segment, in powers of `x - x_left`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Knot spacings `h[k] = xd[k + 1] - xd[k]`.
pub(crate) fn spacings(xd: &[f64]) -> Vec<f64> {
    xd.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Assemble the (n+1)x(n+1) system for `m` over `n` segments.
///
/// Interior rows enforce continuity of the second derivative; rows 0 and
/// n carry the boundary condition. Callers guarantee at least two
/// strictly increasing knots.
pub(crate) fn assemble(xd: &[f64], yd: &[f64], boundary: &SplineBoundary) -> (DenseMatrix, Vec<f64>) {
    let n = xd.len() - 1;
    let h = spacings(xd);
    let slope = |k: usize| (yd[k + 1] - yd[k]) / h[k];

    let mut a = DenseMatrix::zeros(n + 1, n + 1);
    let mut rhs = vec![0.0; n + 1];

    for i in 1..n {
        a.set(i, i - 1, h[i - 1]);
        a.set(i, i, 2.0 * (h[i - 1] + h[i]));
        a.set(i, i + 1, h[i]);
        rhs[i] = 3.0 * (slope(i) - slope(i - 1));
    }

    match *boundary {
        SplineBoundary::Natural => natural_rows(&mut a, n),
        SplineBoundary::Clamped { left, right } => {
            // S'(x_0) = left, S'(x_n) = right
            a.set(0, 0, 2.0 * h[0]);
            a.set(0, 1, h[0]);
            rhs[0] = 3.0 * (slope(0) - left);

            a.set(n, n - 1, h[n - 1]);
            a.set(n, n, 2.0 * h[n - 1]);
            rhs[n] = 3.0 * (right - slope(n - 1));
        }
        SplineBoundary::NotAKnot if n < 3 => {
            tracing::debug!(points = n + 1, "not-a-knot needs 4 knots, using natural ends");
            natural_rows(&mut a, n);
        }
        SplineBoundary::NotAKnot => {
            // d[0] == d[1] and d[n-2] == d[n-1]
            a.set(0, 0, -h[1]);
            a.set(0, 1, h[0] + h[1]);
            a.set(0, 2, -h[0]);

            a.set(n, n - 2, -h[n - 1]);
            a.set(n, n - 1, h[n - 2] + h[n - 1]);
            a.set(n, n, -h[n - 2]);
        }
    }

    (a, rhs)
}

fn natural_rows(a: &mut DenseMatrix, n: usize) {
    a.set(0, 0, 1.0);
    a.set(n, n, 1.0);
}

/// Segment coefficients from the solved `m` vector.
pub(crate) fn cubic_coefficients(xd: &[f64], yd: &[f64], m: &[f64]) -> Vec<SegmentCoefficients> {
    spacings(xd)
        .iter()
        .enumerate()
        .map(|(i, &h)| SegmentCoefficients {
            a: yd[i],
            b: (yd[i + 1] - yd[i]) / h - h * (2.0 * m[i] + m[i + 1]) / 3.0,
            c: m[i],
            d: (m[i + 1] - m[i]) / (3.0 * h),
        })
        .collect()
}

/// Straight-line segments between consecutive knots.
pub(crate) fn linear_coefficients(xd: &[f64], yd: &[f64]) -> Vec<SegmentCoefficients> {
    spacings(xd)
        .iter()
        .enumerate()
        .map(|(i, &h)| SegmentCoefficients {
            a: yd[i],
            b: (yd[i + 1] - yd[i]) / h,
            c: 0.0,
            d: 0.0,
        })
        .collect()
}
