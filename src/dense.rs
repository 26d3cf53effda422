//! Dense row-major matrix.
//!
//! Holds the square systems handed to the linear solvers, including the
//! tridiagonal second-derivative system assembled by the spline builder.

use crate::error::{KnotworkError, Result};

/// Dense real matrix stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    pub nrows: usize,
    pub ncols: usize,
    /// `values[row * ncols + col]`.
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Create an `nrows x ncols` matrix of zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            values: vec![0.0; nrows * ncols],
        }
    }

    /// Build from a slice of rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(KnotworkError::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            nrows,
            ncols,
            values,
        })
    }

    /// Build from (row, col, value) triplets.
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut m = Self::zeros(nrows, ncols);
        for &(row, col, val) in triplets {
            m.values[row * ncols + col] += val;
        }
        m
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.ncols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.ncols + col] = value;
    }

    /// Borrow row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Copy out as a vector of rows. For testing and small matrices only.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nrows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Matrix-vector multiply: y = A * x
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.ncols {
            return Err(KnotworkError::DimensionMismatch(format!(
                "matvec: matrix is {}x{}, vector length is {}",
                self.nrows,
                self.ncols,
                x.len()
            )));
        }
        Ok((0..self.nrows)
            .map(|i| self.row(i).iter().zip(x).map(|(a, v)| a * v).sum())
            .collect())
    }

    /// Smallest ratio `|a_ii| / sum_{j != i} |a_ij|` over all rows.
    ///
    /// A value above 1 means strictly diagonally dominant, which guarantees
    /// convergence of both Jacobi and Gauss-Seidel. Rows with no off-diagonal
    /// entries report infinity.
    pub fn diagonal_dominance(&self) -> f64 {
        (0..self.nrows.min(self.ncols))
            .map(|i| {
                let row = self.row(i);
                let off: f64 = row
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, a)| a.abs())
                    .sum();
                if off == 0.0 {
                    f64::INFINITY
                } else {
                    row[i].abs() / off
                }
            })
            .fold(f64::INFINITY, f64::min)
    }
}

/// Infinity norm of a vector.
pub fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Infinity norm of `A x - b`.
pub fn residual_inf_norm(a: &DenseMatrix, x: &[f64], b: &[f64]) -> Result<f64> {
    let ax = a.matvec(x)?;
    if ax.len() != b.len() {
        return Err(KnotworkError::DimensionMismatch(format!(
            "residual: A*x has length {}, rhs length is {}",
            ax.len(),
            b.len()
        )));
    }
    Ok(ax
        .iter()
        .zip(b)
        .fold(0.0, |acc, (l, r)| acc.max((l - r).abs())))
}
