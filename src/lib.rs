//! Stationary iterative linear solvers and spline interpolation over
//! tabulated data.
//!
//! The numerical core lives in [`solver`] and [`spline`]; [`data`],
//! [`output`] and [`stats`] are the glue used by the `knotwork` binary.

pub mod data;
pub mod dense;
pub mod error;
pub mod output;
pub mod solver;
pub mod spline;
pub mod stats;

pub use error::{KnotworkError, Result};
