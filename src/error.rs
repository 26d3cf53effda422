use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnotworkError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no convergence after {iterations} sweeps (relative change {residual:e})")]
    NonConvergence { iterations: usize, residual: f64 },

    #[error("x = {x} is outside the interpolation range [{min}, {max}]")]
    DomainError { x: f64, min: f64, max: f64 },

    #[error("singular matrix: {0}")]
    Singular(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KnotworkError>;
