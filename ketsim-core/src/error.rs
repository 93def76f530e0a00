//! Error types for gate construction

use thiserror::Error;

/// Errors that can occur when constructing a gate value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    /// Matrix rows and columns disagree
    #[error("gate matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Matrix side is not a power of two of at least 2
    #[error("gate side {dim} is not a power of two >= 2")]
    InvalidDimension { dim: usize },

    /// Matrix fails the unitarity check
    #[error("gate matrix is not unitary, deviates from M*M' = I by {deviation:e}")]
    NotUnitary { deviation: f64 },
}

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, GateError>;
