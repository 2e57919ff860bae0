//! Error types for Rayo operations
//!
//! Only the validating layer (matrix constructors, decomposition entry
//! points, equation builders) returns these. Kernel primitives never fail:
//! numerically degenerate input is reported through their return values.

use thiserror::Error;

/// Result type for Rayo operations
pub type Result<T> = std::result::Result<T, RayoError>;

/// Errors that can occur during Rayo operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RayoError {
    /// Buffer length does not match the declared shape
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Operand shapes are incompatible for the requested operation
    #[error("Dimension mismatch in {operation}: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    DimensionMismatch {
        /// Operation that rejected the operands
        operation: &'static str,
        /// Shape of the left operand
        left: (usize, usize),
        /// Shape of the right operand
        right: (usize, usize),
    },

    /// Square input required
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Zero-sized input where a non-empty matrix is required
    #[error("Empty matrix")]
    EmptyMatrix,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
