//! Error types for vector and matrix operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Broad category of a [`LinalgError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand sizes or arguments are not acceptable for the operation.
    InvalidArgument,
    /// An index or range lies outside the container.
    OutOfRange,
    /// The operation is mathematically undefined or intentionally unsupported
    /// for this input.
    Domain,
}

/// Errors returned by vector, matrix and solver operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand dimensions do not fit the operation.
    #[error("dimension mismatch in {op}: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// Data length does not match the requested dimensions.
    #[error("data length mismatch: expected {expected}, got {got}")]
    InvalidData { expected: usize, got: usize },

    /// An argument is outside the accepted set of values.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A checked index is outside `[0, len)`.
    #[error("{what} index {index} out of range for length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A checked range is outside `[0, len]` or reversed.
    #[error("{what} range {start}..{end} out of bounds for length {len}")]
    RangeOutOfBounds {
        what: &'static str,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The operation is undefined or unsupported for this input.
    #[error("domain error: {reason}")]
    Domain { reason: &'static str },
}

impl LinalgError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionMismatch { .. }
            | Self::InvalidData { .. }
            | Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::IndexOutOfRange { .. } | Self::RangeOutOfBounds { .. } => ErrorKind::OutOfRange,
            Self::Domain { .. } => ErrorKind::Domain,
        }
    }
}
