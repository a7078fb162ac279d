//! Error types for fpmine.

use thiserror::Error;

/// Result type alias using MiningError.
pub type Result<T> = std::result::Result<T, MiningError>;

/// Errors raised by the collections and the mining pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    #[error("Key not found")]
    KeyNotFound,

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid minimum support: {0} (must be at least 1)")]
    InvalidThreshold(usize),

    #[error("Invalid load factor: {0} (must lie strictly between 0 and 1)")]
    InvalidLoadFactor(f64),

    #[error("Invalid initial capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Shape mismatch: expected {expected} labels, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl MiningError {
    /// Returns true if this error comes from a caller-supplied setting
    /// rather than from an access into a collection.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MiningError::InvalidThreshold(_)
                | MiningError::InvalidLoadFactor(_)
                | MiningError::InvalidCapacity(_)
        )
    }
}
