//! Error types for parlabel-core
//!
//! Provides a unified error type for the host-side containers. Each variant
//! captures enough context for diagnostics without exposing internal
//! implementation details.

use thiserror::Error;

/// parlabel-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Data length does not match the declared dimensions
    #[error("dimension mismatch: expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for parlabel-core operations
pub type Result<T> = std::result::Result<T, Error>;
