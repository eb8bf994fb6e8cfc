//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Invalid generator parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Core library error while building a fixture
    #[error("core error: {0}")]
    Core(#[from] parlabel_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
