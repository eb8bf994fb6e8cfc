//! Error types for parlabel-ccl

use parlabel_device::DeviceError;
use thiserror::Error;

/// Errors that can occur during labeling
#[derive(Debug, Error)]
pub enum LabelError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] parlabel_core::Error),

    /// Device launch, allocation or transfer failure
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Invalid argument (connectivity, image size, configuration)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A caller-provided buffer has the wrong extent
    #[error("buffer '{name}' has {actual} elements, expected {expected}")]
    BufferSize {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for labeling operations
pub type LabelResult<T> = Result<T, LabelError>;
