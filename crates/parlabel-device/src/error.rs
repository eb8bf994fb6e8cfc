//! Error types for parlabel-device

use thiserror::Error;

/// Errors raised by the device runtime
///
/// All of them are fatal for the invocation that triggered them: there is
/// no retry and no partial result.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Bad grid or block dimensions for a launch
    #[error("invalid launch of kernel '{kernel}': {reason}")]
    InvalidLaunch { kernel: &'static str, reason: String },

    /// A kernel faulted while running (e.g. out-of-bounds device access)
    #[error("kernel '{kernel}' faulted: {message}")]
    KernelFault {
        kernel: &'static str,
        message: String,
    },

    /// Device memory allocation failed or exceeds the device budget
    #[error("device allocation of {requested} words failed (limit {limit})")]
    Allocation { requested: usize, limit: usize },

    /// Host/device copy with mismatched extents
    #[error("transfer size mismatch: device holds {expected} elements, host has {actual}")]
    Transfer { expected: usize, actual: usize },

    /// Backend could not be created
    #[error("thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;
