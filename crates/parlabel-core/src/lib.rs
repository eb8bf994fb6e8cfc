//! parlabel-core - Basic data structures for connected-component labeling
//!
//! This crate provides the host-side containers shared by the rest of the
//! workspace:
//!
//! - [`Mask`] - Dense row-major foreground mask over any [`Foreground`] type
//! - [`LabelImage`] - Labeled output with component statistics
//! - [`Error`] / [`Result`] - Error type for container operations
//!
//! # Example
//!
//! ```
//! use parlabel_core::Mask;
//!
//! let mask = Mask::from_ascii(
//!     "
//!     XX..
//!     ...X
//!     ",
//! )
//! .unwrap();
//! assert_eq!(mask.count_foreground(), 3);
//! ```

pub mod error;
pub mod labels;
pub mod mask;

pub use error::{Error, Result};
pub use labels::{Bounds, ComponentStats, LabelImage};
pub use mask::{Foreground, Mask};
