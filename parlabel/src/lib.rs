//! parlabel - Data-parallel connected-component labeling
//!
//! Labels the connected foreground regions of a 2-D binary mask with a
//! fixpoint label-propagation algorithm written for massively parallel
//! hardware, and numbers them densely `1..=K` in raster order of their
//! first pixel.
//!
//! # Overview
//!
//! - [`Mask`] / [`LabelImage`] - host-side input and output
//! - [`device`] - execution model: launches, device buffers, the
//!   [`CpuDevice`](device::CpuDevice) backend
//! - [`ccl`] - the labeling kernels and the [`bwlabel`](ccl::bwlabel) driver
//!
//! # Example
//!
//! ```
//! use parlabel::{Connectivity, Mask, label};
//!
//! let mask = Mask::from_ascii(
//!     "
//!     XX..X
//!     X...X
//!     ..X..
//!     ",
//! )
//! .unwrap();
//!
//! let labeled = label(&mask, Connectivity::Four).unwrap();
//! assert_eq!(labeled.num_components(), 3);
//! assert_eq!(labeled.get(0, 0), Some(1));
//! assert_eq!(labeled.get(4, 1), Some(2));
//! assert_eq!(labeled.get(2, 2), Some(3));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use parlabel_core::*;

// Re-export the other crates as modules to avoid name conflicts
pub use parlabel_ccl as ccl;
pub use parlabel_device as device;

pub use parlabel_ccl::{
    Connectivity, LabelConfig, LabelError, LabelResult, count_components, label, label_sequential,
    label_with,
};
