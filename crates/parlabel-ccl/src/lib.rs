//! parlabel-ccl - Parallel connected-component labeling
//!
//! Labels the connected components of a binary mask with a data-parallel
//! fixpoint algorithm:
//!
//! - **Initialize** - each foreground pixel starts as its own root
//! - **Scan / Analysis** - neighbours pull each other towards the smallest
//!   label, then every pixel is pointed straight at its root; repeated until
//!   no label changes
//! - **Prefix sum** - a three-phase scan ranks the surviving roots
//! - **Finalize** - dense `1..=K` labels and the count `K` are written out
//!
//! Components are numbered in increasing order of their lowest linear pixel
//! index (`y * width + x`).
//!
//! # Examples
//!
//! ```
//! use parlabel_ccl::{Connectivity, label};
//! use parlabel_core::Mask;
//!
//! // Two pixels touching only at a corner
//! let mask = Mask::from_ascii(
//!     "
//!     X.
//!     .X
//!     ",
//! )
//! .unwrap();
//!
//! assert_eq!(label(&mask, Connectivity::Four).unwrap().num_components(), 2);
//! assert_eq!(label(&mask, Connectivity::Eight).unwrap().num_components(), 1);
//! ```
//!
//! Running on caller-owned device buffers:
//!
//! ```
//! use parlabel_ccl::{LabelBuffers, LabelConfig, bwlabel};
//! use parlabel_device::{CpuDevice, Device};
//!
//! let device = CpuDevice::new().unwrap();
//! let mask = device.upload(&[1u8, 1, 0, 1]).unwrap();
//! let labels = device.alloc::<u32>(4).unwrap();
//! let packing = device.alloc::<u32>(4).unwrap();
//! let out_final = device.alloc::<f64>(4).unwrap();
//! let out_count = device.alloc::<f64>(1).unwrap();
//!
//! let buffers = LabelBuffers {
//!     out_final: &out_final,
//!     out_count: &out_count,
//!     labels: &labels,
//!     packing: &packing,
//!     mask: &mask,
//! };
//! let report = bwlabel(&device, &buffers, 4, 4, 1, &LabelConfig::default()).unwrap();
//! assert_eq!(report.num_components, 2);
//! assert_eq!(out_final.to_host(), vec![1.0, 1.0, 0.0, 2.0]);
//! ```

pub mod bwlabel;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod kernels;
pub mod label;
pub mod reference;

// Re-export core types
pub use parlabel_core;
pub use parlabel_device;

pub use bwlabel::{LabelBuffers, LabelReport, bwlabel};
pub use config::LabelConfig;
pub use connectivity::Connectivity;
pub use error::{LabelError, LabelResult};
pub use label::{count_components, default_device, label, label_with, label_with_report};
pub use reference::label_sequential;
