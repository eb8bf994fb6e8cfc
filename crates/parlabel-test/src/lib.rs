//! parlabel-test - Regression test framework for parlabel
//!
//! Regression tests record every check in a [`RegParams`] and assert once at
//! the end, so a single run reports all mismatches instead of stopping at
//! the first. The [`masks`] module builds seeded synthetic inputs.
//!
//! # Usage
//!
//! ```
//! use parlabel_test::RegParams;
//!
//! let mut rp = RegParams::new("doc");
//! rp.compare_values(3.0, 3.0, 0.0);
//! rp.compare_labels(&[0.0, 1.0], &[0.0, 1.0]);
//! assert!(rp.cleanup());
//! ```

mod error;
pub mod masks;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

/// Densities used by randomized regression tests
///
/// Spans sparse noise, values around the percolation threshold, and nearly
/// solid masks.
pub const DENSITIES: [f64; 6] = [0.05, 0.3, 0.45, 0.6, 0.75, 0.95];
