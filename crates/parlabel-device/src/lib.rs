//! parlabel-device - Data-parallel execution model
//!
//! This crate provides the runtime the labeling kernels are written against:
//!
//! - **Geometry** - [`Dim3`], [`LaunchConfig`], [`DeviceLimits`] and the
//!   [`GridPartition`] that maps an image onto linear and tiled launches
//! - **Memory** - [`DeviceBuffer`] / [`DeviceSlice`] word-addressed atomic
//!   storage with typed aliasing, and [`DeviceGlobal`] module globals
//! - **Execution** - the [`Kernel`] trait with [`BlockCtx`] / [`ThreadCtx`],
//!   the [`Device`] trait and the [`CpuDevice`] backend
//!
//! # Example
//!
//! ```
//! use parlabel_device::{BlockCtx, CpuDevice, Device, DeviceSlice, Dim3, Kernel, LaunchConfig};
//!
//! struct Fill<'a>(DeviceSlice<'a, u32>);
//!
//! impl Kernel for Fill<'_> {
//!     fn name(&self) -> &'static str {
//!         "fill"
//!     }
//!
//!     fn run_block(&self, block: &BlockCtx) {
//!         for t in block.threads() {
//!             let i = t.global_x() as usize;
//!             if i < self.0.len() {
//!                 self.0.store(i, 1);
//!             }
//!         }
//!     }
//! }
//!
//! let device = CpuDevice::new().unwrap();
//! let buf = device.alloc::<u32>(10).unwrap();
//! let config = LaunchConfig::new(Dim3::x(2), Dim3::x(8));
//! device.launch(&config, &Fill(buf.slice())).unwrap();
//! assert_eq!(buf.to_host(), vec![1; 10]);
//! ```

pub mod cpu;
pub mod device;
pub mod dim;
pub mod error;
pub mod kernel;
pub mod memory;
pub mod partition;

pub use cpu::CpuDevice;
pub use device::{Device, DeviceStats};
pub use dim::{CLASSIC_MAX_GRID_DIM, DeviceLimits, Dim3, divup};
pub use error::{DeviceError, DeviceResult};
pub use kernel::{BlockCtx, Kernel, ThreadCtx};
pub use memory::{DeviceBuffer, DeviceGlobal, DeviceScalar, DeviceSlice};
pub use partition::{
    DEFAULT_THREADS_PER_BLOCK, DEFAULT_TILE, DEFAULT_WORK_PER_THREAD, GridPartition, LaunchConfig,
    LinearLayout,
};
