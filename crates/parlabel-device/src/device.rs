//! The device abstraction

use crate::dim::DeviceLimits;
use crate::error::DeviceResult;
use crate::kernel::Kernel;
use crate::memory::{DeviceBuffer, DeviceGlobal, DeviceScalar};
use crate::partition::LaunchConfig;

/// Counters kept by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStats {
    /// Kernel launches completed
    pub launches: u64,
    /// Device-to-host reads of globals
    pub readbacks: u64,
}

/// A compute device executing data-parallel kernels
///
/// Every [`launch`](Device::launch) is synchronizing: it returns only after
/// all blocks of the grid have finished, so consecutive launches are
/// separated by a device-wide barrier.
pub trait Device: Send + Sync {
    /// Human-readable device name
    fn name(&self) -> &str;

    /// Limits launches and allocations are checked against
    fn limits(&self) -> &DeviceLimits;

    /// Allocate a zero-filled buffer of `len` elements
    fn alloc<T: DeviceScalar>(&self, len: usize) -> DeviceResult<DeviceBuffer<T>>;

    /// Allocate a buffer and copy `host` into it
    fn upload<T: DeviceScalar>(&self, host: &[T]) -> DeviceResult<DeviceBuffer<T>> {
        let buffer = self.alloc(host.len())?;
        buffer.copy_from_host(host)?;
        Ok(buffer)
    }

    /// Run `kernel` over the grid described by `config`
    fn launch(&self, config: &LaunchConfig, kernel: &dyn Kernel) -> DeviceResult<()>;

    /// Copy a device global back to the host
    fn read_global(&self, global: &DeviceGlobal) -> DeviceResult<u32>;

    /// Snapshot of the device counters
    fn stats(&self) -> DeviceStats;
}
