//! Host CPU backend
//!
//! Runs the blocks of each launch on a private `rayon` thread pool. The
//! pool is owned by the device so launches from different devices do not
//! compete for the global pool, and tests can pin the worker count.

use crate::device::{Device, DeviceStats};
use crate::dim::DeviceLimits;
use crate::error::{DeviceError, DeviceResult};
use crate::kernel::{BlockCtx, Kernel};
use crate::memory::{DeviceBuffer, DeviceGlobal, DeviceScalar};
use crate::partition::LaunchConfig;
use rayon::prelude::*;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Data-parallel device backed by host threads
pub struct CpuDevice {
    pool: rayon::ThreadPool,
    limits: DeviceLimits,
    name: String,
    launches: AtomicU64,
    readbacks: AtomicU64,
}

impl CpuDevice {
    /// Create a device with one worker per available core
    pub fn new() -> DeviceResult<Self> {
        Self::with_threads(0)
    }

    /// Create a device with `threads` workers (`0` picks the core count)
    pub fn with_threads(threads: usize) -> DeviceResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("parlabel-cpu-{i}"))
            .build()?;
        let name = format!("cpu ({} workers)", pool.current_num_threads());
        log::info!("created device {}", name);
        Ok(Self {
            pool,
            limits: DeviceLimits::default(),
            name,
            launches: AtomicU64::new(0),
            readbacks: AtomicU64::new(0),
        })
    }

    /// Replace the device limits
    pub fn with_limits(mut self, limits: DeviceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of worker threads
    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Device for CpuDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn limits(&self) -> &DeviceLimits {
        &self.limits
    }

    fn alloc<T: DeviceScalar>(&self, len: usize) -> DeviceResult<DeviceBuffer<T>> {
        let requested = len.saturating_mul(T::WORDS);
        if requested > self.limits.max_alloc_words {
            return Err(DeviceError::Allocation {
                requested,
                limit: self.limits.max_alloc_words,
            });
        }
        DeviceBuffer::try_zeroed(len)
    }

    fn launch(&self, config: &LaunchConfig, kernel: &dyn Kernel) -> DeviceResult<()> {
        config.validate(kernel.name(), &self.limits)?;
        log::trace!(
            "launch {} grid={} block={}",
            kernel.name(),
            config.grid,
            config.block
        );

        let grid = config.grid;
        let block = config.block;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                (0..config.num_blocks()).into_par_iter().for_each(|linear| {
                    let ctx = BlockCtx::from_linear(linear, grid, block);
                    kernel.run_block(&ctx);
                });
            })
        }));

        match result {
            Ok(()) => {
                self.launches.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(payload) => Err(DeviceError::KernelFault {
                kernel: kernel.name(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    fn read_global(&self, global: &DeviceGlobal) -> DeviceResult<u32> {
        self.readbacks.fetch_add(1, Ordering::Relaxed);
        Ok(global.value())
    }

    fn stats(&self) -> DeviceStats {
        DeviceStats {
            launches: self.launches.load(Ordering::Relaxed),
            readbacks: self.readbacks.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for CpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuDevice")
            .field("name", &self.name)
            .field("limits", &self.limits)
            .field("stats", &self.stats())
            .finish()
    }
}
