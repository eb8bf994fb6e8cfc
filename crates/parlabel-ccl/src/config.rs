//! Launch tuning for the labeling pipeline

use crate::error::{LabelError, LabelResult};
use parlabel_device::{DEFAULT_THREADS_PER_BLOCK, DEFAULT_TILE, DEFAULT_WORK_PER_THREAD};

/// Tuning knobs for [`bwlabel`](crate::bwlabel)
///
/// None of these change the labeling result, only how the work is spread
/// over the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelConfig {
    /// Elements handled by each thread of a linear launch
    pub work_per_thread: u32,
    /// Threads per block of a linear launch
    pub threads_per_block: u32,
    /// Block shape of the neighbourhood scan
    pub tile: (u32, u32),
    /// Read the changed-flag back every this many propagation passes
    ///
    /// Values above 1 trade up to `interval - 1` extra passes for fewer
    /// blocking device-to-host reads.
    pub flag_readback_interval: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            work_per_thread: DEFAULT_WORK_PER_THREAD,
            threads_per_block: DEFAULT_THREADS_PER_BLOCK,
            tile: DEFAULT_TILE,
            flag_readback_interval: 1,
        }
    }
}

impl LabelConfig {
    /// Set the per-thread work quantum
    pub fn with_work_per_thread(mut self, work: u32) -> Self {
        self.work_per_thread = work;
        self
    }

    /// Set the linear block size
    pub fn with_threads_per_block(mut self, threads: u32) -> Self {
        self.threads_per_block = threads;
        self
    }

    /// Set the scan tile shape
    pub fn with_tile(mut self, x: u32, y: u32) -> Self {
        self.tile = (x, y);
        self
    }

    /// Set the changed-flag readback interval
    pub fn with_flag_readback_interval(mut self, passes: u32) -> Self {
        self.flag_readback_interval = passes;
        self
    }

    /// Reject zero-sized quantities
    pub fn validate(&self) -> LabelResult<()> {
        let fields = [
            ("work_per_thread", self.work_per_thread),
            ("threads_per_block", self.threads_per_block),
            ("tile.x", self.tile.0),
            ("tile.y", self.tile.1),
            ("flag_readback_interval", self.flag_readback_interval),
        ];
        match fields.iter().find(|(_, v)| *v == 0) {
            Some((name, _)) => Err(LabelError::InvalidArgument(format!(
                "{} must be positive",
                name
            ))),
            None => Ok(()),
        }
    }
}
