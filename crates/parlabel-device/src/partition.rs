//! Grid partitioning
//!
//! Computes launch geometry for an `nx` x `ny` image:
//!
//! - a **linear** launch where every thread owns `work` elements and every
//!   block owns `work * threads` consecutive elements. The block count is
//!   folded into a second grid dimension whenever it would exceed the
//!   per-dimension grid limit.
//! - a **tiled** launch with one thread per pixel, used by the
//!   neighbourhood-scan kernels.
//!
//! Folding can launch a few more blocks than needed
//! (`blocks_x * blocks_y >= num_blocks`). Their element ranges start at or
//! beyond `numel`, so [`LinearLayout`] hands them empty ranges.

use crate::dim::{DeviceLimits, Dim3, divup};
use crate::error::{DeviceError, DeviceResult};
use std::ops::Range;

/// Elements processed by each thread of a linear launch
pub const DEFAULT_WORK_PER_THREAD: u32 = 16;

/// Threads per block of a linear launch
pub const DEFAULT_THREADS_PER_BLOCK: u32 = 256;

/// Block shape of a tiled launch
pub const DEFAULT_TILE: (u32, u32) = (32, 8);

/// Grid and block dimensions of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    pub grid: Dim3,
    pub block: Dim3,
}

impl LaunchConfig {
    pub const fn new(grid: Dim3, block: Dim3) -> Self {
        Self { grid, block }
    }

    /// Total blocks launched
    #[inline]
    pub fn num_blocks(&self) -> u64 {
        self.grid.volume()
    }

    /// Threads in each block
    #[inline]
    pub fn threads_per_block(&self) -> u64 {
        self.block.volume()
    }

    /// Check the geometry against device limits
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidLaunch`] for empty grids or blocks,
    /// blocks with too many threads, or grids exceeding a dimension limit.
    pub fn validate(&self, kernel: &'static str, limits: &DeviceLimits) -> DeviceResult<()> {
        let invalid = |reason: String| DeviceError::InvalidLaunch { kernel, reason };

        if self.grid.volume() == 0 {
            return Err(invalid(format!("empty grid {}", self.grid)));
        }
        if self.block.volume() == 0 {
            return Err(invalid(format!("empty block {}", self.block)));
        }
        if self.block.volume() > limits.max_threads_per_block as u64 {
            return Err(invalid(format!(
                "block {} has {} threads, limit is {}",
                self.block,
                self.block.volume(),
                limits.max_threads_per_block
            )));
        }
        let max = limits.max_grid_dim;
        if self.grid.x > max.x || self.grid.y > max.y || self.grid.z > max.z {
            return Err(invalid(format!(
                "grid {} exceeds limit {}",
                self.grid, max
            )));
        }
        Ok(())
    }
}

/// Element ownership for linear launches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearLayout {
    pub numel: usize,
    pub work: u32,
    pub threads: u32,
}

impl LinearLayout {
    /// Elements owned by one block
    #[inline]
    pub fn block_span(&self) -> usize {
        self.work as usize * self.threads as usize
    }

    /// Range of elements owned by block `block`
    pub fn block_range(&self, block: usize) -> Range<usize> {
        let start = block.saturating_mul(self.block_span()).min(self.numel);
        let end = start.saturating_add(self.block_span()).min(self.numel);
        start..end
    }

    /// Contiguous chunk owned by `thread` of `block`
    ///
    /// Used by the scan kernels, where each thread accumulates a running sum.
    pub fn thread_chunk(&self, block: usize, thread: usize) -> Range<usize> {
        let block_range = self.block_range(block);
        let start = block_range
            .start
            .saturating_add(thread * self.work as usize)
            .min(block_range.end);
        let end = start.saturating_add(self.work as usize).min(block_range.end);
        start..end
    }

    /// Coalesced elements owned by `thread` of `block`
    ///
    /// Thread `t` visits `base + k * threads + t` for `k < work`, so
    /// neighbouring threads touch neighbouring elements on every step.
    pub fn thread_strided(&self, block: usize, thread: usize) -> impl Iterator<Item = usize> {
        let range = self.block_range(block);
        let stride = self.threads as usize;
        (range.start + thread..range.end).step_by(stride.max(1))
    }
}

/// Launch geometry for one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPartition {
    /// Number of pixels
    pub numel: usize,
    /// Blocks needed by a linear launch before folding
    pub num_blocks: u32,
    /// Folded linear launch
    pub linear: LaunchConfig,
    /// One thread per pixel, 2D tiles
    pub tiled: LaunchConfig,
    /// Element ownership of the linear launch
    pub layout: LinearLayout,
}

impl GridPartition {
    /// Compute launch geometry
    ///
    /// # Arguments
    ///
    /// * `nx`, `ny` - Image width and height
    /// * `work` - Elements per thread in linear launches
    /// * `threads` - Threads per block in linear launches
    /// * `tile` - Block shape of tiled launches
    /// * `max_grid` - Per-dimension grid limits of the device
    ///
    /// The linear grid folds into y once its block count exceeds
    /// `max_grid.x`. The tiled grid is clamped to `max_grid` in x and y;
    /// kernels on it grid-stride over the pixels the clamped grid does not
    /// reach (see [`ThreadCtx::stride_x`](crate::ThreadCtx::stride_x)).
    pub fn new(nx: u32, ny: u32, work: u32, threads: u32, tile: (u32, u32), max_grid: Dim3) -> Self {
        let numel = nx as u64 * ny as u64;
        let num_blocks = divup(numel, work as u64 * threads as u64);
        let blocks_y = divup(num_blocks, max_grid.x as u64).max(1);
        let blocks_x = divup(num_blocks, blocks_y);

        let linear = LaunchConfig::new(
            Dim3::xy(blocks_x as u32, blocks_y as u32),
            Dim3::x(threads),
        );
        let tiled = LaunchConfig::new(
            Dim3::xy(
                divup(nx as u64, tile.0 as u64).min(max_grid.x as u64) as u32,
                divup(ny as u64, tile.1 as u64).min(max_grid.y as u64) as u32,
            ),
            Dim3::xy(tile.0, tile.1),
        );

        Self {
            numel: numel as usize,
            num_blocks: num_blocks as u32,
            linear,
            tiled,
            layout: LinearLayout {
                numel: numel as usize,
                work,
                threads,
            },
        }
    }

    /// Geometry with default work, block and tile sizes
    pub fn with_defaults(nx: u32, ny: u32, limits: &DeviceLimits) -> Self {
        Self::new(
            nx,
            ny,
            DEFAULT_WORK_PER_THREAD,
            DEFAULT_THREADS_PER_BLOCK,
            DEFAULT_TILE,
            limits.max_grid_dim,
        )
    }

    /// Whether the linear launch was folded into a second grid dimension
    #[inline]
    pub fn is_folded(&self) -> bool {
        self.linear.grid.y > 1
    }

    /// Single-block launch used for the block-total scan
    pub fn single_block(&self) -> LaunchConfig {
        LaunchConfig::new(Dim3::x(1), Dim3::x(self.layout.threads))
    }
}
