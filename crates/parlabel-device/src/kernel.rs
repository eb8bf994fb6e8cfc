//! Kernels and their execution contexts
//!
//! A kernel is dispatched over a grid of blocks. The device hands each block
//! to [`Kernel::run_block`] exactly once; inside, the kernel walks the
//! block's threads with [`BlockCtx::threads`]. Threads of one block run on
//! the same worker in thread-index order, so block-shared scratch (the
//! equivalent of shared memory) is an ordinary local array and a block-wide
//! barrier is simply the end of a loop over the threads.
//!
//! Blocks of one launch run concurrently and in no particular order. They
//! communicate only through device memory atomics.

use crate::dim::Dim3;

/// Per-block execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCtx {
    pub block_idx: Dim3,
    pub grid_dim: Dim3,
    pub block_dim: Dim3,
}

impl BlockCtx {
    /// Context for the `linear`-th block of a grid (x fastest)
    pub fn from_linear(linear: u64, grid_dim: Dim3, block_dim: Dim3) -> Self {
        let gx = grid_dim.x.max(1) as u64;
        let gy = grid_dim.y.max(1) as u64;
        let block_idx = Dim3::new(
            (linear % gx) as u32,
            ((linear / gx) % gy) as u32,
            (linear / (gx * gy)) as u32,
        );
        Self {
            block_idx,
            grid_dim,
            block_dim,
        }
    }

    /// Linear block index across a folded grid
    #[inline]
    pub fn linear_block(&self) -> usize {
        let g = self.grid_dim;
        let b = self.block_idx;
        (b.z as usize * g.y as usize + b.y as usize) * g.x as usize + b.x as usize
    }

    /// Threads per block
    #[inline]
    pub fn num_threads(&self) -> usize {
        self.block_dim.volume() as usize
    }

    /// Iterate the block's threads in thread-index order (x fastest)
    pub fn threads(&self) -> impl Iterator<Item = ThreadCtx> + '_ {
        let bd = self.block_dim;
        (0..bd.z).flat_map(move |z| {
            (0..bd.y).flat_map(move |y| {
                (0..bd.x).map(move |x| ThreadCtx {
                    block_idx: self.block_idx,
                    thread_idx: Dim3::new(x, y, z),
                    grid_dim: self.grid_dim,
                    block_dim: bd,
                })
            })
        })
    }
}

/// Per-thread execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadCtx {
    pub block_idx: Dim3,
    pub thread_idx: Dim3,
    pub grid_dim: Dim3,
    pub block_dim: Dim3,
}

impl ThreadCtx {
    /// Global x coordinate in a 2D launch
    #[inline]
    pub fn global_x(&self) -> u32 {
        self.block_idx.x * self.block_dim.x + self.thread_idx.x
    }

    /// Global y coordinate in a 2D launch
    #[inline]
    pub fn global_y(&self) -> u32 {
        self.block_idx.y * self.block_dim.y + self.thread_idx.y
    }

    /// Distance between the x coordinates a thread visits in a grid-stride loop
    #[inline]
    pub fn stride_x(&self) -> u32 {
        self.grid_dim.x.saturating_mul(self.block_dim.x).max(1)
    }

    /// Distance between the y coordinates a thread visits in a grid-stride loop
    #[inline]
    pub fn stride_y(&self) -> u32 {
        self.grid_dim.y.saturating_mul(self.block_dim.y).max(1)
    }

    /// Thread index within its block
    #[inline]
    pub fn linear_thread(&self) -> usize {
        let d = self.block_dim;
        let t = self.thread_idx;
        (t.z as usize * d.y as usize + t.y as usize) * d.x as usize + t.x as usize
    }

    /// Linear block index across a folded grid
    #[inline]
    pub fn linear_block(&self) -> usize {
        let g = self.grid_dim;
        let b = self.block_idx;
        (b.z as usize * g.y as usize + b.y as usize) * g.x as usize + b.x as usize
    }

    /// Whether this is thread 0 of block 0
    #[inline]
    pub fn is_first(&self) -> bool {
        self.linear_block() == 0 && self.linear_thread() == 0
    }
}

/// A data-parallel kernel
pub trait Kernel: Sync {
    /// Kernel name used in logs and errors
    fn name(&self) -> &'static str;

    /// Execute every thread of one block
    fn run_block(&self, block: &BlockCtx);
}
