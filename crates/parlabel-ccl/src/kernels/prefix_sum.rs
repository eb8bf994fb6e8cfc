//! Three-phase inclusive scan over the root indicator
//!
//! Phase A writes per-block running sums into `packing` and each block's
//! total into `blocksums[b + 1]` (`blocksums[0] = 0`). Phase B scans
//! `blocksums` in place with a single block, turning entry `b` into the
//! offset of block `b`. Phase C adds that offset to every element of the
//! block. Afterwards `packing[r]` is the 1-based rank of root `r` among all
//! roots, and `packing[numel - 1]` is the component count.

use super::{exclusive_scan, is_root};
use parlabel_device::{BlockCtx, DeviceSlice, Kernel, LinearLayout};

/// Phase A: running root count within each block
pub struct PartialSumKernel<'a> {
    pub packing: DeviceSlice<'a, u32>,
    pub labels: DeviceSlice<'a, u32>,
    pub blocksums: DeviceSlice<'a, u32>,
    pub layout: LinearLayout,
}

impl Kernel for PartialSumKernel<'_> {
    fn name(&self) -> &'static str {
        "partial_sum<true>"
    }

    fn run_block(&self, block: &BlockCtx) {
        let b = block.linear_block();
        if b == 0 {
            self.blocksums.store(0, 0);
        }
        if self.layout.block_range(b).is_empty() {
            return;
        }

        // shared memory: one slot per thread
        let mut sums = vec![0u32; block.num_threads()];
        for t in block.threads() {
            let chunk = self.layout.thread_chunk(b, t.linear_thread());
            sums[t.linear_thread()] = chunk.filter(|&i| is_root(&self.labels, i)).count() as u32;
        }

        let total = exclusive_scan(&mut sums);

        for t in block.threads() {
            let mut running = sums[t.linear_thread()];
            for i in self.layout.thread_chunk(b, t.linear_thread()) {
                if is_root(&self.labels, i) {
                    running += 1;
                }
                self.packing.store(i, running);
            }
        }

        self.blocksums.store(b + 1, total);
    }
}

/// Phase B: inclusive scan of the block totals, single block
pub struct BlockSumKernel<'a> {
    pub sums: DeviceSlice<'a, u32>,
    /// Entries to scan (`num_blocks + 1`)
    pub count: usize,
    /// Entries per thread
    pub per_thread: usize,
}

impl Kernel for BlockSumKernel<'_> {
    fn name(&self) -> &'static str {
        "partial_sum<false>"
    }

    fn run_block(&self, block: &BlockCtx) {
        if block.linear_block() != 0 {
            return;
        }
        let chunk = |t: usize| {
            let start = (t * self.per_thread).min(self.count);
            start..(start + self.per_thread).min(self.count)
        };

        let mut partials = vec![0u32; block.num_threads()];
        for t in block.threads() {
            let t = t.linear_thread();
            partials[t] = chunk(t).map(|i| self.sums.load(i)).sum();
        }

        exclusive_scan(&mut partials);

        for t in block.threads() {
            let t = t.linear_thread();
            let mut running = partials[t];
            for i in chunk(t) {
                running += self.sums.load(i);
                self.sums.store(i, running);
            }
        }
    }
}

/// Phase C: add each block's offset to its running sums
pub struct FullSumKernel<'a> {
    pub packing: DeviceSlice<'a, u32>,
    pub blocksums: DeviceSlice<'a, u32>,
    pub layout: LinearLayout,
}

impl Kernel for FullSumKernel<'_> {
    fn name(&self) -> &'static str {
        "full_sum"
    }

    fn run_block(&self, block: &BlockCtx) {
        let b = block.linear_block();
        if self.layout.block_range(b).is_empty() {
            return;
        }
        let offset = self.blocksums.load(b);
        if offset == 0 {
            return;
        }
        for t in block.threads() {
            for i in self.layout.thread_strided(b, t.linear_thread()) {
                self.packing.store(i, self.packing.load(i) + offset);
            }
        }
    }
}
