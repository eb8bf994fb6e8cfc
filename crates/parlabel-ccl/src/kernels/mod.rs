//! Labeling kernels
//!
//! Label encoding shared by every kernel: `0` is background, and a
//! foreground pixel holds `root + 1`, where `root` is the linear index of
//! the pixel it currently points at. A pixel `i` is a root when
//! `label[i] == i + 1`. Labels only ever decrease, and a label never points
//! above its own pixel, so every chain `l -> label[l - 1]` ends at a root.
//!
//! Launch shapes:
//!
//! | kernel | launch |
//! |---|---|
//! | [`InitializeKernel`] | linear |
//! | [`ScanKernel`] | tiled |
//! | [`AnalysisKernel`] | linear |
//! | [`PartialSumKernel`] | linear |
//! | [`BlockSumKernel`] | single block |
//! | [`FullSumKernel`] | linear |
//! | [`FinalizeKernel`] | linear |

mod analysis;
mod finalize;
mod initialize;
mod prefix_sum;
mod scan;

pub use analysis::AnalysisKernel;
pub use finalize::FinalizeKernel;
pub use initialize::InitializeKernel;
pub use prefix_sum::{BlockSumKernel, FullSumKernel, PartialSumKernel};
pub use scan::ScanKernel;

use parlabel_device::DeviceSlice;

/// Whether pixel `i` is the root of its chain
#[inline]
pub(crate) fn is_root(labels: &DeviceSlice<'_, u32>, i: usize) -> bool {
    labels.load(i) == i as u32 + 1
}

/// Exclusive scan of per-thread totals in place, returning the block total
#[inline]
pub(crate) fn exclusive_scan(sums: &mut [u32]) -> u32 {
    let mut acc = 0u32;
    for s in sums.iter_mut() {
        let v = *s;
        *s = acc;
        acc += v;
    }
    acc
}
