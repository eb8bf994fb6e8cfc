use crate::connectivity::Connectivity;
use parlabel_device::{BlockCtx, DeviceGlobal, DeviceSlice, Kernel};

/// Local propagation: pull the smallest neighbouring label
///
/// For each foreground pixel, find the minimum label `m` among its
/// foreground neighbours. If `m` is strictly smaller than the pixel's label
/// `l`, lower both the pixel and its current root (`l - 1`) to `m` and raise
/// the changed-flag. Ties leave everything untouched, so a converged image
/// is a fixpoint.
pub struct ScanKernel<'a> {
    pub labels: DeviceSlice<'a, u32>,
    pub nx: u32,
    pub ny: u32,
    pub connectivity: Connectivity,
    pub modified: &'a DeviceGlobal,
}

impl ScanKernel<'_> {
    #[inline]
    fn visit(&self, x: u32, y: u32) {
        let i = y as usize * self.nx as usize + x as usize;
        let l = self.labels.load(i);
        if l == 0 {
            return;
        }

        let m = self.neighbour_min(x, y, l);
        if m < l {
            self.labels.fetch_min(i, m);
            self.labels.fetch_min(l as usize - 1, m);
            self.modified.raise(1);
        }
    }

    #[inline]
    fn neighbour_min(&self, x: u32, y: u32, mut m: u32) -> u32 {
        for &(dx, dy) in self.connectivity.offsets() {
            let (Some(xn), Some(yn)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if xn >= self.nx || yn >= self.ny {
                continue;
            }
            let ln = self.labels.load(yn as usize * self.nx as usize + xn as usize);
            if ln != 0 && ln < m {
                m = ln;
            }
        }
        m
    }
}

impl Kernel for ScanKernel<'_> {
    fn name(&self) -> &'static str {
        match self.connectivity {
            Connectivity::Four => "scanning<4>",
            Connectivity::Eight => "scanning<8>",
        }
    }

    fn run_block(&self, block: &BlockCtx) {
        for t in block.threads() {
            // grid-stride: the tiled grid may be clamped below the image size
            let (sx, sy) = (t.stride_x() as usize, t.stride_y() as usize);
            for y in (t.global_y() as usize..self.ny as usize).step_by(sy) {
                for x in (t.global_x() as usize..self.nx as usize).step_by(sx) {
                    self.visit(x as u32, y as u32);
                }
            }
        }
    }
}
