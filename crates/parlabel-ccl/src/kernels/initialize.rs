use parlabel_core::Foreground;
use parlabel_device::{BlockCtx, DeviceScalar, DeviceSlice, Kernel, LinearLayout};

/// Seed every foreground pixel with its own label, background with 0
pub struct InitializeKernel<'a, T> {
    pub labels: DeviceSlice<'a, u32>,
    pub mask: DeviceSlice<'a, T>,
    pub layout: LinearLayout,
}

impl<T: Foreground + DeviceScalar> Kernel for InitializeKernel<'_, T> {
    fn name(&self) -> &'static str {
        "initialize"
    }

    fn run_block(&self, block: &BlockCtx) {
        let b = block.linear_block();
        for t in block.threads() {
            for i in self.layout.thread_strided(b, t.linear_thread()) {
                let label = if self.mask.load(i).is_foreground() {
                    i as u32 + 1
                } else {
                    0
                };
                self.labels.store(i, label);
            }
        }
    }
}
