use parlabel_device::{BlockCtx, DeviceSlice, Kernel, LinearLayout};

/// Write dense labels and the component count to the output buffers
///
/// The only kernel that touches the externally visible outputs.
pub struct FinalizeKernel<'a> {
    pub out_final: DeviceSlice<'a, f64>,
    pub out_count: DeviceSlice<'a, f64>,
    pub labels: DeviceSlice<'a, u32>,
    pub packing: DeviceSlice<'a, u32>,
    pub layout: LinearLayout,
}

impl Kernel for FinalizeKernel<'_> {
    fn name(&self) -> &'static str {
        "finalize"
    }

    fn run_block(&self, block: &BlockCtx) {
        let b = block.linear_block();
        for t in block.threads() {
            if t.is_first() {
                let total = self.packing.load(self.layout.numel - 1);
                self.out_count.store(0, total as f64);
            }
            for i in self.layout.thread_strided(b, t.linear_thread()) {
                let l = self.labels.load(i);
                let dense = if l == 0 {
                    0.0
                } else {
                    self.packing.load(l as usize - 1) as f64
                };
                self.out_final.store(i, dense);
            }
        }
    }
}
