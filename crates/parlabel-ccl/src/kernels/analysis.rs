use parlabel_device::{BlockCtx, DeviceGlobal, DeviceSlice, Kernel, LinearLayout};

/// Root resolution: point every pixel straight at the root of its chain
///
/// When `reset` is given, global thread 0 also clears the changed-flag. The
/// flag is only ever raised by the scan kernel, so clearing it here cannot
/// lose an update.
pub struct AnalysisKernel<'a> {
    pub labels: DeviceSlice<'a, u32>,
    pub layout: LinearLayout,
    pub reset: Option<&'a DeviceGlobal>,
}

impl AnalysisKernel<'_> {
    #[inline]
    fn resolve(&self, mut l: u32) -> u32 {
        loop {
            let next = self.labels.load(l as usize - 1);
            if next == l {
                return l;
            }
            l = next;
        }
    }
}

impl Kernel for AnalysisKernel<'_> {
    fn name(&self) -> &'static str {
        "analysis"
    }

    fn run_block(&self, block: &BlockCtx) {
        let b = block.linear_block();
        for t in block.threads() {
            if t.is_first() {
                if let Some(flag) = self.reset {
                    flag.clear();
                }
            }
            for i in self.layout.thread_strided(b, t.linear_thread()) {
                let l = self.labels.load(i);
                if l == 0 {
                    continue;
                }
                let root = self.resolve(l);
                if root != l {
                    self.labels.store(i, root);
                }
            }
        }
    }
}
