//! Device-level labeling driver
//!
//! [`bwlabel`] runs the whole pipeline on caller-provided device buffers:
//!
//! 1. partition the image into linear and tiled launches
//! 2. seed labels
//! 3. alternate propagation and root resolution until the changed-flag
//!    reads zero
//! 4. compact the surviving roots to `1..=K` with a three-phase scan
//! 5. write dense labels and `K`
//!
//! The per-block partial sums of step 4 borrow the first words of
//! `out_final`, which is not written until step 5.

use crate::config::LabelConfig;
use crate::connectivity::Connectivity;
use crate::error::{LabelError, LabelResult};
use crate::kernels::{
    AnalysisKernel, BlockSumKernel, FinalizeKernel, FullSumKernel, InitializeKernel,
    PartialSumKernel, ScanKernel,
};
use parlabel_core::Foreground;
use parlabel_device::{
    Device, DeviceBuffer, DeviceGlobal, DeviceScalar, GridPartition, Kernel, LaunchConfig, divup,
};

/// Buffers handed to [`bwlabel`]
///
/// All of them must be sized `nx * ny` except `out_count`, which holds one
/// element. The scratch buffers (`labels`, `packing`) and the outputs are
/// exclusively owned by one invocation while it runs.
#[derive(Debug, Clone, Copy)]
pub struct LabelBuffers<'a, T> {
    /// Dense 1-based component id per pixel, 0 for background
    pub out_final: &'a DeviceBuffer<f64>,
    /// Component count `K`
    pub out_count: &'a DeviceBuffer<f64>,
    /// Label scratch
    pub labels: &'a DeviceBuffer<u32>,
    /// Packed-label scratch
    pub packing: &'a DeviceBuffer<u32>,
    /// Foreground mask
    pub mask: &'a DeviceBuffer<T>,
}

/// Summary of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelReport {
    /// Propagation passes run
    pub passes: u32,
    /// Changed-flag reads
    pub readbacks: u32,
    /// Kernel launches issued
    pub launches: u32,
    /// Whether the linear grid was folded into two dimensions
    pub folded: bool,
    /// Number of components `K`
    pub num_components: u32,
}

fn check_len(name: &'static str, actual: usize, expected: usize) -> LabelResult<()> {
    if actual != expected {
        return Err(LabelError::BufferSize {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

struct Launcher<'d, D> {
    device: &'d D,
    launches: u32,
}

impl<D: Device> Launcher<'_, D> {
    fn launch(&mut self, config: &LaunchConfig, kernel: &dyn Kernel) -> LabelResult<()> {
        self.device.launch(config, kernel)?;
        self.launches += 1;
        Ok(())
    }
}

/// Label the connected components of `mask`
///
/// # Arguments
///
/// * `device` - Device owning the buffers
/// * `buffers` - Outputs, scratch and input mask
/// * `nhood` - Connectivity, 4 or 8
/// * `nx`, `ny` - Image width and height
/// * `config` - Launch tuning
///
/// # Errors
///
/// - [`LabelError::InvalidArgument`] for a connectivity other than 4 or 8,
///   an invalid config, or an image too large for 32-bit labels
/// - [`LabelError::BufferSize`] if a buffer has the wrong extent
/// - [`LabelError::Device`] if a launch fails; outputs are then undefined
pub fn bwlabel<D, T>(
    device: &D,
    buffers: &LabelBuffers<'_, T>,
    nhood: u32,
    nx: u32,
    ny: u32,
    config: &LabelConfig,
) -> LabelResult<LabelReport>
where
    D: Device,
    T: Foreground + DeviceScalar,
{
    let connectivity = Connectivity::try_from(nhood)?;
    config.validate()?;

    let numel = nx as u64 * ny as u64;
    if numel > u32::MAX as u64 {
        return Err(LabelError::InvalidArgument(format!(
            "{}x{} image has more pixels than 32-bit labels can address",
            nx, ny
        )));
    }
    let numel = numel as usize;

    check_len("out_final", buffers.out_final.len(), numel)?;
    check_len("out_count", buffers.out_count.len(), 1)?;
    check_len("labels", buffers.labels.len(), numel)?;
    check_len("packing", buffers.packing.len(), numel)?;
    check_len("mask", buffers.mask.len(), numel)?;

    if numel == 0 {
        buffers.out_count.slice().store(0, 0.0);
        return Ok(LabelReport::default());
    }

    let partition = GridPartition::new(
        nx,
        ny,
        config.work_per_thread,
        config.threads_per_block,
        config.tile,
        device.limits().max_grid_dim,
    );
    let layout = partition.layout;
    log::debug!(
        "bwlabel {}x{} {} on {}: {} blocks, linear grid {}, tiled grid {}",
        nx,
        ny,
        connectivity,
        device.name(),
        partition.num_blocks,
        partition.linear.grid,
        partition.tiled.grid
    );

    let labels = buffers.labels.slice();
    let packing = buffers.packing.slice();
    let blocksums = buffers.out_final.alias::<u32>();
    let scan_len = partition.num_blocks as usize + 1;
    if blocksums.len() < scan_len {
        return Err(LabelError::BufferSize {
            name: "out_final (block sums)",
            expected: scan_len,
            actual: blocksums.len(),
        });
    }

    let mut launcher = Launcher {
        device,
        launches: 0,
    };

    launcher.launch(
        &partition.linear,
        &InitializeKernel {
            labels,
            mask: buffers.mask.slice(),
            layout,
        },
    )?;

    // nonzero if a pass lowered any label
    let modified = DeviceGlobal::new("d_modified");
    let scan = ScanKernel {
        labels,
        nx,
        ny,
        connectivity,
        modified: &modified,
    };
    let interval = config.flag_readback_interval;
    let mut passes = 0u32;
    let mut readbacks = 0u32;

    loop {
        passes += 1;
        launcher.launch(&partition.tiled, &scan)?;

        let check = passes % interval == 0;
        let changed = if check {
            readbacks += 1;
            device.read_global(&modified)?
        } else {
            1
        };

        launcher.launch(
            &partition.linear,
            &AnalysisKernel {
                labels,
                layout,
                reset: check.then_some(&modified),
            },
        )?;

        log::debug!("pass {}: modified={}", passes, changed);
        if changed == 0 {
            break;
        }
    }

    launcher.launch(
        &partition.linear,
        &PartialSumKernel {
            packing,
            labels,
            blocksums,
            layout,
        },
    )?;
    launcher.launch(
        &partition.single_block(),
        &BlockSumKernel {
            sums: blocksums,
            count: scan_len,
            per_thread: divup(scan_len as u64, config.threads_per_block as u64) as usize,
        },
    )?;
    launcher.launch(
        &partition.linear,
        &FullSumKernel {
            packing,
            blocksums,
            layout,
        },
    )?;
    launcher.launch(
        &partition.linear,
        &FinalizeKernel {
            out_final: buffers.out_final.slice(),
            out_count: buffers.out_count.slice(),
            labels,
            packing,
            layout,
        },
    )?;

    let num_components = buffers.out_count.slice().load(0) as u32;
    log::debug!(
        "bwlabel {}x{}: {} components after {} passes ({} launches)",
        nx,
        ny,
        num_components,
        passes,
        launcher.launches
    );

    Ok(LabelReport {
        passes,
        readbacks,
        launches: launcher.launches,
        folded: partition.is_folded(),
        num_components,
    })
}
