//! Device driver regression test
//!
//! Exercises `bwlabel` directly on caller-owned device buffers: argument
//! validation, the converged fixpoint, grid folding and clamped tiled
//! grids under lowered grid limits.

use parlabel_ccl::kernels::{AnalysisKernel, ScanKernel};
use parlabel_ccl::{
    Connectivity, LabelBuffers, LabelConfig, LabelError, bwlabel, label_sequential, label_with,
    label_with_report,
};
use parlabel_core::Mask;
use parlabel_device::{
    CpuDevice, Device, DeviceBuffer, DeviceGlobal, DeviceLimits, Dim3, GridPartition,
};
use parlabel_test::{RegParams, masks};

struct Owned {
    out_final: DeviceBuffer<f64>,
    out_count: DeviceBuffer<f64>,
    labels: DeviceBuffer<u32>,
    packing: DeviceBuffer<u32>,
    mask: DeviceBuffer<bool>,
}

impl Owned {
    fn new(device: &CpuDevice, mask: &Mask<bool>) -> Self {
        let numel = mask.len();
        Self {
            out_final: device.alloc(numel).expect("alloc out_final"),
            out_count: device.alloc(1).expect("alloc out_count"),
            labels: device.alloc(numel).expect("alloc labels"),
            packing: device.alloc(numel).expect("alloc packing"),
            mask: device.upload(mask.data()).expect("upload mask"),
        }
    }

    fn buffers(&self) -> LabelBuffers<'_, bool> {
        LabelBuffers {
            out_final: &self.out_final,
            out_count: &self.out_count,
            labels: &self.labels,
            packing: &self.packing,
            mask: &self.mask,
        }
    }
}

#[test]
fn driver_arguments_reg() {
    let mut rp = RegParams::new("driver_arguments");
    let device = CpuDevice::with_threads(2).expect("create device");
    let mask = masks::random_mask(12, 10, 0.5, 3).expect("random mask");
    let owned = Owned::new(&device, &mask);
    let config = LabelConfig::default();

    // --- Connectivity must be 4 or 8 ---
    for nhood in [0, 1, 6, 9, 26] {
        let err = bwlabel(&device, &owned.buffers(), nhood, 12, 10, &config);
        rp.check(
            matches!(err, Err(LabelError::InvalidArgument(_))),
            &format!("nhood {} rejected", nhood),
        );
    }
    rp.check(Connectivity::try_from(4).is_ok(), "4 accepted");
    rp.check(Connectivity::try_from(8).is_ok(), "8 accepted");

    // --- Buffers must match the image ---
    let err = bwlabel(&device, &owned.buffers(), 4, 12, 11, &config);
    rp.check(
        matches!(err, Err(LabelError::BufferSize { .. })),
        "wrong extent rejected",
    );
    let short: DeviceBuffer<u32> = device.alloc(119).expect("alloc");
    let buffers = LabelBuffers {
        packing: &short,
        ..owned.buffers()
    };
    let err = bwlabel(&device, &buffers, 4, 12, 10, &config);
    rp.check(
        matches!(err, Err(LabelError::BufferSize { name: "packing", .. })),
        "short packing rejected",
    );
    let wide: DeviceBuffer<f64> = device.alloc(2).expect("alloc");
    let buffers = LabelBuffers {
        out_count: &wide,
        ..owned.buffers()
    };
    let err = bwlabel(&device, &buffers, 4, 12, 10, &config);
    rp.check(
        matches!(err, Err(LabelError::BufferSize { name: "out_count", .. })),
        "two-element out_count rejected",
    );

    // --- Degenerate launch tuning ---
    for bad in [
        LabelConfig::default().with_work_per_thread(0),
        LabelConfig::default().with_threads_per_block(0),
        LabelConfig::default().with_tile(0, 8),
        LabelConfig::default().with_flag_readback_interval(0),
    ] {
        let err = bwlabel(&device, &owned.buffers(), 4, 12, 10, &bad);
        rp.check(
            matches!(err, Err(LabelError::InvalidArgument(_))),
            "zero config field rejected",
        );
    }

    // --- Block larger than the device allows ---
    let small = CpuDevice::with_threads(1)
        .expect("create device")
        .with_limits(DeviceLimits::default().with_max_threads_per_block(64));
    let err = label_with(&small, &mask, Connectivity::Four, &LabelConfig::default());
    rp.check(
        matches!(err, Err(LabelError::Device(_))),
        "oversized block rejected by device",
    );

    // --- A valid call still works on the same buffers afterwards ---
    let report = bwlabel(&device, &owned.buffers(), 8, 12, 10, &config).expect("bwlabel");
    let expected = label_sequential(&mask, Connectivity::Eight).expect("sequential");
    rp.compare_values(
        expected.num_components() as f64,
        report.num_components as f64,
        0.0,
    );
    rp.compare_values(
        report.num_components as f64,
        owned.out_count.to_host()[0],
        0.0,
    );
    rp.compare_labels(expected.labels(), &owned.out_final.to_host());

    assert!(rp.cleanup());
}

#[test]
fn driver_fixpoint_reg() {
    let mut rp = RegParams::new("driver_fixpoint");
    let device = CpuDevice::with_threads(4).expect("create device");

    for &(conn, seed) in &[(Connectivity::Four, 5u64), (Connectivity::Eight, 6)] {
        let (nx, ny) = (50, 40);
        let mask = masks::random_mask(nx, ny, 0.55, seed).expect("random mask");
        let owned = Owned::new(&device, &mask);
        bwlabel(
            &device,
            &owned.buffers(),
            conn.neighborhood(),
            nx,
            ny,
            &LabelConfig::default(),
        )
        .expect("bwlabel");

        // Every foreground pixel points at a root
        let converged = owned.labels.to_host();
        let resolved = converged
            .iter()
            .all(|&l| l == 0 || converged[l as usize - 1] == l);
        rp.check(resolved, "labels point directly at roots");

        // Roots count matches K
        let roots = converged
            .iter()
            .enumerate()
            .filter(|&(i, &l)| l == i as u32 + 1)
            .count();
        rp.compare_values(
            owned.out_count.to_host()[0],
            roots as f64,
            0.0,
        );

        // One more pass changes nothing and leaves the flag down
        let partition = GridPartition::with_defaults(nx, ny, device.limits());
        let modified = DeviceGlobal::new("d_modified");
        device
            .launch(
                &partition.tiled,
                &ScanKernel {
                    labels: owned.labels.slice(),
                    nx,
                    ny,
                    connectivity: conn,
                    modified: &modified,
                },
            )
            .expect("scan");
        rp.compare_values(0.0, modified.value() as f64, 0.0);
        device
            .launch(
                &partition.linear,
                &AnalysisKernel {
                    labels: owned.labels.slice(),
                    layout: partition.layout,
                    reset: None,
                },
            )
            .expect("analysis");
        rp.check(
            owned.labels.to_host() == converged,
            "converged labels are a fixpoint",
        );
    }

    assert!(rp.cleanup());
}

#[test]
fn driver_folding_reg() {
    let mut rp = RegParams::new("driver_folding");

    // Grid x capped at 2 blocks forces the linear launch to fold
    let limits = DeviceLimits::default().with_max_grid_dim(Dim3::new(2, 65535, 65535));
    let device = CpuDevice::with_threads(4)
        .expect("create device")
        .with_limits(limits);
    let config = LabelConfig::default()
        .with_work_per_thread(2)
        .with_threads_per_block(16)
        .with_tile(32, 8);

    // --- Tiled pattern with a known count ---
    let tile = Mask::from_ascii(
        "
        .....
        .##..
        .#...
        ...#.
        .....
        ",
    )
    .expect("tile");
    let pattern = tile.tile(12, 9).expect("tile pattern");
    eprintln!("  pattern {}x{}", pattern.width(), pattern.height());
    for conn in [Connectivity::Four, Connectivity::Eight] {
        let (labeled, report) =
            label_with_report(&device, &pattern, conn, &config).expect("label pattern");
        rp.check(report.folded, "linear grid folded");
        rp.compare_values(216.0, labeled.num_components() as f64, 0.0);
        let expected = label_sequential(&pattern, conn).expect("sequential");
        rp.compare_labels(expected.labels(), labeled.labels());
    }

    // --- Random masks, block count not a multiple of the fold ---
    for (k, (w, h)) in [(41, 13), (60, 30), (33, 17)].into_iter().enumerate() {
        let mask = masks::random_mask(w, h, 0.5, 77 + k as u64).expect("random mask");
        for conn in [Connectivity::Four, Connectivity::Eight] {
            let (labeled, report) =
                label_with_report(&device, &mask, conn, &config).expect("label");
            rp.check(report.folded, "linear grid folded");
            let expected = label_sequential(&mask, conn).expect("sequential");
            rp.compare_labels(expected.labels(), labeled.labels());
        }
    }

    // --- Same images unfolded on an ordinary device give identical labels ---
    let plain = CpuDevice::with_threads(4).expect("create device");
    for conn in [Connectivity::Four, Connectivity::Eight] {
        let (unfolded, report) =
            label_with_report(&plain, &pattern, conn, &LabelConfig::default()).expect("label");
        rp.check(!report.folded, "default limits do not fold a small image");
        let (folded, report) =
            label_with_report(&device, &pattern, conn, &config).expect("label");
        rp.check(report.folded, "linear grid folded");
        rp.compare_values(
            unfolded.num_components() as f64,
            folded.num_components() as f64,
            0.0,
        );
        rp.compare_labels(unfolded.labels(), folded.labels());
    }

    assert!(rp.cleanup());
}

#[test]
fn driver_clamped_tiles_reg() {
    let mut rp = RegParams::new("driver_clamped_tiles");
    let config = LabelConfig::default();

    // --- Tall image: more tile rows than the grid allows along y ---
    let tall_limits = DeviceLimits::default().with_max_grid_dim(Dim3::new(65535, 16, 65535));
    let tall_device = CpuDevice::with_threads(4)
        .expect("create device")
        .with_limits(tall_limits);
    let stripes = Mask::from_fn(1, 3000, |_, y| y % 3 != 2).expect("stripes");
    let (labeled, report) = label_with_report(&tall_device, &stripes, Connectivity::Four, &config)
        .expect("label tall stripes");
    rp.compare_values(1000.0, labeled.num_components() as f64, 0.0);
    rp.compare_values(1000.0, report.num_components as f64, 0.0);
    rp.compare_values(1000.0, labeled.get(0, 2997).unwrap_or(0) as f64, 0.0);

    for (k, (w, h)) in [(3, 2000), (40, 700)].into_iter().enumerate() {
        let mask = masks::random_mask(w, h, 0.55, 300 + k as u64).expect("random mask");
        for conn in [Connectivity::Four, Connectivity::Eight] {
            let labeled =
                label_with(&tall_device, &mask, conn, &config).expect("label tall");
            let expected = label_sequential(&mask, conn).expect("sequential");
            rp.compare_labels(expected.labels(), labeled.labels());
        }
    }

    // A component that runs the full height crosses every stride boundary
    let snake = masks::serpentine(5, 1999).expect("serpentine");
    let labeled =
        label_with(&tall_device, &snake, Connectivity::Four, &config).expect("label snake");
    rp.compare_values(1.0, labeled.num_components() as f64, 0.0);

    // --- Wide image: more tile columns than the grid allows along x ---
    let wide_limits = DeviceLimits::default().with_max_grid_dim(Dim3::new(4, 65535, 65535));
    let wide_device = CpuDevice::with_threads(4)
        .expect("create device")
        .with_limits(wide_limits);
    let mask = masks::random_mask(2000, 3, 0.55, 400).expect("random mask");
    for conn in [Connectivity::Four, Connectivity::Eight] {
        let labeled = label_with(&wide_device, &mask, conn, &config).expect("label wide");
        let expected = label_sequential(&mask, conn).expect("sequential");
        rp.compare_labels(expected.labels(), labeled.labels());
    }

    assert!(rp.cleanup());
}
