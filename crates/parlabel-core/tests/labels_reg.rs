//! Label image regression test
//!
//! Validation and statistics of labeled images built from masks.

use parlabel_core::{Bounds, Error, LabelImage, Mask};
use parlabel_test::{RegParams, masks};

#[test]
fn labels_reg() {
    let mut rp = RegParams::new("labels");

    // --- Validation ---
    rp.check(
        matches!(
            LabelImage::new(2, 2, vec![0.0; 3], 0),
            Err(Error::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ),
        "short label buffer rejected",
    );
    rp.check(
        LabelImage::new(2, 1, vec![1.0, 3.0], 2).is_err(),
        "label above K rejected",
    );
    rp.check(
        LabelImage::new(2, 1, vec![1.0, 0.5], 1).is_err(),
        "fractional label rejected",
    );
    rp.check(
        LabelImage::new(0, 0, vec![], 0).is_ok(),
        "empty image accepted",
    );

    // --- Statistics ---
    // 1 1 0 2 2
    // 1 0 0 0 2
    // 0 0 3 0 0
    let image = LabelImage::new(
        5,
        3,
        vec![
            1.0, 1.0, 0.0, 2.0, 2.0, //
            1.0, 0.0, 0.0, 0.0, 2.0, //
            0.0, 0.0, 3.0, 0.0, 0.0,
        ],
        3,
    )
    .expect("label image");
    rp.check(image.component_sizes() == vec![3, 3, 1], "component sizes");
    let bounds = image.component_bounds();
    rp.check(
        bounds[1] == Bounds { x: 3, y: 0, w: 2, h: 2 },
        "bounds of component 2",
    );
    let stats = image.component_stats();
    rp.compare_values(3.0, stats.len() as f64, 0.0);
    rp.compare_values(1.0 / 3.0, stats[0].centroid_x, 1e-12);
    rp.compare_values(1.0 / 3.0, stats[0].centroid_y, 1e-12);
    rp.compare_values(2.0, stats[2].centroid_x, 0.0);
    rp.compare_values(2.0, stats[2].centroid_y, 0.0);

    // --- Masks ---
    let tile = masks::checkerboard(2, 2, 1).expect("checkerboard");
    let tiled = tile.tile(3, 2).expect("tile");
    rp.compare_values(6.0, tiled.width() as f64, 0.0);
    rp.compare_values(4.0, tiled.height() as f64, 0.0);
    rp.compare_values(12.0, tiled.count_foreground() as f64, 0.0);
    rp.check(
        tiled == masks::checkerboard(6, 4, 1).expect("checkerboard"),
        "tiling a 2x2 checkerboard gives a larger checkerboard",
    );

    let numeric = Mask::from_vec(3, 1, vec![0u16, 5, 0]).expect("mask");
    rp.check(
        numeric.to_binary().data() == [false, true, false],
        "numeric mask binarized",
    );

    assert!(rp.cleanup());
}
