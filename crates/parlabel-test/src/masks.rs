//! Synthetic masks for labeling tests
//!
//! Random masks are seeded so every run sees the same pixels.

use crate::error::{TestError, TestResult};
use parlabel_core::Mask;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random mask with each pixel foreground with probability `density`
pub fn random_mask(width: u32, height: u32, density: f64, seed: u64) -> TestResult<Mask<bool>> {
    if !(0.0..=1.0).contains(&density) {
        return Err(TestError::InvalidParameter(format!(
            "density must be in [0, 1], got {}",
            density
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(Mask::from_fn(width, height, |_, _| rng.random_bool(density))?)
}

/// Two pixels touching only at a corner: `(0,0)` and `(1,1)`
pub fn diagonal_bridge() -> TestResult<Mask<bool>> {
    Ok(Mask::from_vec(2, 2, vec![true, false, false, true])?)
}

/// A single path snaking through the image
///
/// Even rows are solid; odd rows connect them alternately at the right and
/// left edge. The path is as long as the image is large, which forces the
/// propagation loop through many passes.
pub fn serpentine(width: u32, height: u32) -> TestResult<Mask<bool>> {
    Ok(Mask::from_fn(width, height, |x, y| {
        if y % 2 == 0 {
            true
        } else if (y / 2) % 2 == 0 {
            x + 1 == width
        } else {
            x == 0
        }
    })?)
}

/// Checkerboard of `cell` x `cell` squares, foreground at the origin
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Mask<bool>> {
    if cell == 0 {
        return Err(TestError::InvalidParameter("cell must be positive".into()));
    }
    Ok(Mask::from_fn(width, height, |x, y| {
        (x / cell + y / cell) % 2 == 0
    })?)
}

/// Concentric square rings one pixel wide, separated by one background pixel
pub fn rings(size: u32) -> TestResult<Mask<bool>> {
    Ok(Mask::from_fn(size, size, |x, y| {
        let d = x.min(y).min(size - 1 - x).min(size - 1 - y);
        d % 2 == 0
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_mask_reproducible() {
        let a = random_mask(20, 10, 0.4, 7).unwrap();
        let b = random_mask(20, 10, 0.4, 7).unwrap();
        assert_eq!(a, b);
        assert!(random_mask(2, 2, 1.5, 0).is_err());
        assert_eq!(random_mask(5, 5, 0.0, 1).unwrap().count_foreground(), 0);
        assert_eq!(random_mask(5, 5, 1.0, 1).unwrap().count_foreground(), 25);
    }

    #[test]
    fn test_serpentine() {
        let mask = serpentine(4, 5).unwrap();
        let expected = Mask::from_ascii(
            "
            ####
            ...#
            ####
            #...
            ####
            ",
        )
        .unwrap();
        assert_eq!(mask, expected);
    }

    #[test]
    fn test_checkerboard() {
        let mask = checkerboard(4, 2, 1).unwrap();
        assert_eq!(
            mask.data(),
            &[true, false, true, false, false, true, false, true]
        );
        assert!(checkerboard(4, 4, 0).is_err());
    }

    #[test]
    fn test_rings() {
        let mask = rings(5).unwrap();
        assert!(mask.is_foreground(0, 0));
        assert!(!mask.is_foreground(1, 1));
        assert!(mask.is_foreground(2, 2));
    }
}
