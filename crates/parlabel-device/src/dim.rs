//! Launch dimensions and device limits

use std::fmt;

/// Divide and round up
///
/// `divup(n, 0)` is defined as 0 so that empty geometries never panic.
#[inline]
pub const fn divup(n: u64, d: u64) -> u64 {
    if d == 0 { 0 } else { n.div_ceil(d) }
}

/// Three-component extent used for grids, blocks and indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dim3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Dim3 {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// One-dimensional extent `(x, 1, 1)`
    pub const fn x(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    /// Two-dimensional extent `(x, y, 1)`
    pub const fn xy(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }

    /// Product of all components
    #[inline]
    pub const fn volume(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Largest grid extent per dimension on classic accelerators (`256 * 256 - 1`)
pub const CLASSIC_MAX_GRID_DIM: u32 = 256 * 256 - 1;

/// Hardware limits every launch and allocation is validated against
///
/// The defaults model a classic accelerator: 1024 threads per block and a
/// 65535 ceiling on every grid dimension. Lowering the limits on a
/// development machine makes violations surface early, and lowering
/// `max_grid_dim.x` forces the grid partitioner to fold small images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Maximum threads in one block (product of block dimensions)
    pub max_threads_per_block: u32,
    /// Maximum extent of each grid dimension
    pub max_grid_dim: Dim3,
    /// Maximum size of one allocation, in 32-bit words
    pub max_alloc_words: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_threads_per_block: 1024,
            max_grid_dim: Dim3::new(
                CLASSIC_MAX_GRID_DIM,
                CLASSIC_MAX_GRID_DIM,
                CLASSIC_MAX_GRID_DIM,
            ),
            max_alloc_words: usize::MAX,
        }
    }
}

impl DeviceLimits {
    /// Set the per-block thread limit
    pub fn with_max_threads_per_block(mut self, threads: u32) -> Self {
        self.max_threads_per_block = threads;
        self
    }

    /// Set the per-dimension grid limit
    pub fn with_max_grid_dim(mut self, dim: Dim3) -> Self {
        self.max_grid_dim = dim;
        self
    }

    /// Set the allocation budget in 32-bit words
    pub fn with_max_alloc_words(mut self, words: usize) -> Self {
        self.max_alloc_words = words;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divup() {
        assert_eq!(divup(0, 4), 0);
        assert_eq!(divup(1, 4), 1);
        assert_eq!(divup(4, 4), 1);
        assert_eq!(divup(5, 4), 2);
        assert_eq!(divup(7, 0), 0);
    }

    #[test]
    fn test_volume() {
        assert_eq!(Dim3::xy(32, 8).volume(), 256);
        assert_eq!(Dim3::x(7).volume(), 7);
        assert_eq!(Dim3::default().volume(), 0);
    }

    #[test]
    fn test_default_limits() {
        let limits = DeviceLimits::default();
        assert_eq!(limits.max_grid_dim.x, 65535);
        assert_eq!(limits.max_threads_per_block, 1024);
    }
}
