//! Labeled images and component statistics
//!
//! [`LabelImage`] is the host-side view of a finished labeling: one
//! floating-point label per pixel (`0` for background, `1..=K` for
//! components) plus the component count `K`. Labels are stored as `f64`
//! because that is the representation the device finalizer writes.

use crate::error::{Error, Result};

/// Axis-aligned bounding box of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Component statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStats {
    /// Component label (1-based)
    pub label: u32,
    /// Bounding box
    pub bounds: Bounds,
    /// Number of pixels
    pub pixel_count: u32,
    /// Centroid X coordinate
    pub centroid_x: f64,
    /// Centroid Y coordinate
    pub centroid_y: f64,
}

/// Result of a labeling run
#[derive(Debug, Clone, PartialEq)]
pub struct LabelImage {
    width: u32,
    height: u32,
    labels: Vec<f64>,
    num_components: u32,
}

impl LabelImage {
    /// Wrap a label buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the buffer does not hold
    /// `width * height` labels, or [`Error::InvalidParameter`] if a label
    /// falls outside `0..=num_components` or is not integral.
    pub fn new(width: u32, height: u32, labels: Vec<f64>, num_components: u32) -> Result<Self> {
        let expected = width as usize * height as usize;
        if labels.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: labels.len(),
            });
        }
        if let Some((i, &bad)) = labels
            .iter()
            .enumerate()
            .find(|&(_, &l)| l < 0.0 || l > num_components as f64 || l.fract() != 0.0)
        {
            return Err(Error::InvalidParameter(format!(
                "label {} at index {} outside 0..={}",
                bad, i, num_components
            )));
        }
        Ok(Self {
            width,
            height,
            labels,
            num_components,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of connected components `K`
    #[inline]
    pub fn num_components(&self) -> u32 {
        self.num_components
    }

    /// Raw labels in row-major order
    #[inline]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Label of pixel `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width && y < self.height)
            .then(|| self.labels[y as usize * self.width as usize + x as usize] as u32)
    }

    /// Label at linear index `i`
    pub fn label_at(&self, i: usize) -> Option<u32> {
        self.labels.get(i).map(|&l| l as u32)
    }

    /// Labels converted to integers
    pub fn to_u32(&self) -> Vec<u32> {
        self.labels.iter().map(|&l| l as u32).collect()
    }

    /// Pixel count for each component; index is `label - 1`
    pub fn component_sizes(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.num_components as usize];
        for &l in &self.labels {
            if l > 0.0 {
                counts[l as usize - 1] += 1;
            }
        }
        counts
    }

    /// Bounding box for each component; index is `label - 1`
    pub fn component_bounds(&self) -> Vec<Bounds> {
        self.component_stats().into_iter().map(|s| s.bounds).collect()
    }

    /// Detailed statistics for all components, sorted by label
    pub fn component_stats(&self) -> Vec<ComponentStats> {
        #[derive(Clone)]
        struct Accum {
            count: u32,
            sum_x: u64,
            sum_y: u64,
            min_x: u32,
            min_y: u32,
            max_x: u32,
            max_y: u32,
        }

        let empty = Accum {
            count: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        };
        let mut acc = vec![empty; self.num_components as usize];

        let width = self.width as usize;
        for (i, &l) in self.labels.iter().enumerate() {
            if l <= 0.0 {
                continue;
            }
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            let a = &mut acc[l as usize - 1];
            a.count += 1;
            a.sum_x += x as u64;
            a.sum_y += y as u64;
            a.min_x = a.min_x.min(x);
            a.min_y = a.min_y.min(y);
            a.max_x = a.max_x.max(x);
            a.max_y = a.max_y.max(y);
        }

        acc.into_iter()
            .enumerate()
            .filter(|(_, a)| a.count > 0)
            .map(|(idx, a)| ComponentStats {
                label: idx as u32 + 1,
                bounds: Bounds {
                    x: a.min_x,
                    y: a.min_y,
                    w: a.max_x - a.min_x + 1,
                    h: a.max_y - a.min_y + 1,
                },
                pixel_count: a.count,
                centroid_x: a.sum_x as f64 / a.count as f64,
                centroid_y: a.sum_y as f64 / a.count as f64,
            })
            .collect()
    }
}
