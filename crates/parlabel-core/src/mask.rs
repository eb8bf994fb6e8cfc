//! Foreground masks
//!
//! A [`Mask`] is a dense row-major host image whose element type carries a
//! foreground predicate ([`Foreground`]). Pixel `(x, y)` lives at linear index
//! `y * width + x`, which is also the index used by the labeling kernels.
//!
//! Any numeric type can act as a mask: nonzero means foreground. This mirrors
//! the way binary images are usually produced (thresholded gray images,
//! logical arrays, float masks) without forcing a conversion pass.

use crate::error::{Error, Result};

/// Foreground predicate over a pixel type
pub trait Foreground: Copy + Send + Sync + 'static {
    /// Returns `true` if the pixel belongs to the foreground.
    fn is_foreground(&self) -> bool;
}

impl Foreground for bool {
    #[inline]
    fn is_foreground(&self) -> bool {
        *self
    }
}

macro_rules! impl_foreground_int {
    ($($t:ty),*) => {
        $(
            impl Foreground for $t {
                #[inline]
                fn is_foreground(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

macro_rules! impl_foreground_float {
    ($($t:ty),*) => {
        $(
            impl Foreground for $t {
                // NaN compares unequal to zero and counts as foreground
                #[inline]
                fn is_foreground(&self) -> bool {
                    *self != 0.0
                }
            }
        )*
    };
}

impl_foreground_int!(u8, u16, u32, u64, i8, i16, i32, i64);
impl_foreground_float!(f32, f64);

/// Dense row-major foreground mask
#[derive(Debug, Clone, PartialEq)]
pub struct Mask<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

fn checked_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(Error::InvalidDimension { width, height })
}

impl<T: Foreground + Default> Mask<T> {
    /// Create an all-background mask
    ///
    /// Zero-sized masks are allowed; they label to zero components.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![T::default(); len],
        })
    }
}

impl<T: Foreground> Mask<T> {
    /// Wrap existing row-major data
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Result<Self> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
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

    /// Number of pixels (`width * height`)
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major pixel data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Linear index of `(x, y)`, or `None` if outside the image
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel value at `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Set the pixel value at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `(x, y)` is outside the image.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Result<()> {
        let len = self.data.len();
        let i = self.index(x, y).ok_or(Error::IndexOutOfBounds {
            index: y as usize * self.width as usize + x as usize,
            len,
        })?;
        self.data[i] = value;
        Ok(())
    }

    /// Whether `(x, y)` is a foreground pixel. Outside pixels are background.
    #[inline]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some_and(|v| v.is_foreground())
    }

    /// Count foreground pixels
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|v| v.is_foreground()).count()
    }

    /// Convert to a boolean mask using the foreground predicate
    pub fn to_binary(&self) -> Mask<bool> {
        Mask {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| v.is_foreground()).collect(),
        }
    }

    /// Repeat this mask `tiles_x` times horizontally and `tiles_y` times
    /// vertically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the tiled size overflows `u32`.
    pub fn tile(&self, tiles_x: u32, tiles_y: u32) -> Result<Self> {
        let width = self.width.checked_mul(tiles_x);
        let height = self.height.checked_mul(tiles_y);
        let (Some(width), Some(height)) = (width, height) else {
            return Err(Error::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        };
        let (w, h) = (self.width as usize, self.height as usize);
        Self::from_fn(width, height, |x, y| {
            self.data[(y as usize % h) * w + (x as usize % w)]
        })
    }
}

impl Mask<bool> {
    /// Parse a mask from ASCII art
    ///
    /// Each non-empty line is a row. `#`, `1`, `x` and `X` are foreground;
    /// `.`, `0` and `_` are background. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for unknown characters or rows of
    /// differing lengths.
    pub fn from_ascii(art: &str) -> Result<Self> {
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut data = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(Error::InvalidParameter(format!(
                    "row {} has {} columns, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for c in row.chars() {
                data.push(match c {
                    '#' | '1' | 'x' | 'X' => true,
                    '.' | '0' | '_' => false,
                    other => {
                        return Err(Error::InvalidParameter(format!(
                            "unexpected mask character {:?} in row {}",
                            other, y
                        )));
                    }
                });
            }
        }
        Self::from_vec(width as u32, rows.len() as u32, data)
    }
}
