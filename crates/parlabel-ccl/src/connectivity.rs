//! Pixel connectivity

use crate::error::LabelError;
use std::fmt;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    Four,
    /// 8-way connectivity (includes diagonals)
    Eight,
}

const FOUR_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const EIGHT_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Connectivity {
    /// Neighbourhood size, 4 or 8
    #[inline]
    pub fn neighborhood(self) -> u32 {
        match self {
            Connectivity::Four => 4,
            Connectivity::Eight => 8,
        }
    }

    /// `(dx, dy)` offsets of the neighbours
    #[inline]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &FOUR_OFFSETS,
            Connectivity::Eight => &EIGHT_OFFSETS,
        }
    }
}

impl TryFrom<u32> for Connectivity {
    type Error = LabelError;

    /// Accepts only 4 and 8
    fn try_from(nhood: u32) -> Result<Self, Self::Error> {
        match nhood {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            other => Err(LabelError::InvalidArgument(format!(
                "connectivity must be 4 or 8, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-connected", self.neighborhood())
    }
}
