//! Iterative grid relaxation
//!
//! A [`Grid`] holds two block-distributed buffers of 64-bit floats with a
//! one-cell halo on every face. One [`sweep`](Grid::sweep) computes, for every
//! interior cell, the normalized sum of its neighbors in `current` into
//! `next`, then copies `next` back into `current`. Halo cells are zero for the
//! whole run and are never written after initialization.
//!
//! # Shapes
//!
//! | shape          | dims | neighbors                     | reference factor |
//! |----------------|------|-------------------------------|------------------|
//! | `Five`         | 2    | 4 edge-adjacent               | 1/8              |
//! | `Nine`         | 2    | 8 (edges + corners)           | 1/8              |
//! | `Nineteen`     | 3    | 18 (faces + edges)            | 1/18             |
//! | `TwentySeven`  | 3    | 26 (faces + edges + corners)  | 1/26             |
//!
//! The center cell is never part of the sum.

mod grid;

pub use grid::Grid;

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Sweeps performed by one stencil benchmark
pub const SWEEPS: usize = 100;

/// Neighbor pattern of a stencil
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StencilShape {
    /// 2D, 4 neighbors
    Five,
    /// 2D, 8 neighbors
    Nine,
    /// 3D, 18 neighbors
    Nineteen,
    /// 3D, 26 neighbors
    #[default]
    TwentySeven,
}

impl StencilShape {
    /// Number of grid axes (2 or 3)
    pub const fn dims(self) -> usize {
        match self {
            Self::Five | Self::Nine => 2,
            Self::Nineteen | Self::TwentySeven => 3,
        }
    }

    /// Nominal point count, including the center
    pub const fn points(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Nine => 9,
            Self::Nineteen => 19,
            Self::TwentySeven => 27,
        }
    }

    /// Number of neighbors summed per cell
    pub const fn neighbors(self) -> usize {
        self.points() - 1
    }

    /// Neighbor offsets as `[di, dj, dk]`; `dk` is zero for 2D shapes
    pub fn offsets(self) -> Vec<[isize; 3]> {
        let planes: &[isize] = if self.dims() == 3 { &[-1, 0, 1] } else { &[0] };
        let mut offsets = Vec::with_capacity(self.neighbors());
        for di in -1isize..=1 {
            for dj in -1isize..=1 {
                for &dk in planes {
                    let nonzero = [di, dj, dk].iter().filter(|&&d| d != 0).count();
                    let keep = match self {
                        Self::Five => nonzero == 1,
                        Self::Nine | Self::TwentySeven => nonzero >= 1,
                        Self::Nineteen => nonzero == 1 || nonzero == 2,
                    };
                    if keep {
                        offsets.push([di, dj, dk]);
                    }
                }
            }
        }
        offsets
    }

    /// Normalizing factor applied to the neighbor sum
    pub fn factor(self, normalization: Normalization) -> f64 {
        match normalization {
            Normalization::Reference => match self {
                Self::Five | Self::Nine => 1.0 / 8.0,
                Self::Nineteen => 1.0 / 18.0,
                Self::TwentySeven => 1.0 / 26.0,
            },
            Normalization::NeighborMean => 1.0 / self.neighbors() as f64,
        }
    }
}

impl fmt::Display for StencilShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

impl FromStr for StencilShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5" => Ok(Self::Five),
            "9" => Ok(Self::Nine),
            "19" => Ok(Self::Nineteen),
            "27" => Ok(Self::TwentySeven),
            other => Err(Error::invalid_argument(
                "op",
                format!("unknown stencil '{other}', expected 5, 9, 19 or 27"),
            )),
        }
    }
}

/// How the neighbor sum is scaled
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Factors of the reference benchmark (1/8 for both 2D shapes)
    #[default]
    Reference,
    /// `1 / neighbors`, a true neighbor average
    NeighborMean,
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::NeighborMean => write!(f, "mean"),
        }
    }
}

impl FromStr for Normalization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reference" => Ok(Self::Reference),
            "mean" => Ok(Self::NeighborMean),
            other => Err(Error::invalid_argument(
                "normalization",
                format!("unknown normalization '{other}', expected reference or mean"),
            )),
        }
    }
}

/// A shape bound to a grid edge length: linear neighbor offsets and factor
#[derive(Clone, Debug)]
pub struct Stencil {
    shape: StencilShape,
    offsets: Vec<isize>,
    factor: f64,
}

impl Stencil {
    /// Resolve `shape` for a grid of `size` cells per axis
    pub fn new(shape: StencilShape, normalization: Normalization, size: usize) -> Self {
        let s = size as isize;
        let offsets = shape
            .offsets()
            .into_iter()
            .map(|[di, dj, dk]| match shape.dims() {
                3 => di * s * s + dj * s + dk,
                _ => di * s + dj,
            })
            .collect();
        Self {
            shape,
            offsets,
            factor: shape.factor(normalization),
        }
    }

    /// The neighbor pattern
    #[inline]
    pub fn shape(&self) -> StencilShape {
        self.shape
    }

    /// Linear offsets of the neighbors
    #[inline]
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Normalizing factor
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }
}
