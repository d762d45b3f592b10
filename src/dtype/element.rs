//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use rand::Rng;
use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Trait for types that can be elements of a partitioned array
///
/// Every element type is stored in a shared array as an atomic cell of the same
/// bit width. Cells are accessed with `Relaxed` ordering; visibility between
/// units comes from the collective barrier, never from the cell itself.
///
/// Arithmetic follows the benchmark's numeric contract: integers wrap on
/// overflow, floats follow IEEE-754 and let NaN/Inf propagate.
pub trait Element:
    Copy + Send + Sync + Pod + PartialEq + PartialOrd + Debug + Display + FromStr + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Shared storage cell for one element
    type Cell: Zeroable + Send + Sync + 'static;

    /// Read a cell
    fn load(cell: &Self::Cell) -> Self;

    /// Write a cell
    fn store(cell: &Self::Cell, value: Self);

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Addition; wraps for integers
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Multiplication; wraps for integers
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Square root, truncated back to the element type for integers
    fn sqrt(self) -> Self;

    /// Convert from f64 (saturating truncation for integers)
    fn from_f64(v: f64) -> Self;

    /// Convert to f64
    fn to_f64(self) -> f64;

    /// Draw one value from the generator
    ///
    /// Integers use the full 32-bit range, floats are uniform in `[0, 1)`.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! atomic_cell {
    ($ty:ty, $atomic:ty, $bits:ty) => {
        type Cell = $atomic;

        #[inline]
        fn load(cell: &Self::Cell) -> Self {
            bytemuck::cast::<$bits, $ty>(cell.load(Ordering::Relaxed))
        }

        #[inline]
        fn store(cell: &Self::Cell, value: Self) {
            cell.store(bytemuck::cast::<$ty, $bits>(value), Ordering::Relaxed)
        }
    };
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;

    atomic_cell!(i32, AtomicU32, u32);

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        1
    }

    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        i32::wrapping_add(self, rhs)
    }

    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        i32::wrapping_mul(self, rhs)
    }

    #[inline]
    fn sqrt(self) -> Self {
        (self as f64).sqrt() as i32
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.random::<i32>()
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    atomic_cell!(f32, AtomicU32, u32);

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.random::<f32>()
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    atomic_cell!(f64, AtomicU64, u64);

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        self + rhs
    }

    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.random::<f64>()
    }
}
