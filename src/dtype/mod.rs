//! Data type system for benchmark kernels
//!
//! Kernels are written once against the [`Element`] trait and instantiated for
//! each of the three benchmarked element types. [`DType`] is the runtime tag
//! chosen on the command line; [`dispatch_dtype!`](crate::dispatch_dtype) turns
//! it back into a concrete type parameter.

mod element;

pub use element::Element;

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Element type of a dense benchmark
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit signed integer, wrapping arithmetic
    #[default]
    I32,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
}

impl DType {
    /// Returns the size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 | Self::I32 => 4,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns the short Rust-style name (e.g., "f32")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Returns the spelling used on the command line
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::I32 => "int",
            Self::F32 => "float",
            Self::F64 => "double",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" | "i32" => Ok(Self::I32),
            "float" | "f32" => Ok(Self::F32),
            "double" | "f64" => Ok(Self::F64),
            other => Err(Error::invalid_argument(
                "dtype",
                format!("unknown data type '{other}', expected int, float or double"),
            )),
        }
    }
}

/// Dispatch on a runtime [`DType`], binding `$T` to the matching Rust type
///
/// ```rust,ignore
/// let sample = dispatch_dtype!(dtype, T => { run_dot::<T>(&unit) });
/// ```
#[macro_export]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
        }
    };
}
