//! Error types for parbench

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using parbench's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a benchmark kernel
#[derive(Error, Debug)]
pub enum Error {
    /// A collective allocation could not be satisfied
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Operand lengths or matrix dimensions do not agree
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to an operation or to the configuration
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// An input file could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A sparse-matrix text file is malformed
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// The execution-unit runtime could not be brought up or was misused
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::OutOfMemory { size: 64 };
        assert_eq!(err.to_string(), "Out of memory: failed to allocate 64 bytes");

        let err = Error::shape_mismatch(&[3], &[4]);
        assert_eq!(err.to_string(), "Shape mismatch: expected [3], got [4]");

        let err = Error::parse(7, "expected an integer");
        assert_eq!(err.to_string(), "Parse error at line 7: expected an integer");
    }
}
