//! Sparse matrix text formats
//!
//! # CSR text
//!
//! ```text
//! nnz ncols nrows+1
//! value        (nnz lines)
//! column       (nnz lines)
//! row offset   (nrows+1 lines)
//! ```
//!
//! One number per line; blank lines are ignored. The third header field
//! counts offset lines, so the matrix has one row fewer than it says.
//!
//! # Matrix Market
//!
//! Coordinate edge lists: an optional `%%MatrixMarket` banner, `%` comment
//! lines, a `rows cols entries` size line, then `row col [value]` entries with
//! 1-based indices. `pattern` entries get the value 1 and `symmetric`
//! matrices have their off-diagonal entries mirrored.

use super::coo::CooMatrix;
use super::csr::CsrMatrix;
use crate::dtype::Element;
use crate::error::{Error, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Numbered, non-blank lines of a text document
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    /// Next non-blank line, trimmed, with its 1-based number
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (idx, line) in self.inner.by_ref() {
            self.last = idx + 1;
            let line = line.trim();
            if !line.is_empty() {
                return Some((idx + 1, line));
            }
        }
        None
    }

    fn expect_line(&mut self, what: &str) -> Result<(usize, &'a str)> {
        self.next_line()
            .ok_or_else(|| Error::parse(self.last + 1, format!("unexpected end of input, expected {what}")))
    }

    /// Next line parsed as a single number
    fn number<N: FromStr>(&mut self, what: &str) -> Result<N> {
        let (line, text) = self.expect_line(what)?;
        parse_token(line, text, what)
    }
}

fn parse_token<N: FromStr>(line: usize, token: &str, what: &str) -> Result<N> {
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid {what} '{token}'")))
}

fn parse_value<T: Element>(line: usize, token: &str) -> Result<T> {
    let v: f64 = parse_token(line, token, "value")?;
    Ok(T::from_f64(v))
}

/// Parse the CSR text format
pub fn parse_csr<T: Element>(text: &str) -> Result<CsrMatrix<T>> {
    let mut lines = Lines::new(text);
    let (line, header) = lines.expect_line("header")?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(Error::parse(
            line,
            format!("header needs 3 fields (nnz ncols nrows+1), got {}", fields.len()),
        ));
    }
    let nnz: usize = parse_token(line, fields[0], "nnz")?;
    let ncols: usize = parse_token(line, fields[1], "column count")?;
    let offsets: usize = parse_token(line, fields[2], "offset count")?;
    if offsets == 0 {
        return Err(Error::parse(line, "offset count must be at least 1"));
    }

    let mut values = Vec::with_capacity(nnz.min(text.len()));
    for _ in 0..nnz {
        let (line, text) = lines.expect_line("value")?;
        values.push(parse_value::<T>(line, text)?);
    }
    let col_indices = (0..nnz)
        .map(|_| lines.number::<usize>("column index"))
        .collect::<Result<Vec<_>>>()?;
    let row_ptrs = (0..offsets)
        .map(|_| lines.number::<usize>("row offset"))
        .collect::<Result<Vec<_>>>()?;

    CsrMatrix::new(row_ptrs, col_indices, values, [offsets - 1, ncols])
}

/// Read a CSR text file
pub fn read_csr<T: Element>(path: impl AsRef<Path>) -> Result<CsrMatrix<T>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_csr(&text)
}

/// Write a matrix in the CSR text format
pub fn write_csr<T: Element>(path: impl AsRef<Path>, csr: &CsrMatrix<T>) -> Result<()> {
    let path = path.as_ref();
    let io_err = |e| Error::io(path, e);
    let file = fs::File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{} {} {}", csr.values.len(), csr.shape[1], csr.row_ptrs.len()).map_err(io_err)?;
    for v in &csr.values {
        writeln!(out, "{v}").map_err(io_err)?;
    }
    for c in &csr.col_indices {
        writeln!(out, "{c}").map_err(io_err)?;
    }
    for p in &csr.row_ptrs {
        writeln!(out, "{p}").map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
}

/// Parse a Matrix Market coordinate file into triplets
pub fn parse_matrix_market<T: Element>(text: &str) -> Result<CooMatrix<T>> {
    let mut lines = Lines::new(text);
    let mut pattern = false;
    let mut symmetry = Symmetry::General;

    let (size_line, size) = loop {
        let (line, text) = lines.expect_line("size line")?;
        if let Some(banner) = text.strip_prefix("%%MatrixMarket") {
            let banner = banner.to_ascii_lowercase();
            let words: Vec<&str> = banner.split_whitespace().collect();
            if words.get(1) != Some(&"coordinate") {
                return Err(Error::parse(line, "only coordinate matrices are supported"));
            }
            match words.get(2).copied() {
                Some("real" | "double" | "integer") => {}
                Some("pattern") => pattern = true,
                other => {
                    return Err(Error::parse(
                        line,
                        format!("unsupported field '{}'", other.unwrap_or("")),
                    ));
                }
            }
            symmetry = match words.get(3).copied() {
                None | Some("general") => Symmetry::General,
                Some("symmetric") => Symmetry::Symmetric,
                Some(other) => {
                    return Err(Error::parse(line, format!("unsupported symmetry '{other}'")));
                }
            };
        } else if !text.starts_with('%') {
            break (line, text);
        }
    };

    let fields: Vec<&str> = size.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(Error::parse(size_line, "size line needs 3 fields (rows cols entries)"));
    }
    let nrows: usize = parse_token(size_line, fields[0], "row count")?;
    let ncols: usize = parse_token(size_line, fields[1], "column count")?;
    let entries: usize = parse_token(size_line, fields[2], "entry count")?;

    let capacity = match symmetry {
        Symmetry::General => Some(entries),
        Symmetry::Symmetric => entries.checked_mul(2),
    }
    .ok_or_else(|| Error::parse(size_line, format!("entry count {entries} is too large")))?;
    // every entry takes at least one byte of text
    let mut coo = CooMatrix::with_capacity([nrows, ncols], capacity.min(text.len()));

    let mut read = 0;
    while read < entries {
        let (line, text) = lines.expect_line("entry")?;
        if text.starts_with('%') {
            continue;
        }
        let mut tokens = text.split_whitespace();
        let mut index = |what| -> Result<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| Error::parse(line, format!("missing {what}")))?;
            let one_based: usize = parse_token(line, token, what)?;
            one_based
                .checked_sub(1)
                .ok_or_else(|| Error::parse(line, format!("{what} must be 1-based")))
        };
        let row = index("row index")?;
        let col = index("column index")?;
        let value = if pattern {
            T::one()
        } else {
            let token = tokens
                .next()
                .ok_or_else(|| Error::parse(line, "missing value"))?;
            parse_value::<T>(line, token)?
        };

        coo.push(row, col, value)
            .map_err(|e| Error::parse(line, e.to_string()))?;
        if symmetry == Symmetry::Symmetric && row != col {
            coo.push(col, row, value)
                .map_err(|e| Error::parse(line, e.to_string()))?;
        }
        read += 1;
    }

    Ok(coo)
}

/// Read a Matrix Market file and convert it to CSR
pub fn read_matrix_market<T: Element>(path: impl AsRef<Path>) -> Result<CsrMatrix<T>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_matrix_market::<T>(&text)?.to_csr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::SparseStorage;

    #[test]
    fn test_parse_csr() {
        let text = "3 3 3\n1.5\n2\n3\n\n0\n2\n1\n0\n2\n3\n";
        let csr = parse_csr::<f64>(text).unwrap();
        assert_eq!(csr.shape(), [2, 3]);
        assert_eq!(csr.values(), &[1.5, 2.0, 3.0]);
        assert_eq!(csr.col_indices(), &[0, 2, 1]);
        assert_eq!(csr.row_ptrs(), &[0, 2, 3]);
    }

    #[test]
    fn test_parse_csr_truncated() {
        let err = parse_csr::<i32>("2 2 3\n1\n2\n0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 5, .. }), "{err}");
    }

    #[test]
    fn test_parse_csr_huge_nnz_is_an_error() {
        let err = parse_csr::<f64>("18446744073709551615 3 3\n1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_parse_matrix_market_huge_entry_count_is_an_error() {
        let symmetric = "%%MatrixMarket matrix coordinate real symmetric\n\
                         2 2 18446744073709551615\n\
                         1 1 1.0\n";
        let err = parse_matrix_market::<f64>(symmetric).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");

        let general = "2 2 18446744073709551615\n1 1 1.0\n";
        let err = parse_matrix_market::<f64>(general).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_parse_csr_bad_token() {
        let err = parse_csr::<i32>("1 1 2\nabc\n0\n0\n1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_parse_matrix_market_symmetric_pattern() {
        let text = "%%MatrixMarket matrix coordinate pattern symmetric\n\
                    % a comment\n\
                    3 3 3\n\
                    1 1\n\
                    2 1\n\
                    3 2\n";
        let coo = parse_matrix_market::<i32>(text).unwrap();
        assert_eq!(coo.nnz(), 5);
        let dense = coo.to_csr().to_dense();
        assert_eq!(dense.nonzero_pattern(), vec![(0, 0), (0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_parse_matrix_market_rejects_zero_index() {
        let text = "2 2 1\n0 1 4.0\n";
        assert!(matches!(
            parse_matrix_market::<f64>(text),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_csr::<f64>("/nonexistent/matrix_in.csr").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
