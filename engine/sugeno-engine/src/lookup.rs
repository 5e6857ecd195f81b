//! Precomputed consequent tables
//!
//! A [`LookupTable`] holds one consequent per rule, aligned with the canonical
//! enumeration order of [`RuleBase`](crate::rule_base::RuleBase). The table is
//! opaque data: it is loaded once, checked for finiteness, and its length is
//! checked against the rule base when the system is built.
//!
//! Two on-disk formats are accepted:
//!
//! - JSON: a flat array of numbers, e.g. `[0.0, 5.0, 10.0, ...]`
//! - NumPy `.npy`: a 1-D, C-ordered, little-endian `float64` array

use crate::error::{Result, SugenoError};
use std::path::Path;
use tracing::debug;

const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Immutable array of precomputed rule consequents
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    values: Vec<f64>,
}

impl LookupTable {
    /// Wrap an in-memory array, rejecting empty arrays and non-finite values
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SugenoError::lookup_format("lookup table is empty"));
        }
        if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SugenoError::lookup_format(format!(
                "consequent #{index} is not finite ({value})"
            )));
        }
        Ok(Self { values })
    }

    /// Parse a JSON array of numbers
    pub fn from_json_str(json: &str) -> Result<Self> {
        let values: Vec<f64> = serde_json::from_str(json)
            .map_err(|e| SugenoError::lookup_format(format!("invalid JSON array: {e}")))?;
        Self::new(values)
    }

    /// Parse the bytes of a `.npy` file
    pub fn from_npy_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
            return Err(SugenoError::lookup_format("missing NPY magic string"));
        }

        let major = bytes[6];
        let (header_len, header_start) = match major {
            1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
            2 | 3 => {
                if bytes.len() < 12 {
                    return Err(SugenoError::lookup_format("truncated NPY preamble"));
                }
                let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
                (len as usize, 12)
            }
            other => {
                return Err(SugenoError::lookup_format(format!(
                    "unsupported NPY format version {other}"
                )))
            }
        };

        let data_start = header_start + header_len;
        let header = bytes
            .get(header_start..data_start)
            .and_then(|h| std::str::from_utf8(h).ok())
            .ok_or_else(|| SugenoError::lookup_format("truncated or non-text NPY header"))?;

        let descr = npy_field(header, "descr")
            .map(|d| d.trim_matches(|c| c == '\'' || c == '"'))
            .ok_or_else(|| SugenoError::lookup_format("NPY header has no 'descr'"))?;
        if descr != "<f8" {
            return Err(SugenoError::lookup_format(format!(
                "unsupported NPY dtype '{descr}', expected '<f8'"
            )));
        }

        if npy_field(header, "fortran_order") == Some("True") {
            return Err(SugenoError::lookup_format("Fortran-ordered NPY arrays are not supported"));
        }

        let len = npy_shape_1d(header)?;
        let data = &bytes[data_start..];
        let expected = len.checked_mul(8).ok_or_else(|| {
            SugenoError::lookup_format(format!("NPY shape ({len},) is too large"))
        })?;
        if data.len() != expected {
            return Err(SugenoError::lookup_format(format!(
                "NPY payload has {} bytes, shape ({len},) needs {expected}",
                data.len()
            )));
        }

        let values = data
            .chunks_exact(8)
            .map(|chunk| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect();
        Self::new(values)
    }

    /// Load a table from disk; `.npy` files are read as NumPy, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| SugenoError::LookupIo {
            path: path.to_path_buf(),
            source,
        };

        let is_npy = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("npy"));

        let table = if is_npy {
            Self::from_npy_bytes(&std::fs::read(path).map_err(io_err)?)?
        } else {
            Self::from_json_str(&std::fs::read_to_string(path).map_err(io_err)?)?
        };

        debug!(
            "Loaded {} precomputed consequents from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Serialize the table as a `.npy` v1.0 file
    pub fn to_npy_bytes(&self) -> Vec<u8> {
        let mut header = format!(
            "{{'descr': '<f8', 'fortran_order': False, 'shape': ({},), }}",
            self.values.len()
        );
        // preamble + header + '\n' must be a multiple of 64
        let unpadded = NPY_MAGIC.len() + 4 + header.len() + 1;
        header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
        header.push('\n');

        let mut bytes = Vec::with_capacity(10 + header.len() + self.values.len() * 8);
        bytes.extend_from_slice(NPY_MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for value in &self.values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Number of consequents
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty tables are rejected on construction
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consequent at a rule index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// All consequents in enumeration order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fail unless the table has exactly `expected` entries
    pub fn check_len(&self, expected: usize) -> Result<()> {
        if self.values.len() != expected {
            return Err(SugenoError::LookupLengthMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Raw value text of `'key': value` in a NPY header dict
fn npy_field<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    let quoted = [format!("'{key}'"), format!("\"{key}\"")];
    let start = quoted.iter().find_map(|k| header.find(k.as_str()).map(|i| i + k.len()))?;
    let rest = header[start..].trim_start().strip_prefix(':')?.trim_start();
    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)?
    } else {
        rest.find([',', '}']).unwrap_or(rest.len())
    };
    Some(rest[..end].trim())
}

fn npy_shape_1d(header: &str) -> Result<usize> {
    let shape = npy_field(header, "shape")
        .ok_or_else(|| SugenoError::lookup_format("NPY header has no 'shape'"))?;
    let dims: Vec<&str> = shape
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect();

    match dims.as_slice() {
        [len] => len
            .parse()
            .map_err(|_| SugenoError::lookup_format(format!("bad NPY dimension '{len}'"))),
        _ => Err(SugenoError::lookup_format(format!(
            "expected a 1-D array, got shape {shape}"
        ))),
    }
}
