//! Memory access traces.
//!
//! A trace file holds one access per line in the form `<op> <hex_address>`,
//! where `op` is `r` or `w` and the address is bare hex (no `0x`):
//!
//! ```text
//! r 400341a0
//! w 7fffed80
//! ```
//!
//! Blank lines are ignored. Any other malformed line rejects the whole
//! file.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::address::Address;
use crate::common::error::{Result, SimError};

/// Kind of memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Parses the single-letter trace code (`r` or `w`, lowercase only).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "r" => Some(Self::Read),
            "w" => Some(Self::Write),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// One recorded access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub op: Operation,
    pub address: Address,
}

impl TraceEntry {
    pub fn new(op: Operation, address: u64) -> Self {
        Self {
            op,
            address: Address::new(address),
        }
    }

    pub fn read(address: u64) -> Self {
        Self::new(Operation::Read, address)
    }

    pub fn write(address: u64) -> Self {
        Self::new(Operation::Write, address)
    }
}

/// Parses one non-blank trace line. Errors carry a reason without the line number.
fn parse_line(line: &str, width: u32) -> std::result::Result<TraceEntry, String> {
    let mut fields = line.split_whitespace();
    let op_field = fields.next().ok_or("empty line")?;
    let addr_field = fields
        .next()
        .ok_or_else(|| format!("missing address after '{}'", op_field))?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field '{}'", extra));
    }

    let op = Operation::from_code(op_field)
        .ok_or_else(|| format!("unknown operation '{}' (expected 'r' or 'w')", op_field))?;
    let address = Address::from_hex(addr_field, width).map_err(|e| e.to_string())?;

    Ok(TraceEntry { op, address })
}

/// Immutable, cheaply cloneable access sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    entries: Arc<[TraceEntry]>,
}

impl Trace {
    pub fn new(entries: Vec<TraceEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Parses trace text with `width`-bit addresses.
    ///
    /// # Errors
    ///
    /// Returns `SimError::TraceFormat` with the 1-based line number of the
    /// first malformed line.
    pub fn parse(text: &str, width: u32) -> Result<Self> {
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = parse_line(line, width).map_err(|reason| SimError::TraceFormat {
                line: number + 1,
                reason,
            })?;
            entries.push(entry);
        }
        Ok(Self::new(entries))
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Io` if the file cannot be read and
    /// `SimError::TraceFormat` if a line is malformed or not UTF-8.
    pub fn load(path: impl AsRef<Path>, width: u32) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = std::str::from_utf8(&bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            SimError::TraceFormat {
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                reason: "invalid UTF-8".to_string(),
            }
        })?;
        let trace = Self::parse(text, width)?;
        log::info!("loaded {} accesses from {}", trace.len(), path.display());
        Ok(trace)
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with operation `op`.
    pub fn count(&self, op: Operation) -> u64 {
        self.entries.iter().filter(|e| e.op == op).count() as u64
    }
}

impl FromIterator<TraceEntry> for Trace {
    fn from_iter<I: IntoIterator<Item = TraceEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
