//! Simulator error types.
//!
//! Every error is fatal for a run: a bad geometry is rejected before the
//! trace is replayed, and a malformed trace line aborts loading.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level simulator error.
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("trace format error at line {line}: {reason}")]
    TraceFormat { line: usize, reason: String },

    #[error("invalid address {text:?}: {reason}")]
    Address { text: String, reason: String },

    #[error("could not read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected cache or simulation configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("block size must be a power of 2 (got {0})")]
    BlockSizeNotPowerOfTwo(usize),

    #[error("{level}: associativity must be at least 1")]
    ZeroAssociativity { level: String },

    #[error("{level}: number of sets must be a power of 2 and at least 1 (got {sets})")]
    InvalidSetCount { level: String, sets: usize },

    #[error("{level}: size {size_bytes} is not a multiple of block size x associativity ({set_bytes})")]
    UnevenCapacity {
        level: String,
        size_bytes: usize,
        set_bytes: usize,
    },

    #[error("unsupported replacement policy {0}: 0 for LRU, 1 for PLRU, 2 for Optimal")]
    UnsupportedPolicy(u32),

    #[error("unsupported inclusion property {0}: 0 for non-inclusive, 1 for inclusive")]
    UnsupportedInclusion(u32),

    #[error("address width must be between 1 and 64 bits (got {0})")]
    AddressWidth(u32),

    #[error("{level}: {offset_bits} offset bits + {index_bits} index bits exceed the {width}-bit address")]
    GeometryTooWide {
        level: String,
        offset_bits: u32,
        index_bits: u32,
        width: u32,
    },
}
