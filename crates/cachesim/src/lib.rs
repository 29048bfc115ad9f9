//! Trace-driven cache hierarchy simulator.
//!
//! This crate replays a recorded trace of memory reads and writes against a
//! set-associative L1 cache and an optional L2, and reports per-level hit,
//! miss and write-back statistics together with the final cache contents.
//!
//! # Architecture
//!
//! * **Codec**: fixed-width addresses split into tag, set index and block offset.
//! * **Policies**: true LRU, tree pseudo-LRU and Belady's optimal lookahead.
//! * **Hierarchy**: write-back, write-allocate levels chained L1 -> L2.
//!
//! # Modules
//!
//! * `common`: Address codec and error types.
//! * `config`: Simulation and per-level cache configuration.
//! * `core`: Cache levels, replacement policies and the hierarchy.
//! * `sim`: Trace loading and result reporting.
//! * `stats`: Per-level access counters.

/// Address codec and the crate error type.
///
/// Provides the fixed-width `Address` type, its tag/index/offset
/// decomposition, and the hex/binary text conversions used by traces and
/// reports.
pub mod common;

/// Configuration for the simulated cache hierarchy.
///
/// Holds the user-facing `SimConfig` (CLI codes or JSON) and the validated
/// per-level `CacheConfig` geometry derived from it.
pub mod config;

/// Cache levels, replacement policies and the level chain.
pub mod core;

/// Trace loading and report generation.
pub mod sim;

/// Per-level access counters.
pub mod stats;

pub use crate::common::error::{ConfigError, Result, SimError};
pub use crate::config::SimConfig;
pub use crate::core::CacheHierarchy;
