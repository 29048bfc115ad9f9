//! Simulation driver.
//!
//! Glue between configuration, trace input and the cache hierarchy:
//! builds the hierarchy, replays the trace and packages the result.

/// Plain-text and JSON result reports.
pub mod report;

/// Trace entries and the trace file parser.
pub mod trace;

use std::path::Path;

use self::report::Report;
use self::trace::Trace;
use crate::common::error::Result;
use crate::config::SimConfig;
use crate::core::CacheHierarchy;

/// Builds a hierarchy for `config`, replays `trace` through it and returns
/// the finished hierarchy.
///
/// # Errors
///
/// Returns `SimError::Config` if the configuration is rejected; nothing is
/// replayed in that case.
pub fn simulate(config: &SimConfig, trace: Trace) -> Result<CacheHierarchy> {
    let mut hierarchy = CacheHierarchy::new(config, trace)?;
    hierarchy.run();
    Ok(hierarchy)
}

/// Validates `config`, loads the trace at `path` and runs it to completion.
///
/// The configuration is checked before the trace file is opened.
pub fn run_file(config: &SimConfig, path: impl AsRef<Path>) -> Result<Report> {
    let path = path.as_ref();
    config.validate()?;
    let trace = Trace::load(path, config.address_bits)?;
    let hierarchy = simulate(config, trace)?;
    Ok(Report::new(config, &hierarchy).with_trace_file(path.display().to_string()))
}
