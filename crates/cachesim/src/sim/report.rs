//! Simulation report.
//!
//! Captures the final state of a hierarchy (configuration, per-level
//! counters and contents) in a serializable form. `Display` renders the
//! plain-text layout printed by the CLI; `serde_json` gives the JSON form
//! used by `--json` and the Python bindings.

use std::fmt;

use serde::Serialize;

use crate::config::SimConfig;
use crate::core::{CacheHierarchy, CacheLevel};
use crate::stats::LevelStats;

/// A resident line as shown in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    /// Tag in lowercase hex.
    pub tag: String,
    pub dirty: bool,
}

/// Final state of one level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelReport {
    pub name: String,
    pub sets: usize,
    pub ways: usize,
    pub stats: LevelStats,
    pub reads: u64,
    pub writes: u64,
    pub miss_rate: f64,
    /// `contents[set][way]`; `None` for an invalid line.
    pub contents: Vec<Vec<Option<LineReport>>>,
}

impl LevelReport {
    pub fn new(level: &CacheLevel) -> Self {
        let contents = (0..level.sets())
            .map(|set| {
                level
                    .set_lines(set)
                    .iter()
                    .map(|line| {
                        line.valid.then(|| LineReport {
                            tag: format!("{:x}", line.tag),
                            dirty: line.dirty,
                        })
                    })
                    .collect()
            })
            .collect();

        let stats = *level.stats();
        Self {
            name: level.name().to_string(),
            sets: level.sets(),
            ways: level.ways(),
            reads: stats.reads(),
            writes: stats.writes(),
            miss_rate: stats.miss_rate(),
            stats,
            contents,
        }
    }
}

/// Complete result of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub config: SimConfig,
    pub trace_file: Option<String>,
    pub levels: Vec<LevelReport>,
    /// Blocks moved between the last level and memory.
    pub memory_traffic: u64,
}

impl Report {
    pub fn new(config: &SimConfig, hierarchy: &CacheHierarchy) -> Self {
        Self {
            config: config.clone(),
            trace_file: None,
            levels: hierarchy.levels().iter().map(LevelReport::new).collect(),
            memory_traffic: hierarchy.memory_traffic(),
        }
    }

    pub fn with_trace_file(mut self, path: impl Into<String>) -> Self {
        self.trace_file = Some(path.into());
        self
    }

    pub fn level(&self, name: &str) -> Option<&LevelReport> {
        self.levels.iter().find(|level| level.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "===== Simulator configuration =====")?;
        writeln!(f, "BLOCKSIZE:             {}", c.block_size)?;
        writeln!(f, "L1_SIZE:               {}", c.l1.size_bytes)?;
        writeln!(f, "L1_ASSOC:              {}", c.l1.ways)?;
        writeln!(f, "L2_SIZE:               {}", c.l2.size_bytes)?;
        writeln!(f, "L2_ASSOC:              {}", c.l2.ways)?;
        writeln!(f, "REPLACEMENT POLICY:    {}", c.policy)?;
        writeln!(f, "INCLUSION PROPERTY:    {}", c.inclusion)?;
        writeln!(
            f,
            "trace_file:            {}",
            self.trace_file.as_deref().unwrap_or("-")
        )?;

        for level in &self.levels {
            writeln!(f, "===== {} contents =====", level.name)?;
            for (set, lines) in level.contents.iter().enumerate() {
                write!(f, "Set {:>5}:", set)?;
                for line in lines {
                    match line {
                        Some(line) => {
                            let marker = if line.dirty { "D" } else { " " };
                            write!(f, "  {:>8} {}", line.tag, marker)?;
                        }
                        None => write!(f, "  {:>8}  ", "-")?,
                    }
                }
                writeln!(f)?;
            }
        }

        let empty = LevelStats::default();
        let l1 = self.levels.first().map_or(&empty, |l| &l.stats);
        let l2 = self.levels.get(1).map_or(&empty, |l| &l.stats);

        writeln!(f, "===== Simulation results (raw) =====")?;
        writeln!(f, "a. number of L1 reads:        {}", l1.reads())?;
        writeln!(f, "b. number of L1 read misses:  {}", l1.read_misses)?;
        writeln!(f, "c. number of L1 writes:       {}", l1.writes())?;
        writeln!(f, "d. number of L1 write misses: {}", l1.write_misses)?;
        writeln!(f, "e. L1 miss rate:              {:.6}", l1.miss_rate())?;
        writeln!(f, "f. number of L1 writebacks:   {}", l1.write_backs)?;
        writeln!(f, "g. number of L2 reads:        {}", l2.reads())?;
        writeln!(f, "h. number of L2 read misses:  {}", l2.read_misses)?;
        writeln!(f, "i. number of L2 writes:       {}", l2.writes())?;
        writeln!(f, "j. number of L2 write misses: {}", l2.write_misses)?;
        writeln!(f, "k. L2 miss rate:              {:.6}", l2.miss_rate())?;
        writeln!(f, "l. number of L2 writebacks:   {}", l2.write_backs)?;
        writeln!(f, "m. total memory traffic:      {}", self.memory_traffic)
    }
}
