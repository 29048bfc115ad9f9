//! Chain of cache levels.
//!
//! Each trace entry enters at L1. A miss at level `k` issues a read of the
//! same address to level `k + 1`, followed by a write of the evicted block
//! if the fill displaced a dirty line. The last level's misses and
//! write-backs go to memory and are only counted.

use super::cache::{AccessOutcome, CacheLevel};
use crate::common::address::Address;
use crate::common::error::Result;
use crate::config::{InclusionProperty, SimConfig};
use crate::sim::trace::{Operation, Trace};

pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    trace: Trace,
}

impl CacheHierarchy {
    /// Validates `config` and builds its levels, L1 first.
    ///
    /// `trace` is the sequence [`CacheHierarchy::run`] replays; the optimal
    /// policy reads ahead in it.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` if any level's geometry is invalid.
    pub fn new(config: &SimConfig, trace: Trace) -> Result<Self> {
        let levels = config
            .level_configs()?
            .into_iter()
            .map(|level| CacheLevel::new(level, &trace))
            .collect::<Vec<_>>();

        if config.inclusion == InclusionProperty::Inclusive && levels.len() > 1 {
            log::warn!("inclusive hierarchy requested; inclusion is recorded but not enforced");
        }
        for level in &levels {
            log::info!(
                "{}: {} B, {}-way, {} sets of {} B lines, {} replacement",
                level.name(),
                level.config().size_bytes,
                level.ways(),
                level.sets(),
                level.config().block_size,
                level.config().policy
            );
        }

        Ok(Self { levels, trace })
    }

    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    pub fn l1(&self) -> &CacheLevel {
        &self.levels[0]
    }

    pub fn l2(&self) -> Option<&CacheLevel> {
        self.levels.get(1)
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Sends one access into L1 and cascades it down the chain. Returns the
    /// L1 outcome.
    pub fn access(&mut self, op: Operation, addr: Address, trace_index: usize) -> AccessOutcome {
        cascade(&mut self.levels, op, addr, trace_index)
            .unwrap_or(AccessOutcome { hit: false, evicted: None })
    }

    /// Replays the whole trace in order.
    pub fn run(&mut self) {
        let trace = self.trace.clone();
        for (index, entry) in trace.iter().enumerate() {
            self.access(entry.op, entry.address, index);
        }
        log::info!("replayed {} trace entries", trace.len());
    }

    /// Blocks moved between the last level and memory.
    pub fn memory_traffic(&self) -> u64 {
        self.levels
            .last()
            .map_or(0, |level| level.stats().traffic())
    }
}

fn cascade(
    levels: &mut [CacheLevel],
    op: Operation,
    addr: Address,
    trace_index: usize,
) -> Option<AccessOutcome> {
    let (level, lower) = levels.split_first_mut()?;
    let outcome = level.access(op, addr, trace_index);

    if !outcome.hit {
        cascade(lower, Operation::Read, addr, trace_index);
        if let Some(victim) = outcome.evicted {
            cascade(lower, Operation::Write, victim, trace_index);
        }
    }

    Some(outcome)
}
