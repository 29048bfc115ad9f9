//! Set-associative cache level.
//!
//! A level is write-back and write-allocate: a write hit only marks the
//! line dirty, a write miss fills the line like a read miss and marks it
//! dirty immediately, and dirty lines are handed to the next level when
//! they are evicted.
//!
//! A miss takes the lowest invalid way of its set; the replacement policy
//! only chooses among valid lines once the set is full.

pub mod policies;

use serde::Serialize;

use self::policies::{Policy, PolicyAccess, ReplacementPolicy};
use crate::common::address::{Address, AddressLayout, DecodedAddress};
use crate::config::CacheConfig;
use crate::sim::trace::{Operation, Trace};
use crate::stats::LevelStats;

/// One way of one set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheLine {
    pub tag: u64,
    pub valid: bool,
    pub dirty: bool,
}

/// Result of one access to a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    pub hit: bool,
    /// Block address of a dirty line evicted by the fill, to be written back.
    pub evicted: Option<Address>,
}

impl AccessOutcome {
    fn hit() -> Self {
        Self {
            hit: true,
            evicted: None,
        }
    }
}

pub struct CacheLevel {
    config: CacheConfig,
    layout: AddressLayout,
    lines: Vec<CacheLine>,
    policy: Policy,
    stats: LevelStats,
}

impl CacheLevel {
    /// Builds an empty level. `trace` is only read by the optimal policy.
    pub fn new(config: CacheConfig, trace: &Trace) -> Self {
        let layout = config.layout();
        let policy = Policy::new(&config, layout, trace);
        Self {
            lines: vec![CacheLine::default(); config.sets * config.ways],
            layout,
            policy,
            stats: LevelStats::default(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn layout(&self) -> AddressLayout {
        self.layout
    }

    pub fn stats(&self) -> &LevelStats {
        &self.stats
    }

    pub fn sets(&self) -> usize {
        self.config.sets
    }

    pub fn ways(&self) -> usize {
        self.config.ways
    }

    /// Lines of `set`, way 0 first.
    pub fn set_lines(&self, set: usize) -> &[CacheLine] {
        let base = set * self.config.ways;
        &self.lines[base..base + self.config.ways]
    }

    fn find(&self, fields: &DecodedAddress) -> Option<usize> {
        self.set_lines(fields.index)
            .iter()
            .position(|line| line.valid && line.tag == fields.tag)
    }

    /// Returns true if the block holding `addr` is resident. Does not touch
    /// counters or policy state.
    pub fn contains(&self, addr: Address) -> bool {
        self.find(&self.layout.decode(addr)).is_some()
    }

    /// Returns true if the block holding `addr` is resident and dirty.
    pub fn is_dirty(&self, addr: Address) -> bool {
        let fields = self.layout.decode(addr);
        self.find(&fields)
            .is_some_and(|way| self.set_lines(fields.index)[way].dirty)
    }

    fn install_line(
        &mut self,
        fields: &DecodedAddress,
        op: Operation,
        access: &PolicyAccess,
    ) -> Option<Address> {
        let set = fields.index;
        // Empty ways are filled before the policy is asked to evict.
        let victim_way = self
            .set_lines(set)
            .iter()
            .position(|line| !line.valid)
            .unwrap_or_else(|| self.policy.get_victim(set));
        let victim_idx = set * self.config.ways + victim_way;
        let victim = self.lines[victim_idx];

        let mut evicted = None;
        if victim.valid && victim.dirty {
            let addr = self.layout.line_address(victim.tag, set);
            self.stats.write_backs += 1;
            log::debug!(
                "{}: write-back of {} from set {} way {}",
                self.config.name,
                addr,
                set,
                victim_way
            );
            evicted = Some(addr);
        }

        self.lines[victim_idx] = CacheLine {
            tag: fields.tag,
            valid: true,
            dirty: op == Operation::Write,
        };
        self.policy.update(set, victim_way, access);

        evicted
    }

    /// Performs one access and updates counters, line state and policy state.
    ///
    /// `trace_index` is the position of the trace entry that caused the
    /// access, including accesses derived from it at upper levels.
    pub fn access(&mut self, op: Operation, addr: Address, trace_index: usize) -> AccessOutcome {
        let fields = self.layout.decode(addr);
        let access = PolicyAccess {
            trace_index,
            block: self.layout.block(addr),
        };

        if let Some(way) = self.find(&fields) {
            self.stats.record(op, true);
            if op == Operation::Write {
                self.lines[fields.index * self.config.ways + way].dirty = true;
            }
            self.policy.update(fields.index, way, &access);
            return AccessOutcome::hit();
        }

        self.stats.record(op, false);
        let evicted = self.install_line(&fields, op, &access);
        AccessOutcome {
            hit: false,
            evicted,
        }
    }
}
