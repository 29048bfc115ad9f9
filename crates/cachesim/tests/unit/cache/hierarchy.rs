//! Miss and write-back cascade between L1 and L2.
//!
//! Two-level tests use 16-byte lines, a direct-mapped 1 KiB L1 (64 sets) and
//! a 4 KiB 4-way L2 (64 sets). `0x010` and `0x410` collide in L1 set 1 but
//! fit side by side in L2 set 1.

use super::sim_config;
use cachesim::common::address::Address;
use cachesim::config::{LevelConfig, ReplacementPolicy, SimConfig};
use cachesim::core::CacheHierarchy;
use cachesim::sim::trace::{Operation, Trace, TraceEntry};
use cachesim::stats::LevelStats;
use cachesim::{ConfigError, SimError};
use pretty_assertions::assert_eq;

fn two_level() -> SimConfig {
    SimConfig {
        l2: LevelConfig::new(4096, 4),
        ..sim_config(16, 1024, 1, ReplacementPolicy::Lru)
    }
}

fn run(config: &SimConfig, entries: Vec<TraceEntry>) -> CacheHierarchy {
    crate::init_logging();
    let mut hierarchy = CacheHierarchy::new(config, Trace::new(entries)).unwrap();
    hierarchy.run();
    hierarchy
}

#[test]
fn test_single_level_when_l2_disabled() {
    let hierarchy = run(&sim_config(16, 1024, 1, ReplacementPolicy::Lru), vec![]);
    assert_eq!(hierarchy.levels().len(), 1);
    assert!(hierarchy.l2().is_none());
    assert_eq!(hierarchy.memory_traffic(), 0);
}

#[test]
fn test_rejects_invalid_config() {
    let config = sim_config(16, 1000, 1, ReplacementPolicy::Lru);
    let err = CacheHierarchy::new(&config, Trace::new(vec![])).err().unwrap();
    assert!(matches!(
        err,
        SimError::Config(ConfigError::UnevenCapacity { .. })
    ));
}

#[test]
fn test_direct_mapped_scenario() {
    let hierarchy = run(
        &sim_config(16, 1024, 1, ReplacementPolicy::Lru),
        vec![
            TraceEntry::write(0x10),
            TraceEntry::read(0x10),
            TraceEntry::read(0x30),
        ],
    );

    let l1 = hierarchy.l1();
    assert_eq!(
        *l1.stats(),
        LevelStats {
            read_hits: 1,
            read_misses: 1,
            write_hits: 0,
            write_misses: 1,
            write_backs: 0,
        }
    );
    assert!(l1.is_dirty(Address::new(0x10)));
    assert!(l1.contains(Address::new(0x30)));
    assert!(!l1.is_dirty(Address::new(0x30)));
    // Without L2, L1 talks to memory directly.
    assert_eq!(hierarchy.memory_traffic(), 2);
}

#[test]
fn test_l1_hit_does_not_reach_l2() {
    let hierarchy = run(
        &two_level(),
        vec![TraceEntry::read(0x10), TraceEntry::read(0x10), TraceEntry::write(0x18)],
    );

    let l2 = hierarchy.l2().unwrap().stats();
    assert_eq!(l2.reads(), 1);
    assert_eq!(l2.writes(), 0);
}

#[test]
fn test_l1_miss_reads_l2() {
    let hierarchy = run(&two_level(), vec![TraceEntry::write(0x10)]);

    let l2 = hierarchy.l2().unwrap();
    // The derived access is a read even though the trace entry was a write.
    assert_eq!(l2.stats().read_misses, 1);
    assert_eq!(l2.stats().writes(), 0);
    assert!(l2.contains(Address::new(0x10)));
    assert!(!l2.is_dirty(Address::new(0x10)));
}

#[test]
fn test_dirty_eviction_writes_back_to_l2() {
    let hierarchy = run(
        &two_level(),
        vec![TraceEntry::write(0x10), TraceEntry::read(0x410)],
    );

    let l1 = hierarchy.l1().stats();
    assert_eq!(l1.write_backs, 1);

    let l2 = hierarchy.l2().unwrap();
    assert_eq!(
        *l2.stats(),
        LevelStats {
            read_hits: 0,
            read_misses: 2,
            write_hits: 1,
            write_misses: 0,
            write_backs: 0,
        }
    );
    assert!(l2.is_dirty(Address::new(0x10)));
    assert!(l2.contains(Address::new(0x410)));
    assert_eq!(hierarchy.memory_traffic(), 2);
}

#[test]
fn test_write_back_miss_allocates_in_l2() {
    // A 64-byte direct-mapped L2 (4 sets) loses the block before L1 evicts it.
    let config = SimConfig {
        l2: LevelConfig::new(64, 1),
        ..sim_config(16, 1024, 1, ReplacementPolicy::Lru)
    };
    let hierarchy = run(
        &config,
        vec![
            TraceEntry::write(0x10),  // L1 set 1, L2 set 1
            TraceEntry::read(0x050),  // L1 set 5, L2 set 1: evicts 0x10 from L2
            TraceEntry::read(0x410),  // L1 set 1: evicts dirty 0x10 from L1
        ],
    );

    let l2 = hierarchy.l2().unwrap().stats();
    assert_eq!(l2.read_misses, 3);
    assert_eq!(l2.write_misses, 1);
    assert!(hierarchy.l2().unwrap().is_dirty(Address::new(0x10)));
}

#[test]
fn test_access_returns_l1_outcome() {
    let mut hierarchy = CacheHierarchy::new(&two_level(), Trace::new(vec![])).unwrap();

    let first = hierarchy.access(Operation::Write, Address::new(0x10), 0);
    assert!(!first.hit);

    let second = hierarchy.access(Operation::Read, Address::new(0x410), 1);
    assert!(!second.hit);
    assert_eq!(second.evicted, Some(Address::new(0x10)));

    let third = hierarchy.access(Operation::Read, Address::new(0x410), 2);
    assert!(third.hit);
}

#[test]
fn test_l2_dirty_eviction_counts_traffic() {
    // Tiny L2 (one 16-byte line) so every L1 write-back displaces it.
    let config = SimConfig {
        l2: LevelConfig::new(16, 1),
        ..sim_config(16, 32, 1, ReplacementPolicy::Lru)
    };
    let hierarchy = run(
        &config,
        vec![
            TraceEntry::write(0x00), // L1 set 0
            TraceEntry::write(0x20), // L1 set 0: write-back 0x00
            TraceEntry::write(0x40), // L1 set 0: write-back 0x20
        ],
    );

    let l1 = hierarchy.l1().stats();
    assert_eq!(l1.write_backs, 2);

    let l2 = hierarchy.l2().unwrap().stats();
    assert_eq!(l2.reads(), 3);
    assert_eq!(l2.writes(), 2);
    assert_eq!(l2.write_backs, 1);
    assert_eq!(hierarchy.memory_traffic(), l2.misses() + l2.write_backs);
}

#[test]
fn test_optimal_access_past_trace_end() {
    let config = SimConfig {
        l2: LevelConfig::new(4096, 4),
        ..sim_config(16, 1024, 1, ReplacementPolicy::Optimal)
    };
    let trace = Trace::new(vec![TraceEntry::read(0x10)]);
    let mut hierarchy = CacheHierarchy::new(&config, trace).unwrap();

    assert!(!hierarchy.access(Operation::Read, Address::new(0x10), usize::MAX).hit);
    assert!(hierarchy.access(Operation::Read, Address::new(0x10), usize::MAX).hit);
    assert_eq!(hierarchy.l2().unwrap().stats().read_misses, 1);
}
