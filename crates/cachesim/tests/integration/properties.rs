//! Accounting properties that hold for any trace and any valid geometry.

use cachesim::config::{LevelConfig, ReplacementPolicy, SimConfig};
use cachesim::sim::simulate;
use cachesim::sim::trace::{Operation, Trace, TraceEntry};
use proptest::prelude::*;

fn policy() -> impl Strategy<Value = ReplacementPolicy> {
    prop_oneof![
        Just(ReplacementPolicy::Lru),
        Just(ReplacementPolicy::Plru),
        Just(ReplacementPolicy::Optimal),
    ]
}

/// Addresses confined to a small window so blocks collide often.
fn trace(max_len: usize) -> impl Strategy<Value = Trace> {
    prop::collection::vec((any::<bool>(), 0u64..0x800), 0..max_len).prop_map(|raw| {
        raw.into_iter()
            .map(|(write, addr)| {
                if write {
                    TraceEntry::write(addr)
                } else {
                    TraceEntry::read(addr)
                }
            })
            .collect::<Trace>()
    })
}

/// 16-byte lines; L1 of 2..=8 sets, L2 four times as large.
fn two_level() -> impl Strategy<Value = SimConfig> {
    (1u32..=3, prop::sample::select(vec![1usize, 2, 3, 4]), policy()).prop_map(
        |(set_bits, ways, policy)| {
            let l1 = (16 << set_bits) * ways;
            SimConfig {
                block_size: 16,
                l1: LevelConfig::new(l1, ways),
                l2: LevelConfig::new(l1 * 4, ways * 2),
                policy,
                ..SimConfig::default()
            }
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn l1_counts_every_entry(config in two_level(), trace in trace(200)) {
        let reads = trace.count(Operation::Read);
        let writes = trace.count(Operation::Write);
        let hierarchy = simulate(&config, trace).unwrap();

        let l1 = hierarchy.l1().stats();
        prop_assert_eq!(l1.reads(), reads);
        prop_assert_eq!(l1.writes(), writes);
        prop_assert!(l1.write_backs <= l1.misses());
    }

    #[test]
    fn l2_sees_exactly_l1_traffic(config in two_level(), trace in trace(200)) {
        let hierarchy = simulate(&config, trace).unwrap();

        let l1 = hierarchy.l1().stats();
        let l2 = hierarchy.l2().unwrap().stats();
        prop_assert_eq!(l2.reads(), l1.misses());
        prop_assert_eq!(l2.writes(), l1.write_backs);
        prop_assert_eq!(hierarchy.memory_traffic(), l2.traffic());
    }

    #[test]
    fn resident_lines_never_exceed_capacity(config in two_level(), trace in trace(200)) {
        let hierarchy = simulate(&config, trace).unwrap();

        for level in hierarchy.levels() {
            for set in 0..level.sets() {
                let lines = level.set_lines(set);
                prop_assert_eq!(lines.len(), level.ways());
                let mut tags: Vec<u64> =
                    lines.iter().filter(|l| l.valid).map(|l| l.tag).collect();
                let resident = tags.len();
                tags.sort_unstable();
                tags.dedup();
                prop_assert_eq!(tags.len(), resident, "duplicate tag in set {}", set);
            }
        }
    }

    #[test]
    fn optimal_is_a_lower_bound(
        set_bits in 0u32..=2,
        ways in 1usize..=4,
        trace in trace(150),
    ) {
        let misses = |policy| {
            let config = SimConfig {
                block_size: 16,
                l1: LevelConfig::new((16 << set_bits) * ways, ways),
                l2: LevelConfig::new(0, 0),
                policy,
                ..SimConfig::default()
            };
            simulate(&config, trace.clone()).unwrap().l1().stats().misses()
        };

        let optimal = misses(ReplacementPolicy::Optimal);
        prop_assert!(optimal <= misses(ReplacementPolicy::Lru));
        prop_assert!(optimal <= misses(ReplacementPolicy::Plru));
    }
}
