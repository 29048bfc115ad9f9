//! Least Recently Used (LRU) Replacement Policy.
//!
//! Every access stamps the touched way with the value of a counter that
//! strictly increases over the lifetime of the level. The victim is the way
//! with the smallest stamp in the set. Ways that were never touched keep
//! stamp 0, so an empty set fills from way 0 upwards.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `get_victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(S × W) stamps where S is the number of sets
//! - **Best Case:** Working sets with good temporal locality
//! - **Worst Case:** Cyclic scans one line larger than the set (thrashing)

use super::{PolicyAccess, ReplacementPolicy};

/// LRU Policy state.
pub struct LruPolicy {
    /// Last-access stamp per line, `sets * ways` entries, row-major by set.
    stamps: Vec<u64>,
    ways: usize,
    /// Level-local access clock.
    clock: u64,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            stamps: vec![0; sets * ways],
            ways,
            clock: 0,
        }
    }

    /// Stamp currently held by `way` of `set`.
    pub fn stamp(&self, set: usize, way: usize) -> u64 {
        self.stamps[set * self.ways + way]
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Marks `way` as the most recently used line of its set.
    fn update(&mut self, set: usize, way: usize, _access: &PolicyAccess) {
        self.clock += 1;
        self.stamps[set * self.ways + way] = self.clock;
    }

    /// Returns the way with the oldest stamp, lowest index on ties.
    fn get_victim(&self, set: usize) -> usize {
        let base = set * self.ways;
        let row = &self.stamps[base..base + self.ways];

        let mut victim = 0;
        for (way, &stamp) in row.iter().enumerate().skip(1) {
            if stamp < row[victim] {
                victim = way;
            }
        }
        victim
    }
}
