use serde::Serialize;

use crate::sim::trace::Operation;

/// Access counters for one cache level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    pub read_hits: u64,
    pub read_misses: u64,
    pub write_hits: u64,
    pub write_misses: u64,
    pub write_backs: u64,
}

impl LevelStats {
    pub fn record(&mut self, op: Operation, hit: bool) {
        match (op, hit) {
            (Operation::Read, true) => self.read_hits += 1,
            (Operation::Read, false) => self.read_misses += 1,
            (Operation::Write, true) => self.write_hits += 1,
            (Operation::Write, false) => self.write_misses += 1,
        }
    }

    pub fn reads(&self) -> u64 {
        self.read_hits + self.read_misses
    }

    pub fn writes(&self) -> u64 {
        self.write_hits + self.write_misses
    }

    pub fn accesses(&self) -> u64 {
        self.reads() + self.writes()
    }

    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    pub fn hits(&self) -> u64 {
        self.read_hits + self.write_hits
    }

    /// Misses per hit, `(read_misses + write_misses) / (read_hits + write_hits)`.
    ///
    /// A level that has not hit yet reports 0.0.
    pub fn miss_rate(&self) -> f64 {
        let hits = self.hits();
        if hits > 0 {
            self.misses() as f64 / hits as f64
        } else {
            0.0
        }
    }

    /// Blocks moved to or from the next level: every miss fetches one and
    /// every write-back stores one.
    pub fn traffic(&self) -> u64 {
        self.misses() + self.write_backs
    }
}
