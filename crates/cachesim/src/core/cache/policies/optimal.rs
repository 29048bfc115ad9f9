//! Optimal (Belady) Replacement Policy.
//!
//! On every access the policy looks ahead in the trace for the next
//! reference to the same block and remembers its position. The victim is a
//! line that is never referenced again if one exists, otherwise the line
//! whose next reference lies furthest in the future.
//!
//! This is an offline oracle: it needs the complete trace up front and is
//! only meaningful as a lower bound for the realizable policies.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(N) where N is the remaining trace length
//!   - `get_victim()`: O(W)
//! - **Space Complexity:** O(S × W) plus a shared handle on the trace

use super::{PolicyAccess, ReplacementPolicy};
use crate::common::address::AddressLayout;
use crate::sim::trace::Trace;

/// Optimal Policy state.
pub struct OptimalPolicy {
    /// Trace index of each line's next reference; `None` if never reused.
    next_use: Vec<Option<usize>>,
    ways: usize,
    layout: AddressLayout,
    trace: Trace,
}

impl OptimalPolicy {
    /// Creates a new optimal policy over `trace`.
    ///
    /// `layout` must be the owning level's layout so block identities match
    /// the ones passed to `update`.
    pub fn new(sets: usize, ways: usize, layout: AddressLayout, trace: Trace) -> Self {
        Self {
            next_use: vec![None; sets * ways],
            ways,
            layout,
            trace,
        }
    }

    /// Position of the first reference to `block` strictly after `trace_index`.
    pub fn next_reference(&self, block: u64, trace_index: usize) -> Option<usize> {
        let start = trace_index.saturating_add(1);
        self.trace
            .entries()
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .position(|entry| self.layout.block(entry.address) == block)
            .map(|offset| start + offset)
    }
}

impl ReplacementPolicy for OptimalPolicy {
    fn update(&mut self, set: usize, way: usize, access: &PolicyAccess) {
        let next = self.next_reference(access.block, access.trace_index);
        self.next_use[set * self.ways + way] = next;
    }

    fn get_victim(&self, set: usize) -> usize {
        let base = set * self.ways;
        let row = &self.next_use[base..base + self.ways];

        let mut victim = 0;
        let mut furthest = 0;
        for (way, next) in row.iter().enumerate() {
            match *next {
                None => return way,
                Some(index) if index > furthest => {
                    furthest = index;
                    victim = way;
                }
                Some(_) => {}
            }
        }
        victim
    }
}
