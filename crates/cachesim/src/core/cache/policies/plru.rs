//! Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates the Least Recently Used algorithm using a binary tree of bits.
//! It requires significantly less storage than full LRU (N-1 bits for N ways).
//!
//! Each bit in the tree represents a decision node pointing away from the most
//! recently used subtree. To find a victim, the tree is traversed following the
//! arrows (bits) to a leaf node.
//!
//! The tree is laid out heap-style: node `n` has children `2n + 1` (left half
//! of its way range) and `2n + 2` (right half). A non power of two
//! associativity is rounded up to the next power of two and any leaf past
//! the last real way is clamped to it.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(log W)
//!   - `get_victim()`: O(log W)
//! - **Space Complexity:** O(S × W) bits where S is sets, W is ways (much less than LRU)
//! - **Hardware Cost:** Low - simple bit operations
//! - **Best Case:** Similar to LRU for most access patterns
//! - **Worst Case:** Pathological cases can cause premature eviction of useful lines

use super::{PolicyAccess, ReplacementPolicy};

/// PLRU Policy state.
pub struct PlruPolicy {
    /// Direction bits, `nodes` per set. `true` means the victim lies in the right half.
    tree: Vec<bool>,
    /// Internal nodes per set.
    nodes: usize,
    /// Leaves per set (ways rounded up to a power of two).
    leaves: usize,
    /// Number of ways in the cache.
    ways: usize,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let leaves = ways.max(1).next_power_of_two();
        let nodes = leaves - 1;
        Self {
            tree: vec![false; sets * nodes],
            nodes,
            leaves,
            ways,
        }
    }

    fn bits(&self, set: usize) -> &[bool] {
        &self.tree[set * self.nodes..(set + 1) * self.nodes]
    }
}

impl ReplacementPolicy for PlruPolicy {
    /// Updates the tree bits on access.
    ///
    /// Sets the bits along the path to the accessed way to point away from it,
    /// protecting it from immediate eviction.
    fn update(&mut self, set: usize, way: usize, _access: &PolicyAccess) {
        let base = set * self.nodes;
        let (mut node, mut left, mut right) = (0, 0, self.leaves);

        while right - left > 1 {
            let mid = left + (right - left) / 2;
            if way < mid {
                self.tree[base + node] = true;
                node = 2 * node + 1;
                right = mid;
            } else {
                self.tree[base + node] = false;
                node = 2 * node + 2;
                left = mid;
            }
        }
    }

    /// Identifies the victim way to evict.
    ///
    /// Traverses the tree bits to find the pseudo-least-recently-used way.
    fn get_victim(&self, set: usize) -> usize {
        let bits = self.bits(set);
        let (mut node, mut left, mut right) = (0, 0, self.leaves);

        while right - left > 1 {
            let mid = left + (right - left) / 2;
            if bits[node] {
                node = 2 * node + 2;
                left = mid;
            } else {
                node = 2 * node + 1;
                right = mid;
            }
        }

        left.min(self.ways - 1)
    }
}
