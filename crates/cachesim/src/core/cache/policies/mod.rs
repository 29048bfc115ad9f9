//! Cache replacement policies.
//!
//! Each policy keeps per-set metadata for one cache level and answers two
//! questions: which way was just touched, and which way should be evicted
//! next. The level picks its policy once at construction through the closed
//! [`Policy`] enum.

use crate::common::address::AddressLayout;
use crate::config::{CacheConfig, ReplacementPolicy as PolicyKind};
use crate::sim::trace::Trace;

pub use self::lru::LruPolicy;
pub use self::optimal::OptimalPolicy;
pub use self::plru::PlruPolicy;

mod lru;
mod optimal;
mod plru;

/// Context of the access that touched a way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyAccess {
    /// Position of the triggering entry in the trace.
    pub trace_index: usize,
    /// Block identity (tag and index) that now occupies the way.
    pub block: u64,
}

pub trait ReplacementPolicy {
    /// Records a hit on, or a fill of, `way` in `set`.
    fn update(&mut self, set: usize, way: usize, access: &PolicyAccess);

    /// Returns the way of `set` to evict next.
    fn get_victim(&self, set: usize) -> usize;
}

/// Replacement policy bound to one cache level.
pub enum Policy {
    Lru(LruPolicy),
    Plru(PlruPolicy),
    Optimal(OptimalPolicy),
}

impl Policy {
    /// Builds the policy named by `config`. Only the optimal policy reads `trace`.
    pub fn new(config: &CacheConfig, layout: AddressLayout, trace: &Trace) -> Self {
        match config.policy {
            PolicyKind::Lru => Self::Lru(LruPolicy::new(config.sets, config.ways)),
            PolicyKind::Plru => Self::Plru(PlruPolicy::new(config.sets, config.ways)),
            PolicyKind::Optimal => Self::Optimal(OptimalPolicy::new(
                config.sets,
                config.ways,
                layout,
                trace.clone(),
            )),
        }
    }
}

impl ReplacementPolicy for Policy {
    #[inline]
    fn update(&mut self, set: usize, way: usize, access: &PolicyAccess) {
        match self {
            Self::Lru(p) => p.update(set, way, access),
            Self::Plru(p) => p.update(set, way, access),
            Self::Optimal(p) => p.update(set, way, access),
        }
    }

    #[inline]
    fn get_victim(&self, set: usize) -> usize {
        match self {
            Self::Lru(p) => p.get_victim(set),
            Self::Plru(p) => p.get_victim(set),
            Self::Optimal(p) => p.get_victim(set),
        }
    }
}
