/// Set-associative cache levels and their replacement policies.
pub mod cache;

/// The L1 -> L2 level chain.
pub mod hierarchy;

pub use self::cache::{AccessOutcome, CacheLevel, CacheLine};
pub use self::hierarchy::CacheHierarchy;
