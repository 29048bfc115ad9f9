//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize a simulation. It provides:
//! 1. **Defaults:** Baseline geometry used when a field is omitted.
//! 2. **Structures:** `SimConfig` as supplied by the user, and the validated
//!    per-level `CacheConfig` derived from it.
//! 3. **Enums:** Replacement policy and inclusion property, accepted either
//!    as the numeric codes of the command line or as names in JSON.
//!
//! Configuration is supplied positionally on the command line, as a JSON
//! file, or as a dict from the Python API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::address::{AddressLayout, DEFAULT_ADDRESS_BITS};
use crate::common::error::ConfigError;

/// Default geometry used when a field is omitted from a JSON config.
mod defaults {
    /// Cache line size in bytes.
    pub const BLOCK_SIZE: usize = 32;

    /// L1 capacity in bytes.
    pub const L1_SIZE: usize = 1024;

    /// L1 associativity.
    pub const L1_WAYS: usize = 2;

    /// L2 capacity in bytes. Zero disables the level.
    pub const L2_SIZE: usize = 0;

    /// L2 associativity.
    pub const L2_WAYS: usize = 4;
}

/// Cache replacement policy algorithms.
///
/// Every level of a hierarchy uses the same policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evicts the line referenced least recently.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Tree-based approximation of LRU.
    #[serde(alias = "Plru", alias = "PseudoLru")]
    Plru,
    /// Belady's algorithm: evicts the line reused furthest in the future.
    #[serde(alias = "Optimal")]
    Optimal,
}

impl TryFrom<u32> for ReplacementPolicy {
    type Error = ConfigError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Lru),
            1 => Ok(Self::Plru),
            2 => Ok(Self::Optimal),
            other => Err(ConfigError::UnsupportedPolicy(other)),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lru => "LRU",
            Self::Plru => "Pseudo-LRU",
            Self::Optimal => "Optimal",
        };
        f.write_str(name)
    }
}

/// Multi-level inclusion property.
///
/// Recorded and reported only; the hierarchy does not back-invalidate or
/// force fills to maintain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionProperty {
    #[default]
    #[serde(alias = "NonInclusive")]
    NonInclusive,
    #[serde(alias = "Inclusive")]
    Inclusive,
}

impl TryFrom<u32> for InclusionProperty {
    type Error = ConfigError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NonInclusive),
            1 => Ok(Self::Inclusive),
            other => Err(ConfigError::UnsupportedInclusion(other)),
        }
    }
}

impl fmt::Display for InclusionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonInclusive => f.write_str("non-inclusive"),
            Self::Inclusive => f.write_str("inclusive"),
        }
    }
}

/// Capacity and associativity of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Total capacity in bytes. Zero disables the level.
    pub size_bytes: usize,
    /// Number of ways per set.
    pub ways: usize,
}

impl LevelConfig {
    pub fn new(size_bytes: usize, ways: usize) -> Self {
        Self { size_bytes, ways }
    }

    pub fn is_enabled(&self) -> bool {
        self.size_bytes > 0
    }

    fn default_l1() -> Self {
        Self::new(defaults::L1_SIZE, defaults::L1_WAYS)
    }

    fn default_l2() -> Self {
        Self::new(defaults::L2_SIZE, defaults::L2_WAYS)
    }
}

/// Root simulation configuration.
///
/// # Examples
///
/// ```
/// use cachesim::config::{ReplacementPolicy, SimConfig};
///
/// let json = r#"{
///     "block_size": 16,
///     "l1": { "size_bytes": 1024, "ways": 2 },
///     "l2": { "size_bytes": 8192, "ways": 4 },
///     "policy": "PLRU"
/// }"#;
///
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.policy, ReplacementPolicy::Plru);
/// assert_eq!(config.level_configs().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Line size in bytes, shared by every level.
    #[serde(default = "SimConfig::default_block_size")]
    pub block_size: usize,

    /// First-level cache.
    #[serde(default = "LevelConfig::default_l1")]
    pub l1: LevelConfig,

    /// Second-level cache; `size_bytes == 0` disables it.
    #[serde(default = "LevelConfig::default_l2")]
    pub l2: LevelConfig,

    /// Replacement policy for every level.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Inclusion property (not enforced).
    #[serde(default)]
    pub inclusion: InclusionProperty,

    /// Width of trace addresses in bits.
    #[serde(default = "SimConfig::default_address_bits")]
    pub address_bits: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            l1: LevelConfig::default_l1(),
            l2: LevelConfig::default_l2(),
            policy: ReplacementPolicy::default(),
            inclusion: InclusionProperty::default(),
            address_bits: DEFAULT_ADDRESS_BITS,
        }
    }
}

impl SimConfig {
    fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    fn default_address_bits() -> u32 {
        DEFAULT_ADDRESS_BITS
    }

    /// Builds a configuration from the numeric command-line codes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown policy or inclusion code. Geometry
    /// is checked later by [`SimConfig::level_configs`].
    pub fn from_codes(
        block_size: usize,
        l1: LevelConfig,
        l2: LevelConfig,
        policy: u32,
        inclusion: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            block_size,
            l1,
            l2,
            policy: ReplacementPolicy::try_from(policy)?,
            inclusion: InclusionProperty::try_from(inclusion)?,
            address_bits: DEFAULT_ADDRESS_BITS,
        })
    }

    /// Resolves and validates the geometry of every enabled level, L1 first.
    pub fn level_configs(&self) -> Result<Vec<CacheConfig>, ConfigError> {
        let mut levels = vec![CacheConfig::new("L1", self, &self.l1)?];
        if self.l2.is_enabled() {
            levels.push(CacheConfig::new("L2", self, &self.l2)?);
        }
        Ok(levels)
    }

    /// Checks the configuration without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_configs().map(|_| ())
    }
}

/// Validated geometry of one cache level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub name: String,
    pub block_size: usize,
    pub size_bytes: usize,
    pub ways: usize,
    pub sets: usize,
    pub policy: ReplacementPolicy,
    pub inclusion: InclusionProperty,
    pub address_bits: u32,
}

impl CacheConfig {
    /// Derives and checks the geometry of `level` under `sim`.
    ///
    /// # Errors
    ///
    /// Fails if the block size or resulting set count is not a power of two,
    /// the associativity is zero, the capacity does not divide into whole
    /// sets, or the offset and index fields do not fit in the address width.
    pub fn new(name: &str, sim: &SimConfig, level: &LevelConfig) -> Result<Self, ConfigError> {
        if sim.address_bits == 0 || sim.address_bits > u64::BITS {
            return Err(ConfigError::AddressWidth(sim.address_bits));
        }
        if !sim.block_size.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(sim.block_size));
        }
        if level.ways == 0 {
            return Err(ConfigError::ZeroAssociativity {
                level: name.to_string(),
            });
        }

        let set_bytes = sim.block_size.saturating_mul(level.ways);
        if level.size_bytes % set_bytes != 0 {
            return Err(ConfigError::UnevenCapacity {
                level: name.to_string(),
                size_bytes: level.size_bytes,
                set_bytes,
            });
        }

        let sets = level.size_bytes / set_bytes;
        if !sets.is_power_of_two() {
            return Err(ConfigError::InvalidSetCount {
                level: name.to_string(),
                sets,
            });
        }

        let offset_bits = sim.block_size.trailing_zeros();
        let index_bits = sets.trailing_zeros();
        if offset_bits + index_bits > sim.address_bits {
            return Err(ConfigError::GeometryTooWide {
                level: name.to_string(),
                offset_bits,
                index_bits,
                width: sim.address_bits,
            });
        }

        Ok(Self {
            name: name.to_string(),
            block_size: sim.block_size,
            size_bytes: level.size_bytes,
            ways: level.ways,
            sets,
            policy: sim.policy,
            inclusion: sim.inclusion,
            address_bits: sim.address_bits,
        })
    }

    pub fn layout(&self) -> AddressLayout {
        AddressLayout::new(self.block_size, self.sets, self.address_bits)
    }
}
