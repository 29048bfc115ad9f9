//! Shared types used across the simulator.

/// Fixed-width addresses and their decomposition.
pub mod address;

/// Error types returned by configuration, trace loading and I/O.
pub mod error;

pub use self::address::{Address, AddressLayout, DecodedAddress};
pub use self::error::{ConfigError, Result, SimError};
