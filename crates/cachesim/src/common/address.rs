//! Fixed-width addresses and their cache decomposition.
//!
//! An address is split positionally into three non-overlapping fields:
//!
//! ```text
//! | tag (width - index - offset) | index (log2 sets) | offset (log2 block) |
//! ```
//!
//! The split is purely a function of the level geometry, so `encode` of a
//! `decode` always reproduces the original bit pattern. The module also
//! provides the hex and fixed-width binary text forms used by trace files
//! and reports.

use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// Default address width in bits.
pub const DEFAULT_ADDRESS_BITS: u32 = 32;

/// A byte address in the simulated address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    /// Parses a bare hexadecimal string (no `0x` prefix) into a `width`-bit address.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Address` if the string is empty, contains a
    /// non-hex character, or encodes a value that does not fit in `width` bits.
    pub fn from_hex(text: &str, width: u32) -> Result<Self> {
        let invalid = |reason: &str| SimError::Address {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("empty address"));
        }
        if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("not a hexadecimal number"));
        }

        let digits = text.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self(0));
        }
        let value =
            u64::from_str_radix(digits, 16).map_err(|_| invalid("does not fit in 64 bits"))?;
        if value & !mask(width) != 0 {
            return Err(invalid(&format!("does not fit in {} bits", width)));
        }
        Ok(Self(value))
    }

    /// Lowercase hex without leading zeros.
    pub fn to_hex(&self) -> String {
        format!("{:x}", self.0)
    }

    /// Binary string zero-extended to `width` characters.
    pub fn to_binary(&self, width: u32) -> String {
        format!("{:0width$b}", self.0, width = width as usize)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Low `bits` set; saturates at 64.
#[inline]
pub fn mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Splits `address` into `(tag, index, offset)`.
pub fn decode(address: u64, offset_bits: u32, index_bits: u32) -> (u64, u64, u64) {
    let offset = address & mask(offset_bits);
    let index = address.checked_shr(offset_bits).unwrap_or(0) & mask(index_bits);
    let tag = address
        .checked_shr(offset_bits + index_bits)
        .unwrap_or(0);
    (tag, index, offset)
}

/// Reassembles an address from its fields. Inverse of [`decode`].
pub fn encode(tag: u64, index: u64, offset: u64, offset_bits: u32, index_bits: u32) -> u64 {
    let tag_part = tag.checked_shl(offset_bits + index_bits).unwrap_or(0);
    let index_part = (index & mask(index_bits))
        .checked_shl(offset_bits)
        .unwrap_or(0);
    tag_part | index_part | (offset & mask(offset_bits))
}

/// Converts a hex address to a binary string zero-extended to `width` bits.
pub fn to_binary_fixed_width(hex: &str, width: u32) -> Result<String> {
    Ok(Address::from_hex(hex, width)?.to_binary(width))
}

/// Converts a binary string to lowercase hex, dropping leading zero bits.
///
/// An all-zero input yields `"0"`.
pub fn to_hex(bits: &str) -> Result<String> {
    let invalid = |reason: &str| SimError::Address {
        text: bits.to_string(),
        reason: reason.to_string(),
    };

    if bits.is_empty() {
        return Err(invalid("empty bit string"));
    }
    if !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(invalid("not a binary number"));
    }

    let significant = bits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok("0".to_string());
    }
    let value =
        u64::from_str_radix(significant, 2).map_err(|_| invalid("does not fit in 64 bits"))?;
    Ok(format!("{:x}", value))
}

/// One address split into its cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u64,
    pub index: usize,
    pub offset: u64,
}

/// Bit layout of addresses for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
    width: u32,
}

impl AddressLayout {
    /// Builds the layout for `block_size`-byte lines spread over `sets` sets.
    ///
    /// Both values must already be validated as powers of two.
    pub fn new(block_size: usize, sets: usize, width: u32) -> Self {
        debug_assert!(block_size.is_power_of_two());
        debug_assert!(sets.is_power_of_two());
        Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: sets.trailing_zeros(),
            width,
        }
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        self.width - self.offset_bits - self.index_bits
    }

    pub fn decode(&self, addr: Address) -> DecodedAddress {
        let (tag, index, offset) = decode(addr.val(), self.offset_bits, self.index_bits);
        DecodedAddress {
            tag,
            index: index as usize,
            offset,
        }
    }

    pub fn encode(&self, fields: &DecodedAddress) -> Address {
        Address(encode(
            fields.tag,
            fields.index as u64,
            fields.offset,
            self.offset_bits,
            self.index_bits,
        ))
    }

    /// Block identity (tag and index together) of `addr`.
    #[inline]
    pub fn block(&self, addr: Address) -> u64 {
        addr.val().checked_shr(self.offset_bits).unwrap_or(0)
    }

    /// Block-aligned address of the line holding `tag` in `set`.
    pub fn line_address(&self, tag: u64, set: usize) -> Address {
        self.encode(&DecodedAddress {
            tag,
            index: set,
            offset: 0,
        })
    }
}
