//! # abikit-primitives
//!
//! Primitive types for the abikit ABI codec.
//!
//! This crate provides the fixed-width values that appear inside ABI calldata:
//! 20-byte addresses, 32-byte words and 256-bit integers (unsigned and signed).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod int;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, H256};
pub use int::{I256, IntError};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Size of an EVM word in bytes
pub const WORD_SIZE: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_size_matches_h256() {
        assert_eq!(WORD_SIZE, H256::LEN);
    }

    #[test]
    fn test_u256_word_roundtrip() {
        let value = U256::from(0xdead_beefu64);
        assert_eq!(H256::from_u256(value).to_u256(), value);
    }
}
