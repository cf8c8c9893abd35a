//! # abikit-crypto
//!
//! Hash primitives consumed by the abikit codec.
//!
//! - Keccak-256 hashing, injected into method compilation for selectors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::keccak256;
