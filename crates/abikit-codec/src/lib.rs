//! # abikit-codec
//!
//! Ethereum contract ABI encoder and decoder.
//!
//! ## Features
//!
//! - **DataType**: type tree compiled once from a descriptor, with cached
//!   canonical signatures and static/dynamic classification
//! - **Method**: selector-prefixed call data and selector-free return data
//! - **Contract**: method sets with selector dispatch, loadable from ABI JSON
//! - **Rules**: encoding and decoding options (payload reuse, records, strict
//!   decoding, length limits)
//!
//! ## Quick Start
//!
//! ```rust
//! use abikit_codec::{Method, Value};
//! use abikit_primitives::Address;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transfer = Method::from_signature("transfer(address to, uint256 amount)(bool)")?;
//! assert_eq!(transfer.selector_hex(), "0xa9059cbb");
//!
//! let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//! let calldata = transfer.encode(&Value::Tuple(vec![Value::Address(to), Value::uint(1000)]))?;
//! assert_eq!(calldata.len(), 4 + 64);
//!
//! let args = transfer.decode(&calldata)?;
//! assert_eq!(args.field("amount"), Some(&Value::uint(1000)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Standalone types
//!
//! ```rust
//! use abikit_codec::{DataType, DecodingRules, EncodingRules, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ty = DataType::parse("(bytes,uint256[])")?;
//! assert!(ty.is_dynamic());
//!
//! let value = Value::Tuple(vec![
//!     Value::Bytes(vec![0xca, 0xfe]),
//!     Value::Array(vec![Value::uint(1), Value::uint(2)]),
//! ]);
//! let encoded = ty.encode(&value, &EncodingRules::default())?;
//! assert_eq!(ty.decode(&encoded, &DecodingRules::default())?, value);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calldata;
pub mod contract;
pub mod data_type;
mod descriptor;
mod error;
pub mod json;
mod method;
mod rules;
mod value;

pub use calldata::{CalldataCursor, CalldataWriter};
pub use contract::Contract;
pub use data_type::{ArrayType, DataType, Member, ScalarKind, ScalarType, TupleType};
pub use descriptor::{MethodDescriptor, TypeDescriptor, TypeKind};
pub use error::{AbiError, Path};
pub use json::{AbiEntry, AbiParam};
pub use method::{Method, SELECTOR_LEN};
pub use rules::{DecodingRules, EncodingRules, Rules};
pub use value::Value;

// Re-export primitives for convenience
pub use abikit_primitives::{Address, H256, I256, U256};
