//! ABI values

use abikit_primitives::{Address, I256, U256};

/// A decoded or to-be-encoded ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer (uint8-uint256)
    Uint(U256),
    /// Signed integer (int8-int256)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Address (20 bytes)
    Address(Address),
    /// Fixed-size bytes (bytes1-bytes32)
    FixedBytes(Vec<u8>),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Fixed or dynamic array
    Array(Vec<Value>),
    /// Tuple with positional members
    Tuple(Vec<Value>),
    /// Tuple with named members, in declaration order
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Create a uint value from u128
    pub fn uint(value: u128) -> Self {
        Value::Uint(U256::from(value))
    }

    /// Create an int value from i128
    pub fn int(value: i128) -> Self {
        Value::Int(I256::from_i128(value))
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a record from `(name, value)` pairs
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
        }
    }

    /// Members of a tuple or record, or elements of an array
    pub fn members(&self) -> Option<Vec<&Value>> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items.iter().collect()),
            Value::Record(fields) => Some(fields.iter().map(|(_, v)| v).collect()),
            _ => None,
        }
    }

    /// Field of a record by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert records into positional tuples, recursively
    pub fn into_positional(self) -> Value {
        match self {
            Value::Record(fields) => {
                Value::Tuple(fields.into_iter().map(|(_, v)| v.into_positional()).collect())
            }
            Value::Tuple(items) => Value::Tuple(items.into_iter().map(Value::into_positional).collect()),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::into_positional).collect()),
            other => other,
        }
    }

    /// Get as uint
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as address
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_field_lookup() {
        let v = Value::record([("to", Value::Address(Address::ZERO)), ("amount", Value::uint(5))]);
        assert_eq!(v.field("amount"), Some(&Value::uint(5)));
        assert_eq!(v.field("missing"), None);
    }

    #[test]
    fn test_into_positional_is_recursive() {
        let v = Value::Array(vec![Value::record([("a", Value::Bool(true))])]);
        assert_eq!(
            v.into_positional(),
            Value::Array(vec![Value::Tuple(vec![Value::Bool(true)])])
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::uint(1).kind_name(), "uint");
        assert_eq!(Value::string("x").kind_name(), "string");
        assert_eq!(Value::Tuple(vec![]).kind_name(), "tuple");
    }
}
