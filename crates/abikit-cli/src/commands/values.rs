//! JSON representation of ABI values
//!
//! Input is interpreted against the type tree: integers may be JSON numbers,
//! decimal strings or `0x` hex strings; addresses and byte strings are `0x`
//! hex; tuples are arrays or objects keyed by member name. Output uses decimal
//! strings for integers so no precision is lost.

use abikit_codec::{DataType, ScalarKind, TupleType, Value};
use abikit_primitives::{Address, I256, U256};
use serde_json::{Map, Value as Json};

use crate::CliError;

fn invalid(path: &str, reason: impl Into<String>) -> CliError {
    CliError::InvalidValue {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn child(path: &str, segment: &str) -> String {
    if segment.starts_with('[') {
        format!("{}{}", path, segment)
    } else {
        format!("{}.{}", path, segment)
    }
}

/// Decode a hex string with optional `0x` prefix
pub fn parse_hex(s: &str) -> Result<Vec<u8>, CliError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| CliError::InvalidHex(e.to_string()))
}

fn parse_u256(json: &Json, path: &str) -> Result<U256, CliError> {
    match json {
        Json::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| invalid(path, format!("{} is not an unsigned integer", n))),
        Json::String(s) => match s.strip_prefix("0x") {
            Some(digits) => U256::from_str_radix(digits, 16)
                .map_err(|_| invalid(path, format!("invalid hex integer {:?}", s))),
            None => U256::from_dec_str(s).map_err(|_| invalid(path, format!("invalid integer {:?}", s))),
        },
        other => Err(invalid(path, format!("expected integer, got {}", other))),
    }
}

fn parse_i256(json: &Json, path: &str) -> Result<I256, CliError> {
    match json {
        Json::Number(n) => n
            .as_i64()
            .map(I256::from)
            .ok_or_else(|| invalid(path, format!("{} is not an integer", n))),
        Json::String(s) if s.starts_with("0x") => Ok(I256::new(parse_u256(json, path)?, false)),
        Json::String(s) => I256::from_dec_str(s).map_err(|e| invalid(path, e.to_string())),
        other => Err(invalid(path, format!("expected integer, got {}", other))),
    }
}

fn expect_str<'a>(json: &'a Json, path: &str, what: &str) -> Result<&'a str, CliError> {
    json.as_str()
        .ok_or_else(|| invalid(path, format!("expected {} string, got {}", what, json)))
}

/// Build a value of type `ty` from JSON
pub fn value_from_json(ty: &DataType, json: &Json, path: &str) -> Result<Value, CliError> {
    match ty {
        DataType::Scalar(scalar) => match scalar.kind() {
            ScalarKind::Uint(_) => Ok(Value::Uint(parse_u256(json, path)?)),
            ScalarKind::Int(_) => Ok(Value::Int(parse_i256(json, path)?)),
            ScalarKind::Bool => json
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| invalid(path, format!("expected bool, got {}", json))),
            ScalarKind::Address => {
                let s = expect_str(json, path, "address")?;
                Address::from_hex(s)
                    .map(Value::Address)
                    .map_err(|e| invalid(path, e.to_string()))
            }
            ScalarKind::FixedBytes(_) => {
                let s = expect_str(json, path, "hex")?;
                parse_hex(s).map(Value::FixedBytes)
            }
            ScalarKind::Bytes => {
                let s = expect_str(json, path, "hex")?;
                parse_hex(s).map(Value::Bytes)
            }
            ScalarKind::String => Ok(Value::String(expect_str(json, path, "a")?.to_string())),
        },
        DataType::Tuple(tuple) => tuple_from_json(tuple, json, path),
        DataType::Array(array) => {
            let items = json
                .as_array()
                .ok_or_else(|| invalid(path, format!("expected array, got {}", json)))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| value_from_json(array.element(), item, &child(path, &format!("[{}]", i))))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
    }
}

/// Build a tuple value from a JSON array (positional) or object (by name)
pub fn tuple_from_json(tuple: &TupleType, json: &Json, path: &str) -> Result<Value, CliError> {
    match json {
        Json::Array(items) => {
            if items.len() != tuple.len() {
                return Err(invalid(
                    path,
                    format!("{} expects {} members, got {}", tuple.signature(), tuple.len(), items.len()),
                ));
            }
            tuple
                .members()
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (member, item))| {
                    let segment = member.name().map(str::to_string).unwrap_or_else(|| i.to_string());
                    value_from_json(member.data_type(), item, &child(path, &segment))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple)
        }
        Json::Object(fields) => {
            if let Some(unknown) = fields.keys().find(|k| !tuple.members().iter().any(|m| m.name() == Some(k.as_str()))) {
                return Err(invalid(path, format!("unknown field {:?}", unknown)));
            }
            tuple
                .members()
                .iter()
                .enumerate()
                .map(|(i, member)| -> Result<(String, Value), CliError> {
                    let name = member
                        .name()
                        .ok_or_else(|| invalid(path, format!("member {} has no name, use an array", i)))?;
                    let item = fields
                        .get(name)
                        .ok_or_else(|| invalid(&child(path, name), "missing field"))?;
                    Ok((name.to_string(), value_from_json(member.data_type(), item, &child(path, name))?))
                })
                .collect::<Result<Vec<_>, CliError>>()
                .map(Value::Record)
        }
        other => Err(invalid(path, format!("expected array or object, got {}", other))),
    }
}

/// Render a value as JSON
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Uint(v) => Json::String(v.to_string()),
        Value::Int(v) => Json::String(v.to_string()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Address(a) => Json::String(a.to_hex()),
        Value::FixedBytes(bytes) | Value::Bytes(bytes) => Json::String(format!("0x{}", hex::encode(bytes))),
        Value::String(s) => Json::String(s.clone()),
        Value::Array(items) | Value::Tuple(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Record(fields) => Json::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect::<Map<_, _>>(),
        ),
    }
}
