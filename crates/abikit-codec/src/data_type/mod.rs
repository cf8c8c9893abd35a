//! Data types: the immutable type tree that drives encoding and decoding
//!
//! A [`DataType`] is built once from a [`TypeDescriptor`] and caches its
//! canonical signature and static/dynamic classification. It holds no
//! per-call state, so one tree can serve any number of concurrent calls.

mod array;
mod composite;
mod scalar;
mod tuple;

pub use array::ArrayType;
pub use scalar::{ScalarKind, ScalarType};
pub use tuple::{Member, TupleType};

use abikit_primitives::WORD_SIZE;

use crate::calldata::{CalldataCursor, CalldataWriter};
use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::AbiError;
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

use composite::Segment;

/// An ABI type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Elementary type
    Scalar(ScalarType),
    /// Tuple (struct)
    Tuple(TupleType),
    /// Fixed or dynamic array
    Array(ArrayType),
}

impl DataType {
    /// Build a type tree from a descriptor
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Result<Self, AbiError> {
        let expect_leaf = |descriptor: &TypeDescriptor| {
            if !descriptor.components.is_empty() {
                return Err(AbiError::descriptor(format!(
                    "{} cannot have components",
                    descriptor.kind
                )));
            }
            Ok(())
        };
        let expect_no_width = |descriptor: &TypeDescriptor| {
            if let Some(width) = descriptor.width {
                return Err(AbiError::descriptor(format!(
                    "{} does not take a width, got {}",
                    descriptor.kind, width
                )));
            }
            Ok(())
        };
        let required_width = |descriptor: &TypeDescriptor| {
            descriptor.width.ok_or_else(|| {
                AbiError::descriptor(format!("{} requires a width", descriptor.kind))
            })
        };

        let data_type = match descriptor.kind {
            TypeKind::Uint => {
                expect_leaf(descriptor)?;
                DataType::Scalar(ScalarType::new(ScalarKind::Uint(required_width(descriptor)?))?)
            }
            TypeKind::Int => {
                expect_leaf(descriptor)?;
                DataType::Scalar(ScalarType::new(ScalarKind::Int(required_width(descriptor)?))?)
            }
            TypeKind::FixedBytes => {
                expect_leaf(descriptor)?;
                DataType::Scalar(ScalarType::new(ScalarKind::FixedBytes(required_width(descriptor)?))?)
            }
            TypeKind::Bool | TypeKind::Address | TypeKind::Bytes | TypeKind::String => {
                expect_leaf(descriptor)?;
                expect_no_width(descriptor)?;
                let kind = match descriptor.kind {
                    TypeKind::Bool => ScalarKind::Bool,
                    TypeKind::Address => ScalarKind::Address,
                    TypeKind::Bytes => ScalarKind::Bytes,
                    _ => ScalarKind::String,
                };
                DataType::Scalar(ScalarType::new(kind)?)
            }
            TypeKind::Tuple => {
                expect_no_width(descriptor)?;
                if descriptor.components.is_empty() {
                    return Err(AbiError::descriptor("tuple requires at least one component"));
                }
                DataType::Tuple(TupleType::from_descriptors(&descriptor.components)?)
            }
            TypeKind::Array => {
                let element = match descriptor.components.as_slice() {
                    [element] => element,
                    other => {
                        return Err(AbiError::descriptor(format!(
                            "array requires exactly one element type, got {}",
                            other.len()
                        )))
                    }
                };
                let element = DataType::from_descriptor(element).map_err(|e| e.within("[]"))?;
                DataType::Array(ArrayType::new(element, descriptor.width)?)
            }
        };
        Ok(data_type)
    }

    /// Parse a type string (see [`TypeDescriptor::parse`]) and build its tree
    pub fn parse(s: &str) -> Result<Self, AbiError> {
        Self::from_descriptor(&TypeDescriptor::parse(s)?)
    }

    /// Canonical type signature, e.g. `(uint256,bytes)[]`
    pub fn signature(&self) -> &str {
        match self {
            DataType::Scalar(s) => s.signature(),
            DataType::Tuple(t) => t.signature(),
            DataType::Array(a) => a.signature(),
        }
    }

    /// Whether the encoded width is independent of the value
    pub fn is_static(&self) -> bool {
        match self {
            DataType::Scalar(s) => s.is_static(),
            DataType::Tuple(t) => t.is_static(),
            DataType::Array(a) => a.is_static(),
        }
    }

    /// Whether the type is encoded out of line behind an offset word
    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    /// Bytes this type occupies in the head of its enclosing region:
    /// its full width if static, one offset word if dynamic.
    pub fn head_size(&self) -> usize {
        match self {
            DataType::Scalar(_) => WORD_SIZE,
            DataType::Tuple(t) => t.head_size(),
            DataType::Array(a) => a.head_size(),
        }
    }

    /// Length of the encoding of `value` in this type's own region
    /// (excluding the offset word a parent writes for dynamic types)
    pub fn encoded_len(&self, value: &Value) -> Result<usize, AbiError> {
        match self {
            DataType::Scalar(s) => s.encoded_len(value),
            DataType::Tuple(t) => t.encoded_len(value),
            DataType::Array(a) => a.encoded_len(value),
        }
    }

    /// Encode a standalone value.
    ///
    /// A tuple writes its members directly; any other type is encoded as the
    /// single member of an enclosing tuple, so dynamic values get a leading
    /// offset word.
    pub fn encode(&self, value: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        tracing::trace!(signature = self.signature(), "encoding value");
        match self {
            DataType::Tuple(t) => t.encode_region(value, rules),
            _ => composite::encode_members([(Segment::Root, self, value)], self.head_size(), rules),
        }
    }

    /// Decode a standalone value produced by [`DataType::encode`]
    pub fn decode(&self, data: &[u8], rules: &DecodingRules) -> Result<Value, AbiError> {
        tracing::trace!(signature = self.signature(), len = data.len(), "decoding value");
        let mut cursor = CalldataCursor::new(data);
        match self {
            DataType::Tuple(t) => t.decode_region(&mut cursor, rules),
            _ => self.decode_from(&mut cursor, rules),
        }
    }

    /// Get as tuple
    pub fn as_tuple(&self) -> Option<&TupleType> {
        match self {
            DataType::Tuple(t) => Some(t),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            DataType::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as scalar
    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            DataType::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Write a static value into the head of `writer`
    pub(crate) fn encode_inline(
        &self,
        value: &Value,
        writer: &mut CalldataWriter,
        rules: &EncodingRules,
    ) -> Result<(), AbiError> {
        debug_assert!(self.is_static(), "inline encoding of dynamic type {}", self.signature());
        match self {
            DataType::Scalar(s) => {
                writer.write_word(&s.encode_word(value)?);
                Ok(())
            }
            DataType::Tuple(t) => {
                for (segment, data_type, member) in t.member_values(value, rules)? {
                    data_type
                        .encode_inline(member, writer, rules)
                        .map_err(|e| e.within(&segment.to_string()))?;
                }
                Ok(())
            }
            DataType::Array(a) => {
                for (i, element) in a.element_values(value)?.iter().enumerate() {
                    a.element()
                        .encode_inline(element, writer, rules)
                        .map_err(|e| e.within(&Segment::Element(i).to_string()))?;
                }
                Ok(())
            }
        }
    }

    /// Encode `value` as the contents of this type's own region
    pub(crate) fn encode_region(&self, value: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        match self {
            DataType::Scalar(s) => s.encode_region(value),
            DataType::Tuple(t) => t.encode_region(value, rules),
            DataType::Array(a) => a.encode_region(value, rules),
        }
    }

    /// Decode from a parent head: inline if static, through the offset word
    /// at the read position if dynamic.
    pub(crate) fn decode_from(
        &self,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        if self.is_static() {
            return self.decode_region(cursor, rules);
        }
        let offset = cursor.read_word()?;
        let mut region = cursor.follow_offset(&offset)?;
        self.decode_region(&mut region, rules)
    }

    /// Decode the contents of this type's own region
    pub(crate) fn decode_region(
        &self,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        match self {
            DataType::Scalar(s) => s.decode_region(cursor, rules),
            DataType::Tuple(t) => t.decode_region(cursor, rules),
            DataType::Array(a) => a.decode_region(cursor, rules),
        }
    }
}
