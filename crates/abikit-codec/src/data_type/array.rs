//! Array types

use abikit_primitives::WORD_SIZE;

use crate::calldata::{usize_word, CalldataCursor};
use crate::error::AbiError;
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

use super::composite::{self, Segment};
use super::DataType;

/// Homogeneous sequence, fixed (`T[k]`) or dynamic (`T[]`) length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    element: Box<DataType>,
    length: Option<usize>,
    signature: String,
    is_static: bool,
    /// Full width when static
    static_size: usize,
}

impl ArrayType {
    /// Build an array of `element`; `length` of `None` means dynamic
    pub fn new(element: DataType, length: Option<usize>) -> Result<Self, AbiError> {
        let signature = match length {
            Some(0) => return Err(AbiError::descriptor("fixed array length must be at least 1")),
            Some(n) => format!("{}[{}]", element.signature(), n),
            None => format!("{}[]", element.signature()),
        };
        if element.head_size() == 0 {
            return Err(AbiError::descriptor(format!("{} has an empty element type", signature)));
        }
        let is_static = length.is_some() && element.is_static();
        let static_size = if is_static {
            length
                .and_then(|n| n.checked_mul(element.head_size()))
                .ok_or_else(|| AbiError::descriptor(format!("{} is too large", signature)))?
        } else {
            0
        };
        Ok(Self {
            element: Box::new(element),
            length,
            signature,
            is_static,
            static_size,
        })
    }

    /// Element type
    pub fn element(&self) -> &DataType {
        &self.element
    }

    /// Fixed length, `None` for dynamic arrays
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Static if fixed-length with a static element
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Bytes occupied in a parent head
    pub fn head_size(&self) -> usize {
        if self.is_static {
            self.static_size
        } else {
            WORD_SIZE
        }
    }

    pub(crate) fn element_values<'v>(&self, value: &'v Value) -> Result<&'v [Value], AbiError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(AbiError::encoding(format!(
                    "expected {}, got {}",
                    self.signature,
                    other.kind_name()
                )))
            }
        };
        if let Some(n) = self.length {
            if items.len() != n {
                return Err(AbiError::encoding(format!(
                    "{} expects {} elements, got {}",
                    self.signature,
                    n,
                    items.len()
                )));
            }
        }
        Ok(items)
    }

    fn members<'a>(
        &'a self,
        items: &'a [Value],
    ) -> impl Iterator<Item = (Segment<'a>, &'a DataType, &'a Value)> + 'a {
        let element: &'a DataType = &self.element;
        items
            .iter()
            .enumerate()
            .map(move |(i, item)| (Segment::Element(i), element, item))
    }

    pub(crate) fn encode_region(&self, value: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        let items = self.element_values(value)?;
        let body = composite::encode_members(
            self.members(items),
            self.element.head_size() * items.len(),
            rules,
        )?;
        if self.length.is_some() {
            return Ok(body);
        }
        let mut out = Vec::with_capacity(WORD_SIZE + body.len());
        out.extend_from_slice(usize_word(items.len()).as_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub(crate) fn encoded_len(&self, value: &Value) -> Result<usize, AbiError> {
        if self.is_static {
            return Ok(self.static_size);
        }
        let items = self.element_values(value)?;
        let body = composite::encoded_members_len(self.members(items))?;
        Ok(if self.length.is_some() { body } else { WORD_SIZE + body })
    }

    pub(crate) fn decode_region(
        &self,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        match self.length {
            Some(n) => self.decode_elements(n, cursor, rules),
            None => {
                let n = cursor.read_length()?;
                let mut elements = cursor.enter_region();
                self.decode_elements(n, &mut elements, rules)
            }
        }
    }

    fn decode_elements(
        &self,
        len: usize,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        // Every element needs at least its head, so reject lengths the
        // buffer cannot hold before allocating for them
        let capacity = cursor.remaining() / self.element.head_size();
        if len > capacity {
            return Err(AbiError::decoding(format!(
                "{} declares {} elements, only {} fit in the remaining {} bytes",
                self.signature,
                len,
                capacity,
                cursor.remaining()
            )));
        }
        if self.length.is_none() {
            rules.check_length(len)?;
        }
        let element = &*self.element;
        let values = composite::decode_members(
            (0..len).map(|i| (Segment::Element(i), element)),
            cursor,
            rules,
        )?;
        Ok(Value::Array(values))
    }
}
