//! Head/tail layout shared by tuples and arrays

use std::fmt;

use crate::calldata::{usize_word, CalldataCursor, CalldataWriter};
use crate::error::AbiError;
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

use super::DataType;

/// Path segment naming one member of a composite
#[derive(Debug, Clone, Copy)]
pub(crate) enum Segment<'a> {
    /// The value itself
    Root,
    /// Named tuple member
    Name(&'a str),
    /// Unnamed tuple member
    Index(usize),
    /// Array element
    Element(usize),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Root => Ok(()),
            Segment::Name(name) => f.write_str(name),
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Element(i) => write!(f, "[{}]", i),
        }
    }
}

/// Encode members into one region.
///
/// Static members are written inline in declaration order. Each dynamic
/// member gets a placeholder head word; once every head is written the queued
/// members are encoded into the tail and their placeholders patched with the
/// region-relative offset.
pub(crate) fn encode_members<'t, 'v, I>(
    members: I,
    head_size: usize,
    rules: &EncodingRules,
) -> Result<Vec<u8>, AbiError>
where
    I: IntoIterator<Item = (Segment<'t>, &'t DataType, &'v Value)>,
{
    let mut writer = CalldataWriter::new(head_size).with_optimize(rules.optimize);
    let mut deferred = Vec::new();

    for (segment, data_type, value) in members {
        if data_type.is_static() {
            data_type
                .encode_inline(value, &mut writer, rules)
                .map_err(|e| e.within(&segment.to_string()))?;
        } else {
            let slot = writer.reserve_word();
            deferred.push((slot, segment, data_type, value));
        }
    }

    for (slot, segment, data_type, value) in deferred {
        let payload = data_type
            .encode_region(value, rules)
            .map_err(|e| e.within(&segment.to_string()))?;
        let offset = writer.append_heap_bytes(&payload);
        writer.patch_word(slot, &usize_word(offset));
    }

    Ok(writer.into_bytes())
}

/// Decode members from one region, following offsets against its base
pub(crate) fn decode_members<'t, I>(
    members: I,
    cursor: &mut CalldataCursor<'_>,
    rules: &DecodingRules,
) -> Result<Vec<Value>, AbiError>
where
    I: IntoIterator<Item = (Segment<'t>, &'t DataType)>,
{
    members
        .into_iter()
        .map(|(segment, data_type)| {
            data_type
                .decode_from(cursor, rules)
                .map_err(|e| e.within(&segment.to_string()))
        })
        .collect()
}

/// Sum of region lengths as laid out by [`encode_members`] without reuse
pub(crate) fn encoded_members_len<'t, 'v, I>(members: I) -> Result<usize, AbiError>
where
    I: IntoIterator<Item = (Segment<'t>, &'t DataType, &'v Value)>,
{
    let mut total = 0usize;
    for (segment, data_type, value) in members {
        let len = if data_type.is_static() {
            data_type.head_size()
        } else {
            let body = data_type
                .encoded_len(value)
                .map_err(|e| e.within(&segment.to_string()))?;
            data_type.head_size() + body
        };
        total = total
            .checked_add(len)
            .ok_or_else(|| AbiError::encoding("encoded length overflows usize"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_display() {
        assert_eq!(Segment::Root.to_string(), "");
        assert_eq!(Segment::Name("to").to_string(), "to");
        assert_eq!(Segment::Index(1).to_string(), "1");
        assert_eq!(Segment::Element(2).to_string(), "[2]");
    }

    #[test]
    fn test_mixed_members_layout() {
        // (uint256, bytes, bool) with bytes = 0x0102
        let uint = DataType::parse("uint256").unwrap();
        let bytes = DataType::parse("bytes").unwrap();
        let boolean = DataType::parse("bool").unwrap();
        let a = Value::uint(9);
        let b = Value::Bytes(vec![1, 2]);
        let c = Value::Bool(true);

        let out = encode_members(
            [
                (Segment::Index(0), &uint, &a),
                (Segment::Index(1), &bytes, &b),
                (Segment::Index(2), &boolean, &c),
            ],
            96,
            &EncodingRules::default(),
        )
        .unwrap();

        assert_eq!(out.len(), 160);
        assert_eq!(out[31], 9);
        assert_eq!(out[63], 96); // offset past the three head words
        assert_eq!(out[95], 1);
        assert_eq!(out[127], 2); // length
        assert_eq!(&out[128..130], &[1, 2]);
    }
}
