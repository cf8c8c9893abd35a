//! Tuple types

use crate::calldata::CalldataCursor;
use crate::descriptor::TypeDescriptor;
use crate::error::AbiError;
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

use super::composite::{self, Segment};
use super::DataType;

/// Tuple member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    name: Option<String>,
    data_type: DataType,
}

impl Member {
    /// Create a member
    pub fn new(name: Option<String>, data_type: DataType) -> Self {
        Self { name, data_type }
    }

    /// Member name, if declared
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Member type
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn segment(&self, index: usize) -> Segment<'_> {
        match &self.name {
            Some(name) => Segment::Name(name),
            None => Segment::Index(index),
        }
    }
}

/// Ordered sequence of members encoded as one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
    members: Vec<Member>,
    signature: String,
    is_static: bool,
    /// Sum of member head sizes
    members_head_size: usize,
}

impl TupleType {
    /// Build from members. An empty tuple is allowed here (method without
    /// arguments) but rejected for tuple descriptors.
    pub fn new(members: Vec<Member>) -> Result<Self, AbiError> {
        let signature = format!(
            "({})",
            members
                .iter()
                .map(|m| m.data_type.signature())
                .collect::<Vec<_>>()
                .join(",")
        );
        let is_static = members.iter().all(|m| m.data_type.is_static());
        let members_head_size = members
            .iter()
            .try_fold(0usize, |acc, m| acc.checked_add(m.data_type.head_size()))
            .ok_or_else(|| AbiError::descriptor(format!("{} is too large", signature)))?;
        Ok(Self {
            members,
            signature,
            is_static,
            members_head_size,
        })
    }

    /// Build from component descriptors
    pub fn from_descriptors(components: &[TypeDescriptor]) -> Result<Self, AbiError> {
        let members = components
            .iter()
            .enumerate()
            .map(|(i, component)| -> Result<Member, AbiError> {
                let data_type = DataType::from_descriptor(component).map_err(|e| match &component.name {
                    Some(name) => e.within(name),
                    None => e.within(&i.to_string()),
                })?;
                Ok(Member::new(component.name.clone(), data_type))
            })
            .collect::<Result<Vec<_>, AbiError>>()?;
        Self::new(members)
    }

    /// Members in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the tuple has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Canonical signature, e.g. `(address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Static if every member is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Bytes occupied in a parent head
    pub fn head_size(&self) -> usize {
        if self.is_static {
            self.members_head_size
        } else {
            abikit_primitives::WORD_SIZE
        }
    }

    /// Whether every member has a name, so decoded values can be records
    pub fn all_named(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|m| m.name.is_some())
    }

    /// Encode a tuple or record value as a standalone region
    pub fn encode(&self, value: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        self.encode_region(value, rules)
    }

    /// Decode a standalone region
    pub fn decode(&self, data: &[u8], rules: &DecodingRules) -> Result<Value, AbiError> {
        self.decode_region(&mut CalldataCursor::new(data), rules)
    }

    /// Pair each member with its value.
    ///
    /// Positional tuples must match the arity. Records are matched by member
    /// name and need every member named.
    pub(crate) fn member_values<'t, 'v>(
        &'t self,
        value: &'v Value,
        rules: &EncodingRules,
    ) -> Result<Vec<(Segment<'t>, &'t DataType, &'v Value)>, AbiError> {
        match value {
            Value::Tuple(items) => {
                if items.len() != self.members.len() {
                    return Err(AbiError::encoding(format!(
                        "{} expects {} members, got {}",
                        self.signature,
                        self.members.len(),
                        items.len()
                    )));
                }
                Ok(self
                    .members
                    .iter()
                    .zip(items)
                    .enumerate()
                    .map(|(i, (member, item))| (member.segment(i), &member.data_type, item))
                    .collect())
            }
            Value::Record(fields) if rules.accept_records => {
                if fields.len() != self.members.len() {
                    return Err(AbiError::encoding(format!(
                        "{} expects {} fields, got {}",
                        self.signature,
                        self.members.len(),
                        fields.len()
                    )));
                }
                self.members
                    .iter()
                    .enumerate()
                    .map(|(i, member)| -> Result<_, AbiError> {
                        let name = member.name.as_deref().ok_or_else(|| {
                            AbiError::encoding(format!(
                                "member {} of {} has no name, pass a positional tuple",
                                i, self.signature
                            ))
                        })?;
                        let field = fields
                            .iter()
                            .find(|(key, _)| key == name)
                            .map(|(_, v)| v)
                            .ok_or_else(|| AbiError::encoding("missing field").within(name))?;
                        Ok((Segment::Name(name), &member.data_type, field))
                    })
                    .collect()
            }
            Value::Record(_) => Err(AbiError::encoding(format!(
                "records are not accepted for {}, pass a positional tuple",
                self.signature
            ))),
            other => Err(AbiError::encoding(format!(
                "expected {}, got {}",
                self.signature,
                other.kind_name()
            ))),
        }
    }

    pub(crate) fn encode_region(&self, value: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        let members = self.member_values(value, rules)?;
        composite::encode_members(members, self.members_head_size, rules)
    }

    pub(crate) fn encoded_len(&self, value: &Value) -> Result<usize, AbiError> {
        if self.is_static {
            return Ok(self.members_head_size);
        }
        let members = self.member_values(value, &EncodingRules::default())?;
        composite::encoded_members_len(members)
    }

    pub(crate) fn decode_region(
        &self,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        let members = self
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| (member.segment(i), &member.data_type));
        let values = composite::decode_members(members, cursor, rules)?;

        if rules.structs_as_records && self.all_named() {
            let fields = self
                .members
                .iter()
                .zip(values)
                .map(|(member, value)| (member.name.clone().unwrap_or_default(), value))
                .collect();
            Ok(Value::Record(fields))
        } else {
            Ok(Value::Tuple(values))
        }
    }
}
