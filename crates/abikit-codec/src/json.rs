//! ABI JSON front end
//!
//! Deserializes the Solidity compiler's ABI JSON into descriptors. Only the
//! fields the codec needs are read; everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::error::AbiError;

/// One parameter of an ABI entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name, empty if unnamed
    #[serde(default)]
    pub name: String,
    /// Type string, e.g. `uint256`, `tuple[]`
    #[serde(rename = "type")]
    pub ty: String,
    /// Tuple members for `tuple` types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Convert to a type descriptor
    pub fn to_descriptor(&self) -> Result<TypeDescriptor, AbiError> {
        let components = self
            .components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                component.to_descriptor().map_err(|e| {
                    if component.name.is_empty() {
                        e.within(&i.to_string())
                    } else {
                        e.within(&component.name)
                    }
                })
            })
            .collect::<Result<Vec<_>, AbiError>>()?;

        let mut descriptor = TypeDescriptor::parse_with_components(&self.ty, components)?;
        descriptor.name = if self.name.is_empty() { None } else { Some(self.name.clone()) };
        Ok(descriptor)
    }
}

/// One entry of an ABI JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    /// `function`, `event`, `constructor`, ...
    #[serde(rename = "type", default = "default_entry_type")]
    pub kind: String,
    /// Entry name
    #[serde(default)]
    pub name: String,
    /// Parameters
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    /// Return values
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    /// `pure`, `view`, `nonpayable` or `payable`
    #[serde(rename = "stateMutability", default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

impl AbiEntry {
    /// Whether this entry describes a callable function
    pub fn is_function(&self) -> bool {
        self.kind == "function"
    }

    /// Convert a function entry to a method descriptor
    pub fn to_method_descriptor(&self) -> Result<MethodDescriptor, AbiError> {
        if !self.is_function() {
            return Err(AbiError::descriptor(format!("{} entry is not a function", self.kind)));
        }
        let convert = |params: &[AbiParam], root: &str| {
            params
                .iter()
                .enumerate()
                .map(|(i, param)| {
                    let segment = if param.name.is_empty() { i.to_string() } else { param.name.clone() };
                    param
                        .to_descriptor()
                        .map_err(|e| e.within(&segment).within(root))
                })
                .collect::<Result<Vec<_>, AbiError>>()
        };
        Ok(MethodDescriptor::new(
            self.name.clone(),
            convert(&self.inputs, "args")?,
            convert(&self.outputs, "returns")?,
        ))
    }
}

/// Parse an ABI JSON array
pub fn parse_abi(json: &str) -> Result<Vec<AbiEntry>, AbiError> {
    Ok(serde_json::from_str(json)?)
}
