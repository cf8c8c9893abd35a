//! Contract methods: selector-prefixed call data and selector-free return data

use abikit_primitives::H256;

use crate::calldata::CalldataCursor;
use crate::data_type::TupleType;
use crate::descriptor::MethodDescriptor;
use crate::error::AbiError;
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

/// Length of a function selector
pub const SELECTOR_LEN: usize = 4;

/// A contract method with compiled input and output tuples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    inputs: TupleType,
    outputs: TupleType,
    signature: String,
    selector: [u8; SELECTOR_LEN],
}

impl Method {
    /// Compile a method, computing its selector with `hash`
    pub fn new(
        descriptor: &MethodDescriptor,
        hash: impl FnOnce(&[u8]) -> H256,
    ) -> Result<Self, AbiError> {
        if descriptor.name.is_empty() {
            return Err(AbiError::descriptor("method name is empty"));
        }
        let inputs = TupleType::from_descriptors(&descriptor.inputs).map_err(|e| e.within("args"))?;
        let outputs = TupleType::from_descriptors(&descriptor.outputs).map_err(|e| e.within("returns"))?;
        let signature = format!("{}{}", descriptor.name, inputs.signature());

        let digest = hash(signature.as_bytes());
        let mut selector = [0u8; SELECTOR_LEN];
        selector.copy_from_slice(&digest.as_bytes()[..SELECTOR_LEN]);

        tracing::debug!(%signature, selector = %hex::encode(selector), "compiled method");

        Ok(Self {
            name: descriptor.name.clone(),
            inputs,
            outputs,
            signature,
            selector,
        })
    }

    /// Compile a method with Keccak-256 selectors
    #[cfg(feature = "keccak")]
    pub fn with_keccak(descriptor: &MethodDescriptor) -> Result<Self, AbiError> {
        Self::new(descriptor, abikit_crypto::keccak256)
    }

    /// Compile from `name(types)` or `name(types)(returns)`
    #[cfg(feature = "keccak")]
    pub fn from_signature(signature: &str) -> Result<Self, AbiError> {
        Self::with_keccak(&MethodDescriptor::parse_signature(signature)?)
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Function selector
    pub fn selector(&self) -> [u8; SELECTOR_LEN] {
        self.selector
    }

    /// Function selector as `0x`-prefixed hex
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Input tuple
    pub fn inputs(&self) -> &TupleType {
        &self.inputs
    }

    /// Output tuple
    pub fn outputs(&self) -> &TupleType {
        &self.outputs
    }

    /// Whether `calldata` starts with this method's selector
    pub fn matches(&self, calldata: &[u8]) -> bool {
        calldata.len() >= SELECTOR_LEN && calldata[..SELECTOR_LEN] == self.selector
    }

    /// Encode call data with default rules
    pub fn encode(&self, args: &Value) -> Result<Vec<u8>, AbiError> {
        self.encode_with(args, &EncodingRules::default())
    }

    /// Encode call data: selector followed by the arguments
    pub fn encode_with(&self, args: &Value, rules: &EncodingRules) -> Result<Vec<u8>, AbiError> {
        let body = self.inputs.encode_region(args, rules).map_err(|e| e.within("args"))?;
        let mut calldata = Vec::with_capacity(SELECTOR_LEN + body.len());
        calldata.extend_from_slice(&self.selector);
        calldata.extend_from_slice(&body);
        tracing::trace!(method = %self.signature, len = calldata.len(), "encoded call data");
        Ok(calldata)
    }

    /// Decode call data with default rules
    pub fn decode(&self, calldata: &[u8]) -> Result<Value, AbiError> {
        self.decode_with(calldata, &DecodingRules::default())
    }

    /// Check the selector, then decode the arguments that follow it
    pub fn decode_with(&self, calldata: &[u8], rules: &DecodingRules) -> Result<Value, AbiError> {
        if !self.matches(calldata) {
            let found = &calldata[..calldata.len().min(SELECTOR_LEN)];
            return Err(AbiError::SelectorMismatch {
                expected: self.selector_hex(),
                found: format!("0x{}", hex::encode(found)),
            });
        }
        tracing::trace!(method = %self.signature, len = calldata.len(), "decoding call data");
        let mut cursor = CalldataCursor::with_base(calldata, SELECTOR_LEN)?;
        self.inputs
            .decode_region(&mut cursor, rules)
            .map_err(|e| e.within("args"))
    }

    /// Encode return data with default rules
    pub fn encode_return_values(&self, values: &Value) -> Result<Vec<u8>, AbiError> {
        self.encode_return_values_with(values, &EncodingRules::default())
    }

    /// Encode return data (no selector)
    pub fn encode_return_values_with(
        &self,
        values: &Value,
        rules: &EncodingRules,
    ) -> Result<Vec<u8>, AbiError> {
        self.outputs.encode_region(values, rules).map_err(|e| e.within("returns"))
    }

    /// Decode return data with [`DecodingRules::return_values`]
    pub fn decode_return_values(&self, data: &[u8]) -> Result<Value, AbiError> {
        self.decode_return_values_with(data, &DecodingRules::return_values())
    }

    /// Decode return data (no selector)
    pub fn decode_return_values_with(
        &self,
        data: &[u8],
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        tracing::trace!(method = %self.signature, len = data.len(), "decoding return data");
        self.outputs
            .decode_region(&mut CalldataCursor::new(data), rules)
            .map_err(|e| e.within("returns"))
    }
}
