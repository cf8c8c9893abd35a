//! Contract interfaces: named sets of methods with selector dispatch

use crate::error::AbiError;
use crate::method::{Method, SELECTOR_LEN};
use crate::rules::{DecodingRules, EncodingRules};
use crate::value::Value;

/// Ordered set of methods
#[derive(Debug, Clone, Default)]
pub struct Contract {
    methods: Vec<Method>,
}

impl Contract {
    /// Create an empty contract
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ABI JSON array, skipping events, errors and constructors
    #[cfg(feature = "keccak")]
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let mut contract = Self::new();
        for entry in crate::json::parse_abi(json)? {
            if !entry.is_function() {
                continue;
            }
            let method = Method::with_keccak(&entry.to_method_descriptor()?)
                .map_err(|e| e.within(&entry.name))?;
            contract.add_method(method);
        }
        tracing::debug!(methods = contract.methods.len(), "loaded contract ABI");
        Ok(contract)
    }

    /// Add a method
    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    /// Add a method with builder pattern
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// All methods in declaration order
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// First method with this name
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Method with this selector
    pub fn method_by_selector(&self, selector: [u8; SELECTOR_LEN]) -> Option<&Method> {
        self.methods.iter().find(|m| m.selector() == selector)
    }

    fn require(&self, name: &str) -> Result<&Method, AbiError> {
        self.method(name)
            .ok_or_else(|| AbiError::UnknownMethod(name.to_string()))
    }

    /// Encode a call to the named method
    pub fn encode_call(&self, name: &str, args: &Value) -> Result<Vec<u8>, AbiError> {
        self.encode_call_with(name, args, &EncodingRules::default())
    }

    /// Encode a call to the named method with explicit rules
    pub fn encode_call_with(
        &self,
        name: &str,
        args: &Value,
        rules: &EncodingRules,
    ) -> Result<Vec<u8>, AbiError> {
        self.require(name)?.encode_with(args, rules)
    }

    /// Find the method targeted by `calldata` and decode its arguments
    pub fn decode_call(&self, calldata: &[u8]) -> Result<(&Method, Value), AbiError> {
        self.decode_call_with(calldata, &DecodingRules::default())
    }

    /// Dispatch on the selector and decode with explicit rules
    pub fn decode_call_with(
        &self,
        calldata: &[u8],
        rules: &DecodingRules,
    ) -> Result<(&Method, Value), AbiError> {
        let method = self
            .methods
            .iter()
            .find(|m| m.matches(calldata))
            .ok_or_else(|| {
                let found = &calldata[..calldata.len().min(SELECTOR_LEN)];
                AbiError::UnknownSelector(format!("0x{}", hex::encode(found)))
            })?;
        let args = method.decode_with(calldata, rules)?;
        Ok((method, args))
    }

    /// Decode the return data of the named method
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Value, AbiError> {
        self.require(name)?.decode_return_values(data)
    }

    /// Decode the return data of the named method with explicit rules
    pub fn decode_output_with(
        &self,
        name: &str,
        data: &[u8],
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        self.require(name)?.decode_return_values_with(data, rules)
    }
}

/// Standard ERC20 interface
#[cfg(feature = "keccak")]
pub fn erc20() -> Result<Contract, AbiError> {
    const SIGNATURES: &[&str] = &[
        "name()(string)",
        "symbol()(string)",
        "decimals()(uint8)",
        "totalSupply()(uint256)",
        "balanceOf(address owner)(uint256)",
        "transfer(address to, uint256 amount)(bool)",
        "approve(address spender, uint256 amount)(bool)",
        "allowance(address owner, address spender)(uint256)",
        "transferFrom(address from, address to, uint256 amount)(bool)",
    ];
    SIGNATURES
        .iter()
        .try_fold(Contract::new(), |contract, sig| -> Result<Contract, AbiError> {
            Ok(contract.with_method(Method::from_signature(sig)?))
        })
}
