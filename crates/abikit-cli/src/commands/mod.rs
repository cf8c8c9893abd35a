//! CLI subcommands

pub mod call;
pub mod signature;
pub mod values;

use std::path::PathBuf;

use abikit_codec::{Contract, Method};
use clap::Args;

use crate::CliError;

/// Where a method definition comes from
#[derive(Debug, Args)]
pub struct MethodSource {
    /// Method signature, e.g. "transfer(address to, uint256 amount)(bool)"
    #[arg(long, conflicts_with = "abi")]
    pub sig: Option<String>,

    /// ABI JSON file
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// Method name within the ABI
    #[arg(long)]
    pub name: Option<String>,
}

impl MethodSource {
    /// Load the contract described by `--abi`, if given
    pub fn contract(&self) -> Result<Option<Contract>, CliError> {
        match &self.abi {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                Ok(Some(Contract::from_json(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Resolve to a single method
    pub fn resolve(&self) -> Result<Method, CliError> {
        if let Some(sig) = &self.sig {
            return Ok(Method::from_signature(sig)?);
        }
        let contract = self
            .contract()?
            .ok_or_else(|| CliError::InvalidInput("either --sig or --abi is required".to_string()))?;
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| CliError::InvalidInput("--name is required with --abi".to_string()))?;
        let method = contract
            .method(name)
            .ok_or_else(|| abikit_codec::AbiError::UnknownMethod(name.to_string()))?;
        Ok(method.clone())
    }
}
