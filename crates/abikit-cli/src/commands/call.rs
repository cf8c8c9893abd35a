//! Encode and decode commands for call data and return data

use clap::Args;

use super::values::{parse_hex, tuple_from_json, value_to_json};
use super::MethodSource;
use crate::{config::Config, output::Output, CliError};

/// Encode call data
#[derive(Debug, Args)]
pub struct EncodeCommand {
    #[command(flatten)]
    source: MethodSource,

    /// Arguments as a JSON array or object
    #[arg(long, default_value = "[]")]
    args: String,
}

impl EncodeCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let method = self.source.resolve()?;
        let args: serde_json::Value = serde_json::from_str(&self.args)?;
        let args = tuple_from_json(method.inputs(), &args, "args")?;
        let data = method.encode_with(&args, &config.rules.encoding)?;
        tracing::debug!(method = method.signature(), len = data.len(), "encoded call data");

        let hex = format!("0x{}", hex::encode(&data));
        Output::new(json)
            .field("signature", method.signature())
            .field("selector", &method.selector_hex())
            .field("data", &hex)
            .message(&hex)
            .print();
        Ok(())
    }
}

/// Decode call data
#[derive(Debug, Args)]
pub struct DecodeCommand {
    #[command(flatten)]
    source: MethodSource,

    /// Call data as hex
    #[arg(long)]
    data: String,
}

impl DecodeCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let data = parse_hex(&self.data)?;
        let rules = &config.rules.decoding;

        // Without a method name, dispatch on the selector across the ABI
        let (method, args) = match (&self.source.sig, &self.source.name) {
            (None, None) => {
                let contract = self.source.contract()?.ok_or_else(|| {
                    CliError::InvalidInput("either --sig or --abi is required".to_string())
                })?;
                let (method, args) = contract.decode_call_with(&data, rules)?;
                (method.clone(), args)
            }
            _ => {
                let method = self.source.resolve()?;
                let args = method.decode_with(&data, rules)?;
                (method, args)
            }
        };

        let args = value_to_json(&args);
        Output::new(json)
            .field("signature", method.signature())
            .field_value("args", args.clone())
            .message(&format!(
                "{}\n{}",
                method.signature(),
                serde_json::to_string_pretty(&args)?
            ))
            .print();
        Ok(())
    }
}

/// Encode return data
#[derive(Debug, Args)]
pub struct EncodeOutputCommand {
    #[command(flatten)]
    source: MethodSource,

    /// Return values as a JSON array or object
    #[arg(long, default_value = "[]")]
    values: String,
}

impl EncodeOutputCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let method = self.source.resolve()?;
        let values: serde_json::Value = serde_json::from_str(&self.values)?;
        let values = tuple_from_json(method.outputs(), &values, "returns")?;
        let data = method.encode_return_values_with(&values, &config.rules.encoding)?;

        let hex = format!("0x{}", hex::encode(&data));
        Output::new(json)
            .field("signature", method.signature())
            .field("data", &hex)
            .message(&hex)
            .print();
        Ok(())
    }
}

/// Decode return data
#[derive(Debug, Args)]
pub struct DecodeOutputCommand {
    #[command(flatten)]
    source: MethodSource,

    /// Return data as hex
    #[arg(long)]
    data: String,
}

impl DecodeOutputCommand {
    pub fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let method = self.source.resolve()?;
        let data = parse_hex(&self.data)?;
        let values = method.decode_return_values_with(&data, &config.rules.return_decoding)?;

        let values = value_to_json(&values);
        Output::new(json)
            .field("signature", method.signature())
            .field_value("values", values.clone())
            .message(&serde_json::to_string_pretty(&values)?)
            .print();
        Ok(())
    }
}
