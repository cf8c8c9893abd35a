//! Signature command

use clap::Args;
use serde_json::json;

use super::MethodSource;
use crate::{output::Output, CliError};

/// Print the canonical signature and selector of a method
#[derive(Debug, Args)]
pub struct SignatureCommand {
    #[command(flatten)]
    source: MethodSource,
}

impl SignatureCommand {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let method = self.source.resolve()?;
        let selector = method.selector_hex();

        Output::new(json)
            .field("signature", method.signature())
            .field("selector", &selector)
            .field_value("outputs", json!(method.outputs().signature()))
            .message(&format!("{}\nSelector: {}", method.signature(), selector))
            .print();

        Ok(())
    }
}
