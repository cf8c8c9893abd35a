//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Value that does not fit its ABI type
    #[error("Invalid value at {path}: {reason}")]
    InvalidValue {
        /// Member path, e.g. `args.recipients[2]`
        path: String,
        /// What was wrong
        reason: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Codec error
    #[error("ABI error: {0}")]
    Abi(#[from] abikit_codec::AbiError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
