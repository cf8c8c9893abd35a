//! # abikit-cli
//!
//! Command-line interface for the abikit ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Signatures
//! abikit signature --sig "transfer(address to, uint256 amount)(bool)"
//!
//! # Call data
//! abikit encode --sig "transfer(address,uint256)" --args '["0x11...11", "1000"]'
//! abikit decode --abi erc20.json --data 0xa9059cbb...
//!
//! # Return data
//! abikit encode-output --sig "balanceOf(address)(uint256)" --values '["42"]'
//! abikit decode-output --abi erc20.json --name balanceOf --data 0x...
//!
//! # Configuration
//! abikit config --show
//! abikit config --set-optimize true --set-max-length 65536
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// abikit CLI
#[derive(Parser, Debug)]
#[command(name = "abikit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ~/.abikit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the canonical signature and selector of a method
    Signature(commands::signature::SignatureCommand),
    /// Encode call data
    Encode(commands::call::EncodeCommand),
    /// Decode call data
    Decode(commands::call::DecodeCommand),
    /// Encode return data
    #[command(name = "encode-output")]
    EncodeOutput(commands::call::EncodeOutputCommand),
    /// Decode return data
    #[command(name = "decode-output")]
    DecodeOutput(commands::call::DecodeOutputCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Deduplicate repeated dynamic payloads when encoding
        #[arg(long)]
        set_optimize: Option<bool>,
        /// Reject non-canonical words when decoding
        #[arg(long)]
        set_strict: Option<bool>,
        /// Decode named tuples in call data as records
        #[arg(long)]
        set_records: Option<bool>,
        /// Largest accepted array or byte-string length when decoding
        #[arg(long)]
        set_max_length: Option<usize>,
    },
}

/// Requested configuration edits
struct ConfigEdits {
    optimize: Option<bool>,
    strict: Option<bool>,
    records: Option<bool>,
    max_length: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.clone().or_else(Config::config_path);
    let mut config = Config::load(config_path.as_deref());

    let result = match cli.command {
        Commands::Signature(cmd) => cmd.execute(cli.json),
        Commands::Encode(cmd) => cmd.execute(&config, cli.json),
        Commands::Decode(cmd) => cmd.execute(&config, cli.json),
        Commands::EncodeOutput(cmd) => cmd.execute(&config, cli.json),
        Commands::DecodeOutput(cmd) => cmd.execute(&config, cli.json),
        Commands::Config {
            show,
            set_optimize,
            set_strict,
            set_records,
            set_max_length,
        } => {
            let edits = ConfigEdits {
                optimize: set_optimize,
                strict: set_strict,
                records: set_records,
                max_length: set_max_length,
            };
            handle_config(&mut config, config_path.as_deref(), show, edits, cli.json)
        }
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    edits: ConfigEdits,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(optimize) = edits.optimize {
        config.rules.encoding.optimize = optimize;
        modified = true;
    }

    if let Some(strict) = edits.strict {
        config.rules.decoding.strict = strict;
        config.rules.return_decoding.strict = strict;
        modified = true;
    }

    if let Some(records) = edits.records {
        config.rules.decoding.structs_as_records = records;
        modified = true;
    }

    if let Some(max_length) = edits.max_length {
        config.rules.decoding.max_length = Some(max_length);
        config.rules.return_decoding.max_length = Some(max_length);
        modified = true;
    }

    if modified {
        let path = path.ok_or_else(|| CliError::Config("cannot determine home directory".to_string()))?;
        config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message("Configuration saved")
            .print();
    } else if show {
        let rules = &config.rules;
        let max_length = rules
            .decoding
            .max_length
            .map_or_else(|| "none".to_string(), |n| n.to_string());
        Output::new(json)
            .field_value("rules", serde_json::to_value(rules)?)
            .message(&format!(
                "Optimize: {}\nAccept records: {}\nStrict: {}\nStructs as records: {}\nMax length: {}",
                rules.encoding.optimize,
                rules.encoding.accept_records,
                rules.decoding.strict,
                rules.decoding.structs_as_records,
                max_length
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-optimize/--set-strict/--set-records/--set-max-length to modify")
            .print();
    }

    Ok(())
}
