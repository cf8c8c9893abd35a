//! CLI integration tests for abikit-cli
//!
//! Tests command parsing, output formatting, and config handling.

use std::path::Path;
use std::process::Command;

const TRANSFER: &str = "transfer(address to, uint256 amount)(bool)";
const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";

const ERC20_ABI: &str = r#"[
    {"type": "function", "name": "transfer", "stateMutability": "nonpayable",
     "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
     "outputs": [{"name": "", "type": "bool"}]},
    {"type": "function", "name": "balanceOf", "stateMutability": "view",
     "inputs": [{"name": "owner", "type": "address"}],
     "outputs": [{"name": "", "type": "uint256"}]},
    {"type": "event", "name": "Transfer", "inputs": []}
]"#;

/// Helper to run the CLI with arguments against an isolated home directory
fn run_abikit_in(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_abikit"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Helper to run the CLI with arguments
fn run_abikit(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();
    run_abikit_in(home.path(), args)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn parse_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn transfer_calldata() -> String {
    format!(
        "0xa9059cbb{:0>64}{:0>64}",
        RECIPIENT.trim_start_matches("0x"),
        "3e8"
    )
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_abikit(&["--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("abikit"));
    assert!(stdout.contains("signature"));
    assert!(stdout.contains("encode"));
    assert!(stdout.contains("decode-output"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let output = run_abikit(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("abikit"));
}

#[test]
fn test_cli_encode_help() {
    let output = run_abikit(&["encode", "--help"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("--sig"));
    assert!(stdout.contains("--abi"));
    assert!(stdout.contains("--args"));
}

// ==================== Signature Tests ====================

#[test]
fn test_signature() {
    let output = run_abikit(&["signature", "--sig", TRANSFER]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("transfer(address,uint256)"));
    assert!(stdout.contains("0xa9059cbb"));
}

#[test]
fn test_signature_json() {
    let output = run_abikit(&["--json", "signature", "--sig", TRANSFER]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["signature"], "transfer(address,uint256)");
    assert_eq!(json["selector"], "0xa9059cbb");
    assert_eq!(json["outputs"], "(bool)");
}

#[test]
fn test_signature_invalid() {
    let output = run_abikit(&["signature", "--sig", "transfer(uint7)"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

// ==================== Call Data Tests ====================

#[test]
fn test_encode_positional() {
    let args = format!(r#"["{}", 1000]"#, RECIPIENT);
    let output = run_abikit(&["encode", "--sig", TRANSFER, "--args", &args]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), transfer_calldata());
}

#[test]
fn test_encode_record_json() {
    let args = format!(r#"{{"amount": "1000", "to": "{}"}}"#, RECIPIENT);
    let output = run_abikit(&["--json", "encode", "--sig", TRANSFER, "--args", &args]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["data"], transfer_calldata().as_str());
    assert_eq!(json["selector"], "0xa9059cbb");
}

#[test]
fn test_encode_invalid_value() {
    let output = run_abikit(&["encode", "--sig", TRANSFER, "--args", r#"["0x1234", 1]"#]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("args.to"));
}

#[test]
fn test_decode_as_record() {
    let data = transfer_calldata();
    let output = run_abikit(&["--json", "decode", "--sig", TRANSFER, "--data", &data]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["args"]["to"], RECIPIENT);
    assert_eq!(json["args"]["amount"], "1000");

    // Fields print in declaration order, not sorted
    let stdout = stdout(&output);
    let to = stdout.find("\"to\"").unwrap();
    let amount = stdout.find("\"amount\"").unwrap();
    assert!(to < amount);
}

#[test]
fn test_decode_selector_mismatch() {
    let data = transfer_calldata().replace("a9059cbb", "deadbeef");
    let output = run_abikit(&["--json", "decode", "--sig", TRANSFER, "--data", &data]);
    assert!(!output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("selector mismatch"));
}

#[test]
fn test_decode_invalid_hex() {
    let output = run_abikit(&["decode", "--sig", TRANSFER, "--data", "0xzz"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid hex"));
}

#[test]
fn test_decode_dispatch_by_selector() {
    let home = tempfile::tempdir().unwrap();
    let abi = home.path().join("erc20.json");
    std::fs::write(&abi, ERC20_ABI).unwrap();

    let data = transfer_calldata();
    let output = run_abikit_in(
        home.path(),
        &["--json", "decode", "--abi", abi.to_str().unwrap(), "--data", &data],
    );
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["signature"], "transfer(address,uint256)");
    assert_eq!(json["args"]["amount"], "1000");
}

#[test]
fn test_decode_unknown_selector() {
    let home = tempfile::tempdir().unwrap();
    let abi = home.path().join("erc20.json");
    std::fs::write(&abi, ERC20_ABI).unwrap();

    let output = run_abikit_in(
        home.path(),
        &["decode", "--abi", abi.to_str().unwrap(), "--data", "0xdeadbeef"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("0xdeadbeef"));
}

#[test]
fn test_encode_requires_method_source() {
    let output = run_abikit(&["encode", "--args", "[]"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--sig"));
}

// ==================== Return Data Tests ====================

#[test]
fn test_output_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let abi = home.path().join("erc20.json");
    std::fs::write(&abi, ERC20_ABI).unwrap();
    let abi = abi.to_str().unwrap();

    let output = run_abikit_in(
        home.path(),
        &["encode-output", "--abi", abi, "--name", "balanceOf", "--values", r#"["42"]"#],
    );
    assert!(output.status.success());
    let data = stdout(&output);
    assert_eq!(data, format!("0x{:0>64}", "2a"));

    let output = run_abikit_in(
        home.path(),
        &["--json", "decode-output", "--abi", abi, "--name", "balanceOf", "--data", &data],
    );
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["values"], serde_json::json!(["42"]));
}

#[test]
fn test_decode_output_positional_by_default() {
    let sig = "get()(uint256 a, string b)";
    let output = run_abikit(&["encode-output", "--sig", sig, "--values", r#"[7, "hi"]"#]);
    assert!(output.status.success());
    let data = stdout(&output);

    let output = run_abikit(&["--json", "decode-output", "--sig", sig, "--data", &data]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["values"], serde_json::json!(["7", "hi"]));
}

// ==================== Config Tests ====================

#[test]
fn test_config_show_default() {
    let output = run_abikit(&["--json", "config", "--show"]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["rules"]["encoding"]["optimize"], false);
    assert_eq!(json["rules"]["decoding"]["structs_as_records"], true);
    assert_eq!(json["rules"]["return_decoding"]["structs_as_records"], false);
}

#[test]
fn test_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let output = run_abikit_in(
        home.path(),
        &["config", "--set-optimize", "true", "--set-max-length", "1024"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Configuration saved"));
    assert!(home.path().join(".abikit").join("config.toml").exists());

    let output = run_abikit_in(home.path(), &["--json", "config", "--show"]);
    let json = parse_json(&output);
    assert_eq!(json["rules"]["encoding"]["optimize"], true);
    assert_eq!(json["rules"]["decoding"]["max_length"], 1024);
}

#[test]
fn test_config_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    let output = run_abikit(&[
        "--config",
        path.to_str().unwrap(),
        "config",
        "--set-records",
        "false",
    ]);
    assert!(output.status.success());
    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("structs_as_records = false"));
}

#[test]
fn test_config_records_off_decodes_positionally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();
    run_abikit(&["--config", path, "config", "--set-records", "false"]);

    let data = transfer_calldata();
    let output = run_abikit(&["--json", "--config", path, "decode", "--sig", TRANSFER, "--data", &data]);
    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["args"], serde_json::json!([RECIPIENT, "1000"]));
}

#[test]
fn test_config_max_length_rejects_long_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();
    run_abikit(&["--config", path, "config", "--set-max-length", "2"]);

    let sig = "f(uint256[] ids)";
    let output = run_abikit(&["--config", path, "encode", "--sig", sig, "--args", "[[1, 2, 3]]"]);
    assert!(output.status.success());
    let data = stdout(&output);

    let output = run_abikit(&["--config", path, "decode", "--sig", sig, "--data", &data]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("args.ids"));
}
