#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

/// CLI command with a clean, colorless, quiet environment.
pub fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("voyage-emissions-cli");
    cmd.env("NO_COLOR", "1")
        .env("RUST_LOG", "error")
        .env_remove("VOYAGE_EMISSIONS_GHG_TARGET")
        .env_remove("VOYAGE_EMISSIONS_EUA_PRICE")
        .env_remove("VOYAGE_EMISSIONS_PENALTY_RATE")
        .env_remove("VOYAGE_EMISSIONS_FACTORS");
    cmd
}

pub fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("command runs");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}
