//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use voyage_emissions_lib::VoyageInput;

/// Path to the fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Load a voyage input fixture by file name.
#[allow(dead_code)]
pub fn load_input(name: &str) -> VoyageInput {
    let path = fixtures_dir().join(name);
    VoyageInput::from_path(&path).unwrap_or_else(|err| panic!("fixture {name} loads: {err}"))
}

/// Assert two floats agree to within a relative tolerance of 1e-9.
#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
