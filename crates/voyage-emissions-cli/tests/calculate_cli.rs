mod common;

use common::{cli, fixture, json_stdout};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::tempdir;

#[test]
fn text_report_shows_badge_and_consumed_fuels() {
    cli()
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_pacific_ruby.json"))
        .assert()
        .success()
        .stdout(contains("[NON-COMPLIANT] penalty EUR "))
        .stdout(contains("Pacific Ruby voyage 202502"))
        .stdout(contains("HFO"))
        .stdout(contains("MDO/MGO"))
        .stdout(contains("LNG Otto SS").not())
        .stdout(contains("\x1b[").not());
}

#[test]
fn json_report_carries_structured_figures() {
    let value = json_stdout(
        cli()
            .args(["--format", "json", "calculate", "--input"])
            .arg(fixture("voyage_pacific_ruby.json")),
    );

    assert_eq!(value["per_fuel"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["per_fuel"][0]["fuel"], "hfo");
    assert_eq!(value["compliance"]["status"], "non_compliant");
    assert_eq!(value["compliance"]["compliant"], false);

    let eua_cost = value["eua_cost_eur"].as_f64().unwrap();
    assert!((eua_cost - 415.954685 * 85.0).abs() < 1e-6);
}

#[test]
fn flag_overrides_environment_overrides_input() {
    let cost = |value: &serde_json::Value| value["eua_cost_eur"].as_f64().unwrap();
    let euas = |value: &serde_json::Value| value["totals"]["sailing_eua"].as_f64().unwrap()
        + value["totals"]["port_eua"].as_f64().unwrap();

    let from_env = json_stdout(
        cli()
            .env("VOYAGE_EMISSIONS_EUA_PRICE", "50")
            .args(["--format", "json", "calculate", "--input"])
            .arg(fixture("voyage_biofuel_blend.json")),
    );
    assert!((cost(&from_env) - euas(&from_env) * 50.0).abs() < 1e-6);

    let from_flag = json_stdout(
        cli()
            .env("VOYAGE_EMISSIONS_EUA_PRICE", "50")
            .args(["--format", "json", "calculate", "--eua-price", "100", "--input"])
            .arg(fixture("voyage_biofuel_blend.json")),
    );
    assert!((cost(&from_flag) - euas(&from_flag) * 100.0).abs() < 1e-6);

    // The fixture itself sets 70.
    let from_input = json_stdout(
        cli()
            .args(["--format", "json", "calculate", "--input"])
            .arg(fixture("voyage_biofuel_blend.json")),
    );
    assert!((cost(&from_input) - euas(&from_input) * 70.0).abs() < 1e-6);
}

#[test]
fn raised_target_makes_voyage_compliant() {
    cli()
        .args(["calculate", "--ghg-target", "95", "--input"])
        .arg(fixture("voyage_pacific_ruby.json"))
        .assert()
        .success()
        .stdout(contains("[COMPLIANT]"));
}

#[test]
fn rich_format_renders_markdown() {
    cli()
        .args(["--format", "rich", "calculate", "--input"])
        .arg(fixture("voyage_biofuel_blend.json"))
        .assert()
        .success()
        .stdout(contains("**Nordic Fern voyage B-07**"))
        .stdout(contains("| Biofuel 1 |"));
}

#[test]
fn exports_three_csv_files() {
    let dir = tempdir().expect("tempdir");
    cli()
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_pacific_ruby.json"))
        .arg("--export-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Exported "));

    for suffix in ["_detailed_emissions.csv", "_summary.csv", "_input.csv"] {
        let path = dir.path().join(format!("Pacific_Ruby_voyage_202502{suffix}"));
        assert!(path.exists(), "missing {}", path.display());
    }
    let summary =
        std::fs::read_to_string(dir.path().join("Pacific_Ruby_voyage_202502_summary.csv")).unwrap();
    assert!(summary.starts_with("Metric,Value"));
    assert!(summary.contains("Total EUAs (Sailing + Port)"));
}

#[test]
fn invalid_input_is_rejected_before_calculation() {
    cli()
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_invalid.json"))
        .assert()
        .failure()
        .stderr(contains("failed validation"))
        .stderr(contains("IMO number"));
}

#[test]
fn skip_validation_calculates_anyway() {
    cli()
        .args(["calculate", "--skip-validation", "--input"])
        .arg(fixture("voyage_invalid.json"))
        .assert()
        .success()
        .stdout(contains("Pacific Ruby voyage 202503"));
}

#[test]
fn placeholder_biofuel_factor_fails_until_supplied() {
    cli()
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_unset_biofuel.json"))
        .assert()
        .failure()
        .stderr(contains("Biofuel 2"));

    cli()
        .arg("--factors")
        .arg(fixture("emission_factors.csv"))
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_unset_biofuel.json"))
        .assert()
        .success()
        .stdout(contains("Biofuel 2"));
}

#[test]
fn unparsable_environment_override_is_reported() {
    cli()
        .env("VOYAGE_EMISSIONS_GHG_TARGET", "strict")
        .arg("calculate")
        .arg("--input")
        .arg(fixture("voyage_pacific_ruby.json"))
        .assert()
        .failure()
        .stderr(contains("VOYAGE_EMISSIONS_GHG_TARGET"));
}
