//! Output formatting for voyage reports, factor tables and validation results.
//!
//! Formatters return strings so commands decide where to print and tests can
//! assert on the exact text.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use voyage_emissions_lib::{
    ComplianceAssessment, ComplianceStatus, EmissionFactorTable, RenderMode, VoyageReport,
};

use crate::terminal::{format_euros, ColorPalette};

/// Output format shared by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text with a colored compliance badge.
    #[default]
    Text,
    /// Markdown for chat and notes.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

/// Render a calculated voyage.
pub fn format_report(
    report: &VoyageReport,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)? + "\n",
        OutputFormat::Rich => report.render(RenderMode::RichText),
        OutputFormat::Text => {
            let mut buffer = String::new();
            let _ = writeln!(buffer, "{}", compliance_badge(&report.compliance, palette));
            let rendered = report.render(RenderMode::PlainText);
            let (heading, body) = rendered.split_once('\n').unwrap_or((rendered.as_str(), ""));
            let _ = writeln!(buffer, "{}{heading}{}", palette.white_bold, palette.reset);
            buffer.push_str(body);
            buffer
        }
    })
}

/// One-line verdict badge, e.g. `[NON-COMPLIANT] penalty EUR 30,968`.
pub fn compliance_badge(assessment: &ComplianceAssessment, palette: &ColorPalette) -> String {
    let (tag, label) = match assessment.status {
        ComplianceStatus::Compliant => (palette.tag_compliant, "COMPLIANT"),
        ComplianceStatus::NonCompliant => (palette.tag_non_compliant, "NON-COMPLIANT"),
        ComplianceStatus::NotApplicable => (palette.tag_not_applicable, "NOT APPLICABLE"),
    };
    let detail = match assessment.status {
        ComplianceStatus::NonCompliant => {
            format!(" penalty {}", format_euros(assessment.penalty_eur))
        }
        ComplianceStatus::Compliant => format!(
            " {:.2} gCO2e/MJ below target",
            assessment.margin_g_per_mj().unwrap_or_default()
        ),
        ComplianceStatus::NotApplicable => String::new(),
    };
    format!(
        "{tag}[{label}]{reset}{gray}{detail}{reset}",
        reset = palette.reset,
        gray = palette.gray
    )
}

#[derive(Serialize)]
struct FactorRow<'a> {
    fuel: &'a str,
    label: &'a str,
    category: &'a str,
    lcv_mj_per_g: f64,
    ghg_wtw_g_per_mj: f64,
    co2_ttw_g_per_mj: f64,
}

/// Render an emission factor table in canonical fuel order.
pub fn format_factor_table(table: &EmissionFactorTable, format: OutputFormat) -> Result<String> {
    let rows: Vec<FactorRow<'_>> = table
        .iter()
        .map(|(fuel, factor)| FactorRow {
            fuel: fuel.id(),
            label: fuel.label(),
            category: fuel.category().label(),
            lcv_mj_per_g: factor.lcv_mj_per_g,
            ghg_wtw_g_per_mj: factor.ghg_wtw_g_per_mj,
            co2_ttw_g_per_mj: factor.co2_ttw_g_per_mj,
        })
        .collect();

    let source = table
        .source_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in reference".to_string());

    let mut buffer = String::new();
    match format {
        OutputFormat::Json => {
            buffer = serde_json::to_string_pretty(&rows)? + "\n";
        }
        OutputFormat::Rich => {
            let _ = writeln!(buffer, "**Emission factors** (_{source}_)");
            let _ = writeln!(buffer);
            let _ = writeln!(
                buffer,
                "| Fuel | Category | LCV (MJ/g) | GHG WtW (gCO2e/MJ) | CO2 TtW (gCO2e/MJ) |"
            );
            let _ = writeln!(buffer, "|---|---|---:|---:|---:|");
            for row in &rows {
                let _ = writeln!(
                    buffer,
                    "| {} | {} | {} | {} | {} |",
                    row.label, row.category, row.lcv_mj_per_g, row.ghg_wtw_g_per_mj, row.co2_ttw_g_per_mj
                );
            }
        }
        OutputFormat::Text => {
            let _ = writeln!(buffer, "Emission factors ({}, {source}):", rows.len());
            let _ = writeln!(
                buffer,
                "{:<14} {:<13} {:>10} {:>10} {:>10}",
                "Fuel", "Category", "LCV", "GHG WtW", "CO2 TtW"
            );
            for row in &rows {
                let _ = writeln!(
                    buffer,
                    "{:<14} {:<13} {:>10.4} {:>10.2} {:>10.2}",
                    row.label, row.category, row.lcv_mj_per_g, row.ghg_wtw_g_per_mj, row.co2_ttw_g_per_mj
                );
            }
        }
    }
    Ok(buffer)
}

#[derive(Serialize)]
struct ValidationOutcome<'a> {
    valid: bool,
    problems: &'a [String],
}

/// Render the outcome of input validation.
pub fn format_validation(problems: &[String], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let outcome = ValidationOutcome {
            valid: problems.is_empty(),
            problems,
        };
        return Ok(serde_json::to_string_pretty(&outcome)? + "\n");
    }

    let mut buffer = String::new();
    if problems.is_empty() {
        let _ = writeln!(buffer, "Input is valid.");
    } else {
        let _ = writeln!(buffer, "Input has {} problem(s):", problems.len());
        let bullet = if format == OutputFormat::Rich { "*" } else { "-" };
        for problem in problems {
            let _ = writeln!(buffer, "{bullet} {problem}");
        }
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyage_emissions_lib::compliance::evaluate;
    use voyage_emissions_lib::{RegulatoryParameters, VoyageInput};

    #[test]
    fn badge_shows_penalty_when_non_compliant() {
        let assessment = evaluate(Some(95.0), 1_000_000.0, &RegulatoryParameters::default());
        let badge = compliance_badge(&assessment, &ColorPalette::plain());
        assert!(badge.starts_with("[NON-COMPLIANT] penalty EUR "), "{badge}");
    }

    #[test]
    fn badge_uses_palette_colors() {
        let assessment = evaluate(Some(50.0), 1_000_000.0, &RegulatoryParameters::default());
        let badge = compliance_badge(&assessment, &ColorPalette::colored());
        assert!(badge.starts_with(crate::terminal::colors::TAG_COMPLIANT));
        assert!(badge.contains("[COMPLIANT]"));
    }

    #[test]
    fn text_report_emphasizes_vessel_heading() {
        let report = VoyageInput::from_json(
            r#"{"voyage": {"vessel_name": "Pacific Ruby", "voyage_number": "7"},
                "consumption": [{"fuel": "hfo", "main_engine_sailing": 10.0}]}"#,
        )
        .unwrap()
        .calculate()
        .unwrap();

        let colored = format_report(&report, OutputFormat::Text, &ColorPalette::colored()).unwrap();
        let heading = format!(
            "{}Pacific Ruby voyage 7{}\n",
            crate::terminal::colors::WHITE_BOLD,
            crate::terminal::colors::RESET
        );
        assert!(colored.contains(&heading), "{colored}");

        let plain = format_report(&report, OutputFormat::Text, &ColorPalette::plain()).unwrap();
        let mut lines = plain.lines();
        assert!(lines.next().unwrap().starts_with("[NON-COMPLIANT]"));
        assert_eq!(lines.next(), Some("Pacific Ruby voyage 7"));
        assert!(plain.contains("Totals: fuel 10.00 MT"));
    }

    #[test]
    fn factor_table_text_lists_every_fuel() {
        let text = format_factor_table(&EmissionFactorTable::reference(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Emission factors (13, built-in reference):"));
        assert!(text.contains("LNG Otto SS"));
        assert!(text.contains("Biofuel"));
    }

    #[test]
    fn factor_table_json_uses_ids() {
        let json = format_factor_table(&EmissionFactorTable::reference(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(13));
        assert_eq!(value[2]["fuel"], "hfo");
    }

    #[test]
    fn validation_output_lists_problems() {
        let problems = vec!["IMO number must be exactly 7 digits, got '1'".to_string()];
        let text = format_validation(&problems, OutputFormat::Text).unwrap();
        assert!(text.contains("Input has 1 problem(s):"));
        assert!(text.contains("- IMO number"));

        let json = format_validation(&[], OutputFormat::Json).unwrap();
        assert!(json.contains("\"valid\": true"));
    }
}
