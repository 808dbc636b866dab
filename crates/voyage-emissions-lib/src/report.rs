//! Export and presentation of calculated voyages.
//!
//! Writers emit figures exactly as calculated; rounding is applied only by
//! [`VoyageReport::render`].

use std::fmt::Write as _;
use std::io;

use csv::Writer;
use serde_json::Value;

use crate::calculator::PerFuelResult;
use crate::compliance::ComplianceStatus;
use crate::constants::MJ_PER_TJ;
use crate::engine::{VoyageInput, VoyageReport};
use crate::error::Result;
use crate::fuel::FuelType;
use crate::totals::VoyageTotals;

/// Column headings of the per-fuel export.
pub const PER_FUEL_COLUMNS: [&str; 11] = [
    "Fuel Type",
    "Sailing Fuel (MT)",
    "Port Fuel (MT)",
    "Sailing Energy (TJ)",
    "Port Energy (TJ)",
    "Sailing GHG WtW (MT)",
    "Port GHG WtW (MT)",
    "Sailing CO2 TtW (MT)",
    "Port CO2 TtW (MT)",
    "Sailing EUAs",
    "Port EUAs",
];

pub const DETAILED_EXPORT_SUFFIX: &str = "_detailed_emissions.csv";
pub const SUMMARY_EXPORT_SUFFIX: &str = "_summary.csv";
pub const INPUT_EXPORT_SUFFIX: &str = "_input.csv";

/// Presentation style for [`VoyageReport::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    /// Markdown-flavoured output for chat and notes.
    RichText,
}

/// Write the input record as `Field,Value` rows.
///
/// Nested keys are joined with `_`; list entries are keyed by position.
pub fn input_csv<W: io::Write>(writer: W, input: &VoyageInput) -> Result<()> {
    let value = serde_json::to_value(input)?;
    let mut rows = Vec::new();
    flatten_value(String::new(), &value, &mut rows);

    let mut csv = Writer::from_writer(writer);
    csv.write_record(["Field", "Value"])?;
    for (field, value) in rows {
        csv.write_record([field.as_str(), value.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write one row per consumed fuel.
pub fn per_fuel_csv<W: io::Write>(writer: W, results: &[PerFuelResult]) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(PER_FUEL_COLUMNS)?;
    for result in results {
        let (s, p) = (&result.sailing, &result.port);
        let figures = [
            s.mass_t,
            p.mass_t,
            s.energy_tj(),
            p.energy_tj(),
            s.ghg_mt,
            p.ghg_mt,
            s.co2_mt,
            p.co2_mt,
            s.eua_count,
            p.eua_count,
        ];
        let mut record = Vec::with_capacity(PER_FUEL_COLUMNS.len());
        record.push(result.fuel.label().to_string());
        record.extend(figures.iter().map(f64::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write voyage totals as `Metric,Value` rows.
pub fn totals_csv<W: io::Write>(writer: W, totals: &VoyageTotals) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["Metric", "Value"])?;
    for (metric, value) in totals_rows(totals) {
        csv.write_record([metric, value.to_string().as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

fn totals_rows(totals: &VoyageTotals) -> Vec<(&'static str, f64)> {
    let mut rows = vec![
        ("Total Sailing Fuel (MT)", totals.sailing_fuel_mt),
        ("Total Port Fuel (MT)", totals.port_fuel_mt),
        ("Total Sailing Energy (TJ)", totals.sailing_energy_tj()),
        ("Total Port Energy (TJ)", totals.port_energy_tj()),
        ("Total Sailing GHG (MT)", totals.sailing_ghg_mt),
        ("Total Port GHG (MT)", totals.port_ghg_mt),
        ("Total Sailing CO2 (MT)", totals.sailing_co2_mt),
        ("Total Port CO2 (MT)", totals.port_co2_mt),
        ("Total Sailing EUAs", totals.sailing_eua),
        ("Total Port EUAs", totals.port_eua),
        ("Total EUAs (Sailing + Port)", totals.total_eua()),
    ];
    if let Some(intensity) = totals.ghg_intensity_g_per_mj {
        rows.push(("GHG Intensity (gCO2e/MJ)", intensity));
    }
    rows
}

/// `<vessel>_voyage_<voyage_no>` with path separators and whitespace replaced.
pub fn export_file_stem(vessel_name: &str, voyage_number: &str) -> String {
    format!(
        "{}_voyage_{}",
        file_component(vessel_name),
        file_component(voyage_number)
    )
}

fn file_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

fn flatten_value(prefix: String, value: &Value, rows: &mut Vec<(String, String)>) {
    let key = |child: &str| {
        if prefix.is_empty() {
            child.to_string()
        } else {
            format!("{prefix}_{child}")
        }
    };
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten_value(key(child), nested, rows);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_value(key(&index.to_string()), nested, rows);
            }
        }
        Value::Null => rows.push((prefix, String::new())),
        Value::String(text) => rows.push((prefix, text.clone())),
        other => rows.push((prefix, other.to_string())),
    }
}

impl VoyageReport {
    /// File name stem for this voyage's exports.
    pub fn export_file_stem(&self) -> String {
        export_file_stem(&self.vessel_name, &self.voyage_number)
    }

    /// Render a human-readable summary.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn heading(&self) -> String {
        let vessel = if self.vessel_name.is_empty() {
            "<unnamed vessel>"
        } else {
            self.vessel_name.as_str()
        };
        if self.voyage_number.is_empty() {
            vessel.to_string()
        } else {
            format!("{vessel} voyage {}", self.voyage_number)
        }
    }

    fn verdict_line(&self) -> String {
        let c = &self.compliance;
        match c.status {
            ComplianceStatus::Compliant => format!(
                "Compliant, {:.2} gCO2e/MJ below target",
                c.margin_g_per_mj().unwrap_or_default()
            ),
            ComplianceStatus::NonCompliant => format!(
                "Non-compliant, {:.2} gCO2e/MJ above target, estimated penalty EUR {:.0}",
                c.excess_g_per_mj().unwrap_or_default(),
                c.penalty_eur
            ),
            ComplianceStatus::NotApplicable => "Not applicable, no energy consumed".to_string(),
        }
    }

    fn passage_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.main_engine_fuel.is_some() || self.auxiliary_engine_fuel.is_some() {
            let label = |fuel: Option<FuelType>| fuel.map_or("n/a", FuelType::label);
            lines.push(format!(
                "Engines: main {}, auxiliary {}",
                label(self.main_engine_fuel),
                label(self.auxiliary_engine_fuel)
            ));
        }
        if let Some(hours) = self.sailing_hours {
            lines.push(format!("Sailing time: {hours:.1} h"));
        }
        if let Some(hours) = self.port_stay_hours {
            lines.push(format!("Port stay: {hours:.1} h"));
        }
        lines
    }

    fn efficiency_lines(&self) -> Vec<String> {
        let e = &self.efficiency;
        let mut lines = Vec::new();
        if let Some(value) = e.fuel_kg_per_nm {
            lines.push(format!("Fuel efficiency: {value:.2} kg/nm"));
        }
        if let Some(value) = e.co2_kg_per_nm {
            lines.push(format!("CO2 efficiency: {value:.2} kg CO2/nm"));
        }
        if let Some(value) = e.co2_kg_per_tonne_cargo {
            lines.push(format!("Cargo efficiency: {value:.2} kg CO2/tonne"));
        }
        lines
    }

    fn render_plain(&self) -> String {
        let t = &self.totals;
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.heading());
        for line in self.passage_lines() {
            let _ = writeln!(buffer, "{line}");
        }

        if self.per_fuel.is_empty() {
            let _ = writeln!(buffer, "No fuel consumption recorded.");
        } else {
            let _ = writeln!(
                buffer,
                "{:<14} {:>12} {:>10} {:>12} {:>10} {:>10} {:>10}",
                "Fuel", "Sailing (MT)", "Port (MT)", "Energy (TJ)", "GHG (MT)", "CO2 (MT)", "EUAs"
            );
            for result in &self.per_fuel {
                let _ = writeln!(
                    buffer,
                    "{:<14} {:>12.2} {:>10.2} {:>12.4} {:>10.2} {:>10.2} {:>10.2}",
                    result.fuel.label(),
                    result.sailing.mass_t,
                    result.port.mass_t,
                    result.total_energy_mj() / MJ_PER_TJ,
                    result.total_ghg_mt(),
                    result.total_co2_mt(),
                    result.total_eua()
                );
            }
        }

        let _ = writeln!(
            buffer,
            "Totals: fuel {:.2} MT, energy {:.4} TJ, GHG {:.2} MT CO2e, CO2 {:.2} MT",
            t.total_fuel_mt(),
            t.total_energy_tj(),
            t.total_ghg_mt(),
            t.total_co2_mt()
        );
        match t.ghg_intensity_g_per_mj {
            Some(intensity) => {
                let _ = writeln!(
                    buffer,
                    "GHG intensity: {intensity:.2} gCO2e/MJ (target {:.4})",
                    self.compliance.target_g_per_mj
                );
            }
            None => {
                let _ = writeln!(buffer, "GHG intensity: n/a");
            }
        }
        let _ = writeln!(buffer, "FuelEU Maritime: {}", self.verdict_line());
        let _ = writeln!(
            buffer,
            "EU ETS: {:.2} EUAs (sailing {:.2}, port {:.2}), estimated cost EUR {:.0}",
            t.total_eua(),
            t.sailing_eua,
            t.port_eua,
            self.eua_cost_eur
        );
        for line in self.efficiency_lines() {
            let _ = writeln!(buffer, "{line}");
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let t = &self.totals;
        let mut buffer = String::new();
        let _ = writeln!(buffer, "**{}**", self.heading());
        let _ = writeln!(buffer);
        let passage = self.passage_lines();
        if !passage.is_empty() {
            for line in passage {
                let _ = writeln!(buffer, "* {line}");
            }
            let _ = writeln!(buffer);
        }
        if !self.per_fuel.is_empty() {
            let _ = writeln!(
                buffer,
                "| Fuel | Sailing (MT) | Port (MT) | Energy (TJ) | GHG (MT) | CO2 (MT) | EUAs |"
            );
            let _ = writeln!(buffer, "|---|---:|---:|---:|---:|---:|---:|");
            for result in &self.per_fuel {
                let _ = writeln!(
                    buffer,
                    "| {} | {:.2} | {:.2} | {:.4} | {:.2} | {:.2} | {:.2} |",
                    result.fuel.label(),
                    result.sailing.mass_t,
                    result.port.mass_t,
                    result.total_energy_mj() / MJ_PER_TJ,
                    result.total_ghg_mt(),
                    result.total_co2_mt(),
                    result.total_eua()
                );
            }
            let _ = writeln!(buffer);
        }
        let _ = writeln!(
            buffer,
            "* Total fuel: `{:.2}` MT, energy `{:.4}` TJ",
            t.total_fuel_mt(),
            t.total_energy_tj()
        );
        let _ = writeln!(
            buffer,
            "* GHG `{:.2}` MT CO2e, CO2 `{:.2}` MT",
            t.total_ghg_mt(),
            t.total_co2_mt()
        );
        if let Some(intensity) = t.ghg_intensity_g_per_mj {
            let _ = writeln!(buffer, "* GHG intensity: `{intensity:.2}` gCO2e/MJ");
        }
        let _ = writeln!(buffer, "* **FuelEU Maritime:** {}", self.verdict_line());
        let _ = writeln!(
            buffer,
            "* **EU ETS:** `{:.2}` EUAs, estimated cost EUR `{:.0}`",
            t.total_eua(),
            self.eua_cost_eur
        );
        for line in self.efficiency_lines() {
            let _ = writeln!(buffer, "* {line}");
        }
        buffer
    }
}
