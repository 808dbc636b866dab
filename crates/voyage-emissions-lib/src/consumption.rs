//! Fuel consumption records and the per-phase aggregator.
//!
//! Consumption is reported per fuel type for each engine role in each voyage
//! phase. The aggregator reduces the three engine roles to a single sailing
//! mass and a single port mass.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::factors::map_headers;
use crate::fuel::FuelType;

/// Engine role that burned the fuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineRole {
    MainEngine,
    AuxiliaryEngine,
    Other,
}

impl EngineRole {
    pub const ALL: [EngineRole; 3] = [
        EngineRole::MainEngine,
        EngineRole::AuxiliaryEngine,
        EngineRole::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EngineRole::MainEngine => "ME",
            EngineRole::AuxiliaryEngine => "AE",
            EngineRole::Other => "Other",
        }
    }
}

/// Voyage phase in which the fuel was burned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Sailing,
    Port,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Sailing, Phase::Port];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Sailing => "Sailing",
            Phase::Port => "Port",
        }
    }
}

/// Fuel mass in metric tonnes for each engine role and phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelConsumptionRecord {
    pub main_engine_sailing: f64,
    pub auxiliary_engine_sailing: f64,
    pub other_sailing: f64,
    pub main_engine_port: f64,
    pub auxiliary_engine_port: f64,
    pub other_port: f64,
}

/// Sailing and port totals for a single fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseMasses {
    pub sailing_t: f64,
    pub port_t: f64,
}

impl PhaseMasses {
    pub fn total_t(&self) -> f64 {
        self.sailing_t + self.port_t
    }

    /// True when nothing was burned in either phase.
    pub fn is_zero(&self) -> bool {
        self.sailing_t == 0.0 && self.port_t == 0.0
    }
}

impl FuelConsumptionRecord {
    pub fn get(&self, role: EngineRole, phase: Phase) -> f64 {
        match (role, phase) {
            (EngineRole::MainEngine, Phase::Sailing) => self.main_engine_sailing,
            (EngineRole::AuxiliaryEngine, Phase::Sailing) => self.auxiliary_engine_sailing,
            (EngineRole::Other, Phase::Sailing) => self.other_sailing,
            (EngineRole::MainEngine, Phase::Port) => self.main_engine_port,
            (EngineRole::AuxiliaryEngine, Phase::Port) => self.auxiliary_engine_port,
            (EngineRole::Other, Phase::Port) => self.other_port,
        }
    }

    /// Return a copy with one role/phase quantity replaced.
    #[must_use]
    pub fn with(mut self, role: EngineRole, phase: Phase, mass_t: f64) -> Self {
        let slot = match (role, phase) {
            (EngineRole::MainEngine, Phase::Sailing) => &mut self.main_engine_sailing,
            (EngineRole::AuxiliaryEngine, Phase::Sailing) => &mut self.auxiliary_engine_sailing,
            (EngineRole::Other, Phase::Sailing) => &mut self.other_sailing,
            (EngineRole::MainEngine, Phase::Port) => &mut self.main_engine_port,
            (EngineRole::AuxiliaryEngine, Phase::Port) => &mut self.auxiliary_engine_port,
            (EngineRole::Other, Phase::Port) => &mut self.other_port,
        };
        *slot = mass_t;
        self
    }

    pub fn phase_mass(&self, phase: Phase) -> f64 {
        EngineRole::ALL
            .iter()
            .map(|role| self.get(*role, phase))
            .sum()
    }

    /// Reduce engine roles to sailing and port totals.
    pub fn aggregate(&self) -> PhaseMasses {
        PhaseMasses {
            sailing_t: self.main_engine_sailing + self.auxiliary_engine_sailing + self.other_sailing,
            port_t: self.main_engine_port + self.auxiliary_engine_port + self.other_port,
        }
    }

    /// Check every quantity is finite and non-negative.
    ///
    /// The calculation engine does not call this; it is the input
    /// collector's responsibility.
    pub fn validate(&self, fuel: FuelType) -> Vec<String> {
        let mut problems = Vec::new();
        for phase in Phase::ALL {
            for role in EngineRole::ALL {
                let value = self.get(role, phase);
                if !value.is_finite() || value < 0.0 {
                    problems.push(format!(
                        "{} {} {} consumption must be a finite non-negative number, got {}",
                        fuel,
                        role.label(),
                        phase.label(),
                        value
                    ));
                }
            }
        }
        problems
    }
}

/// One fuel's consumption within a [`ConsumptionSheet`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEntry {
    pub fuel: FuelType,
    #[serde(flatten)]
    pub record: FuelConsumptionRecord,
}

/// Ordered per-fuel consumption for a voyage.
///
/// Input order is preserved and determines the order of per-fuel results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConsumptionEntry>", into = "Vec<ConsumptionEntry>")]
pub struct ConsumptionSheet {
    entries: Vec<ConsumptionEntry>,
}

impl ConsumptionSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet, rejecting fuels that appear more than once.
    pub fn from_entries(entries: Vec<ConsumptionEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.fuel) {
                return Err(Error::ConsumptionValidation {
                    message: format!("fuel '{}' listed more than once", entry.fuel),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Add or replace the record for `fuel`, keeping its original position.
    pub fn set(&mut self, fuel: FuelType, record: FuelConsumptionRecord) {
        match self.entries.iter_mut().find(|entry| entry.fuel == fuel) {
            Some(entry) => entry.record = record,
            None => self.entries.push(ConsumptionEntry { fuel, record }),
        }
    }

    pub fn get(&self, fuel: FuelType) -> Option<&FuelConsumptionRecord> {
        self.entries
            .iter()
            .find(|entry| entry.fuel == fuel)
            .map(|entry| &entry.record)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsumptionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total fuel burned across every fuel and phase, in tonnes.
    pub fn total_mass_t(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.record.aggregate().total_t())
            .sum()
    }

    /// Load consumption from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load consumption from CSV with one row per fuel.
    ///
    /// Only the `fuel` column is required; absent quantity columns read as zero.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::ConsumptionValidation {
                message: format!("failed to read consumption headers: {err}"),
            })?
            .clone();

        let synonyms: &[(&str, &[&str])] = &[
            ("fuel", &["fuel", "fuel_type"]),
            (
                "main_engine_sailing",
                &["main_engine_sailing", "me_sailing", "me_consumption_sailing"],
            ),
            (
                "auxiliary_engine_sailing",
                &[
                    "auxiliary_engine_sailing",
                    "ae_sailing",
                    "ae_consumption_sailing",
                ],
            ),
            (
                "other_sailing",
                &["other_sailing", "others_sailing", "other_consumption_sailing"],
            ),
            (
                "main_engine_port",
                &["main_engine_port", "me_port", "me_consumption_port"],
            ),
            (
                "auxiliary_engine_port",
                &["auxiliary_engine_port", "ae_port", "ae_consumption_port"],
            ),
            (
                "other_port",
                &["other_port", "others_port", "other_consumption_port"],
            ),
        ];
        let index_map = map_headers(&headers, synonyms);

        if !index_map.contains_key("fuel") {
            return Err(Error::ConsumptionValidation {
                message: format!(
                    "missing required column: fuel. Available: {}",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut entries = Vec::new();
        let mut row_num: usize = 1;
        for result in csv_reader.records() {
            row_num += 1;
            let record = result.map_err(|e| Error::ConsumptionValidation {
                message: e.to_string(),
            })?;

            let get = |field: &str| -> String {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let fuel = FuelType::parse(&get("fuel"))?;
            let parse = |field: &str| -> Result<f64> {
                let raw = get(field);
                if raw.is_empty() {
                    return Ok(0.0);
                }
                raw.parse::<f64>().map_err(|e| Error::ConsumptionValidation {
                    message: format!("invalid {field} for fuel '{fuel}' at row {row_num}: {e}"),
                })
            };

            entries.push(ConsumptionEntry {
                fuel,
                record: FuelConsumptionRecord {
                    main_engine_sailing: parse("main_engine_sailing")?,
                    auxiliary_engine_sailing: parse("auxiliary_engine_sailing")?,
                    other_sailing: parse("other_sailing")?,
                    main_engine_port: parse("main_engine_port")?,
                    auxiliary_engine_port: parse("auxiliary_engine_port")?,
                    other_port: parse("other_port")?,
                },
            });
        }

        Self::from_entries(entries)
    }
}

impl TryFrom<Vec<ConsumptionEntry>> for ConsumptionSheet {
    type Error = Error;

    fn try_from(entries: Vec<ConsumptionEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<ConsumptionSheet> for Vec<ConsumptionEntry> {
    fn from(sheet: ConsumptionSheet) -> Self {
        sheet.entries
    }
}
