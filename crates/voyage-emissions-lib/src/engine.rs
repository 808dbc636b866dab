use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculator::{calculate_fuel, PerFuelResult};
use crate::compliance::{eua_cost_eur, evaluate, ComplianceAssessment};
use crate::consumption::ConsumptionSheet;
use crate::efficiency::EfficiencyMetrics;
use crate::error::{Error, Result};
use crate::factors::EmissionFactorTable;
use crate::fuel::FuelType;
use crate::totals::VoyageTotals;
use crate::voyage::VoyageContext;

/// Complete input record for one voyage calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoyageInput {
    pub voyage: VoyageContext,
    /// Defaults to the reference table when omitted.
    #[serde(default)]
    pub emission_factors: EmissionFactorTable,
    pub consumption: ConsumptionSheet,
}

impl VoyageInput {
    /// Load an input record from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Every input problem in the record, in voyage-then-consumption order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = self.voyage.validate();
        for entry in self.consumption.iter() {
            problems.extend(entry.record.validate(entry.fuel));
        }
        problems
    }

    /// Run the input collector's checks, reporting all problems at once.
    ///
    /// # Errors
    /// Returns [`Error::VoyageValidation`] listing every problem found.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::VoyageValidation { problems })
        }
    }

    /// Calculate this voyage with its own factor table.
    pub fn calculate(&self) -> Result<VoyageReport> {
        calculate_voyage(&self.emission_factors, &self.consumption, &self.voyage)
    }
}

/// Everything the presentation and export layers need for one voyage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoyageReport {
    pub vessel_name: String,
    pub voyage_number: String,
    pub main_engine_fuel: Option<FuelType>,
    pub auxiliary_engine_fuel: Option<FuelType>,
    pub sailing_hours: Option<f64>,
    pub port_stay_hours: Option<f64>,
    /// Consumed fuels only, in consumption-sheet order.
    pub per_fuel: Vec<PerFuelResult>,
    pub totals: VoyageTotals,
    pub compliance: ComplianceAssessment,
    pub eua_cost_eur: f64,
    pub efficiency: EfficiencyMetrics,
}

/// Run the full pipeline for one voyage.
///
/// The factor table is read, never modified, and fuels with no consumption
/// are dropped before their factor is looked up.
///
/// # Errors
/// Returns the first [`Error::MissingFactor`] or [`Error::InvalidFactor`]
/// raised by a consumed fuel.
pub fn calculate_voyage(
    factors: &EmissionFactorTable,
    consumption: &ConsumptionSheet,
    voyage: &VoyageContext,
) -> Result<VoyageReport> {
    let mut per_fuel = Vec::with_capacity(consumption.len());
    for entry in consumption.iter() {
        match calculate_fuel(entry.fuel, &entry.record, factors)? {
            Some(result) => {
                debug!(
                    fuel = %result.fuel,
                    energy_mj = result.total_energy_mj(),
                    ghg_mt = result.total_ghg_mt(),
                    co2_mt = result.total_co2_mt(),
                    "calculated fuel emissions"
                );
                per_fuel.push(result);
            }
            None => debug!(fuel = %entry.fuel, "skipping fuel with no consumption"),
        }
    }

    let totals = VoyageTotals::aggregate(&per_fuel);
    let params = &voyage.regulatory;
    let compliance = evaluate(totals.ghg_intensity_g_per_mj, totals.total_energy_mj(), params);
    let eua_cost = eua_cost_eur(totals.total_eua(), params);
    let efficiency = EfficiencyMetrics::calculate(&totals, voyage.distance_nm, voyage.cargo_tonnes);

    info!(
        vessel = %voyage.vessel_name,
        voyage = %voyage.voyage_number,
        fuels = per_fuel.len(),
        energy_tj = totals.total_energy_tj(),
        ghg_mt = totals.total_ghg_mt(),
        eua = totals.total_eua(),
        status = compliance.status.label(),
        "voyage emissions calculated"
    );
    if let Some(excess) = compliance.excess_g_per_mj() {
        warn!(
            excess_g_per_mj = excess,
            target_g_per_mj = compliance.target_g_per_mj,
            penalty_eur = compliance.penalty_eur,
            "GHG intensity exceeds FuelEU target"
        );
    }

    Ok(VoyageReport {
        vessel_name: voyage.vessel_name.clone(),
        voyage_number: voyage.voyage_number.clone(),
        main_engine_fuel: voyage.main_engine_fuel,
        auxiliary_engine_fuel: voyage.auxiliary_engine_fuel,
        sailing_hours: voyage.sailing_hours(),
        port_stay_hours: voyage.port_call.stay_hours(),
        per_fuel,
        totals,
        compliance,
        eua_cost_eur: eua_cost,
        efficiency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceStatus;
    use crate::consumption::{ConsumptionEntry, FuelConsumptionRecord};
    use crate::factors::EmissionFactor;

    fn sailing(mass_t: f64) -> FuelConsumptionRecord {
        FuelConsumptionRecord {
            main_engine_sailing: mass_t,
            ..FuelConsumptionRecord::default()
        }
    }

    fn sheet(entries: &[(FuelType, FuelConsumptionRecord)]) -> ConsumptionSheet {
        ConsumptionSheet::from_entries(
            entries
                .iter()
                .map(|(fuel, record)| ConsumptionEntry {
                    fuel: *fuel,
                    record: *record,
                })
                .collect(),
        )
        .expect("unique fuels")
    }

    fn voyage() -> VoyageContext {
        VoyageContext {
            vessel_name: "Pacific Ruby".to_string(),
            imo_number: "1234567".to_string(),
            voyage_number: "7".to_string(),
            distance_nm: 1000.0,
            cargo_tonnes: 5000.0,
            ..VoyageContext::default()
        }
    }

    #[test]
    fn zero_rows_are_excluded_and_order_is_kept() {
        let consumption = sheet(&[
            (FuelType::MdoMgo, sailing(10.0)),
            (FuelType::LngOttoSlowSpeed, FuelConsumptionRecord::default()),
            (FuelType::Hfo, sailing(100.0)),
        ]);
        let report =
            calculate_voyage(&EmissionFactorTable::reference(), &consumption, &voyage()).unwrap();
        let fuels: Vec<_> = report.per_fuel.iter().map(|r| r.fuel).collect();
        assert_eq!(fuels, vec![FuelType::MdoMgo, FuelType::Hfo]);
        assert_eq!(report.vessel_name, "Pacific Ruby");
    }

    #[test]
    fn empty_voyage_is_not_applicable() {
        let report = calculate_voyage(
            &EmissionFactorTable::empty(),
            &ConsumptionSheet::new(),
            &voyage(),
        )
        .unwrap();
        assert!(report.per_fuel.is_empty());
        assert_eq!(report.compliance.status, ComplianceStatus::NotApplicable);
        assert_eq!(report.eua_cost_eur, 0.0);
        assert_eq!(report.efficiency.fuel_kg_per_nm, Some(0.0));
    }

    #[test]
    fn missing_factor_aborts() {
        let consumption = sheet(&[(FuelType::Hfo, sailing(1.0))]);
        let err = calculate_voyage(&EmissionFactorTable::empty(), &consumption, &voyage())
            .unwrap_err();
        assert!(matches!(err, Error::MissingFactor { fuel: FuelType::Hfo }));
    }

    #[test]
    fn unset_biofuel_factor_is_invalid() {
        let consumption = sheet(&[(FuelType::Biofuel2, sailing(1.0))]);
        let err = calculate_voyage(&EmissionFactorTable::reference(), &consumption, &voyage())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFactor { fuel: FuelType::Biofuel2, .. }));
    }

    #[test]
    fn factor_table_is_not_modified() {
        let factors = EmissionFactorTable::reference();
        let before = factors.clone();
        let consumption = sheet(&[(FuelType::Hfo, sailing(100.0))]);
        calculate_voyage(&factors, &consumption, &voyage()).unwrap();
        assert_eq!(factors, before);
    }

    #[test]
    fn eua_cost_uses_voyage_price() {
        let mut context = voyage();
        context.regulatory.eua_price_eur = 100.0;
        let factors = EmissionFactorTable::empty()
            .with_factor(FuelType::Hfo, EmissionFactor::new(0.0405, 91.74, 76.89));
        let consumption = sheet(&[(FuelType::Hfo, sailing(100.0))]);
        let report = calculate_voyage(&factors, &consumption, &context).unwrap();
        assert!((report.eua_cost_eur - report.totals.total_eua() * 100.0).abs() < 1e-6);
        assert_eq!(report.compliance.status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn validate_collects_consumption_problems() {
        let input = VoyageInput {
            voyage: VoyageContext {
                imo_number: "bad".to_string(),
                ..voyage()
            },
            emission_factors: EmissionFactorTable::reference(),
            consumption: sheet(&[(FuelType::Hfo, sailing(-1.0))]),
        };
        let err = input.validate().unwrap_err();
        match err {
            Error::VoyageValidation { problems } => {
                assert_eq!(problems.len(), 2, "{problems:?}");
                assert!(problems[0].contains("IMO number"));
                assert!(problems[1].contains("HFO"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn input_without_factors_uses_reference_table() {
        let raw = r#"{
            "voyage": {"vessel_name": "Pacific Ruby", "imo_number": "1234567"},
            "consumption": [{"fuel": "hfo", "main_engine_sailing": 100.0}]
        }"#;
        let input = VoyageInput::from_json(raw).unwrap();
        assert_eq!(input.emission_factors, EmissionFactorTable::reference());
        let report = input.calculate().unwrap();
        assert!((report.totals.total_energy_mj() - 4_050_000.0).abs() < 1e-6);
    }
}
