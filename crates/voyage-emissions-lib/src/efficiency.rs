//! Voyage efficiency ratios.

use serde::{Deserialize, Serialize};

use crate::constants::KG_PER_TONNE;
use crate::totals::VoyageTotals;

/// Per-distance and per-cargo ratios. Each is `None` when its divisor is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    /// Kilograms of fuel per nautical mile.
    pub fuel_kg_per_nm: Option<f64>,
    /// Kilograms of CO2 per nautical mile.
    pub co2_kg_per_nm: Option<f64>,
    /// Kilograms of CO2 per tonne of cargo carried.
    pub co2_kg_per_tonne_cargo: Option<f64>,
}

impl EfficiencyMetrics {
    pub fn calculate(totals: &VoyageTotals, distance_nm: f64, cargo_tonnes: f64) -> Self {
        Self {
            fuel_kg_per_nm: per_unit_kg(totals.total_fuel_mt(), distance_nm),
            co2_kg_per_nm: per_unit_kg(totals.total_co2_mt(), distance_nm),
            co2_kg_per_tonne_cargo: per_unit_kg(totals.total_co2_mt(), cargo_tonnes),
        }
    }
}

fn per_unit_kg(tonnes: f64, divisor: f64) -> Option<f64> {
    if divisor > 0.0 && divisor.is_finite() {
        Some(tonnes / divisor * KG_PER_TONNE)
    } else {
        None
    }
}
