//! Voyage-wide totals and GHG intensity.

use serde::{Deserialize, Serialize};

use crate::calculator::PerFuelResult;
use crate::constants::{GRAMS_PER_TONNE, MJ_PER_TJ};

/// Sums of every per-fuel figure across the voyage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoyageTotals {
    pub sailing_fuel_mt: f64,
    pub port_fuel_mt: f64,
    pub sailing_energy_mj: f64,
    pub port_energy_mj: f64,
    pub sailing_ghg_mt: f64,
    pub port_ghg_mt: f64,
    pub sailing_co2_mt: f64,
    pub port_co2_mt: f64,
    pub sailing_eua: f64,
    pub port_eua: f64,
    /// gCO2e per MJ; `None` when no energy was consumed.
    pub ghg_intensity_g_per_mj: Option<f64>,
}

impl VoyageTotals {
    /// Sum the per-fuel results and derive GHG intensity.
    pub fn aggregate(results: &[PerFuelResult]) -> Self {
        let mut totals = results.iter().fold(Self::default(), |mut acc, result| {
            acc.sailing_fuel_mt += result.sailing.mass_t;
            acc.port_fuel_mt += result.port.mass_t;
            acc.sailing_energy_mj += result.sailing.energy_mj;
            acc.port_energy_mj += result.port.energy_mj;
            acc.sailing_ghg_mt += result.sailing.ghg_mt;
            acc.port_ghg_mt += result.port.ghg_mt;
            acc.sailing_co2_mt += result.sailing.co2_mt;
            acc.port_co2_mt += result.port.co2_mt;
            acc.sailing_eua += result.sailing.eua_count;
            acc.port_eua += result.port.eua_count;
            acc
        });
        totals.ghg_intensity_g_per_mj = ghg_intensity(totals.total_ghg_mt(), totals.total_energy_tj());
        totals
    }

    pub fn total_fuel_mt(&self) -> f64 {
        self.sailing_fuel_mt + self.port_fuel_mt
    }

    pub fn total_energy_mj(&self) -> f64 {
        self.sailing_energy_mj + self.port_energy_mj
    }

    pub fn sailing_energy_tj(&self) -> f64 {
        self.sailing_energy_mj / MJ_PER_TJ
    }

    pub fn port_energy_tj(&self) -> f64 {
        self.port_energy_mj / MJ_PER_TJ
    }

    pub fn total_energy_tj(&self) -> f64 {
        self.total_energy_mj() / MJ_PER_TJ
    }

    pub fn total_ghg_mt(&self) -> f64 {
        self.sailing_ghg_mt + self.port_ghg_mt
    }

    pub fn total_co2_mt(&self) -> f64 {
        self.sailing_co2_mt + self.port_co2_mt
    }

    pub fn total_eua(&self) -> f64 {
        self.sailing_eua + self.port_eua
    }
}

/// GHG intensity in gCO2e/MJ: tonnes back to grams over TJ back to MJ.
///
/// Returns `None` unless total energy is strictly positive, so callers never
/// see NaN or infinity.
pub fn ghg_intensity(total_ghg_mt: f64, total_energy_tj: f64) -> Option<f64> {
    if total_energy_tj > 0.0 && total_energy_tj.is_finite() {
        Some((total_ghg_mt * GRAMS_PER_TONNE) / (total_energy_tj * MJ_PER_TJ))
    } else {
        None
    }
}
