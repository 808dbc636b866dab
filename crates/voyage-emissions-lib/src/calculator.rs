//! Mass to energy to emissions conversion.
//!
//! Formula chain for one phase of one fuel:
//!
//! ```text
//! energy_mj = lcv_mj_per_g * mass_t * 1e6
//! ghg_mt    = energy_mj * ghg_wtw_g_per_mj / 1e6
//! co2_mt    = energy_mj * co2_ttw_g_per_mj / 1e6
//! eua_count = co2_mt * EUA_PER_TONNE_CO2
//! ```
//!
//! Energy is also exposed in terajoules for display, but every emission
//! figure is derived from the megajoule value.

use serde::{Deserialize, Serialize};

use crate::consumption::FuelConsumptionRecord;
use crate::constants::{EUA_PER_TONNE_CO2, GRAMS_PER_TONNE, MJ_PER_TJ};
use crate::error::Result;
use crate::factors::{EmissionFactor, EmissionFactorTable};
use crate::fuel::FuelType;

/// Energy in MJ released by burning `mass_t` tonnes of fuel.
pub fn energy_mj(mass_t: f64, lcv_mj_per_g: f64) -> f64 {
    lcv_mj_per_g * mass_t * GRAMS_PER_TONNE
}

/// Well-to-wake GHG in tonnes CO2e for `energy_mj` of energy.
pub fn ghg_mt(energy_mj: f64, ghg_wtw_g_per_mj: f64) -> f64 {
    energy_mj * ghg_wtw_g_per_mj / GRAMS_PER_TONNE
}

/// Tank-to-wake CO2 in tonnes for `energy_mj` of energy.
pub fn co2_mt(energy_mj: f64, co2_ttw_g_per_mj: f64) -> f64 {
    energy_mj * co2_ttw_g_per_mj / GRAMS_PER_TONNE
}

/// EU Allowances owed for `co2_mt` tonnes of CO2.
pub fn eua_count(co2_mt: f64) -> f64 {
    co2_mt * EUA_PER_TONNE_CO2
}

/// Emissions for one phase of one fuel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseEmissions {
    pub mass_t: f64,
    pub energy_mj: f64,
    pub ghg_mt: f64,
    pub co2_mt: f64,
    pub eua_count: f64,
}

impl PhaseEmissions {
    /// Run the formula chain for `mass_t` tonnes burned with `factor`.
    pub fn calculate(mass_t: f64, factor: &EmissionFactor) -> Self {
        let energy = energy_mj(mass_t, factor.lcv_mj_per_g);
        let co2 = co2_mt(energy, factor.co2_ttw_g_per_mj);
        Self {
            mass_t,
            energy_mj: energy,
            ghg_mt: ghg_mt(energy, factor.ghg_wtw_g_per_mj),
            co2_mt: co2,
            eua_count: eua_count(co2),
        }
    }

    pub fn energy_tj(&self) -> f64 {
        self.energy_mj / MJ_PER_TJ
    }
}

/// Sailing and port emissions for a single fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerFuelResult {
    pub fuel: FuelType,
    pub sailing: PhaseEmissions,
    pub port: PhaseEmissions,
}

impl PerFuelResult {
    pub fn total_mass_t(&self) -> f64 {
        self.sailing.mass_t + self.port.mass_t
    }

    pub fn total_energy_mj(&self) -> f64 {
        self.sailing.energy_mj + self.port.energy_mj
    }

    pub fn total_ghg_mt(&self) -> f64 {
        self.sailing.ghg_mt + self.port.ghg_mt
    }

    pub fn total_co2_mt(&self) -> f64 {
        self.sailing.co2_mt + self.port.co2_mt
    }

    pub fn total_eua(&self) -> f64 {
        self.sailing.eua_count + self.port.eua_count
    }
}

/// Calculate one fuel's emissions.
///
/// Returns `Ok(None)` when the fuel was not burned in either phase; such
/// fuels are left out of reports rather than listed with zeros, and their
/// factor is never looked up.
///
/// # Errors
/// Propagates [`EmissionFactorTable::require`] failures for consumed fuels.
pub fn calculate_fuel(
    fuel: FuelType,
    record: &FuelConsumptionRecord,
    factors: &EmissionFactorTable,
) -> Result<Option<PerFuelResult>> {
    let masses = record.aggregate();
    if masses.is_zero() {
        return Ok(None);
    }

    let factor = factors.require(fuel)?;
    Ok(Some(PerFuelResult {
        fuel,
        sailing: PhaseEmissions::calculate(masses.sailing_t, factor),
        port: PhaseEmissions::calculate(masses.port_t, factor),
    }))
}
