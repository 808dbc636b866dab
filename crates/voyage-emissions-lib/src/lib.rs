//! Voyage emissions library entry points.
//!
//! This crate turns per-fuel consumption figures into energy, well-to-wake
//! GHG, tank-to-wake CO2 and EU Allowance obligations for a single voyage,
//! then derives GHG intensity, a FuelEU Maritime verdict with penalty
//! estimate, EU ETS cost and efficiency ratios. Higher-level consumers (the
//! CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!
//! Every calculation is a pure function of its inputs: the emission factor
//! table is passed in explicitly and never modified.

#![deny(warnings)]

pub mod calculator;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod consumption;
pub mod efficiency;
pub mod engine;
pub mod error;
pub mod factors;
pub mod fuel;
pub mod report;
pub mod totals;
pub mod voyage;

pub use calculator::{calculate_fuel, PerFuelResult, PhaseEmissions};
pub use compliance::{ComplianceAssessment, ComplianceStatus, RegulatoryParameters};
pub use config::factors_path_from_env;
pub use consumption::{
    ConsumptionEntry, ConsumptionSheet, EngineRole, FuelConsumptionRecord, Phase, PhaseMasses,
};
pub use efficiency::EfficiencyMetrics;
pub use engine::{calculate_voyage, VoyageInput, VoyageReport};
pub use error::{Error, Result};
pub use factors::{EmissionFactor, EmissionFactorTable};
pub use fuel::{FuelCategory, FuelType};
pub use report::{export_file_stem, input_csv, per_fuel_csv, totals_csv, RenderMode};
pub use totals::{ghg_intensity, VoyageTotals};
pub use voyage::{
    Condition, Jurisdiction, PortActivity, PortCall, PortLimits, Route, Schedule, VoyageContext,
};
