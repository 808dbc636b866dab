//! Unit conversions and regulatory defaults shared across the calculation modules.

/// Grams in one metric tonne.
pub const GRAMS_PER_TONNE: f64 = 1e6;

/// Kilograms in one metric tonne.
pub const KG_PER_TONNE: f64 = 1_000.0;

/// Megajoules in one terajoule. Energy is reported in TJ but every emission
/// formula operates on the MJ figure.
pub const MJ_PER_TJ: f64 = 1e6;

/// EU Allowances surrendered per tonne of tank-to-wake CO2.
///
/// EU ETS maritime currently requires one allowance per tonne. A phase-in
/// percentage would replace this ratio.
pub const EUA_PER_TONNE_CO2: f64 = 1.0;

/// FuelEU Maritime GHG intensity target (gCO2e/MJ) used when none is configured.
pub const DEFAULT_GHG_TARGET_G_PER_MJ: f64 = 89.3368;

/// Approximate EUA market price in euros.
pub const DEFAULT_EUA_PRICE_EUR: f64 = 85.0;

/// Penalty in euros per MJ of energy for each gCO2e/MJ above target.
///
/// Equivalent to 2400 EUR per TJ per gCO2e/MJ of excess intensity.
pub const DEFAULT_PENALTY_RATE_EUR_PER_MJ: f64 = 2400.0 / MJ_PER_TJ;

/// Global warming potential of methane (100-year horizon).
pub const DEFAULT_GWP_CH4: f64 = 25.0;

/// Global warming potential of nitrous oxide (100-year horizon).
pub const DEFAULT_GWP_N2O: f64 = 298.0;

/// Regulatory year assumed when the input record does not name one.
pub const DEFAULT_REGULATORY_YEAR: u16 = 2025;
