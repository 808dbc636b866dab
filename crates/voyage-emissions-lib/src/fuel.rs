//! Closed fuel-type identity.
//!
//! Fuel types are a fixed enumeration so that consumption records and the
//! emission factor table can never disagree on a key through a typo. Each
//! variant has a stable machine identifier (used in JSON and CSV files) and a
//! display label matching the regulatory fuel names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum Jaro-Winkler similarity for a fuel name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Maximum number of suggestions attached to an unknown fuel error.
const MAX_SUGGESTIONS: usize = 3;

/// Broad grouping used when presenting fuels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelCategory {
    Conventional,
    Gas,
    Biofuel,
}

impl FuelCategory {
    pub fn label(self) -> &'static str {
        match self {
            FuelCategory::Conventional => "Conventional",
            FuelCategory::Gas => "Gas",
            FuelCategory::Biofuel => "Biofuel",
        }
    }
}

/// Fuel type identifier.
///
/// Ordering follows declaration order, which is also the canonical iteration
/// order of an [`EmissionFactorTable`](crate::factors::EmissionFactorTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FuelType {
    /// Light fuel oil, viscosity below 80 cSt.
    LfoBelow80Cst,
    /// Light fuel oil, viscosity above 80 cSt.
    LfoAbove80Cst,
    /// Heavy fuel oil.
    Hfo,
    /// Marine diesel / gas oil.
    MdoMgo,
    /// Liquefied petroleum gas, propane.
    LpgPropane,
    /// Liquefied petroleum gas, butane.
    LpgButane,
    /// LNG, Otto cycle, medium speed.
    LngOttoMediumSpeed,
    /// LNG, Otto cycle, slow speed.
    LngOttoSlowSpeed,
    /// LNG, Diesel cycle, slow speed.
    LngDieselSlowSpeed,
    /// LNG, lean-burn spark ignition.
    LngLbsi,
    Biofuel1,
    Biofuel2,
    Biofuel3,
}

impl FuelType {
    /// Every fuel type in canonical order.
    pub const ALL: [FuelType; 13] = [
        FuelType::LfoBelow80Cst,
        FuelType::LfoAbove80Cst,
        FuelType::Hfo,
        FuelType::MdoMgo,
        FuelType::LpgPropane,
        FuelType::LpgButane,
        FuelType::LngOttoMediumSpeed,
        FuelType::LngOttoSlowSpeed,
        FuelType::LngDieselSlowSpeed,
        FuelType::LngLbsi,
        FuelType::Biofuel1,
        FuelType::Biofuel2,
        FuelType::Biofuel3,
    ];

    /// Stable machine identifier used in input files.
    pub fn id(self) -> &'static str {
        match self {
            FuelType::LfoBelow80Cst => "lfo_below_80_cst",
            FuelType::LfoAbove80Cst => "lfo_above_80_cst",
            FuelType::Hfo => "hfo",
            FuelType::MdoMgo => "mdo_mgo",
            FuelType::LpgPropane => "lpg_propane",
            FuelType::LpgButane => "lpg_butane",
            FuelType::LngOttoMediumSpeed => "lng_otto_ms",
            FuelType::LngOttoSlowSpeed => "lng_otto_ss",
            FuelType::LngDieselSlowSpeed => "lng_diesel_ss",
            FuelType::LngLbsi => "lng_lbsi",
            FuelType::Biofuel1 => "biofuel_1",
            FuelType::Biofuel2 => "biofuel_2",
            FuelType::Biofuel3 => "biofuel_3",
        }
    }

    /// Human-readable label shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            FuelType::LfoBelow80Cst => "LFO <80 CST",
            FuelType::LfoAbove80Cst => "LFO> 80 CST",
            FuelType::Hfo => "HFO",
            FuelType::MdoMgo => "MDO/MGO",
            FuelType::LpgPropane => "LPG (P)",
            FuelType::LpgButane => "LPG (B)",
            FuelType::LngOttoMediumSpeed => "LNG Otto MS",
            FuelType::LngOttoSlowSpeed => "LNG Otto SS",
            FuelType::LngDieselSlowSpeed => "LNG Diesel SS",
            FuelType::LngLbsi => "LBSI",
            FuelType::Biofuel1 => "Biofuel 1",
            FuelType::Biofuel2 => "Biofuel 2",
            FuelType::Biofuel3 => "Biofuel 3",
        }
    }

    pub fn category(self) -> FuelCategory {
        match self {
            FuelType::LfoBelow80Cst | FuelType::LfoAbove80Cst | FuelType::Hfo | FuelType::MdoMgo => {
                FuelCategory::Conventional
            }
            FuelType::LpgPropane
            | FuelType::LpgButane
            | FuelType::LngOttoMediumSpeed
            | FuelType::LngOttoSlowSpeed
            | FuelType::LngDieselSlowSpeed
            | FuelType::LngLbsi => FuelCategory::Gas,
            FuelType::Biofuel1 | FuelType::Biofuel2 | FuelType::Biofuel3 => FuelCategory::Biofuel,
        }
    }

    /// Additional spellings seen in operator reports.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            FuelType::MdoMgo => &["MGO", "MDO", "MDO MGO"],
            FuelType::LpgPropane => &["LPG(P)", "LPG Propane"],
            FuelType::LpgButane => &["LPG(B)", "LPG Butane"],
            FuelType::LngLbsi => &["LNG LBSI"],
            _ => &[],
        }
    }

    /// Resolve a fuel name, returning [`Error::UnknownFuelType`] with suggestions on failure.
    ///
    /// Matching tries, in order: the exact identifier or label (case-insensitive),
    /// a known alias, and finally a punctuation-insensitive comparison that must
    /// be unambiguous.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();

        for fuel in Self::ALL {
            if fuel.id().eq_ignore_ascii_case(trimmed) || fuel.label().eq_ignore_ascii_case(trimmed)
            {
                return Ok(fuel);
            }
        }

        for fuel in Self::ALL {
            if fuel
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(trimmed))
            {
                return Ok(fuel);
            }
        }

        let wanted = normalize(trimmed);
        let matches: Vec<FuelType> = Self::ALL
            .into_iter()
            .filter(|fuel| {
                normalize(fuel.id()) == wanted
                    || normalize(fuel.label()) == wanted
                    || fuel.aliases().iter().any(|alias| normalize(alias) == wanted)
            })
            .collect();
        if let [single] = matches.as_slice() {
            return Ok(*single);
        }

        Err(Error::UnknownFuelType {
            name: trimmed.to_string(),
            suggestions: fuzzy_fuel_matches(trimmed, MAX_SUGGESTIONS),
        })
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FuelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FuelType::parse(s)
    }
}

impl TryFrom<String> for FuelType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        FuelType::parse(&value)
    }
}

impl From<FuelType> for String {
    fn from(value: FuelType) -> Self {
        value.id().to_string()
    }
}

/// Return up to `limit` fuel labels similar to `name`, best match first.
pub fn fuzzy_fuel_matches(name: &str, limit: usize) -> Vec<String> {
    let wanted = name.to_lowercase();
    let mut scored: Vec<(f64, &'static str)> = FuelType::ALL
        .into_iter()
        .map(|fuel| {
            let by_label = strsim::jaro_winkler(&wanted, &fuel.label().to_lowercase());
            let by_id = strsim::jaro_winkler(&wanted, fuel.id());
            (by_label.max(by_id), fuel.label())
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, label)| label.to_string())
        .collect()
}

fn normalize(s: &str) -> String {
    s.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
