//! Emission factor reference data.
//!
//! An [`EmissionFactorTable`] is an immutable snapshot: editing a factor
//! produces a new table via [`EmissionFactorTable::with_factor`], so a
//! calculation in progress never observes a half-applied edit.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fuel::FuelType;

/// Per-fuel conversion factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Lower calorific value in MJ per gram.
    pub lcv_mj_per_g: f64,
    /// Well-to-wake GHG emissions in gCO2e per MJ.
    pub ghg_wtw_g_per_mj: f64,
    /// Tank-to-wake CO2 emissions in gCO2e per MJ.
    pub co2_ttw_g_per_mj: f64,
}

impl EmissionFactor {
    pub const fn new(lcv_mj_per_g: f64, ghg_wtw_g_per_mj: f64, co2_ttw_g_per_mj: f64) -> Self {
        Self {
            lcv_mj_per_g,
            ghg_wtw_g_per_mj,
            co2_ttw_g_per_mj,
        }
    }

    /// Check that this factor can be used to compute emissions for `fuel`.
    ///
    /// The WtW GHG factor may be negative (some biofuels are credited with
    /// upstream capture), but LCV must be positive and TtW CO2 non-negative.
    pub fn validate(&self, fuel: FuelType) -> Result<()> {
        let fields = [
            (self.lcv_mj_per_g, "lcv_mj_per_g"),
            (self.ghg_wtw_g_per_mj, "ghg_wtw_g_per_mj"),
            (self.co2_ttw_g_per_mj, "co2_ttw_g_per_mj"),
        ];
        for (value, field) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidFactor {
                    fuel,
                    reason: format!("{field} must be finite, got {value}"),
                });
            }
        }

        if self.lcv_mj_per_g <= 0.0 {
            return Err(Error::InvalidFactor {
                fuel,
                reason: format!(
                    "lcv_mj_per_g must be positive, got {}",
                    self.lcv_mj_per_g
                ),
            });
        }

        if self.co2_ttw_g_per_mj < 0.0 {
            return Err(Error::InvalidFactor {
                fuel,
                reason: format!(
                    "co2_ttw_g_per_mj must be non-negative, got {}",
                    self.co2_ttw_g_per_mj
                ),
            });
        }

        Ok(())
    }
}

static REFERENCE_TABLE: Lazy<EmissionFactorTable> = Lazy::new(|| {
    let entries = [
        (FuelType::LfoBelow80Cst, EmissionFactor::new(0.041, 91.39, 76.85)),
        (FuelType::LfoAbove80Cst, EmissionFactor::new(0.0405, 91.74, 76.89)),
        (FuelType::Hfo, EmissionFactor::new(0.0405, 91.74, 76.89)),
        (FuelType::MdoMgo, EmissionFactor::new(0.0427, 90.77, 75.08)),
        (FuelType::LpgPropane, EmissionFactor::new(0.046, 74.21, 65.22)),
        (FuelType::LpgButane, EmissionFactor::new(0.046, 74.86, 65.87)),
        (FuelType::LngOttoMediumSpeed, EmissionFactor::new(0.0491, 89.20, 54.27)),
        (FuelType::LngOttoSlowSpeed, EmissionFactor::new(0.0491, 82.87, 55.06)),
        (FuelType::LngDieselSlowSpeed, EmissionFactor::new(0.0491, 76.08, 55.90)),
        (FuelType::LngLbsi, EmissionFactor::new(0.0491, 86.94, 54.55)),
        (FuelType::Biofuel1, EmissionFactor::new(0.037, 16.28, 76.59)),
        // Placeholders until the operator supplies certified values.
        (FuelType::Biofuel2, EmissionFactor::new(0.0, 0.0, 0.0)),
        (FuelType::Biofuel3, EmissionFactor::new(0.0, 0.0, 0.0)),
    ];
    EmissionFactorTable {
        factors: entries.into_iter().collect(),
        source: None,
    }
});

/// Mapping of fuel type to emission factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorTable {
    #[serde(flatten)]
    factors: BTreeMap<FuelType, EmissionFactor>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl EmissionFactorTable {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self {
            factors: BTreeMap::new(),
            source: None,
        }
    }

    /// Built-in reference factors for every fuel type.
    pub fn reference() -> Self {
        REFERENCE_TABLE.clone()
    }

    /// Look up the factor for a fuel without validating it.
    pub fn get(&self, fuel: FuelType) -> Option<&EmissionFactor> {
        self.factors.get(&fuel)
    }

    /// Look up a factor that is usable for calculation.
    ///
    /// # Errors
    /// [`Error::MissingFactor`] when the fuel has no entry,
    /// [`Error::InvalidFactor`] when the entry fails [`EmissionFactor::validate`].
    pub fn require(&self, fuel: FuelType) -> Result<&EmissionFactor> {
        let factor = self.get(fuel).ok_or(Error::MissingFactor { fuel })?;
        factor.validate(fuel)?;
        Ok(factor)
    }

    /// Return a new table version with `fuel` set to `factor`.
    #[must_use]
    pub fn with_factor(&self, fuel: FuelType, factor: EmissionFactor) -> Self {
        let mut next = self.clone();
        next.factors.insert(fuel, factor);
        next
    }

    /// Return a new table version with every entry of `overlay` applied on top.
    #[must_use]
    pub fn merged_with(&self, overlay: &EmissionFactorTable) -> Self {
        let mut next = self.clone();
        next.factors
            .extend(overlay.factors.iter().map(|(fuel, factor)| (*fuel, *factor)));
        if overlay.source.is_some() {
            next.source = overlay.source.clone();
        }
        next
    }

    /// Iterate entries in canonical fuel order.
    pub fn iter(&self) -> impl Iterator<Item = (FuelType, &EmissionFactor)> {
        self.factors.iter().map(|(fuel, factor)| (*fuel, factor))
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Get the source path if the table was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Load a factor table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut table = Self::from_reader(file)?;
        table.source = Some(path.to_path_buf());
        Ok(table)
    }

    /// Load a factor table from CSV.
    ///
    /// Rows may carry zero factors (placeholder fuels); positivity is only
    /// enforced when a consumed fuel is looked up through [`Self::require`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::FactorTableValidation {
                message: format!("failed to read emission factor headers: {err}"),
            })?
            .clone();

        let synonyms: &[(&str, &[&str])] = &[
            ("fuel", &["fuel", "fuel_type", "fuel_name"]),
            (
                "lcv_mj_per_g",
                &["lcv_mj_per_g", "lcv_mj_g", "lcv", "lcv_mjg"],
            ),
            (
                "ghg_wtw_g_per_mj",
                &[
                    "ghg_wtw_g_per_mj",
                    "ghg_wtw_gco2e_mj",
                    "ghg_wtw",
                    "ghg",
                ],
            ),
            (
                "co2_ttw_g_per_mj",
                &[
                    "co2_ttw_g_per_mj",
                    "co2_ttw_gco2e_mj",
                    "co2_ttw",
                    "co2",
                ],
            ),
        ];
        let index_map = map_headers(&headers, synonyms);

        let required = ["fuel", "lcv_mj_per_g", "ghg_wtw_g_per_mj", "co2_ttw_g_per_mj"];
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|c| !index_map.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::FactorTableValidation {
                message: format!(
                    "missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut factors = BTreeMap::new();
        let mut row_num: usize = 1;
        for result in csv_reader.records() {
            row_num += 1;
            let record = result.map_err(|e| Error::FactorTableValidation {
                message: e.to_string(),
            })?;

            let get = |field: &str| -> String {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let fuel_name = get("fuel");
            if fuel_name.is_empty() {
                return Err(Error::FactorTableValidation {
                    message: format!("missing fuel name at row {row_num}"),
                });
            }
            let fuel = FuelType::parse(&fuel_name)?;

            let parse = |field: &str| -> Result<f64> {
                let raw = get(field);
                let value = raw.parse::<f64>().map_err(|e| Error::FactorTableValidation {
                    message: format!("invalid {field} for fuel '{fuel}' at row {row_num}: {e}"),
                })?;
                if !value.is_finite() {
                    return Err(Error::FactorTableValidation {
                        message: format!(
                            "{field} for fuel '{fuel}' at row {row_num} must be finite"
                        ),
                    });
                }
                Ok(value)
            };

            let factor = EmissionFactor {
                lcv_mj_per_g: parse("lcv_mj_per_g")?,
                ghg_wtw_g_per_mj: parse("ghg_wtw_g_per_mj")?,
                co2_ttw_g_per_mj: parse("co2_ttw_g_per_mj")?,
            };

            if factors.insert(fuel, factor).is_some() {
                return Err(Error::FactorTableValidation {
                    message: format!("duplicate fuel '{fuel}' at row {row_num}"),
                });
            }
        }

        Ok(Self {
            factors,
            source: None,
        })
    }
}

/// Normalize header strings for robust matching.
pub(crate) fn normalize_header(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Resolve each canonical column name to the first header matching one of its synonyms.
pub(crate) fn map_headers<'a>(
    headers: &csv::StringRecord,
    synonyms: &[(&'a str, &[&str])],
) -> HashMap<&'a str, usize> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut index_map = HashMap::new();

    for (canon, alts) in synonyms {
        'outer: for alt in *alts {
            let alt_n = normalize_header(alt);
            for (i, h) in normalized.iter().enumerate() {
                if h == &alt_n {
                    index_map.insert(*canon, i);
                    break 'outer;
                }
            }
        }
    }

    index_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reference_table_covers_every_fuel() {
        let table = EmissionFactorTable::reference();
        assert_eq!(table.len(), FuelType::ALL.len());
        let hfo = table.require(FuelType::Hfo).expect("hfo usable");
        assert_eq!(hfo.lcv_mj_per_g, 0.0405);
        assert_eq!(hfo.ghg_wtw_g_per_mj, 91.74);
        assert_eq!(hfo.co2_ttw_g_per_mj, 76.89);
    }

    #[test]
    fn placeholder_biofuel_is_rejected_on_require() {
        let table = EmissionFactorTable::reference();
        assert!(table.get(FuelType::Biofuel2).is_some());
        let err = table.require(FuelType::Biofuel2).unwrap_err();
        assert!(matches!(err, Error::InvalidFactor { fuel: FuelType::Biofuel2, .. }));
    }

    #[test]
    fn missing_entry_is_reported() {
        let table = EmissionFactorTable::empty();
        let err = table.require(FuelType::Hfo).unwrap_err();
        assert!(matches!(err, Error::MissingFactor { fuel: FuelType::Hfo }));
    }

    #[test]
    fn negative_wtw_factor_is_allowed() {
        let factor = EmissionFactor::new(0.037, -12.0, 70.0);
        assert!(factor.validate(FuelType::Biofuel1).is_ok());
    }

    #[test]
    fn with_factor_leaves_original_untouched() {
        let original = EmissionFactorTable::reference();
        let tuned = original.with_factor(FuelType::Biofuel2, EmissionFactor::new(0.038, 20.0, 74.0));
        assert_eq!(original.get(FuelType::Biofuel2).unwrap().lcv_mj_per_g, 0.0);
        assert_eq!(tuned.get(FuelType::Biofuel2).unwrap().lcv_mj_per_g, 0.038);
    }

    #[test]
    fn merged_with_overlays_entries() {
        let overlay = EmissionFactorTable::empty()
            .with_factor(FuelType::Biofuel3, EmissionFactor::new(0.04, 10.0, 75.0));
        let merged = EmissionFactorTable::reference().merged_with(&overlay);
        assert_eq!(merged.len(), FuelType::ALL.len());
        assert_eq!(merged.get(FuelType::Biofuel3).unwrap().ghg_wtw_g_per_mj, 10.0);
    }

    #[test]
    fn reads_csv_with_source_style_headers() {
        let csv = "Fuel Type,LCV_MJ_g,GHG_WtW_gCO2e_MJ,CO2_TtW_gCO2e_MJ\nHFO,0.0405,91.74,76.89\nMDO/MGO,0.0427,90.77,75.08\n";
        let table = EmissionFactorTable::from_reader(Cursor::new(csv)).expect("table parses");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(FuelType::MdoMgo).unwrap().lcv_mj_per_g, 0.0427);
    }

    #[test]
    fn rejects_duplicate_fuels() {
        let csv = "fuel,lcv,ghg,co2\nhfo,0.04,90,76\nHFO,0.04,90,76\n";
        let err = EmissionFactorTable::from_reader(Cursor::new(csv)).unwrap_err();
        assert!(err.to_string().contains("duplicate fuel 'HFO' at row 3"));
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "fuel,lcv\nhfo,0.04\n";
        let err = EmissionFactorTable::from_reader(Cursor::new(csv)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ghg_wtw_g_per_mj"));
        assert!(message.contains("co2_ttw_g_per_mj"));
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let csv = "fuel,lcv,ghg,co2\nhfo,abc,90,76\n";
        let err = EmissionFactorTable::from_reader(Cursor::new(csv)).unwrap_err();
        assert!(err.to_string().contains("invalid lcv_mj_per_g for fuel 'HFO' at row 2"));
    }

    #[test]
    fn serializes_as_fuel_keyed_map() {
        let table = EmissionFactorTable::empty()
            .with_factor(FuelType::Hfo, EmissionFactor::new(0.0405, 91.74, 76.89));
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["hfo"]["lcv_mj_per_g"], 0.0405);

        let back: EmissionFactorTable = serde_json::from_value(value).unwrap();
        assert_eq!(back, table);
    }
}
