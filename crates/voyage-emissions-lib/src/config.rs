//! Environment overrides for regulatory parameters and the factor table path.
//!
//! Precedence, lowest first: built-in defaults, the input record, the
//! environment, then explicit command-line flags applied by the caller.

use std::env;
use std::path::PathBuf;

use crate::compliance::RegulatoryParameters;
use crate::error::{Error, Result};

pub const GHG_TARGET_ENV: &str = "VOYAGE_EMISSIONS_GHG_TARGET";
pub const EUA_PRICE_ENV: &str = "VOYAGE_EMISSIONS_EUA_PRICE";
pub const PENALTY_RATE_ENV: &str = "VOYAGE_EMISSIONS_PENALTY_RATE";
pub const FACTORS_PATH_ENV: &str = "VOYAGE_EMISSIONS_FACTORS";

impl RegulatoryParameters {
    /// Defaults with any environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when a variable is set but is not a finite number.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides resolved by `lookup`, keyed by environment variable name.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = read_number(&lookup, GHG_TARGET_ENV)? {
            self.ghg_target_g_per_mj = value;
        }
        if let Some(value) = read_number(&lookup, EUA_PRICE_ENV)? {
            self.eua_price_eur = value;
        }
        if let Some(value) = read_number(&lookup, PENALTY_RATE_ENV)? {
            self.penalty_rate_eur_per_mj = value;
        }
        Ok(self)
    }
}

/// Factor table CSV named by `VOYAGE_EMISSIONS_FACTORS`, if set and non-empty.
pub fn factors_path_from_env() -> Option<PathBuf> {
    env::var_os(FACTORS_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn read_number<F>(lookup: &F, key: &str) -> Result<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(Error::Config {
            key: key.to_string(),
            message: format!("expected a finite number, got '{trimmed}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_variables_keeps_values() {
        let params = RegulatoryParameters::default()
            .with_overrides_from(lookup(&[]))
            .unwrap();
        assert_eq!(params, RegulatoryParameters::default());
    }

    #[test]
    fn variables_override_each_field() {
        let params = RegulatoryParameters::default()
            .with_overrides_from(lookup(&[
                (GHG_TARGET_ENV, "85.69"),
                (EUA_PRICE_ENV, " 70 "),
                (PENALTY_RATE_ENV, "0.003"),
            ]))
            .unwrap();
        assert_eq!(params.ghg_target_g_per_mj, 85.69);
        assert_eq!(params.eua_price_eur, 70.0);
        assert_eq!(params.penalty_rate_eur_per_mj, 0.003);
    }

    #[test]
    fn blank_variable_is_ignored() {
        let params = RegulatoryParameters::default()
            .with_overrides_from(lookup(&[(EUA_PRICE_ENV, "  ")]))
            .unwrap();
        assert_eq!(params.eua_price_eur, RegulatoryParameters::default().eua_price_eur);
    }

    #[test]
    fn unparsable_variable_is_a_config_error() {
        let err = RegulatoryParameters::default()
            .with_overrides_from(lookup(&[(GHG_TARGET_ENV, "lots")]))
            .unwrap_err();
        match err {
            Error::Config { key, message } => {
                assert_eq!(key, GHG_TARGET_ENV);
                assert!(message.contains("lots"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_variable_is_rejected() {
        let result = RegulatoryParameters::default()
            .with_overrides_from(lookup(&[(PENALTY_RATE_ENV, "inf")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
