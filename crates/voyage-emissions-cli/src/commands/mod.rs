// Handlers for CLI subcommands. main.rs parses arguments and dispatches here.

pub mod calculate;
pub mod factors;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use voyage_emissions_lib::{factors_path_from_env, EmissionFactorTable, VoyageInput};

use voyage_emissions_cli::output::OutputFormat;

/// Global options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    /// `--factors` flag value; falls back to `VOYAGE_EMISSIONS_FACTORS`.
    pub factors: Option<PathBuf>,
}

impl CommandContext {
    /// Factor table CSV named by the flag or the environment, if any.
    pub fn factors_path(&self) -> Option<PathBuf> {
        self.factors.clone().or_else(factors_path_from_env)
    }

    /// Load the configured factor table CSV.
    pub fn load_factor_override(&self) -> Result<Option<EmissionFactorTable>> {
        let Some(path) = self.factors_path() else {
            return Ok(None);
        };
        let table = EmissionFactorTable::from_path(&path).with_context(|| {
            format!("failed to load emission factors from {}", path.display())
        })?;
        Ok(Some(table))
    }
}

/// Load a voyage input record from a JSON file.
pub fn load_input(path: &Path) -> Result<VoyageInput> {
    VoyageInput::from_path(path)
        .with_context(|| format!("failed to load voyage input from {}", path.display()))
}
