//! Calculate command handler.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use voyage_emissions_lib::report::{
    DETAILED_EXPORT_SUFFIX, INPUT_EXPORT_SUFFIX, SUMMARY_EXPORT_SUFFIX,
};
use voyage_emissions_lib::{
    input_csv, per_fuel_csv, totals_csv, RegulatoryParameters, VoyageInput, VoyageReport,
};

use super::{load_input, CommandContext};
use voyage_emissions_cli::output::{format_report, OutputFormat};
use voyage_emissions_cli::terminal::ColorPalette;

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    /// Voyage input record (JSON).
    #[arg(long)]
    pub input: PathBuf,

    /// FuelEU GHG intensity target in gCO2e/MJ.
    #[arg(long)]
    pub ghg_target: Option<f64>,

    /// EU Allowance price in euros.
    #[arg(long)]
    pub eua_price: Option<f64>,

    /// Penalty in euros per MJ for each gCO2e/MJ above target.
    #[arg(long)]
    pub penalty_rate: Option<f64>,

    /// Write detailed, summary and input CSV exports into this directory.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Calculate even when the input record has validation problems.
    #[arg(long)]
    pub skip_validation: bool,
}

impl CalculateArgs {
    /// Apply flag overrides on top of `params`.
    fn apply_overrides(&self, mut params: RegulatoryParameters) -> RegulatoryParameters {
        if let Some(value) = self.ghg_target {
            params.ghg_target_g_per_mj = value;
        }
        if let Some(value) = self.eua_price {
            params.eua_price_eur = value;
        }
        if let Some(value) = self.penalty_rate {
            params.penalty_rate_eur_per_mj = value;
        }
        params
    }
}

/// Handle the `calculate` subcommand.
///
/// Settings resolve from the input file, then the environment, then flags.
/// A factor CSV is applied on top of the input's factor table.
pub fn handle_calculate(args: &CalculateArgs, ctx: &CommandContext) -> Result<()> {
    let mut input = load_input(&args.input)?;

    if !args.skip_validation {
        input
            .validate()
            .with_context(|| format!("{} failed validation", args.input.display()))?;
    }

    if let Some(table) = ctx.load_factor_override()? {
        input.emission_factors = input.emission_factors.merged_with(&table);
    }
    let params = input
        .voyage
        .regulatory
        .with_env_overrides()
        .context("invalid regulatory override in environment")?;
    input.voyage.regulatory = args.apply_overrides(params);

    let report = input.calculate().context("voyage calculation failed")?;
    print!(
        "{}",
        format_report(&report, ctx.format, &ColorPalette::detect())?
    );

    if let Some(dir) = &args.export_dir {
        let written = write_exports(dir, &input, &report)?;
        if ctx.format != OutputFormat::Json {
            println!();
            for path in written {
                println!("Exported {}", path.display());
            }
        }
    }
    Ok(())
}

/// Write the three CSV exports, returning their paths.
pub fn write_exports(dir: &Path, input: &VoyageInput, report: &VoyageReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let stem = report.export_file_stem();
    let detailed = dir.join(format!("{stem}{DETAILED_EXPORT_SUFFIX}"));
    let summary = dir.join(format!("{stem}{SUMMARY_EXPORT_SUFFIX}"));
    let record = dir.join(format!("{stem}{INPUT_EXPORT_SUFFIX}"));

    per_fuel_csv(create(&detailed)?, &report.per_fuel)
        .with_context(|| format!("failed to write {}", detailed.display()))?;
    totals_csv(create(&summary)?, &report.totals)
        .with_context(|| format!("failed to write {}", summary.display()))?;
    input_csv(create(&record)?, input)
        .with_context(|| format!("failed to write {}", record.display()))?;

    let written = vec![detailed, summary, record];
    for path in &written {
        info!(path = %path.display(), "wrote export");
    }
    Ok(written)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}
