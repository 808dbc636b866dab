//! Validate command handler.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use super::{load_input, CommandContext};
use voyage_emissions_cli::output::format_validation;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Voyage input record (JSON).
    #[arg(long)]
    pub input: PathBuf,
}

/// Check an input record and list every problem found.
///
/// Exits unsuccessfully when any problem is reported.
pub fn handle_validate(args: &ValidateArgs, ctx: &CommandContext) -> Result<()> {
    let input = load_input(&args.input)?;
    let problems = input.problems();
    print!("{}", format_validation(&problems, ctx.format)?);

    if !problems.is_empty() {
        bail!(
            "{} failed validation with {} problem(s)",
            args.input.display(),
            problems.len()
        );
    }
    Ok(())
}
