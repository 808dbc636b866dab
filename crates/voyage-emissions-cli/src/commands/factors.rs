//! Factors command handler for listing the active emission factor table.

use anyhow::Result;

use voyage_emissions_lib::EmissionFactorTable;

use super::CommandContext;
use voyage_emissions_cli::output::format_factor_table;

/// Print the reference table with any configured factor CSV laid over it.
///
/// This is the table `calculate` uses for an input record without its own
/// `emission_factors`.
pub fn handle_list_factors(ctx: &CommandContext) -> Result<()> {
    let reference = EmissionFactorTable::reference();
    let table = match ctx.load_factor_override()? {
        Some(overlay) => reference.merged_with(&overlay),
        None => reference,
    };
    print!("{}", format_factor_table(&table, ctx.format)?);
    Ok(())
}
