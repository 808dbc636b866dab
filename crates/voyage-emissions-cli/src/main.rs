mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::calculate::{handle_calculate, CalculateArgs};
use commands::factors::handle_list_factors;
use commands::validate::{handle_validate, ValidateArgs};
use commands::CommandContext;
use voyage_emissions_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Voyage GHG, EU ETS and FuelEU Maritime calculator"
)]
struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Emission factor CSV applied over the input's factors (env: VOYAGE_EMISSIONS_FACTORS).
    #[arg(long, global = true)]
    factors: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate emissions, allowances and compliance for a voyage.
    Calculate(CalculateArgs),
    /// Check a voyage input record without calculating.
    Validate(ValidateArgs),
    /// List the active emission factor table.
    Factors,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = CommandContext {
        format: cli.format,
        factors: cli.factors,
    };

    match cli.command {
        Command::Calculate(args) => handle_calculate(&args, &ctx),
        Command::Validate(args) => handle_validate(&args, &ctx),
        Command::Factors => handle_list_factors(&ctx),
    }
}

// Logs go to stderr so report output on stdout stays machine-readable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
