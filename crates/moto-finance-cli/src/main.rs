mod commands;
mod config;
mod input;
mod logger;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::financing::{InstallmentArgs, QuoteArgs, ScheduleArgs, TermsArgs};
use commands::lead::{HandoffArgs, MaskArgs, SubmitArgs};

/// Dealership financing simulations
#[derive(Parser)]
#[command(
    name = "motofin",
    version,
    about = "Dealership financing simulations",
    long_about = "Prices motorcycle financing with decimal precision: level monthly \
                  installments, term comparisons, amortization schedules, and the \
                  lead/messaging handoff that follows a simulation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Financing configuration file (TOML or JSON)
    #[arg(long, global = true, env = "MOTOFIN_CONFIG")]
    config: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the monthly installment for a price, down payment and term
    Installment(InstallmentArgs),
    /// Build a full quote with totals and warnings
    Quote(QuoteArgs),
    /// Compare installments across every offered term
    Terms(TermsArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Format the dealer message and deep link for a simulation
    Handoff(HandoffArgs),
    /// Validate, record (in memory) and hand off a simulation
    Submit(SubmitArgs),
    /// Apply the storefront phone or CPF input mask
    Mask(MaskArgs),
    /// Print the effective financing configuration
    ShowConfig,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let financing = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(2);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Installment(args) => commands::financing::run_installment(args, &financing),
        Commands::Quote(args) => commands::financing::run_quote(args, &financing),
        Commands::Terms(args) => commands::financing::run_terms(args, &financing),
        Commands::Schedule(args) => commands::financing::run_schedule(args, &financing),
        Commands::Handoff(args) => commands::lead::run_handoff(args, &financing),
        Commands::Submit(args) => commands::lead::run_submit(args, &financing),
        Commands::Mask(args) => commands::lead::run_mask(args),
        Commands::ShowConfig => serde_json::to_value(&financing).map_err(Into::into),
        Commands::Version => {
            println!("motofin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, financing.locale);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
