mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::AmortizationArgs;
use commands::analysis::{AnalyzeArgs, CompareArgs};
use commands::cash_flow::{CashFlowArgs, DebtServiceArgs};
use commands::exit::{ExitArgs, IrrArgs};
use commands::financing::FinancingArgs;
use commands::waterfall::WaterfallArgs;

/// Real-estate syndication underwriting
#[derive(Parser)]
#[command(
    name = "synd",
    version,
    about = "Real-estate syndication underwriting",
    long_about = "A CLI for underwriting real-estate syndications with decimal precision. \
                  Covers loan amortization, financing structure, 10-year cash flows, \
                  debt service coverage, exit valuation, IRR and GP/LP waterfalls, \
                  and side-by-side comparison of up to three financing scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline stages to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment, balance and month-by-month amortization schedule
    Amortization(AmortizationArgs),
    /// Loan amount, down payment and raise for a scenario
    Financing(FinancingArgs),
    /// 10-year cash-flow projection for a scenario
    CashFlow(CashFlowArgs),
    /// Debt service and DSCR for a scenario
    DebtService(DebtServiceArgs),
    /// Exit valuation, project IRR and cash-on-cash
    Exit(ExitArgs),
    /// Internal rate of return for an investment and its cash flows
    Irr(IrrArgs),
    /// GP/LP hurdle waterfall distribution
    Waterfall(WaterfallArgs),
    /// Run the full underwriting pipeline for one scenario
    Analyze(AnalyzeArgs),
    /// Compare up to three scenarios side by side
    Compare(CompareArgs),
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
    logging::init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortization(args) => commands::amortization::run_amortization(args),
        Commands::Financing(args) => commands::financing::run_financing(args),
        Commands::CashFlow(args) => commands::cash_flow::run_cash_flow(args),
        Commands::DebtService(args) => commands::cash_flow::run_debt_service(args),
        Commands::Exit(args) => commands::exit::run_exit(args),
        Commands::Irr(args) => commands::exit::run_irr(args),
        Commands::Waterfall(args) => commands::waterfall::run_waterfall(args),
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Compare(args) => commands::analysis::run_compare(args),
        Commands::Version => {
            println!("synd {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
