use betpool::application::command::{self, Receipt};
use betpool::application::pool::PoolLedger;
use betpool::config::PoolConfig;
use betpool::domain::bet::Identity;
use betpool::domain::pool::NoWinnerPolicy;
use betpool::domain::report::TransferLine;
use betpool::domain::units::{MAX_DECIMALS, Units};
use betpool::infrastructure::in_memory::InMemoryLedger;
use betpool::interfaces::csv::command_reader::CommandReader;
use betpool::interfaces::csv::report_writer::ReportWriter;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Refund,
    Retain,
}

impl From<PolicyArg> for NoWinnerPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Refund => NoWinnerPolicy::Refund,
            PolicyArg::Retain => NoWinnerPolicy::Retain,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file (type, caller, outcome, amount)
    input: PathBuf,

    /// Comma separated outcomes, in index order
    #[arg(long, value_delimiter = ',', required = true)]
    outcomes: Vec<String>,

    /// Identity allowed to resolve or close the pool
    #[arg(long)]
    manager: String,

    /// Fractional digits of one whole token
    #[arg(long, default_value_t = MAX_DECIMALS, value_parser = clap::value_parser!(u32).range(0..=MAX_DECIMALS as i64))]
    decimals: u32,

    /// What to do when nobody backed the winning outcome
    #[arg(long, value_enum, default_value = "refund")]
    no_winner_policy: PolicyArg,

    /// Identities whose incoming transfers the ledger refuses
    #[arg(long, value_delimiter = ',')]
    reject_transfers_to: Vec<String>,

    /// Output format for the transfer report
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("betpool={}", cli.log_level).into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let units = Units::new(cli.decimals).into_diagnostic()?;
    let ledger = InMemoryLedger::with_rejecting(cli.reject_transfers_to.into_iter().map(Identity::from));
    let config = PoolConfig::new(cli.outcomes, cli.manager)
        .with_no_winner_policy(cli.no_winner_policy.into());
    let pool = PoolLedger::from_config(config, Box::new(ledger)).into_diagnostic()?;

    let mut transfers: Vec<TransferLine> = Vec::new();
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (row, command_result) in reader.commands().enumerate() {
        match command_result {
            Ok(command) => match command::execute(&pool, command, units).await {
                Ok(Receipt::BetAccepted) => {}
                Ok(receipt) => transfers.extend_from_slice(receipt.transfers()),
                Err(e) => warn!(row = row + 1, error = %e, "Command rejected"),
            },
            Err(e) => warn!(row = row + 1, error = %e, "Error reading command"),
        }
    }

    info!(
        state = ?pool.state().await,
        total_bets = %units.format(pool.total_bets_balance().await),
        held = %units.format(pool.held_balance().await),
        "Processing finished"
    );

    let stdout = io::stdout();
    match cli.format {
        Format::Csv => {
            let mut writer = ReportWriter::new(stdout.lock(), units);
            writer.write_lines(&transfers).into_diagnostic()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &transfers).into_diagnostic()?;
            println!();
        }
    }

    Ok(())
}
