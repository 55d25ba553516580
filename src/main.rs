mod cmd;
mod events;
mod rates;
mod tax;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kestc",
    version,
    about = "Austrian KESt calculator for employer stock plans (RSU/ESPP)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chronological ledger of every event with the running position
    Ledger(cmd::ledger::LedgerCommand),
    /// Realized gains and losses per sale
    Report(cmd::report::ReportCommand),
    /// Yearly KESt summary with FinanzOnline Kennzahlen
    Summary(cmd::summary::SummaryCommand),
    /// Check input data for problems without producing a report
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ledger(cmd) => cmd.exec(),
        Command::Report(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
