//! Ledger command - chronological audit trail with the running position

use crate::cmd::{load_rates, read_events};
use crate::tax::{process_events, Holding, Ledger, ProcessedEvent};
use chrono::Datelike;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct LedgerCommand {
    /// Events file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Daily USD/EUR rates CSV (date,usd_eur)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Days to look back for the nearest prior rate
    #[arg(long, default_value_t = crate::rates::DEFAULT_LOOKBACK_DAYS)]
    lookback: i64,

    /// Show only this calendar year. The running position still reflects
    /// the full history.
    #[arg(short, long)]
    year: Option<i32>,

    /// Write the full ledger as CSV instead of a table
    #[arg(long, conflicts_with = "year")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct LedgerRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Price (USD)")]
    price_usd: String,
    #[tabled(rename = "FX")]
    fx_rate: String,
    #[tabled(rename = "Price (EUR)")]
    price_eur: String,
    #[tabled(rename = "Gain (EUR)")]
    gain_eur: String,
    #[tabled(rename = "Held")]
    total_shares: String,
    #[tabled(rename = "Avg Cost")]
    avg_cost: String,
    #[tabled(rename = "Total Cost")]
    total_cost: String,
}

impl From<&ProcessedEvent> for LedgerRow {
    fn from(e: &ProcessedEvent) -> Self {
        LedgerRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            kind: e.kind.as_str().to_string(),
            shares: format_quantity(e.shares),
            price_usd: format!("{:.2}", e.price_usd),
            fx_rate: e.fx_rate.map_or("-".to_string(), |r| format!("{:.4}", r)),
            price_eur: format!("{:.4}", e.price_eur),
            gain_eur: if e.gain_eur.is_zero() {
                "-".to_string()
            } else {
                format!("{:.4}", e.gain_eur)
            },
            total_shares: format_quantity(e.total_shares_after),
            avg_cost: format!("{:.4}", e.avg_cost_eur_after),
            total_cost: format!("{:.4}", e.total_cost_eur_after),
        }
    }
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct LedgerOutput<'a> {
    events: Vec<&'a ProcessedEvent>,
    closing: &'a Holding,
}

impl LedgerCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let events = read_events(&self.file)?;
        let rates = load_rates(self.rates.as_deref(), self.lookback)?;
        let ledger = process_events(events, &rates)?;

        if self.csv {
            return ledger.write_csv(io::stdout().lock());
        }

        let visible: Vec<&ProcessedEvent> = ledger
            .events
            .iter()
            .filter(|e| self.year.is_none_or(|y| e.date.year() == y))
            .collect();

        if self.json {
            self.print_json(&visible, &ledger.closing)
        } else {
            self.print_table(&visible, &ledger);
            Ok(())
        }
    }

    fn print_table(&self, visible: &[&ProcessedEvent], ledger: &Ledger) {
        println!();
        match self.year {
            Some(year) => println!("STOCK LEDGER ({})", year),
            None => println!("STOCK LEDGER"),
        }
        println!();

        if visible.is_empty() {
            println!("No events found.");
            return;
        }

        let rows: Vec<LedgerRow> = visible.iter().map(|e| LedgerRow::from(*e)).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        let closing = &ledger.closing;
        match closing.average_cost() {
            None => println!("Closing position: none"),
            Some(avg) => println!(
                "Closing position: {} shares @ avg {} (total cost {})",
                format_quantity(closing.total_shares),
                format_eur4(avg),
                format_eur4(closing.total_cost_eur)
            ),
        }
        println!();
    }

    fn print_json(&self, visible: &[&ProcessedEvent], closing: &Holding) -> anyhow::Result<()> {
        let output = LedgerOutput {
            events: visible.to_vec(),
            closing,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn format_eur4(amount: Decimal) -> String {
    format!("\u{20AC}{:.4}", amount)
}

fn format_quantity(qty: Decimal) -> String {
    let s = format!("{:.4}", qty);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
