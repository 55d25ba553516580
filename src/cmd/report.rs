//! Report command - the full filing artifact: per-sale breakdown, yearly
//! KESt figures, FinanzOnline Kennzahlen and the closing position

use crate::cmd::{load_rates, read_events};
use crate::tax::{yearly_summaries, Holding, KestRate, ProcessedEvent, YearlyTaxSummary};
use chrono::Datelike;
use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Events file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Daily USD/EUR rates CSV (date,usd_eur)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Days to look back for the nearest prior rate
    #[arg(long, default_value_t = crate::rates::DEFAULT_LOOKBACK_DAYS)]
    lookback: i64,

    /// Calendar year to report
    #[arg(short, long)]
    year: Option<i32>,

    /// KESt rate as a fraction (e.g. 0.275 for 27.5%)
    #[arg(long)]
    kest_rate: Option<Decimal>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct DisposalRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Shares")]
    shares: String,
    #[tabled(rename = "Sell Price (EUR)")]
    price_eur: String,
    #[tabled(rename = "Avg Cost (EUR)")]
    avg_cost: String,
    #[tabled(rename = "Proceeds")]
    proceeds: String,
    #[tabled(rename = "Cost Basis")]
    cost_basis: String,
    #[tabled(rename = "Gain/Loss")]
    gain: String,
}

#[derive(Debug, Clone, Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Gains (EUR)")]
    gains: String,
    #[tabled(rename = "Losses (EUR)")]
    losses: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "KESt Due")]
    kest_due: String,
}

/// One disposal for JSON output
#[derive(Debug, Serialize)]
struct DisposalData {
    date: String,
    shares: String,
    price_eur: String,
    proceeds_eur: String,
    cost_basis_eur: String,
    gain_eur: String,
}

#[derive(Debug, Serialize)]
struct YearData {
    year: i32,
    total_gains: String,
    total_losses: String,
    taxable_gain: String,
    kest_due: String,
}

#[derive(Debug, Serialize)]
struct ClosingData {
    total_shares: String,
    avg_cost_eur: String,
    total_cost_eur: String,
}

#[derive(Debug, Serialize)]
struct ReportData {
    year: String,
    kest_rate: String,
    disposal_count: usize,
    total_proceeds: String,
    total_cost_basis: String,
    total_gain: String,
    disposals: Vec<DisposalData>,
    years: Vec<YearData>,
    closing: ClosingData,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rate = self.resolve_rate()?;
        let events = read_events(&self.file)?;
        let rates = load_rates(self.rates.as_deref(), self.lookback)?;
        let ledger = crate::tax::process_events(events, &rates)?;

        let disposals: Vec<ProcessedEvent> = ledger
            .disposals()
            .filter(|e| self.year.is_none_or(|y| e.date.year() == y))
            .cloned()
            .collect();
        let summaries = yearly_summaries(&disposals);

        if self.json {
            self.print_json(&disposals, &summaries, &ledger.closing, rate)
        } else {
            self.print_report(&disposals, &summaries, &ledger.closing, rate);
            Ok(())
        }
    }

    fn resolve_rate(&self) -> anyhow::Result<KestRate> {
        match self.kest_rate {
            None => Ok(KestRate::default()),
            Some(rate) if rate >= Decimal::ZERO && rate <= Decimal::ONE => Ok(KestRate(rate)),
            Some(rate) => anyhow::bail!(
                "--kest-rate expects a fraction between 0 and 1 (e.g. 0.275), got {}",
                rate
            ),
        }
    }

    fn print_report(
        &self,
        disposals: &[ProcessedEvent],
        summaries: &[YearlyTaxSummary],
        closing: &Holding,
        rate: KestRate,
    ) {
        let year_str = self.year.map_or("All Years".to_string(), |y| y.to_string());

        println!();
        println!("REALIZED GAINS ({})", year_str);
        println!();

        if disposals.is_empty() {
            println!("No sales found.");
        } else {
            let rows: Vec<DisposalRow> = disposals
                .iter()
                .map(|e| DisposalRow {
                    date: e.date.format("%Y-%m-%d").to_string(),
                    shares: format_quantity(e.shares),
                    price_eur: format!("{:.4}", e.price_eur),
                    avg_cost: format!("{:.4}", avg_cost(e)),
                    proceeds: format_eur(proceeds(e)),
                    cost_basis: format_eur(cost_basis(e)),
                    gain: format_eur_signed(e.gain_eur),
                })
                .collect();

            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();

            let total_proceeds: Decimal = disposals.iter().map(proceeds).sum();
            let total_cost: Decimal = disposals.iter().map(cost_basis).sum();
            let total_gain: Decimal = disposals.iter().map(|e| e.gain_eur).sum();
            println!(
                "Sales: {} | Proceeds: {} | Cost basis: {} | Gain/loss: {}",
                disposals.len(),
                format_eur(total_proceeds),
                format_eur(total_cost),
                format_eur_signed(total_gain)
            );
        }
        println!();

        if !summaries.is_empty() {
            println!("TAX SUMMARY (KESt {})", rate);
            println!();

            let rows: Vec<YearRow> = summaries
                .iter()
                .map(|s| YearRow {
                    year: s.year.to_string(),
                    gains: format!("{:.2}", s.total_gains),
                    losses: format!("{:.2}", s.total_losses),
                    taxable: format!("{:.2}", s.taxable_gain()),
                    kest_due: format!("{:.2}", s.kest_due(rate)),
                })
                .collect();

            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();

            println!("FINANZONLINE (Einkünfte aus Kapitalvermögen)");
            println!();
            for s in summaries {
                println!("Year {}", s.year);
                println!(
                    "  Kennzahl 994 (Überschüsse aus realisierten Wertsteigerungen): {}",
                    format_eur(s.total_gains)
                );
                println!(
                    "  Kennzahl 892 (Verluste aus Kapitalvermögen): {}",
                    format_eur_signed(s.total_losses)
                );
            }
            println!();
        }

        if closing.total_shares.is_zero() {
            println!("Closing position: none");
        } else {
            println!(
                "Closing position: {} shares @ avg \u{20AC}{:.4} (total cost \u{20AC}{:.4})",
                format_quantity(closing.total_shares),
                closing.avg_cost_eur,
                closing.total_cost_eur
            );
        }
        println!();
    }

    fn print_json(
        &self,
        disposals: &[ProcessedEvent],
        summaries: &[YearlyTaxSummary],
        closing: &Holding,
        rate: KestRate,
    ) -> anyhow::Result<()> {
        let total_proceeds: Decimal = disposals.iter().map(proceeds).sum();
        let total_cost: Decimal = disposals.iter().map(cost_basis).sum();
        let total_gain: Decimal = disposals.iter().map(|e| e.gain_eur).sum();

        let data = ReportData {
            year: self.year.map_or("All Years".to_string(), |y| y.to_string()),
            kest_rate: rate.0.to_string(),
            disposal_count: disposals.len(),
            total_proceeds: format!("{:.2}", total_proceeds),
            total_cost_basis: format!("{:.2}", total_cost),
            total_gain: format!("{:.2}", total_gain),
            disposals: disposals
                .iter()
                .map(|e| DisposalData {
                    date: e.date.format("%Y-%m-%d").to_string(),
                    shares: format_quantity(e.shares),
                    price_eur: format!("{:.4}", e.price_eur),
                    proceeds_eur: format!("{:.2}", proceeds(e)),
                    cost_basis_eur: format!("{:.2}", cost_basis(e)),
                    gain_eur: format!("{:.2}", e.gain_eur),
                })
                .collect(),
            years: summaries
                .iter()
                .map(|s| YearData {
                    year: s.year,
                    total_gains: format!("{:.2}", s.total_gains),
                    total_losses: format!("{:.2}", s.total_losses),
                    taxable_gain: format!("{:.2}", s.taxable_gain()),
                    kest_due: format!("{:.2}", s.kest_due(rate)),
                })
                .collect(),
            closing: ClosingData {
                total_shares: format_quantity(closing.total_shares),
                avg_cost_eur: format!("{:.4}", closing.avg_cost_eur),
                total_cost_eur: format!("{:.4}", closing.total_cost_eur),
            },
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

/// Cost removed from the holding by this sale
fn cost_basis(e: &ProcessedEvent) -> Decimal {
    -e.cost_change_eur
}

fn proceeds(e: &ProcessedEvent) -> Decimal {
    e.gain_eur + cost_basis(e)
}

/// Average cost at the time of the sale, reconstructed from the recorded
/// cost basis
fn avg_cost(e: &ProcessedEvent) -> Decimal {
    if e.shares.is_zero() {
        Decimal::ZERO
    } else {
        (cost_basis(e) / e.shares)
            .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
    }
}

fn format_eur(amount: Decimal) -> String {
    format!("\u{20AC}{:.2}", amount)
}

fn format_eur_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-\u{20AC}{:.2}", amount.abs())
    } else {
        format!("\u{20AC}{:.2}", amount)
    }
}

fn format_quantity(qty: Decimal) -> String {
    let s = format!("{:.4}", qty);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
