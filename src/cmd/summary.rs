//! Summary command - yearly KESt figures and FinanzOnline Kennzahlen

use crate::cmd::{load_rates, read_events};
use crate::tax::{pad_years, process_events, yearly_summaries, KestRate, YearlyTaxSummary};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Events file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Daily USD/EUR rates CSV (date,usd_eur)
    #[arg(short, long)]
    rates: Option<PathBuf>,

    /// Days to look back for the nearest prior rate
    #[arg(long, default_value_t = crate::rates::DEFAULT_LOOKBACK_DAYS)]
    lookback: i64,

    /// First calendar year to report; earlier years are dropped
    #[arg(long)]
    from: Option<i32>,

    /// Last calendar year to report; later years are dropped
    #[arg(long)]
    to: Option<i32>,

    /// KESt rate as a fraction (e.g. 0.275 for 27.5%)
    #[arg(long)]
    kest_rate: Option<Decimal>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct YearRow {
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Gains (EUR)")]
    gains: String,
    #[tabled(rename = "Losses (EUR)")]
    losses: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "KESt Due")]
    kest_due: String,
}

/// One year for JSON output
#[derive(Debug, Serialize)]
struct YearData {
    year: i32,
    total_gains: String,
    total_losses: String,
    net_gain_loss: String,
    taxable_gain: String,
    kest_due: String,
}

#[derive(Debug, Serialize)]
struct SummaryData {
    kest_rate: String,
    years: Vec<YearData>,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rate = self.resolve_rate()?;
        let events = read_events(&self.file)?;
        let rates = load_rates(self.rates.as_deref(), self.lookback)?;
        let ledger = process_events(events, &rates)?;

        let mut summaries = yearly_summaries(&ledger.events);
        if let Some(range) = self.year_range(&summaries)? {
            summaries = pad_years(summaries, range);
        }

        if self.json {
            self.print_json(&summaries, rate)
        } else {
            self.print_summary(&summaries, rate);
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

    /// Resolve --from/--to into a contiguous range; an open end falls back
    /// to the years that actually saw sales.
    fn year_range(
        &self,
        summaries: &[YearlyTaxSummary],
    ) -> anyhow::Result<Option<RangeInclusive<i32>>> {
        let first = summaries.first().map(|s| s.year);
        let last = summaries.last().map(|s| s.year);

        let range = match (self.from, self.to) {
            (None, None) => None,
            (Some(from), Some(to)) => Some(from..=to),
            (Some(from), None) => Some(from..=last.unwrap_or(from).max(from)),
            (None, Some(to)) => Some(first.unwrap_or(to).min(to)..=to),
        };

        if let Some(ref range) = range {
            if range.is_empty() {
                anyhow::bail!(
                    "empty year range: --from {} is after --to {}",
                    range.start(),
                    range.end()
                );
            }
        }
        Ok(range)
    }

    fn print_summary(&self, summaries: &[YearlyTaxSummary], rate: KestRate) {
        println!();
        println!("TAX SUMMARY (KESt {})", rate);
        println!();

        if summaries.is_empty() {
            println!("No sales found.");
            return;
        }

        let rows: Vec<YearRow> = summaries
            .iter()
            .map(|s| YearRow {
                year: s.year.to_string(),
                gains: format!("{:.2}", s.total_gains),
                losses: format!("{:.2}", s.total_losses),
                net: format!("{:.2}", s.net_gain_loss()),
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
        println!("Losses offset gains within the same year only; no carryforward is applied.");
        println!();
    }

    fn print_json(&self, summaries: &[YearlyTaxSummary], rate: KestRate) -> anyhow::Result<()> {
        let data = SummaryData {
            kest_rate: rate.0.to_string(),
            years: summaries
                .iter()
                .map(|s| YearData {
                    year: s.year,
                    total_gains: format!("{:.2}", s.total_gains),
                    total_losses: format!("{:.2}", s.total_losses),
                    net_gain_loss: format!("{:.2}", s.net_gain_loss()),
                    taxable_gain: format!("{:.2}", s.taxable_gain()),
                    kest_due: format!("{:.2}", s.kest_due(rate)),
                })
                .collect(),
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
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
