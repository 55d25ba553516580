use crate::events::EventKind;
use crate::tax::engine::ProcessedEvent;
use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Flat Austrian rate for capital gains from securities (§ 27a EStG)
pub const DEFAULT_KEST_RATE: Decimal = dec!(0.275);

/// KESt rate applied to the yearly taxable gain, as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KestRate(pub Decimal);

impl Default for KestRate {
    fn default() -> Self {
        KestRate(DEFAULT_KEST_RATE)
    }
}

impl fmt::Display for KestRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", (self.0 * dec!(100)).normalize())
    }
}

/// Aggregated figures for one calendar year. Losses are kept negative and
/// never offset gains in other years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlyTaxSummary {
    pub year: i32,
    /// Sum of positive realized gains (Kennzahl 994)
    pub total_gains: Decimal,
    /// Sum of realized losses, zero or negative (Kennzahl 892)
    pub total_losses: Decimal,
}

impl YearlyTaxSummary {
    pub fn empty(year: i32) -> Self {
        YearlyTaxSummary {
            year,
            total_gains: Decimal::ZERO,
            total_losses: Decimal::ZERO,
        }
    }

    pub fn net_gain_loss(&self) -> Decimal {
        self.total_gains + self.total_losses
    }

    /// Negative net results are floored at zero; there is no loss
    /// carryforward between years.
    pub fn taxable_gain(&self) -> Decimal {
        self.net_gain_loss().max(Decimal::ZERO)
    }

    /// Tax due at `rate`, rounded to whole cents (half-up)
    pub fn kest_due(&self, rate: KestRate) -> Decimal {
        (self.taxable_gain() * rate.0)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    fn add_disposal(&mut self, gain_eur: Decimal) {
        if gain_eur < Decimal::ZERO {
            self.total_losses += gain_eur;
        } else {
            self.total_gains += gain_eur;
        }
    }
}

/// Bucket realized disposals by calendar year, ascending. Years without a
/// sale get no row; use [`pad_years`] to force a contiguous range.
pub fn yearly_summaries(events: &[ProcessedEvent]) -> Vec<YearlyTaxSummary> {
    let mut years: BTreeMap<i32, YearlyTaxSummary> = BTreeMap::new();
    for event in events.iter().filter(|e| e.kind == EventKind::Sell) {
        let year = event.date.year();
        years
            .entry(year)
            .or_insert_with(|| YearlyTaxSummary::empty(year))
            .add_disposal(event.gain_eur);
    }
    years.into_values().collect()
}

/// Restrict summaries to a contiguous year range, inserting all-zero rows
/// for years without disposals and dropping years outside the range.
pub fn pad_years(
    summaries: Vec<YearlyTaxSummary>,
    range: RangeInclusive<i32>,
) -> Vec<YearlyTaxSummary> {
    let by_year: BTreeMap<i32, YearlyTaxSummary> =
        summaries.into_iter().map(|s| (s.year, s)).collect();
    range
        .map(|year| {
            by_year
                .get(&year)
                .copied()
                .unwrap_or_else(|| YearlyTaxSummary::empty(year))
        })
        .collect()
}
