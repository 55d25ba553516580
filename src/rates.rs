use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;

use crate::events::parse_date;

/// How far back to search for a rate when the requested date has none.
/// Covers a weekend plus a holiday cluster without masking genuinely
/// missing data.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateError {
    #[error("no USD/EUR rate on or before {date} (searched {lookback_days} days back)")]
    Unavailable {
        date: NaiveDate,
        lookback_days: i64,
    },
}

/// Daily USD→EUR conversion, keyed by date.
pub trait RateSource {
    /// The USD→EUR multiplier effective on `date`.
    fn rate_for(&self, date: NaiveDate) -> Result<Decimal, RateError>;
}

/// In-memory rate table with nearest-prior-date fallback for weekends and
/// holidays (the ECB publishes no reference rate on those days).
#[derive(Debug, Clone)]
pub struct RateTable {
    rates: BTreeMap<NaiveDate, Decimal>,
    lookback_days: i64,
}

/// CSV record format for the rate table
#[derive(Debug, Deserialize)]
struct RateRecord {
    date: String,
    usd_eur: String,
}

impl RateTable {
    pub fn new() -> Self {
        RateTable {
            rates: BTreeMap::new(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (NaiveDate, Decimal)>) -> Self {
        let mut table = RateTable::new();
        for (date, rate) in pairs {
            table.insert(date, rate);
        }
        table
    }

    /// Read a rate table from CSV with a `date,usd_eur` header. Duplicate
    /// dates keep the last value.
    pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut pairs = Vec::new();
        for (i, record) in rdr.deserialize::<RateRecord>().enumerate() {
            let row = i + 2;
            let record = record?;
            let date = parse_date(&record.date)
                .ok_or_else(|| anyhow::anyhow!("rates row {}: invalid date '{}'", row, record.date))?;
            let rate = Decimal::from_str(record.usd_eur.trim()).map_err(|_| {
                anyhow::anyhow!("rates row {}: invalid usd_eur '{}'", row, record.usd_eur)
            })?;
            if rate <= Decimal::ZERO {
                anyhow::bail!("rates row {}: usd_eur must be positive, got {}", row, rate);
            }
            pairs.push((date, rate));
        }
        Ok(RateTable::from_pairs(pairs))
    }

    pub fn insert(&mut self, date: NaiveDate, rate: Decimal) {
        self.rates.insert(date, rate);
    }
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable::new()
    }
}

impl RateSource for RateTable {
    fn rate_for(&self, date: NaiveDate) -> Result<Decimal, RateError> {
        if let Some((found, rate)) = self.rates.range(..=date).next_back() {
            let age = (date - *found).num_days();
            if age <= self.lookback_days {
                if age > 0 {
                    debug!("no USD/EUR rate on {}, using {} from {}", date, rate, found);
                }
                return Ok(*rate);
            }
        }
        Err(RateError::Unavailable {
            date,
            lookback_days: self.lookback_days,
        })
    }
}
