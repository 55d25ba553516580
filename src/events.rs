use chrono::NaiveDate;
use kestc_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    #[error("row {row}: invalid date '{value}' (expected YYYY-MM-DD, MM/DD/YYYY or DD-MON-YYYY)")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: unknown event type '{value}' (expected VEST, BUY or SELL)")]
    UnknownKind { row: usize, value: String },
    #[error("row {row}: invalid decimal in {field}: '{value}'")]
    InvalidDecimal {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: shares must be positive, got {shares}")]
    NonPositiveShares { row: usize, shares: Decimal },
    #[error("row {row}: {field} must be positive, got {value}")]
    NonPositiveValue {
        row: usize,
        field: &'static str,
        value: Decimal,
    },
}

/// Kind of stock plan event. The set is fixed by statute: shares arrive by
/// vesting or purchase and leave by sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// RSU vest (income-taxed acquisition)
    Vest,
    /// ESPP or open-market purchase
    Buy,
    /// Sale, including sell-to-cover
    Sell,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Vest => "VEST",
            EventKind::Buy => "BUY",
            EventKind::Sell => "SELL",
        }
    }
}

/// A normalized stock plan event for a single security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StockEvent {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[schemars(with = "f64")]
    pub shares: Decimal,
    #[schemars(with = "f64")]
    pub price_usd: Decimal,
    /// Per-event USD→EUR override (e.g. the rate a payslip used)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub fx_rate: Option<Decimal>,
    /// Pre-supplied EUR price per share; skips currency conversion entirely
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub price_eur: Option<Decimal>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Root of the JSON input format
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EventsFile {
    pub events: Vec<StockEvent>,
}

/// One column of the events CSV format, for `schema` output.
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub help: &'static str,
}

/// CSV record format for stock events. Fields stay strings here so parse
/// failures can be reported with the offending row and value.
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct EventRecord {
    /// Event date: YYYY-MM-DD, MM/DD/YYYY or DD-MON-YYYY (e.g. 05-DEC-2022)
    pub date: String,
    /// Event kind: VEST, BUY or SELL (case-insensitive)
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of shares; fractional quantities allowed
    pub shares: String,
    /// Per-share price in USD
    pub price_usd: String,
    /// USD→EUR rate override for this event
    #[serde(default)]
    pub fx_rate: Option<String>,
    /// Pre-supplied per-share EUR price; skips conversion
    #[serde(default)]
    pub price_eur: Option<String>,
    /// Free-text provenance note
    #[serde(default)]
    pub note: Option<String>,
}

impl EventRecord {
    /// Convert to a typed event, validating as we go. `row` is the 1-based
    /// line in the source file (the header is line 1).
    pub fn to_event(&self, row: usize) -> Result<StockEvent, EventError> {
        let date = parse_date(&self.date).ok_or_else(|| EventError::InvalidDate {
            row,
            value: self.date.clone(),
        })?;

        let kind = match self.kind.trim().to_uppercase().as_str() {
            "VEST" => EventKind::Vest,
            "BUY" => EventKind::Buy,
            "SELL" => EventKind::Sell,
            _ => {
                return Err(EventError::UnknownKind {
                    row,
                    value: self.kind.clone(),
                })
            }
        };

        let shares = parse_decimal(&self.shares, "shares", row)?;
        let price_usd = parse_decimal(&self.price_usd, "price_usd", row)?;
        let fx_rate = parse_optional_decimal(self.fx_rate.as_deref(), "fx_rate", row)?;
        let price_eur = parse_optional_decimal(self.price_eur.as_deref(), "price_eur", row)?;

        let event = StockEvent {
            date,
            kind,
            shares,
            price_usd,
            fx_rate,
            price_eur,
            note: self.note.clone().filter(|n| !n.trim().is_empty()),
        };
        validate_event(&event, row)?;
        Ok(event)
    }
}

/// Parse a date in any of the formats brokerage exports use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%b-%Y"))
        .ok()
}

fn parse_decimal(s: &str, field: &'static str, row: usize) -> Result<Decimal, EventError> {
    Decimal::from_str(s.trim()).map_err(|_| EventError::InvalidDecimal {
        row,
        field,
        value: s.to_string(),
    })
}

fn parse_optional_decimal(
    s: Option<&str>,
    field: &'static str,
    row: usize,
) -> Result<Option<Decimal>, EventError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_decimal(s, field, row).map(Some),
    }
}

/// Field checks shared by both readers: share counts and prices must be
/// positive.
fn validate_event(event: &StockEvent, row: usize) -> Result<(), EventError> {
    if event.shares <= Decimal::ZERO {
        return Err(EventError::NonPositiveShares {
            row,
            shares: event.shares,
        });
    }
    for (field, value) in [
        ("price_usd", Some(event.price_usd)),
        ("fx_rate", event.fx_rate),
        ("price_eur", event.price_eur),
    ] {
        if let Some(value) = value {
            if value <= Decimal::ZERO {
                return Err(EventError::NonPositiveValue { row, field, value });
            }
        }
    }
    Ok(())
}

/// Read stock events from CSV. Input order is preserved; ordering is the
/// engine's job.
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<StockEvent>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut events = Vec::new();
    for (i, record) in rdr.deserialize::<EventRecord>().enumerate() {
        // Header occupies line 1
        let row = i + 2;
        let record = record?;
        events.push(record.to_event(row)?);
    }
    Ok(events)
}

/// Read stock events from JSON (an `{ "events": [...] }` document).
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Vec<StockEvent>> {
    let input: EventsFile = serde_json::from_reader(reader)?;
    for (i, event) in input.events.iter().enumerate() {
        validate_event(event, i + 1)?;
    }
    Ok(input.events)
}
