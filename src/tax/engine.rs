use crate::events::{EventKind, StockEvent};
use crate::rates::{RateError, RateSource};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    /// Depot check: a sale may never exceed the currently held quantity.
    /// Clamping instead would falsify the audit trail.
    #[error(
        "cannot sell {requested} shares on {date}: only {available} held \
         (check the ordering of sell-to-cover transactions)"
    )]
    InsufficientHoldings {
        date: NaiveDate,
        requested: Decimal,
        available: Decimal,
    },
    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Working precision for EUR amounts: four decimals, half-up.
fn round4(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Running position for one security: quantity held plus the moving average
/// cost prescribed by the Gleitender Durchschnittspreis method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Holding {
    pub total_shares: Decimal,
    pub avg_cost_eur: Decimal,
    pub total_cost_eur: Decimal,
}

impl Holding {
    /// Average cost per share, defined only while shares are held.
    pub fn average_cost(&self) -> Option<Decimal> {
        (!self.total_shares.is_zero()).then_some(self.avg_cost_eur)
    }

    /// Rule A: every acquisition recomputes the weighted average from the
    /// running totals. Historical per-lot detail is not retained, so the
    /// average must be carried incrementally.
    ///
    /// `shares` must be positive (enforced at the input boundary).
    pub fn acquire(&self, shares: Decimal, price_eur: Decimal) -> Holding {
        let added_cost = round4(shares * price_eur);
        let new_total_cost = self.total_shares * self.avg_cost_eur + added_cost;
        let new_total_shares = self.total_shares + shares;
        let holding = Holding {
            total_shares: new_total_shares,
            avg_cost_eur: round4(new_total_cost / new_total_shares),
            total_cost_eur: round4(new_total_cost),
        };
        log::debug!(
            "ACQUIRE: shares={}, price_eur={}. New total: shares={}, avg={}, cost={}",
            shares,
            price_eur,
            holding.total_shares,
            holding.avg_cost_eur,
            holding.total_cost_eur
        );
        holding
    }

    /// Rules B and C: a sale consumes quantity at the unchanged average and
    /// realizes `(price - avg) * shares`. Fails the depot check without
    /// touching state when more shares are sold than held.
    pub fn dispose(
        &self,
        date: NaiveDate,
        shares: Decimal,
        price_eur: Decimal,
    ) -> Result<(Holding, Decimal, Decimal), EngineError> {
        if shares > self.total_shares {
            return Err(EngineError::InsufficientHoldings {
                date,
                requested: shares,
                available: self.total_shares,
            });
        }
        let gain = round4((price_eur - self.avg_cost_eur) * shares);
        let cost_removed = round4(self.avg_cost_eur * shares);
        let total_shares = self.total_shares - shares;
        let holding = if total_shares.is_zero() {
            // Position emptied: the average resets with it
            Holding::default()
        } else {
            Holding {
                total_shares,
                avg_cost_eur: self.avg_cost_eur,
                total_cost_eur: self.total_cost_eur - cost_removed,
            }
        };
        log::debug!(
            "SELL: shares={}, price_eur={}, gain={}. Remaining: shares={}, avg={}",
            shares,
            price_eur,
            gain,
            holding.total_shares,
            holding.avg_cost_eur
        );
        Ok((holding, gain, cost_removed))
    }
}

/// Audit record for one processed event; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub shares: Decimal,
    pub price_usd: Decimal,
    /// Rate used for conversion; `None` when `price_eur` came pre-supplied
    pub fx_rate: Option<Decimal>,
    pub price_eur: Decimal,
    /// Signed cost-basis delta this event caused
    pub cost_change_eur: Decimal,
    /// Zero for acquisitions, signed realized gain/loss for sales
    pub gain_eur: Decimal,
    pub total_shares_after: Decimal,
    pub avg_cost_eur_after: Decimal,
    pub total_cost_eur_after: Decimal,
    pub note: Option<String>,
}

/// CSV record for ledger output
#[derive(Debug, Serialize)]
struct LedgerCsvRecord {
    date: String,
    #[serde(rename = "type")]
    kind: &'static str,
    shares: String,
    price_usd: String,
    fx_rate: String,
    price_eur: String,
    gain_eur: String,
    total_shares_after: String,
    avg_cost_eur_after: String,
    total_cost_eur_after: String,
    note: String,
}

impl From<&ProcessedEvent> for LedgerCsvRecord {
    fn from(e: &ProcessedEvent) -> Self {
        LedgerCsvRecord {
            date: e.date.format("%Y-%m-%d").to_string(),
            kind: e.kind.as_str(),
            shares: e.shares.to_string(),
            price_usd: e.price_usd.to_string(),
            fx_rate: e.fx_rate.map(|r| r.to_string()).unwrap_or_default(),
            price_eur: e.price_eur.to_string(),
            gain_eur: e.gain_eur.to_string(),
            total_shares_after: e.total_shares_after.to_string(),
            avg_cost_eur_after: e.avg_cost_eur_after.to_string(),
            total_cost_eur_after: e.total_cost_eur_after.to_string(),
            note: e.note.clone().unwrap_or_default(),
        }
    }
}

/// Engine output: every processed event in sequence order plus the closing
/// position.
#[derive(Debug)]
pub struct Ledger {
    pub events: Vec<ProcessedEvent>,
    pub closing: Holding,
}

impl Ledger {
    pub fn disposals(&self) -> impl Iterator<Item = &ProcessedEvent> {
        self.events.iter().filter(|e| e.kind == EventKind::Sell)
    }

    /// Write the full ledger to CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for event in &self.events {
            let record: LedgerCsvRecord = event.into();
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Order events for processing: date ascending; on equal dates vests, then
/// buys, then sells, so a sell-to-cover consumes cost basis established the
/// same morning. Same-kind same-date ties keep their input order.
pub fn sequence_events(events: &mut [StockEvent]) {
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| same_day_rank(a.kind).cmp(&same_day_rank(b.kind)))
    });
}

fn same_day_rank(kind: EventKind) -> u8 {
    match kind {
        EventKind::Vest => 0,
        EventKind::Buy => 1,
        EventKind::Sell => 2,
    }
}

/// Run-scoped memo so each date hits the underlying rate source at most once.
struct RateLookup<'a> {
    source: &'a dyn RateSource,
    memo: HashMap<NaiveDate, Decimal>,
}

impl<'a> RateLookup<'a> {
    fn new(source: &'a dyn RateSource) -> Self {
        RateLookup {
            source,
            memo: HashMap::new(),
        }
    }

    fn rate_for(&mut self, date: NaiveDate) -> Result<Decimal, RateError> {
        if let Some(rate) = self.memo.get(&date) {
            return Ok(*rate);
        }
        let rate = self.source.rate_for(date)?;
        self.memo.insert(date, rate);
        Ok(rate)
    }
}

/// Per-event EUR price: a pre-supplied EUR price wins, then a per-event
/// override rate, then the daily table. Returns the price and the rate used
/// (if any).
fn resolve_price_eur(
    event: &StockEvent,
    rates: &mut RateLookup<'_>,
) -> Result<(Decimal, Option<Decimal>), EngineError> {
    if let Some(price_eur) = event.price_eur {
        return Ok((price_eur, None));
    }
    let rate = match event.fx_rate {
        Some(rate) => rate,
        None => rates.rate_for(event.date)?,
    };
    Ok((round4(event.price_usd * rate), Some(rate)))
}

/// Run the engine over one security's event stream: sequence, then fold a
/// Holding through one transition per event. Pure function of the inputs;
/// nothing is retained between runs.
pub fn process_events(
    events: Vec<StockEvent>,
    rates: &dyn RateSource,
) -> Result<Ledger, EngineError> {
    let mut events = events;
    sequence_events(&mut events);

    let mut lookup = RateLookup::new(rates);
    let mut holding = Holding::default();
    let mut processed = Vec::with_capacity(events.len());

    for event in &events {
        let (price_eur, fx_rate) = resolve_price_eur(event, &mut lookup)?;
        let (next, cost_change_eur, gain_eur) = match event.kind {
            EventKind::Vest | EventKind::Buy => {
                let next = holding.acquire(event.shares, price_eur);
                (next, round4(event.shares * price_eur), Decimal::ZERO)
            }
            EventKind::Sell => {
                let (next, gain, cost_removed) =
                    holding.dispose(event.date, event.shares, price_eur)?;
                (next, -cost_removed, gain)
            }
        };
        processed.push(ProcessedEvent {
            date: event.date,
            kind: event.kind,
            shares: event.shares,
            price_usd: event.price_usd,
            fx_rate,
            price_eur,
            cost_change_eur,
            gain_eur,
            total_shares_after: next.total_shares,
            avg_cost_eur_after: next.avg_cost_eur,
            total_cost_eur_after: next.total_cost_eur,
            note: event.note.clone(),
        });
        holding = next;
    }

    Ok(Ledger {
        events: processed,
        closing: holding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTable;
    use rust_decimal_macros::dec;
    use std::cell::Cell;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn vest(date: &str, shares: Decimal, price_usd: Decimal, fx: Decimal) -> StockEvent {
        StockEvent {
            date: d(date),
            kind: EventKind::Vest,
            shares,
            price_usd,
            fx_rate: Some(fx),
            price_eur: None,
            note: None,
        }
    }

    fn buy(date: &str, shares: Decimal, price_usd: Decimal, fx: Decimal) -> StockEvent {
        StockEvent {
            kind: EventKind::Buy,
            ..vest(date, shares, price_usd, fx)
        }
    }

    fn sell(date: &str, shares: Decimal, price_usd: Decimal, fx: Decimal) -> StockEvent {
        StockEvent {
            kind: EventKind::Sell,
            ..vest(date, shares, price_usd, fx)
        }
    }

    fn vest_eur(date: &str, shares: Decimal, price_eur: Decimal) -> StockEvent {
        StockEvent {
            date: d(date),
            kind: EventKind::Vest,
            shares,
            price_usd: price_eur,
            fx_rate: None,
            price_eur: Some(price_eur),
            note: None,
        }
    }

    fn sell_eur(date: &str, shares: Decimal, price_eur: Decimal) -> StockEvent {
        StockEvent {
            kind: EventKind::Sell,
            ..vest_eur(date, shares, price_eur)
        }
    }

    /// Run against an empty rate table: every event must carry its own rate.
    fn run(events: Vec<StockEvent>) -> Ledger {
        process_events(events, &RateTable::new()).unwrap()
    }

    #[test]
    fn first_vest_sets_average() {
        let ledger = run(vec![vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82))]);

        assert_eq!(ledger.events.len(), 1);
        let e = &ledger.events[0];
        assert_eq!(e.price_eur, dec!(41.0000));
        assert_eq!(e.gain_eur, dec!(0));
        assert_eq!(e.cost_change_eur, dec!(4100.0000));
        assert_eq!(ledger.closing.total_shares, dec!(100));
        assert_eq!(ledger.closing.avg_cost_eur, dec!(41.0000));
        assert_eq!(ledger.closing.total_cost_eur, dec!(4100.0000));
    }

    #[test]
    fn second_acquisition_recomputes_weighted_average() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            buy("2021-06-01", dec!(50), dec!(40.00), dec!(0.85)),
        ]);

        // 4100 + 1700 = 5800 over 150 shares
        assert_eq!(ledger.closing.total_shares, dec!(150));
        assert_eq!(ledger.closing.avg_cost_eur, dec!(38.6667));
        assert_eq!(ledger.closing.total_cost_eur, dec!(5800.0000));
    }

    #[test]
    fn sell_realizes_gain_against_average() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            buy("2021-06-01", dec!(50), dec!(40.00), dec!(0.85)),
            sell("2021-07-15", dec!(25), dec!(55.00), dec!(0.84)),
        ]);

        let e = &ledger.events[2];
        // (46.20 - 38.6667) * 25
        assert_eq!(e.gain_eur, dec!(188.3325));
        assert_eq!(e.cost_change_eur, dec!(-966.6675));
        assert_eq!(e.total_shares_after, dec!(125));
        assert_eq!(ledger.closing.total_cost_eur, dec!(4833.3325));
    }

    #[test]
    fn sell_never_changes_average() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            buy("2021-06-01", dec!(50), dec!(40.00), dec!(0.85)),
            sell("2021-07-15", dec!(25), dec!(55.00), dec!(0.84)),
            sell("2021-08-02", dec!(60), dec!(30.00), dec!(0.84)),
        ]);

        for e in ledger.disposals() {
            assert_eq!(e.avg_cost_eur_after, dec!(38.6667));
        }
        assert_eq!(ledger.closing.avg_cost_eur, dec!(38.6667));
    }

    #[test]
    fn sell_loss_is_negative() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            sell("2021-07-15", dec!(40), dec!(30.00), dec!(0.82)),
        ]);

        // (24.60 - 41.00) * 40
        assert_eq!(ledger.events[1].gain_eur, dec!(-656.0000));
    }

    #[test]
    fn sell_all_resets_position_to_zero() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            sell("2021-07-15", dec!(100), dec!(55.00), dec!(0.84)),
        ]);

        assert_eq!(ledger.closing, Holding::default());
        assert_eq!(ledger.events[1].avg_cost_eur_after, dec!(0));
        assert_eq!(ledger.events[1].total_cost_eur_after, dec!(0));
    }

    #[test]
    fn overselling_fails_depot_check() {
        let err = process_events(
            vec![
                vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
                sell("2021-07-15", dec!(150), dec!(55.00), dec!(0.84)),
            ],
            &RateTable::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            EngineError::InsufficientHoldings {
                date: d("2021-07-15"),
                requested: dec!(150),
                available: dec!(100),
            }
        );
    }

    #[test]
    fn failed_depot_check_leaves_holding_untouched() {
        let holding = Holding::default().acquire(dec!(10), dec!(41.00));
        let before = holding;

        let err = holding
            .dispose(d("2021-07-15"), dec!(25), dec!(46.20))
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientHoldings { .. }));
        assert_eq!(holding, before);
    }

    #[test]
    fn sell_on_empty_holding_fails() {
        let err = process_events(
            vec![sell("2021-07-15", dec!(1), dec!(55.00), dec!(0.84))],
            &RateTable::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            EngineError::InsufficientHoldings { available, .. } if available == Decimal::ZERO
        ));
    }

    #[test]
    fn same_day_vest_processed_before_sell() {
        // Sell-to-cover arrives first in the input, but the vest must
        // establish the cost basis before the sale consumes it.
        let ledger = run(vec![
            sell("2021-08-01", dec!(20), dec!(45.00), dec!(0.84)),
            vest("2021-08-01", dec!(50), dec!(45.00), dec!(0.84)),
        ]);

        assert_eq!(ledger.events[0].kind, EventKind::Vest);
        assert_eq!(ledger.events[1].kind, EventKind::Sell);
        assert_eq!(ledger.closing.total_shares, dec!(30));
    }

    #[test]
    fn same_day_orders_vest_buy_sell() {
        let mut events = vec![
            sell("2021-08-01", dec!(10), dec!(45.00), dec!(0.84)),
            buy("2021-08-01", dec!(5), dec!(44.00), dec!(0.84)),
            vest("2021-08-01", dec!(50), dec!(45.00), dec!(0.84)),
        ];
        sequence_events(&mut events);

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Vest, EventKind::Buy, EventKind::Sell]);
    }

    #[test]
    fn same_kind_same_day_keeps_input_order() {
        let mut events = vec![
            vest("2021-08-01", dec!(1), dec!(10.00), dec!(0.84)),
            vest("2021-08-01", dec!(2), dec!(20.00), dec!(0.84)),
            vest("2021-08-01", dec!(3), dec!(30.00), dec!(0.84)),
        ];
        sequence_events(&mut events);

        let shares: Vec<_> = events.iter().map(|e| e.shares).collect();
        assert_eq!(shares, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn dates_sort_before_kinds() {
        let mut events = vec![
            sell("2021-08-02", dec!(10), dec!(45.00), dec!(0.84)),
            vest("2021-08-03", dec!(50), dec!(45.00), dec!(0.84)),
            buy("2021-08-01", dec!(5), dec!(44.00), dec!(0.84)),
        ];
        sequence_events(&mut events);

        let dates: Vec<_> = events.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d("2021-08-01"), d("2021-08-02"), d("2021-08-03")]);
    }

    #[test]
    fn acquisition_chains_are_order_independent() {
        let forward = vec![
            vest("2021-01-04", dec!(100), dec!(50.00), dec!(0.82)),
            buy("2021-02-01", dec!(50), dec!(40.00), dec!(0.85)),
            vest("2021-03-01", dec!(25), dec!(60.00), dec!(0.80)),
        ];
        let mut shuffled = forward.clone();
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);

        let a = run(forward);
        let b = run(shuffled);
        assert_eq!(a.closing, b.closing);
    }

    #[test]
    fn weighted_average_ignores_acquisition_order() {
        // 10*2 + 30*4 + 60*8 = 620 over 100 shares, exact in every order
        let lots = [
            (dec!(10), dec!(2)),
            (dec!(30), dec!(4)),
            (dec!(60), dec!(8)),
        ];
        let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

        for order in orders {
            let mut holding = Holding::default();
            for i in order {
                let (shares, price) = lots[i];
                holding = holding.acquire(shares, price);
            }
            assert_eq!(holding.avg_cost_eur, dec!(6.2000));
            assert_eq!(holding.total_shares, dec!(100));
        }
    }

    #[test]
    fn moving_average_worked_example() {
        let ledger = run(vec![
            vest_eur("2024-03-15", dec!(100), dec!(138.00)),
            vest_eur("2024-06-01", dec!(50), dec!(167.40)),
            sell_eur("2024-09-10", dec!(80), dec!(182.00)),
            vest_eur("2024-12-01", dec!(30), dec!(150.40)),
        ]);

        assert_eq!(ledger.events[0].avg_cost_eur_after, dec!(138.0000));
        assert_eq!(ledger.events[1].avg_cost_eur_after, dec!(147.8000));
        assert_eq!(ledger.events[1].total_shares_after, dec!(150));

        let sale = &ledger.events[2];
        assert_eq!(sale.gain_eur, dec!(2736.0000));
        assert_eq!(sale.total_shares_after, dec!(70));
        assert_eq!(sale.avg_cost_eur_after, dec!(147.8000));

        assert_eq!(ledger.events[3].avg_cost_eur_after, dec!(148.5800));
        assert_eq!(ledger.closing.total_shares, dec!(100));
    }

    #[test]
    fn pre_supplied_price_eur_bypasses_rates() {
        let ledger = run(vec![vest_eur("2024-03-15", dec!(100), dec!(138.00))]);
        assert_eq!(ledger.events[0].fx_rate, None);
        assert_eq!(ledger.events[0].price_eur, dec!(138.00));
    }

    #[test]
    fn table_rate_used_when_event_has_none() {
        let table = RateTable::from_pairs([(d("2021-05-17"), dec!(0.82))]);
        let mut event = vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82));
        event.fx_rate = None;

        let ledger = process_events(vec![event], &table).unwrap();
        assert_eq!(ledger.events[0].fx_rate, Some(dec!(0.82)));
        assert_eq!(ledger.events[0].price_eur, dec!(41.0000));
    }

    #[test]
    fn missing_rate_is_fatal() {
        let mut event = vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82));
        event.fx_rate = None;

        let err = process_events(vec![event], &RateTable::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Rate(RateError::Unavailable { date, .. }) if date == d("2021-05-17")
        ));
    }

    struct CountingSource {
        rate: Decimal,
        calls: Cell<usize>,
    }

    impl RateSource for CountingSource {
        fn rate_for(&self, _date: NaiveDate) -> Result<Decimal, RateError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.rate)
        }
    }

    #[test]
    fn rate_lookups_are_cached_per_date_within_a_run() {
        let source = CountingSource {
            rate: dec!(0.84),
            calls: Cell::new(0),
        };
        let mut events = vec![
            vest("2021-08-01", dec!(50), dec!(45.00), dec!(0.84)),
            sell("2021-08-01", dec!(20), dec!(45.00), dec!(0.84)),
            vest("2021-08-02", dec!(10), dec!(45.00), dec!(0.84)),
        ];
        for event in &mut events {
            event.fx_rate = None;
        }

        process_events(events, &source).unwrap();
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn fractional_shares_stay_exact() {
        let ledger = run(vec![vest("2021-05-17", dec!(63.5432), dec!(46.68), dec!(0.82))]);

        assert_eq!(ledger.closing.total_shares, dec!(63.5432));
        // 46.68 * 0.82 = 38.2776 exactly; the average equals the price
        assert_eq!(ledger.closing.avg_cost_eur, dec!(38.2776));
    }

    #[test]
    fn large_amounts_do_not_lose_precision() {
        let ledger = run(vec![vest("2021-05-17", dec!(1000000), dec!(8200.00), dec!(1.0))]);

        assert_eq!(ledger.closing.total_cost_eur, dec!(8200000000.0000));
        assert_eq!(ledger.closing.avg_cost_eur, dec!(8200.0000));
    }

    #[test]
    fn zero_gain_sell() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            sell("2021-06-17", dec!(50), dec!(50.00), dec!(0.82)),
        ]);

        assert_eq!(ledger.events[1].gain_eur, dec!(0.0000));
    }

    #[test]
    fn empty_events_produce_empty_ledger() {
        let ledger = run(vec![]);
        assert!(ledger.events.is_empty());
        assert_eq!(ledger.closing, Holding::default());
    }

    #[test]
    fn ledger_csv_contains_every_event() {
        let ledger = run(vec![
            vest("2021-05-17", dec!(100), dec!(50.00), dec!(0.82)),
            sell("2021-07-15", dec!(25), dec!(55.00), dec!(0.84)),
        ]);

        let mut out = Vec::new();
        ledger.write_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert!(csv.starts_with("date,type,shares,"));
        assert!(csv.contains("2021-05-17,VEST,100,"));
        assert!(csv.contains("2021-07-15,SELL,25,"));
    }
}
