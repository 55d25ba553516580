pub mod engine;
pub mod summary;

pub use engine::{process_events, sequence_events, EngineError, Holding, Ledger, ProcessedEvent};
pub use summary::{pad_years, yearly_summaries, KestRate, YearlyTaxSummary, DEFAULT_KEST_RATE};
