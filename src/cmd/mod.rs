pub mod ledger;
pub mod report;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::events::{self, StockEvent};
use crate::rates::RateTable;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read stock events from CSV or JSON (or stdin with "-"). The file
/// extension picks the format; stdin is sniffed by its first byte.
pub fn read_events(path: &Path) -> anyhow::Result<Vec<StockEvent>> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<Vec<StockEvent>> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
    let reader = BufReader::new(file);
    if path.extension() == Some(OsStr::new("json")) {
        events::read_json(reader)
    } else {
        events::read_csv(reader)
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<StockEvent>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    let is_json = buffer
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{');

    let cursor = io::Cursor::new(buffer);
    if is_json {
        events::read_json(cursor)
    } else {
        events::read_csv(cursor)
    }
}

/// Load the daily USD/EUR rate table, or an empty one when no file is given
/// (every event must then carry its own rate or EUR price).
pub fn load_rates(path: Option<&Path>, lookback_days: i64) -> anyhow::Result<RateTable> {
    let table = match path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
            RateTable::read_csv(BufReader::new(file))?
        }
        None => RateTable::new(),
    };
    Ok(table.with_lookback_days(lookback_days))
}
