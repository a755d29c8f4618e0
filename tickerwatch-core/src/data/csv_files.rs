//! Local CSV quote provider.
//!
//! Reads `<dir>/<SYMBOL>.csv` with a `date,open,high,low,close` header,
//! oldest row first. Used as the offline data path and as the fixture
//! format in tests; also the fallback strategy behind Yahoo in the default
//! provider chain.

use std::path::PathBuf;

use serde::Deserialize;

use super::provider::{ProviderError, QuoteProvider};
use super::yahoo::snapshot_from_bars;
use crate::domain::{Bar, PriceSnapshot};

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: chrono::NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// Per-symbol CSV files in one directory.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        // caret tickers are not portable file names
        let name = symbol.replace('^', "_");
        self.dir.join(format!("{name}.csv"))
    }
}

impl QuoteProvider for CsvProvider {
    fn name(&self) -> &str {
        "local_csv"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| ProviderError::Other(format!("open {}: {e}", path.display())))?;

        let mut bars = Vec::new();
        for record in reader.deserialize::<CsvBar>() {
            let row = record
                .map_err(|e| ProviderError::ResponseFormatChanged(format!("{}: {e}", path.display())))?;
            bars.push(Bar {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
            });
        }
        snapshot_from_bars(symbol, bars)
    }
}
