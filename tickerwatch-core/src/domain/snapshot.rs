//! Price snapshot — everything the evaluator needs for one symbol.

use serde::{Deserialize, Serialize};

use super::Bar;

/// Current price plus the daily history backing the indicator engine.
///
/// `history` is ordered oldest-first and is expected to cover at least one
/// trading year; shorter windows are tolerated (the indicator engine
/// degrades). The most recent bar is today's (possibly partial) bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    pub prev_close: f64,
    pub today_low: f64,
    pub history: Vec<Bar>,
}

impl PriceSnapshot {
    /// A snapshot is unusable unless price and previous close are finite and
    /// positive. Absence of either is a fetch failure, never a zero value.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite()
            && self.prev_close.is_finite()
            && self.price > 0.0
            && self.prev_close > 0.0
    }

    /// Percent change from the previous close.
    pub fn change_pct(&self) -> f64 {
        (self.price - self.prev_close) / self.prev_close * 100.0
    }
}
