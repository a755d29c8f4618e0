//! Rule — one row of the watch table.

use serde::{Deserialize, Serialize};

/// A single alert rule.
///
/// Threshold fields left blank in the rules CSV are `None`. A row with no
/// thresholds at all is a watch-only entry: it still feeds the indicator
/// engine and the recap, but never fires a threshold trigger. Pattern
/// triggers fire for every row regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub symbol: String,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub pct_up: Option<f64>,
    pub pct_down: Option<f64>,
    pub webhook: Option<String>,
}

impl Rule {
    /// Bare rule for a symbol, with no thresholds and no webhook.
    pub fn watch_only(symbol: &str) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            low: None,
            high: None,
            pct_up: None,
            pct_down: None,
            webhook: None,
        }
    }

    /// Synthetic row for a watchlist extension symbol: percent-change
    /// thresholds only.
    pub fn with_pct_thresholds(symbol: &str, pct_up: f64, pct_down: f64) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            low: None,
            high: None,
            pct_up: Some(pct_up),
            pct_down: Some(pct_down),
            webhook: None,
        }
    }

    /// True when no threshold field is set.
    pub fn is_watch_only(&self) -> bool {
        self.low.is_none() && self.high.is_none() && self.pct_up.is_none() && self.pct_down.is_none()
    }

    /// Case-normalize the symbol in place. Symbols are the unique key within
    /// an evaluation pass, so every entry point normalizes the same way.
    pub fn normalize(&mut self) {
        self.symbol = normalize_symbol(&self.symbol);
    }
}

/// Uppercase, trimmed symbol form used as the map key everywhere.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
