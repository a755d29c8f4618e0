//! Recap bookkeeping — the latest snapshot per symbol, rendered post-close.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSet;

/// One symbol's latest state for the end-of-day summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapEntry {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub rank: u8,
    pub rsi: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub regime_start: bool,
    pub cup_handle: bool,
    pub ur_signal: bool,
    pub h_channel: bool,
}

impl RecapEntry {
    pub fn from_indicators(
        symbol: impl Into<String>,
        price: f64,
        change_pct: f64,
        rank: u8,
        ind: &IndicatorSet,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_pct,
            rank,
            rsi: ind.rsi,
            sma50: ind.sma50,
            sma200: ind.sma200,
            regime_start: ind.regime_start,
            cup_handle: ind.cup_handle,
            ur_signal: ind.ur_signal,
            h_channel: ind.h_channel,
        }
    }

    /// Short labels for the flags that are set, in rank order.
    pub fn flag_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.regime_start {
            labels.push("regime");
        }
        if self.cup_handle {
            labels.push("cup&handle");
        }
        if self.ur_signal {
            labels.push("undercut&rally");
        }
        if self.h_channel {
            labels.push("channel");
        }
        labels
    }
}

/// Accumulated recap entries for the current day, keyed by symbol.
///
/// Every run overwrites its symbols' entries (last write wins), so the book
/// always reflects the most recent pass. Persisted across runs until the
/// post-close finalization clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecapBook {
    #[serde(default)]
    entries: BTreeMap<String, RecapEntry>,
}

impl RecapBook {
    pub fn upsert(&mut self, entry: RecapEntry) {
        self.entries.insert(entry.symbol.clone(), entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries sorted by rank ascending, then symbol ascending.
    pub fn sorted_entries(&self) -> Vec<&RecapEntry> {
        let mut entries: Vec<&RecapEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.symbol.cmp(&b.symbol)));
        entries
    }

    /// One human-readable line per symbol, in recap order.
    pub fn summary_lines(&self) -> Vec<String> {
        self.sorted_entries()
            .iter()
            .map(|e| {
                let flags = e.flag_labels();
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                };
                format!(
                    "#{rank} {symbol}: {price:.2} ({change:+.2}%) RSI {rsi:.1}{flags}",
                    rank = e.rank,
                    symbol = e.symbol,
                    price = e.price,
                    change = e.change_pct,
                    rsi = e.rsi,
                )
            })
            .collect()
    }
}
