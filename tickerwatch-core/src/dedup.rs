//! Once-per-trading-day alert dedup.
//!
//! State is keyed by trading date; per symbol it is the set of trigger kinds
//! already delivered today. A kind fires at most once per date — re-enabling
//! is the rule editor's job (it removes entries), and a date change discards
//! the whole map.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Trigger, TriggerKind};

/// Persisted dedup state for one trading date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertState {
    pub date: NaiveDate,
    #[serde(default)]
    pub sent: BTreeMap<String, BTreeSet<TriggerKind>>,
}

impl AlertState {
    /// Fresh empty state for a trading date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sent: BTreeMap::new(),
        }
    }

    /// Carry the state forward only when it belongs to `today`; anything
    /// stored under another date is stale and discarded wholesale.
    pub fn for_date(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            info!(stored = %self.date, today = %today, "discarding stale alert state");
            Self::new(today)
        }
    }

    /// The subset of `triggers` whose kind has not been delivered for
    /// `symbol` today. An empty return means no alert this run.
    pub fn fresh<'t>(&self, symbol: &str, triggers: &'t [Trigger]) -> Vec<&'t Trigger> {
        match self.sent.get(symbol) {
            Some(delivered) => triggers
                .iter()
                .filter(|t| !delivered.contains(&t.kind))
                .collect(),
            None => triggers.iter().collect(),
        }
    }

    /// Mark every kind in `triggers` as delivered for `symbol`.
    pub fn record(&mut self, symbol: &str, triggers: &[Trigger]) {
        if triggers.is_empty() {
            return;
        }
        self.sent
            .entry(symbol.to_string())
            .or_default()
            .extend(triggers.iter().map(|t| t.kind));
    }
}
