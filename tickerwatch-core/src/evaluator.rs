//! Rule evaluation — threshold triggers, pattern triggers, severity.

use serde::{Deserialize, Serialize};

use crate::domain::{PriceSnapshot, Rule, Severity, Trigger, TriggerKind};
use crate::indicators::IndicatorSet;

/// Outcome of evaluating one rule row against fetched data.
///
/// `triggers` holds every reason that currently applies, independently
/// checked — a row may fire several at once. Dedup happens downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub change_pct: f64,
    pub rank: u8,
    pub severity: Severity,
    pub triggers: Vec<Trigger>,
}

/// Evaluate one rule row. Threshold triggers come first, pattern triggers
/// after, so rendered alerts lead with what the user configured.
pub fn evaluate(rule: &Rule, snapshot: &PriceSnapshot, indicators: &IndicatorSet) -> Evaluation {
    let price = snapshot.price;
    let change_pct = snapshot.change_pct();
    let mut triggers = Vec::new();

    if let Some(low) = rule.low {
        if price <= low {
            triggers.push(Trigger::new(
                TriggerKind::Low,
                format!("price {price:.2} at or below low target {low:.2}"),
            ));
        }
    }
    if let Some(high) = rule.high {
        if price >= high {
            triggers.push(Trigger::new(
                TriggerKind::High,
                format!("price {price:.2} at or above high target {high:.2}"),
            ));
        }
    }
    if let Some(pct_up) = rule.pct_up {
        if change_pct >= pct_up {
            triggers.push(Trigger::new(
                TriggerKind::Up,
                format!("up {change_pct:.2}% on the day (threshold {pct_up:.2}%)"),
            ));
        }
    }
    if let Some(pct_down) = rule.pct_down {
        // stored sign is irrelevant; a down threshold is always a drop
        if change_pct <= -pct_down.abs() {
            triggers.push(Trigger::new(
                TriggerKind::Down,
                format!(
                    "down {:.2}% on the day (threshold {:.2}%)",
                    change_pct.abs(),
                    pct_down.abs()
                ),
            ));
        }
    }

    if indicators.regime_start {
        triggers.push(Trigger::new(
            TriggerKind::Regime,
            format!(
                "regime start: price {price:.2} above SMA200 {:.2}, SMA50 {:.2} > SMA150 {:.2}",
                indicators.sma200, indicators.sma50, indicators.sma150
            ),
        ));
    }
    if indicators.cup_handle {
        triggers.push(Trigger::new(
            TriggerKind::CupHandle,
            format!(
                "cup & handle zone: {:.1}% off 52-week high {:.2}, RSI {:.1}",
                (indicators.high52 - price) / indicators.high52 * 100.0,
                indicators.high52,
                indicators.rsi
            ),
        ));
    }
    if indicators.ur_signal {
        triggers.push(Trigger::new(
            TriggerKind::Ur,
            format!(
                "undercut & rally: low {:.2} undercut the prior 60-day low {:.2}, now {price:.2}",
                snapshot.today_low, indicators.prior_60d_low
            ),
        ));
    }
    if indicators.h_channel {
        triggers.push(Trigger::new(
            TriggerKind::HChannel,
            "horizontal channel: trailing 20-day closes within 5% of their mean".to_string(),
        ));
    }

    let severity = Severity::from_kinds(triggers.iter().map(|t| t.kind));
    Evaluation {
        change_pct,
        rank: indicators.rank(price),
        severity,
        triggers,
    }
}
