//! Alert — the emitted record for a symbol with at least one fresh trigger.

use serde::{Deserialize, Serialize};

use super::{Severity, Trigger};

/// One alert per symbol per run.
///
/// `triggers` carries the full current trigger list for context, including
/// kinds that were already silenced today; whether the alert exists at all is
/// decided by the dedup filter upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    pub triggers: Vec<Trigger>,
    pub price: f64,
    pub prev_close: f64,
    pub change_pct: f64,
    pub rank: u8,
    pub severity: Severity,
    pub text: String,
}

impl Alert {
    pub fn new(
        symbol: impl Into<String>,
        triggers: Vec<Trigger>,
        price: f64,
        prev_close: f64,
        change_pct: f64,
        rank: u8,
        severity: Severity,
    ) -> Self {
        let symbol = symbol.into();
        let text = render_text(&symbol, &triggers, price, change_pct, rank);
        Self {
            symbol,
            triggers,
            price,
            prev_close,
            change_pct,
            rank,
            severity,
            text,
        }
    }
}

/// Markdown-flavored message body, one bullet per trigger.
fn render_text(symbol: &str, triggers: &[Trigger], price: f64, change_pct: f64, rank: u8) -> String {
    let mut text = format!(
        "**{symbol}**\nPrice: `{price:.2}` | %Δ: `{change_pct:+.2}%` | Rank: `{rank}`\n"
    );
    for trigger in triggers {
        text.push_str(&format!("- {}\n", trigger.detail));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TriggerKind;

    #[test]
    fn text_lists_every_trigger() {
        let alert = Alert::new(
            "XYZ",
            vec![
                Trigger::new(TriggerKind::Low, "price 95.00 at or below low target 100.00"),
                Trigger::new(TriggerKind::Down, "down 3.06% on the day (threshold 2.00%)"),
            ],
            95.0,
            98.0,
            -3.06,
            6,
            Severity::Down,
        );
        assert!(alert.text.starts_with("**XYZ**"));
        assert!(alert.text.contains("`95.00`"));
        assert!(alert.text.contains("`-3.06%`"));
        assert!(alert.text.contains("- price 95.00 at or below low target 100.00"));
        assert!(alert.text.contains("- down 3.06%"));
    }

    #[test]
    fn positive_change_is_signed() {
        let alert = Alert::new("ABC", Vec::new(), 103.0, 100.0, 3.0, 5, Severity::Up);
        assert!(alert.text.contains("`+3.00%`"));
    }
}
