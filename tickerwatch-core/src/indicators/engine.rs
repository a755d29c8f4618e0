//! Per-symbol indicator engine: trailing values, pattern flags, priority rank.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::PriceSnapshot;

use super::{channel_width, prior_low, trailing_rsi, trailing_sma, year_high, year_low};

const RSI_PERIOD: usize = 14;
const UNDERCUT_WINDOW: usize = 60;
const CHANNEL_WINDOW: usize = 20;
const CHANNEL_MAX_WIDTH: f64 = 0.05;
const CUP_HANDLE_MAX_OFF_HIGH: f64 = 0.05;

/// Neutral RSI reported when the real value is undefined.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Everything the evaluator and the recap need about one symbol's tape.
///
/// Derived purely from a [`PriceSnapshot`]. Insufficient history never
/// errors: the affected values degrade to neutral defaults (0.0 for levels,
/// 50.0 for RSI, false for flags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma50: f64,
    pub sma150: f64,
    pub sma200: f64,
    pub rsi: f64,
    pub high52: f64,
    pub low52: f64,
    pub prior_60d_low: f64,
    pub regime_start: bool,
    pub cup_handle: bool,
    pub ur_signal: bool,
    pub h_channel: bool,
}

impl IndicatorSet {
    /// Neutral set used when no history is available at all.
    pub fn neutral() -> Self {
        Self {
            sma50: 0.0,
            sma150: 0.0,
            sma200: 0.0,
            rsi: NEUTRAL_RSI,
            high52: 0.0,
            low52: 0.0,
            prior_60d_low: 0.0,
            regime_start: false,
            cup_handle: false,
            ur_signal: false,
            h_channel: false,
        }
    }

    /// Compute the full set for one snapshot.
    pub fn compute(snapshot: &PriceSnapshot) -> Self {
        let bars = &snapshot.history;
        let price = snapshot.price;

        let sma50 = trailing_sma(bars, 50);
        let sma150 = trailing_sma(bars, 150);
        let sma200 = trailing_sma(bars, 200);
        let rsi = trailing_rsi(bars, RSI_PERIOD);
        let high52 = year_high(bars);
        let low52 = year_low(bars);
        let prior = prior_low(bars, UNDERCUT_WINDOW);
        let channel = channel_width(bars, CHANNEL_WINDOW);

        if sma200.is_none() || rsi.is_none() || prior.is_none() {
            debug!(
                bars = bars.len(),
                "short or gappy history, degrading missing indicators to neutral defaults"
            );
        }

        let regime_start = match (sma50, sma150, sma200) {
            (Some(s50), Some(s150), Some(s200)) => price > s200 && s50 > s150 && s150 > s200,
            _ => false,
        };

        let cup_handle = match (high52, sma50, sma200, rsi) {
            (Some(h52), Some(s50), Some(s200), Some(r)) => {
                (h52 - price) / h52 < CUP_HANDLE_MAX_OFF_HIGH
                    && s50 > s200
                    && (45.0..=65.0).contains(&r)
            }
            _ => false,
        };

        let ur_signal = match prior {
            Some(p) => snapshot.today_low < p && price > p,
            None => false,
        };

        let h_channel = matches!(channel, Some(w) if w < CHANNEL_MAX_WIDTH);

        Self {
            sma50: sma50.unwrap_or(0.0),
            sma150: sma150.unwrap_or(0.0),
            sma200: sma200.unwrap_or(0.0),
            rsi: rsi.unwrap_or(NEUTRAL_RSI),
            high52: high52.unwrap_or(0.0),
            low52: low52.unwrap_or(0.0),
            prior_60d_low: prior.unwrap_or(0.0),
            regime_start,
            cup_handle,
            ur_signal,
            h_channel,
        }
    }

    /// Priority rank, 1 = highest. Flags are not mutually exclusive; the
    /// best-ranked one wins. 5 is the generic uptrend, 6 means no signal.
    pub fn rank(&self, price: f64) -> u8 {
        if self.regime_start {
            1
        } else if self.cup_handle {
            2
        } else if self.ur_signal {
            3
        } else if self.h_channel {
            4
        } else if price > self.sma200 && self.sma50 > self.sma200 {
            5
        } else {
            6
        }
    }
}
