//! Relative Strength Index over the trailing daily deltas.
//!
//! Plain rolling mean of gains and losses — not Wilder smoothing.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! avg_loss == 0 with gains present falls out as RSI = 100; a 0/0 ratio is
//! non-finite and reported as `None` so the caller can apply its neutral
//! default.

use crate::domain::Bar;

/// RSI over the last `period` close-to-close deltas.
///
/// Needs `period + 1` closes. `None` on short history, NaN closes, or a
/// non-finite result.
pub fn trailing_rsi(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }
    let window = &bars[bars.len() - (period + 1)..];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let (prev, curr) = (pair[0].close, pair[1].close);
        if prev.is_nan() || curr.is_nan() {
            return None;
        }
        let delta = curr - prev;
        if delta > 0.0 {
            gain_sum += delta;
        } else {
            loss_sum -= delta;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
