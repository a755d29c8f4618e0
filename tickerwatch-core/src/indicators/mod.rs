//! Trailing indicator primitives and the per-symbol indicator engine.
//!
//! Unlike a backtester, the monitor only ever needs the value at the most
//! recent end of a daily history, so every primitive returns one trailing
//! value. `None` means the history is too short (or contains NaN closes) —
//! the engine maps that to neutral defaults rather than erroring.

pub mod engine;
pub mod range;
pub mod rsi;
pub mod sma;

pub use engine::IndicatorSet;
pub use range::{channel_width, prior_low, year_high, year_low};
pub use rsi::trailing_rsi;
pub use sma::trailing_sma;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHL: open = prev close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
