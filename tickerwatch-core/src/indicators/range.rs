//! Range primitives: 52-week extremes, prior-window low, channel width.

use crate::domain::Bar;

/// Highest high across the supplied history. The available window stands in
/// for 52 weeks when shorter. NaN highs are skipped; `None` when nothing
/// usable remains.
pub fn year_high(bars: &[Bar]) -> Option<f64> {
    bars.iter()
        .map(|b| b.high)
        .filter(|h| !h.is_nan())
        .fold(None, |acc: Option<f64>, h| {
            Some(acc.map_or(h, |a| a.max(h)))
        })
}

/// Lowest low across the supplied history.
pub fn year_low(bars: &[Bar]) -> Option<f64> {
    bars.iter()
        .map(|b| b.low)
        .filter(|l| !l.is_nan())
        .fold(None, |acc: Option<f64>, l| {
            Some(acc.map_or(l, |a| a.min(l)))
        })
}

/// Minimum low of the `window` bars preceding the most recent bar.
///
/// The most recent bar is excluded, so a partial intraday bar never
/// undercuts itself. Needs `window + 1` bars.
pub fn prior_low(bars: &[Bar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window + 1 {
        return None;
    }
    let slice = &bars[bars.len() - 1 - window..bars.len() - 1];
    let mut min: Option<f64> = None;
    for bar in slice {
        if bar.low.is_nan() {
            return None;
        }
        min = Some(min.map_or(bar.low, |m| m.min(bar.low)));
    }
    min
}

/// (max − min) / mean over the trailing `window` closes.
///
/// `None` on short history, NaN closes, or a non-positive mean.
pub fn channel_width(bars: &[Bar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window {
        return None;
    }
    let closes = &bars[bars.len() - window..];
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for bar in closes {
        if bar.close.is_nan() {
            return None;
        }
        min = min.min(bar.close);
        max = max.max(bar.close);
        sum += bar.close;
    }
    let mean = sum / window as f64;
    if mean <= 0.0 {
        return None;
    }
    Some((max - min) / mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn year_extremes_cover_full_history() {
        let bars = make_bars(&[10.0, 30.0, 20.0]);
        // make_bars: high = max(open,close)+1, low = min(open,close)-1
        assert_approx(year_high(&bars).unwrap(), 31.0, DEFAULT_EPSILON);
        assert_approx(year_low(&bars).unwrap(), 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn year_extremes_empty_history() {
        assert_eq!(year_high(&[]), None);
        assert_eq!(year_low(&[]), None);
    }

    #[test]
    fn prior_low_excludes_most_recent_bar() {
        // Last bar carries the lowest low, but it must not count.
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[4].low = 1.0;
        let prior = prior_low(&bars, 4).unwrap();
        assert!(prior > 1.0);
        // Lows of bars 0..=3: min(open,close)-1 → 99.0
        assert_approx(prior, 99.0, DEFAULT_EPSILON);
    }

    #[test]
    fn prior_low_needs_window_plus_one() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        assert_eq!(prior_low(&bars, 3), None);
        assert!(prior_low(&bars, 2).is_some());
    }

    #[test]
    fn channel_width_flat_series_is_zero() {
        let bars = make_bars(&[50.0; 25]);
        assert_approx(channel_width(&bars, 20).unwrap(), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn channel_width_hand_calc() {
        // Trailing 4 closes: 98, 100, 102, 100 → (102-98)/100 = 0.04
        let bars = make_bars(&[90.0, 98.0, 100.0, 102.0, 100.0]);
        assert_approx(channel_width(&bars, 4).unwrap(), 0.04, DEFAULT_EPSILON);
    }

    #[test]
    fn channel_width_short_history() {
        let bars = make_bars(&[100.0, 101.0]);
        assert_eq!(channel_width(&bars, 20), None);
    }
}
