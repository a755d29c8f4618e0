//! NYSE trading calendar — trading days, holidays, early closes, session windows.
//!
//! All session predicates take zone-aware timestamps and do their comparisons
//! in the exchange's local zone (America/New_York). Naive timestamps are
//! unrepresentable at this boundary; callers convert explicitly or ask for
//! [`now_eastern`].
//!
//! The holiday table is hardcoded for 2023–2027. Early-close sessions are
//! entries whose descriptive name contains "early close" — those ARE trading
//! days, with a 13:00 close instead of 16:00.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::America::New_York;
use chrono_tz::Tz;

/// The reference exchange's timezone.
pub const MARKET_TZ: Tz = New_York;

/// Current time in the exchange zone.
pub fn now_eastern() -> DateTime<Tz> {
    Utc::now().with_timezone(&MARKET_TZ)
}

/// Descriptive name of the calendar entry for `date`, if any.
///
/// Full holidays and early-close sessions both live in this table; the two
/// are told apart by the "early close" marker in the name.
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    ENTRIES
        .iter()
        .find(|(y, m, d, _)| {
            date.year() == *y && date.month() == *m && date.day() == *d
        })
        .map(|(_, _, _, name)| *name)
}

fn is_early_close_name(name: &str) -> bool {
    name.to_ascii_lowercase().contains("early close")
}

/// True when `date` is a full market holiday (closed all day).
pub fn is_full_holiday(date: NaiveDate) -> bool {
    matches!(holiday_name(date), Some(name) if !is_early_close_name(name))
}

/// True when `date` is a designated early-close (half-day) session.
pub fn is_early_close(date: NaiveDate) -> bool {
    matches!(holiday_name(date), Some(name) if is_early_close_name(name))
}

/// True when the market trades at all on `date`: a weekday that is not a
/// full holiday. Early-close days are trading days.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !is_full_holiday(date)
}

/// Regular-session close for `date`: 13:00 on early-close days, else 16:00.
pub fn session_close(date: NaiveDate) -> NaiveTime {
    if is_early_close(date) {
        NaiveTime::from_hms_opt(13, 0, 0).unwrap()
    } else {
        NaiveTime::from_hms_opt(16, 0, 0).unwrap()
    }
}

fn regular_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap()
}

fn pre_market_open() -> NaiveTime {
    NaiveTime::from_hms_opt(4, 0, 0).unwrap()
}

fn after_hours_end() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap()
}

/// 9:30 ≤ t < close, trading days only.
pub fn in_regular_session(dt: DateTime<Tz>) -> bool {
    let local = dt.with_timezone(&MARKET_TZ);
    let date = local.date_naive();
    if !is_trading_day(date) {
        return false;
    }
    let t = local.time();
    regular_open() <= t && t < session_close(date)
}

/// 4:00 ≤ t < 9:30, trading days only.
pub fn in_pre_market(dt: DateTime<Tz>) -> bool {
    let local = dt.with_timezone(&MARKET_TZ);
    if !is_trading_day(local.date_naive()) {
        return false;
    }
    let t = local.time();
    pre_market_open() <= t && t < regular_open()
}

/// close ≤ t < 20:00, trading days only.
pub fn in_after_hours(dt: DateTime<Tz>) -> bool {
    let local = dt.with_timezone(&MARKET_TZ);
    let date = local.date_naive();
    if !is_trading_day(date) {
        return false;
    }
    let t = local.time();
    session_close(date) <= t && t < after_hours_end()
}

/// Pre-market ∪ regular ∪ after-hours. The monitor's run gate.
pub fn in_extended_session(dt: DateTime<Tz>) -> bool {
    in_pre_market(dt) || in_regular_session(dt) || in_after_hours(dt)
}

/// close ≤ t < close + `window_minutes`, trading days only. The recap is
/// finalized on the first run that lands inside this window.
pub fn in_recap_window(dt: DateTime<Tz>, window_minutes: u32) -> bool {
    let local = dt.with_timezone(&MARKET_TZ);
    let date = local.date_naive();
    if !is_trading_day(date) {
        return false;
    }
    let close = session_close(date);
    let end = close + Duration::minutes(i64::from(window_minutes));
    let t = local.time();
    close <= t && t < end
}

// ---------------------------------------------------------------------------
// Holiday table 2023–2027 (observed dates; "early close" entries are 13:00
// sessions, everything else is a full closure)
// ---------------------------------------------------------------------------

const ENTRIES: &[(i32, u32, u32, &str)] = &[
    // ── 2023 ─────────────────────────────────────────────────────────
    (2023, 1, 2, "New Year's Day (observed)"),
    (2023, 1, 16, "Martin Luther King Jr. Day"),
    (2023, 2, 20, "Washington's Birthday"),
    (2023, 4, 7, "Good Friday"),
    (2023, 5, 29, "Memorial Day"),
    (2023, 6, 19, "Juneteenth National Independence Day"),
    (2023, 7, 3, "Independence Day eve (early close)"),
    (2023, 7, 4, "Independence Day"),
    (2023, 9, 4, "Labor Day"),
    (2023, 11, 23, "Thanksgiving Day"),
    (2023, 11, 24, "Day after Thanksgiving (early close)"),
    (2023, 12, 25, "Christmas Day"),
    // ── 2024 ─────────────────────────────────────────────────────────
    (2024, 1, 1, "New Year's Day"),
    (2024, 1, 15, "Martin Luther King Jr. Day"),
    (2024, 2, 19, "Washington's Birthday"),
    (2024, 3, 29, "Good Friday"),
    (2024, 5, 27, "Memorial Day"),
    (2024, 6, 19, "Juneteenth National Independence Day"),
    (2024, 7, 3, "Independence Day eve (early close)"),
    (2024, 7, 4, "Independence Day"),
    (2024, 9, 2, "Labor Day"),
    (2024, 11, 28, "Thanksgiving Day"),
    (2024, 11, 29, "Day after Thanksgiving (early close)"),
    (2024, 12, 24, "Christmas Eve (early close)"),
    (2024, 12, 25, "Christmas Day"),
    // ── 2025 ─────────────────────────────────────────────────────────
    (2025, 1, 1, "New Year's Day"),
    (2025, 1, 20, "Martin Luther King Jr. Day"),
    (2025, 2, 17, "Washington's Birthday"),
    (2025, 4, 18, "Good Friday"),
    (2025, 5, 26, "Memorial Day"),
    (2025, 6, 19, "Juneteenth National Independence Day"),
    (2025, 7, 3, "Independence Day eve (early close)"),
    (2025, 7, 4, "Independence Day"),
    (2025, 9, 1, "Labor Day"),
    (2025, 11, 27, "Thanksgiving Day"),
    (2025, 11, 28, "Day after Thanksgiving (early close)"),
    (2025, 12, 24, "Christmas Eve (early close)"),
    (2025, 12, 25, "Christmas Day"),
    // ── 2026 ─────────────────────────────────────────────────────────
    (2026, 1, 1, "New Year's Day"),
    (2026, 1, 19, "Martin Luther King Jr. Day"),
    (2026, 2, 16, "Washington's Birthday"),
    (2026, 4, 3, "Good Friday"),
    (2026, 5, 25, "Memorial Day"),
    (2026, 6, 19, "Juneteenth National Independence Day"),
    (2026, 7, 3, "Independence Day (observed)"),
    (2026, 9, 7, "Labor Day"),
    (2026, 11, 26, "Thanksgiving Day"),
    (2026, 11, 27, "Day after Thanksgiving (early close)"),
    (2026, 12, 24, "Christmas Eve (early close)"),
    (2026, 12, 25, "Christmas Day"),
    // ── 2027 ─────────────────────────────────────────────────────────
    (2027, 1, 1, "New Year's Day"),
    (2027, 1, 18, "Martin Luther King Jr. Day"),
    (2027, 2, 15, "Washington's Birthday"),
    (2027, 3, 26, "Good Friday"),
    (2027, 5, 31, "Memorial Day"),
    (2027, 6, 18, "Juneteenth National Independence Day (observed)"),
    (2027, 7, 5, "Independence Day (observed)"),
    (2027, 9, 6, "Labor Day"),
    (2027, 11, 25, "Thanksgiving Day"),
    (2027, 11, 26, "Day after Thanksgiving (early close)"),
    (2027, 12, 24, "Christmas Day (observed)"),
];
