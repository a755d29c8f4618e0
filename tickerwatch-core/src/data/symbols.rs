//! Provider-symbol aliasing for index shorthands.
//!
//! Users write the familiar index names; the provider wants caret tickers.
//! Alerts and the recap always show the user-facing symbol.

const INDEX_ALIASES: &[(&str, &str)] = &[
    ("SPX", "^GSPC"),
    ("VIX", "^VIX"),
    ("COMP.IDX", "^IXIC"),
    ("DJIND", "^DJI"),
];

/// Map a user-facing symbol to the ticker the provider understands.
/// Unknown symbols pass through unchanged.
pub fn provider_symbol(symbol: &str) -> &str {
    INDEX_ALIASES
        .iter()
        .find(|(user, _)| *user == symbol)
        .map(|(_, provider)| *provider)
        .unwrap_or(symbol)
}
