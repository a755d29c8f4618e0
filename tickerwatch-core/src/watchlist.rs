//! Watchlist extension — extra bare symbols merged into the rule table.
//!
//! Sources: a comma-separated configuration value and an optional
//! line-delimited file. Symbols already present as rule rows are skipped;
//! the rest become synthetic percent-change rows.

use std::collections::BTreeSet;

use crate::domain::rule::normalize_symbol;
use crate::domain::Rule;

/// Parse a comma-separated symbol list (configuration/environment value).
pub fn parse_list(raw: &str) -> Vec<String> {
    dedup_normalized(raw.split(','))
}

/// Parse a line-delimited symbol file. Blank lines and `#` comments are
/// ignored.
pub fn parse_file(contents: &str) -> Vec<String> {
    dedup_normalized(
        contents
            .lines()
            .map(|line| line.split('#').next().unwrap_or("")),
    )
}

fn dedup_normalized<'a, I: Iterator<Item = &'a str>>(raw: I) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for item in raw {
        let symbol = normalize_symbol(item);
        if !symbol.is_empty() && seen.insert(symbol.clone()) {
            out.push(symbol);
        }
    }
    out
}

/// Append synthetic rows for `extra` symbols that have no rule row yet.
/// Synthetic rows watch percent change only, with the given default
/// thresholds.
pub fn merge_into_rules(rules: &mut Vec<Rule>, extra: &[String], pct_up: f64, pct_down: f64) {
    let existing: BTreeSet<String> = rules.iter().map(|r| r.symbol.clone()).collect();
    for symbol in extra {
        let symbol = normalize_symbol(symbol);
        if !existing.contains(&symbol) {
            rules.push(Rule::with_pct_thresholds(&symbol, pct_up, pct_down));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_split_trimmed_uppercased() {
        assert_eq!(
            parse_list("aapl, msft ,,SPY"),
            vec!["AAPL".to_string(), "MSFT".into(), "SPY".into()]
        );
    }

    #[test]
    fn list_dedups_preserving_order() {
        assert_eq!(
            parse_list("spy,aapl,SPY"),
            vec!["SPY".to_string(), "AAPL".into()]
        );
    }

    #[test]
    fn file_ignores_comments_and_blanks() {
        let contents = "# core watch\naapl\n\nmsft # megacap\n";
        assert_eq!(
            parse_file(contents),
            vec!["AAPL".to_string(), "MSFT".into()]
        );
    }

    #[test]
    fn merge_skips_existing_rule_symbols() {
        let mut rules = vec![Rule::watch_only("AAPL")];
        merge_into_rules(
            &mut rules,
            &["AAPL".to_string(), "MSFT".to_string()],
            5.0,
            5.0,
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].symbol, "MSFT");
        assert_eq!(rules[1].pct_up, Some(5.0));
        assert_eq!(rules[1].pct_down, Some(5.0));
        assert!(rules[1].low.is_none());
    }
}
