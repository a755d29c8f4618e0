//! Rules CSV — the `symbol,low,high,pct_up,pct_down,webhook` table.
//!
//! Parsed once at the boundary into typed rows. Blank threshold fields are
//! `None`, rows that fail to parse are skipped with a warning, and duplicate
//! symbols keep the first row.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tickerwatch_core::domain::Rule;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RulesError {
    /// Missing rule source: the run treats this as "nothing to do".
    #[error("rules file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("read rules {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: csv::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawRule {
    symbol: String,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    pct_up: Option<f64>,
    #[serde(default)]
    pct_down: Option<f64>,
    #[serde(default)]
    webhook: Option<String>,
}

pub fn load_rules(path: &Path) -> Result<Vec<Rule>, RulesError> {
    if !path.exists() {
        return Err(RulesError::Missing(path.to_path_buf()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| RulesError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rules = Vec::new();
    let mut seen = BTreeSet::new();
    for (i, record) in reader.deserialize::<RawRule>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let line = i + 2;
        let raw = match record {
            Ok(raw) => raw,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed rules row");
                continue;
            }
        };
        let mut rule = Rule {
            symbol: raw.symbol,
            low: raw.low,
            high: raw.high,
            pct_up: raw.pct_up,
            pct_down: raw.pct_down,
            webhook: raw.webhook.filter(|w| !w.trim().is_empty()),
        };
        rule.normalize();
        if rule.symbol.is_empty() {
            continue;
        }
        if !seen.insert(rule.symbol.clone()) {
            warn!(line, symbol = %rule.symbol, "duplicate rule row ignored");
            continue;
        }
        rules.push(rule);
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_rules(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("rules.csv")).unwrap();
        write!(file, "{contents}").unwrap();
        dir
    }

    #[test]
    fn blank_fields_become_none() {
        let dir = write_rules(
            "symbol,low,high,pct_up,pct_down,webhook\n\
             AAPL,150,200,,,\n\
             spy,,,2.5,2.5,https://hooks.example/spy\n",
        );
        let rules = load_rules(&dir.path().join("rules.csv")).unwrap();
        assert_eq!(rules.len(), 2);

        assert_eq!(rules[0].symbol, "AAPL");
        assert_eq!(rules[0].low, Some(150.0));
        assert_eq!(rules[0].high, Some(200.0));
        assert_eq!(rules[0].pct_up, None);
        assert_eq!(rules[0].webhook, None);

        assert_eq!(rules[1].symbol, "SPY");
        assert_eq!(rules[1].pct_down, Some(2.5));
        assert_eq!(
            rules[1].webhook.as_deref(),
            Some("https://hooks.example/spy")
        );
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let dir = write_rules(
            "symbol,low,high,pct_up,pct_down,webhook\n\
             AAPL,not-a-number,,,,\n\
             MSFT,100,,,,\n",
        );
        let rules = load_rules(&dir.path().join("rules.csv")).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].symbol, "MSFT");
    }

    #[test]
    fn duplicate_symbols_keep_the_first_row() {
        let dir = write_rules(
            "symbol,low,high,pct_up,pct_down,webhook\n\
             AAPL,100,,,,\n\
             aapl,,200,,,\n",
        );
        let rules = load_rules(&dir.path().join("rules.csv")).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].low, Some(100.0));
        assert_eq!(rules[0].high, None);
    }

    #[test]
    fn missing_file_is_its_own_variant() {
        let err = load_rules(Path::new("/nonexistent/rules.csv")).unwrap_err();
        assert!(matches!(err, RulesError::Missing(_)));
    }

    #[test]
    fn watch_only_rows_survive() {
        let dir = write_rules("symbol,low,high,pct_up,pct_down,webhook\nVIX,,,,,\n");
        let rules = load_rules(&dir.path().join("rules.csv")).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(rules[0].is_watch_only());
    }
}
