//! Integration tests for the run controller: mock provider, temp files,
//! the full gate → evaluate → persist → emit cycle.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use tempfile::TempDir;
use tickerwatch_core::calendar::MARKET_TZ;
use tickerwatch_core::data::{ProviderError, QuoteProvider};
use tickerwatch_core::dedup::AlertState;
use tickerwatch_core::domain::{PriceSnapshot, Severity, TriggerKind};
use tickerwatch_runner::delivery::{AlertSink, DeliveryError};
use tickerwatch_runner::{run_once, MonitorConfig, RunOutcome};

struct MockProvider(BTreeMap<String, PriceSnapshot>);

impl MockProvider {
    fn with(snapshots: &[(&str, f64, f64)]) -> Self {
        Self(
            snapshots
                .iter()
                .map(|(symbol, price, prev_close)| {
                    (symbol.to_string(), snapshot(*price, *prev_close))
                })
                .collect(),
        )
    }
}

impl QuoteProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn fetch(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        self.0
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

struct CollectingSink(Mutex<Vec<(String, String)>>);

impl CollectingSink {
    fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }
}

impl AlertSink for CollectingSink {
    fn deliver(&self, webhook: &str, text: &str) -> Result<(), DeliveryError> {
        self.0
            .lock()
            .unwrap()
            .push((webhook.to_string(), text.to_string()));
        Ok(())
    }
}

/// Snapshot with no history: the indicator engine degrades to neutral, so
/// tests only see the threshold triggers they set up.
fn snapshot(price: f64, prev_close: f64) -> PriceSnapshot {
    PriceSnapshot {
        price,
        prev_close,
        today_low: price,
        history: Vec::new(),
    }
}

fn config_in(dir: &TempDir) -> MonitorConfig {
    MonitorConfig {
        rules_file: dir.path().join("rules.csv"),
        state_file: dir.path().join("alert_state.json"),
        recap_store_file: dir.path().join("recap_store.json"),
        alerts_file: dir.path().join("alerts.json"),
        recap_html_file: dir.path().join("recap.html"),
        recap_json_file: dir.path().join("recap.json"),
        recap_ready_file: dir.path().join("recap_ready.json"),
        ..Default::default()
    }
}

fn write_rules(cfg: &MonitorConfig, rows: &str) {
    let contents = format!("symbol,low,high,pct_up,pct_down,webhook\n{rows}");
    std::fs::write(&cfg.rules_file, contents).unwrap();
}

fn load_state(path: &Path) -> AlertState {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// Monday 2025-03-03, mid regular session.
fn trading_morning() -> DateTime<Tz> {
    MARKET_TZ.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap()
}

/// Monday 2025-03-03, long before pre-market opens.
fn predawn() -> DateTime<Tz> {
    MARKET_TZ.with_ymd_and_hms(2025, 3, 3, 2, 0, 0).unwrap()
}

/// Monday 2025-03-03, ten minutes after the close.
fn post_close() -> DateTime<Tz> {
    MARKET_TZ.with_ymd_and_hms(2025, 3, 3, 16, 10, 0).unwrap()
}

#[test]
fn outside_session_is_a_clean_noop() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "XYZ,100,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, predawn()).unwrap();

    assert_eq!(report.outcome, RunOutcome::OutsideSession);
    assert!(report.alerts.is_empty());
    // zero state mutation
    assert!(!cfg.state_file.exists());
    assert!(!cfg.recap_store_file.exists());
}

#[test]
fn force_flag_overrides_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_in(&dir);
    cfg.force = true;
    write_rules(&cfg, "XYZ,100,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, predawn()).unwrap();
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.alerts.len(), 1);
}

#[test]
fn low_target_fires_once_with_down_severity() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "XYZ,100,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();

    assert_eq!(report.evaluated, 1);
    assert_eq!(report.alerts.len(), 1);
    let alert = &report.alerts[0];
    assert_eq!(alert.symbol, "XYZ");
    assert_eq!(alert.severity, Severity::Down);
    assert_eq!(alert.triggers[0].kind, TriggerKind::Low);
    assert!((alert.change_pct - (-3.06)).abs() < 0.01);

    // persisted dedup state carries the plain tag
    let state = load_state(&cfg.state_file);
    assert!(state.sent["XYZ"].contains(&TriggerKind::Low));
    assert!(cfg.alerts_file.exists());
}

#[test]
fn rerunning_with_unchanged_prices_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "ABC,,,1,,\n");
    let provider = MockProvider::with(&[("ABC", 102.0, 100.0)]);
    let sink = CollectingSink::new();

    let first = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    assert_eq!(first.alerts.len(), 1);
    assert_eq!(first.alerts[0].triggers[0].kind, TriggerKind::Up);

    let second = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    assert_eq!(second.outcome, RunOutcome::Completed);
    assert!(second.alerts.is_empty());
    // the stale alerts artifact from run 1 is removed
    assert!(!cfg.alerts_file.exists());

    let state = load_state(&cfg.state_file);
    assert_eq!(state.sent["ABC"].len(), 1);
}

#[test]
fn a_new_trigger_kind_reopens_the_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "XYZ,100,,,5,\n");

    // run 1: only the low target fires (-1.02% is above the -5% threshold)
    let provider = MockProvider::with(&[("XYZ", 97.0, 98.0)]);
    let sink = CollectingSink::new();
    let first = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    assert_eq!(first.alerts.len(), 1);
    assert_eq!(first.alerts[0].triggers.len(), 1);

    // run 2: the drop deepens; `low` is silenced but `down` is fresh, and
    // the alert carries the full current trigger list for context
    let provider = MockProvider::with(&[("XYZ", 92.0, 98.0)]);
    let second = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    assert_eq!(second.alerts.len(), 1);
    let kinds: Vec<TriggerKind> = second.alerts[0].triggers.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TriggerKind::Low, TriggerKind::Down]);

    let state = load_state(&cfg.state_file);
    assert_eq!(state.sent["XYZ"].len(), 2);
}

#[test]
fn watch_only_rows_feed_the_recap_but_never_alert() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "VIX,,,,,\n");
    let provider = MockProvider::with(&[("^VIX", 18.5, 17.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();

    assert_eq!(report.evaluated, 1);
    assert!(report.alerts.is_empty());
    let store = std::fs::read_to_string(&cfg.recap_store_file).unwrap();
    assert!(store.contains("VIX"));
}

#[test]
fn watchlist_symbols_get_synthetic_pct_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_in(&dir);
    cfg.watch_symbols = vec!["ABC".into()];
    write_rules(&cfg, "XYZ,100,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 150.0, 149.0), ("ABC", 106.0, 100.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();

    assert_eq!(report.evaluated, 2);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].symbol, "ABC");
    assert_eq!(report.alerts[0].triggers[0].kind, TriggerKind::Up);
}

#[test]
fn missing_rules_file_is_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    let provider = MockProvider::with(&[]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    assert_eq!(report.outcome, RunOutcome::NothingToDo);
    assert!(!cfg.state_file.exists());
}

#[test]
fn fetch_failures_skip_the_row_not_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "XYZ,100,,,,\nGONE,50,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.evaluated, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.alerts.len(), 1);
    // the skipped row appears in neither alerts nor the recap store
    let store = std::fs::read_to_string(&cfg.recap_store_file).unwrap();
    assert!(!store.contains("GONE"));
}

#[test]
fn recap_is_finalized_inside_the_close_window() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config_in(&dir);
    write_rules(&cfg, "XYZ,,,,,\n");
    let provider = MockProvider::with(&[("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    // accumulate during the session, finalize after the close
    run_once(&cfg, &provider, &sink, trading_morning()).unwrap();
    let report = run_once(&cfg, &provider, &sink, post_close()).unwrap();

    assert!(report.recap_finalized);
    assert!(cfg.recap_html_file.exists());
    assert!(cfg.recap_ready_file.exists());
    let html = std::fs::read_to_string(&cfg.recap_html_file).unwrap();
    assert!(html.contains("XYZ"));
    // the store is cleared so the next day starts empty
    assert!(!cfg.recap_store_file.exists());

    // a later run outside the window does not re-finalize
    let after = MARKET_TZ.with_ymd_and_hms(2025, 3, 3, 17, 30, 0).unwrap();
    let report = run_once(&cfg, &provider, &sink, after).unwrap();
    assert!(!report.recap_finalized);
}

#[test]
fn webhook_delivery_prefers_the_rule_then_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config_in(&dir);
    cfg.default_webhook = Some("https://hooks.example/default".into());
    write_rules(
        &cfg,
        "ABC,100,,,,https://hooks.example/abc\nXYZ,100,,,,\n",
    );
    let provider = MockProvider::with(&[("ABC", 95.0, 98.0), ("XYZ", 95.0, 98.0)]);
    let sink = CollectingSink::new();

    let report = run_once(&cfg, &provider, &sink, trading_morning()).unwrap();

    assert_eq!(report.alerts.len(), 2);
    assert_eq!(report.delivered, 2);
    let delivered = sink.0.lock().unwrap();
    let destinations: Vec<&str> = delivered.iter().map(|(url, _)| url.as_str()).collect();
    assert!(destinations.contains(&"https://hooks.example/abc"));
    assert!(destinations.contains(&"https://hooks.example/default"));
}
