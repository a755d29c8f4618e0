//! The run controller — one gate-fetch-evaluate-persist-emit cycle.
//!
//! Invoked periodically by an external scheduler; every invocation is
//! idempotent with respect to dedup. Quote fetches run in parallel, but all
//! state commits happen sequentially afterwards, so no symbol is ever
//! written from two evaluations.

use chrono::DateTime;
use chrono_tz::Tz;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info, warn};

use tickerwatch_core::calendar;
use tickerwatch_core::data::{provider_symbol, QuoteProvider};
use tickerwatch_core::domain::{Alert, PriceSnapshot, Rule};
use tickerwatch_core::evaluator;
use tickerwatch_core::indicators::IndicatorSet;
use tickerwatch_core::recap::RecapEntry;
use tickerwatch_core::watchlist;

use crate::artifacts;
use crate::config::MonitorConfig;
use crate::delivery::AlertSink;
use crate::rules_io::{load_rules, RulesError};
use crate::state_io;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Why a run ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Outside the extended session and not forced: clean no-op.
    OutsideSession,
    /// No rules and no watch symbols: clean no-op.
    NothingToDo,
    Completed,
}

/// Summary of one invocation, for the CLI and for tests.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub evaluated: usize,
    pub skipped: usize,
    pub alerts: Vec<Alert>,
    pub delivered: usize,
    pub delivery_failures: usize,
    pub recap_finalized: bool,
}

impl RunReport {
    fn no_op(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            evaluated: 0,
            skipped: 0,
            alerts: Vec::new(),
            delivered: 0,
            delivery_failures: 0,
            recap_finalized: false,
        }
    }
}

/// Execute one monitor cycle at the given instant.
///
/// Row-level failures (fetch errors, short history) are contained at the row
/// boundary; only an unreadable rules file surfaces as an error.
pub fn run_once(
    cfg: &MonitorConfig,
    provider: &dyn QuoteProvider,
    sink: &dyn AlertSink,
    now: DateTime<Tz>,
) -> Result<RunReport, RunError> {
    // 1. Session gate.
    if !cfg.force && !calendar::in_extended_session(now) {
        info!(%now, "outside the extended session, nothing to run");
        return Ok(RunReport::no_op(RunOutcome::OutsideSession));
    }

    // 2. Rules + watchlist.
    let mut rules = match load_rules(&cfg.rules_file) {
        Ok(rules) => rules,
        Err(RulesError::Missing(path)) => {
            warn!(path = %path.display(), "no rules file, nothing to do");
            return Ok(RunReport::no_op(RunOutcome::NothingToDo));
        }
        Err(e) => return Err(e.into()),
    };
    merge_watchlist(cfg, &mut rules);
    if rules.is_empty() {
        info!("rules table and watchlist are both empty, nothing to do");
        return Ok(RunReport::no_op(RunOutcome::NothingToDo));
    }

    let today = now.date_naive();
    let mut state = state_io::load_alert_state(&cfg.state_file, today);
    let mut book = state_io::load_recap_book(&cfg.recap_store_file);

    // 3a. Parallel fetch; results stay aligned with the rules slice.
    let snapshots: Vec<Option<PriceSnapshot>> = rules
        .par_iter()
        .map(|rule| match provider.fetch(provider_symbol(&rule.symbol)) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(symbol = %rule.symbol, error = %e, "fetch failed, skipping row");
                None
            }
        })
        .collect();

    // 3b. Sequential evaluate + commit (single-writer over state and book).
    let mut alerts: Vec<(Alert, Option<String>)> = Vec::new();
    let mut evaluated = 0usize;
    let mut skipped = 0usize;
    for (rule, snapshot) in rules.iter().zip(snapshots) {
        let Some(snapshot) = snapshot else {
            skipped += 1;
            continue;
        };
        evaluated += 1;

        let indicators = IndicatorSet::compute(&snapshot);
        let eval = evaluator::evaluate(rule, &snapshot, &indicators);

        // Recap reflects current market data regardless of alert suppression.
        book.upsert(RecapEntry::from_indicators(
            rule.symbol.clone(),
            snapshot.price,
            eval.change_pct,
            eval.rank,
            &indicators,
        ));

        let fresh = state.fresh(&rule.symbol, &eval.triggers);
        if fresh.is_empty() {
            continue;
        }
        info!(
            symbol = %rule.symbol,
            fresh = fresh.len(),
            total = eval.triggers.len(),
            severity = ?eval.severity,
            "triggered"
        );
        state.record(&rule.symbol, &eval.triggers);
        let webhook = rule
            .webhook
            .clone()
            .or_else(|| cfg.default_webhook.clone());
        alerts.push((
            Alert::new(
                rule.symbol.clone(),
                eval.triggers,
                snapshot.price,
                snapshot.prev_close,
                eval.change_pct,
                eval.rank,
                eval.severity,
            ),
            webhook,
        ));
    }

    // 4. Persist state and recap store.
    if let Err(e) = state_io::save_alert_state(&cfg.state_file, &state) {
        error!(error = %e, "failed to persist alert state");
    }
    if let Err(e) = state_io::save_recap_book(&cfg.recap_store_file, &book) {
        error!(error = %e, "failed to persist recap store");
    }

    // 5. Alerts artifact + delivery.
    let mut delivered = 0usize;
    let mut delivery_failures = 0usize;
    if alerts.is_empty() {
        match artifacts::clear_alerts(&cfg.alerts_file) {
            Ok(true) => info!("no alerts, removed stale artifact"),
            Ok(false) => {}
            Err(e) => error!(error = %e, "failed to remove stale alert artifact"),
        }
    } else {
        let alert_records: Vec<Alert> = alerts.iter().map(|(a, _)| a.clone()).collect();
        if let Err(e) = artifacts::write_alerts(&cfg.alerts_file, &alert_records) {
            error!(error = %e, "failed to persist alerts artifact");
        }
        for (alert, webhook) in &alerts {
            let Some(webhook) = webhook else {
                info!(symbol = %alert.symbol, "no webhook configured, local artifact only");
                continue;
            };
            match sink.deliver(webhook, &alert.text) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    delivery_failures += 1;
                    warn!(symbol = %alert.symbol, error = %e, "webhook delivery failed");
                }
            }
        }
    }

    // 6. Post-close recap finalization.
    let mut recap_finalized = false;
    if calendar::in_recap_window(now, cfg.recap_window_minutes) && !book.is_empty() {
        match artifacts::write_recap(
            &cfg.recap_html_file,
            &cfg.recap_json_file,
            &cfg.recap_ready_file,
            &book,
            today,
        ) {
            Ok(()) => {
                recap_finalized = true;
                info!(symbols = book.len(), "recap finalized");
                if let Err(e) = state_io::remove_if_exists(&cfg.recap_store_file) {
                    error!(error = %e, "failed to clear recap store");
                }
            }
            Err(e) => error!(error = %e, "failed to write recap artifacts"),
        }
    }

    info!(
        evaluated,
        skipped,
        alerts = alerts.len(),
        recap_finalized,
        "run complete"
    );
    Ok(RunReport {
        outcome: RunOutcome::Completed,
        evaluated,
        skipped,
        alerts: alerts.into_iter().map(|(a, _)| a).collect(),
        delivered,
        delivery_failures,
        recap_finalized,
    })
}

/// Merge config + file watch symbols into the rule list as synthetic
/// percent-change rows.
fn merge_watchlist(cfg: &MonitorConfig, rules: &mut Vec<Rule>) {
    let mut extra: Vec<String> = cfg.watch_symbols.clone();
    if let Some(path) = &cfg.watch_file {
        match std::fs::read_to_string(path) {
            Ok(contents) => extra.extend(watchlist::parse_file(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "watch file not found, ignoring");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "unreadable watch file, ignoring"),
        }
    }
    watchlist::merge_into_rules(rules, &extra, cfg.default_pct_up, cfg.default_pct_down);
}
