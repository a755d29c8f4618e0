//! Monitor configuration — built once at process entry, passed by reference.
//!
//! Core logic never reads the environment. The CLI constructs this struct
//! from an optional TOML file plus the two supported environment overrides
//! and hands it down by reference.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickerwatch_core::watchlist;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Everything a run needs to know. Every field has a default, so a partial
/// TOML file (or none at all) works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// The rules table (owned by the rule editor; read-only here).
    pub rules_file: PathBuf,
    /// Per-date dedup state.
    pub state_file: PathBuf,
    /// Accumulated recap entries, cleared after finalization.
    pub recap_store_file: PathBuf,
    /// Alert artifact for downstream delivery.
    pub alerts_file: PathBuf,
    pub recap_html_file: PathBuf,
    pub recap_json_file: PathBuf,
    /// Machine-readable "recap is ready" marker for the orchestrator.
    pub recap_ready_file: PathBuf,

    /// Extra watch symbols beyond the rules table.
    pub watch_symbols: Vec<String>,
    /// Optional line-delimited symbol file, merged like `watch_symbols`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_file: Option<PathBuf>,
    /// Percent thresholds applied to synthetic watchlist rows.
    pub default_pct_up: f64,
    pub default_pct_down: f64,

    /// Fallback webhook for rule rows that carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_webhook: Option<String>,

    pub fetch_timeout_secs: u64,
    /// Minutes after the close during which the recap is finalized.
    pub recap_window_minutes: u32,

    /// Directory of per-symbol OHLC CSV files (fallback provider).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
    /// Use only the local CSV provider; no network.
    pub offline: bool,
    /// Bypass the extended-session gate.
    pub force: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            rules_file: PathBuf::from("rules.csv"),
            state_file: PathBuf::from("alert_state.json"),
            recap_store_file: PathBuf::from("recap_store.json"),
            alerts_file: PathBuf::from("alerts.json"),
            recap_html_file: PathBuf::from("recap.html"),
            recap_json_file: PathBuf::from("recap.json"),
            recap_ready_file: PathBuf::from("recap_ready.json"),
            watch_symbols: Vec::new(),
            watch_file: None,
            default_pct_up: 5.0,
            default_pct_down: 5.0,
            default_webhook: None,
            fetch_timeout_secs: 30,
            recap_window_minutes: 45,
            history_dir: None,
            offline: false,
            force: false,
        }
    }
}

impl MonitorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File config when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Apply the supported environment overrides:
    /// `TICKERWATCH_WEBHOOK` (default webhook) and `TICKERWATCH_WATCH`
    /// (comma-separated extra watch symbols).
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("TICKERWATCH_WEBHOOK").ok(),
            std::env::var("TICKERWATCH_WATCH").ok(),
        );
    }

    fn apply_overrides(&mut self, webhook: Option<String>, watch: Option<String>) {
        if let Some(url) = webhook.filter(|u| !u.trim().is_empty()) {
            self.default_webhook = Some(url);
        }
        if let Some(list) = watch {
            for symbol in watchlist::parse_list(&list) {
                if !self.watch_symbols.contains(&symbol) {
                    self.watch_symbols.push(symbol);
                }
            }
        }
    }
}
