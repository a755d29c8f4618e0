//! TickerWatch Runner — one-shot monitor orchestration.
//!
//! Builds on `tickerwatch-core` to provide:
//! - Typed monitor configuration (TOML file + environment overlay)
//! - Rules CSV loading and watchlist merging
//! - Dedup-state and recap-store persistence
//! - The run controller: gate, fetch, evaluate, persist, emit
//! - Alert artifacts, webhook delivery, post-close recap rendering

pub mod artifacts;
pub mod config;
pub mod delivery;
pub mod rules_io;
pub mod runner;
pub mod state_io;

pub use artifacts::RecapDocument;
pub use config::{ConfigError, MonitorConfig};
pub use delivery::{AlertSink, DeliveryError, WebhookClient};
pub use rules_io::{load_rules, RulesError};
pub use runner::{run_once, RunError, RunOutcome, RunReport};
pub use state_io::StorageError;
