//! TickerWatch CLI — run the monitor, inspect the session, force a recap.
//!
//! Commands:
//! - `run` — execute one monitor cycle (gate, fetch, evaluate, alert, recap)
//! - `session` — print the market session state for now or a given instant
//! - `recap` — render the recap from the accumulated store on demand

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tickerwatch_core::calendar::{self, MARKET_TZ};
use tickerwatch_core::data::{CsvProvider, ProviderChain, QuoteProvider, YahooProvider};
use tickerwatch_runner::delivery::WebhookClient;
use tickerwatch_runner::{artifacts, run_once, state_io, MonitorConfig, RunOutcome};

#[derive(Parser)]
#[command(
    name = "tickerwatch",
    about = "TickerWatch — rule-based market alerts with an end-of-day recap"
)]
struct Cli {
    /// Path to the monitor config TOML. Defaults apply without one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one monitor cycle.
    Run {
        /// Run even outside the extended trading session.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Use only the local CSV provider; no network.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Evaluate as if at this RFC3339 instant instead of now.
        #[arg(long)]
        at: Option<String>,
    },
    /// Print the market session state.
    Session {
        /// Inspect this RFC3339 instant instead of now.
        #[arg(long)]
        at: Option<String>,
    },
    /// Render the recap from the accumulated store without waiting for the
    /// close window.
    Recap {
        /// Also clear the recap store afterwards.
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut cfg = MonitorConfig::load(cli.config.as_deref())?;
    cfg.apply_env();

    match cli.command {
        Commands::Run { force, offline, at } => {
            cfg.force |= force;
            cfg.offline |= offline;
            cmd_run(&cfg, at)
        }
        Commands::Session { at } => cmd_session(at),
        Commands::Recap { clear } => cmd_recap(&cfg, clear),
    }
}

/// Parse an RFC3339 override or take the current exchange-local time. A
/// zone-less instant is a usage error, rejected by the parser.
fn instant(at: Option<String>) -> Result<chrono::DateTime<chrono_tz::Tz>> {
    match at {
        Some(raw) => {
            let parsed: DateTime<chrono::FixedOffset> = DateTime::parse_from_rfc3339(&raw)
                .with_context(|| format!("'{raw}' is not a zone-aware RFC3339 timestamp"))?;
            Ok(parsed.with_timezone(&MARKET_TZ))
        }
        None => Ok(calendar::now_eastern()),
    }
}

fn build_provider(cfg: &MonitorConfig) -> ProviderChain {
    let timeout = Duration::from_secs(cfg.fetch_timeout_secs);
    let mut providers: Vec<Box<dyn QuoteProvider>> = Vec::new();
    if !cfg.offline {
        providers.push(Box::new(YahooProvider::new(timeout)));
    }
    if let Some(dir) = &cfg.history_dir {
        providers.push(Box::new(CsvProvider::new(dir)));
    }
    if providers.is_empty() {
        warn!("offline mode without history_dir: every fetch will fail");
    }
    ProviderChain::new(providers)
}

fn cmd_run(cfg: &MonitorConfig, at: Option<String>) -> Result<()> {
    let now = instant(at)?;
    let provider = build_provider(cfg);
    let sink = WebhookClient::new(Duration::from_secs(cfg.fetch_timeout_secs));

    let report = run_once(cfg, &provider, &sink, now)?;

    match report.outcome {
        RunOutcome::OutsideSession => println!("Outside the extended session; nothing to do."),
        RunOutcome::NothingToDo => println!("No rules to evaluate; nothing to do."),
        RunOutcome::Completed => {
            for alert in &report.alerts {
                println!("{}", alert.text);
            }
            println!(
                "Evaluated {} row(s), skipped {}, {} alert(s), {} delivered ({} failed).",
                report.evaluated,
                report.skipped,
                report.alerts.len(),
                report.delivered,
                report.delivery_failures
            );
            if report.recap_finalized {
                println!("Recap finalized: {}", cfg.recap_html_file.display());
            }
        }
    }
    Ok(())
}

fn cmd_session(at: Option<String>) -> Result<()> {
    let now = instant(at)?;
    let date = now.date_naive();

    println!("Instant:       {}", now.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Trading day:   {}", calendar::is_trading_day(date));
    if let Some(name) = calendar::holiday_name(date) {
        println!("Calendar note: {name}");
    }
    if calendar::is_trading_day(date) {
        println!("Session close: {}", calendar::session_close(date));
    }
    println!("Pre-market:    {}", calendar::in_pre_market(now));
    println!("Regular:       {}", calendar::in_regular_session(now));
    println!("After-hours:   {}", calendar::in_after_hours(now));
    println!("Extended:      {}", calendar::in_extended_session(now));
    Ok(())
}

fn cmd_recap(cfg: &MonitorConfig, clear: bool) -> Result<()> {
    let book = state_io::load_recap_book(&cfg.recap_store_file);
    if book.is_empty() {
        println!("Recap store is empty; nothing to render.");
        return Ok(());
    }
    let date = calendar::now_eastern().date_naive();
    artifacts::write_recap(
        &cfg.recap_html_file,
        &cfg.recap_json_file,
        &cfg.recap_ready_file,
        &book,
        date,
    )?;
    println!(
        "Recap for {} symbol(s) written to {}",
        book.len(),
        cfg.recap_html_file.display()
    );
    if clear {
        state_io::remove_if_exists(&cfg.recap_store_file)?;
        println!("Recap store cleared.");
    }
    Ok(())
}
