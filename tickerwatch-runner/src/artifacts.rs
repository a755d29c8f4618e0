//! Run artifacts — the alerts list, the recap document, the ready marker.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tickerwatch_core::domain::Alert;
use tickerwatch_core::recap::{RecapBook, RecapEntry};

use crate::state_io::{remove_if_exists, save_json, StorageError};

/// Structured recap, written alongside the HTML rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapDocument {
    pub date: NaiveDate,
    pub entries: Vec<RecapEntry>,
    pub summary: Vec<String>,
}

impl RecapDocument {
    pub fn from_book(book: &RecapBook, date: NaiveDate) -> Self {
        Self {
            date,
            entries: book.sorted_entries().into_iter().cloned().collect(),
            summary: book.summary_lines(),
        }
    }
}

/// Marker consumed by the orchestrating scheduler once the recap is final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapReady {
    pub date: NaiveDate,
    pub html: String,
    pub json: String,
}

/// Persist the alert list for downstream delivery.
pub fn write_alerts(path: &Path, alerts: &[Alert]) -> Result<(), StorageError> {
    save_json(path, &alerts)
}

/// Remove a stale alert artifact from a previous run, if any.
pub fn clear_alerts(path: &Path) -> Result<bool, StorageError> {
    remove_if_exists(path)
}

/// Write the recap HTML + JSON and the ready marker.
pub fn write_recap(
    html_path: &Path,
    json_path: &Path,
    ready_path: &Path,
    book: &RecapBook,
    date: NaiveDate,
) -> Result<(), StorageError> {
    let html = render_recap_html(book, date);
    std::fs::write(html_path, html).map_err(|source| StorageError::Write {
        path: html_path.to_path_buf(),
        source,
    })?;

    save_json(json_path, &RecapDocument::from_book(book, date))?;
    save_json(
        ready_path,
        &RecapReady {
            date,
            html: html_path.display().to_string(),
            json: json_path.display().to_string(),
        },
    )
}

/// Render the recap as a single-page HTML table, best rank first.
pub fn render_recap_html(book: &RecapBook, date: NaiveDate) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Market recap {date}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em; }}\n\
         table {{ border-collapse: collapse; }}\n\
         th, td {{ border: 1px solid #ccc; padding: 4px 10px; text-align: right; }}\n\
         th:first-child, td:first-child {{ text-align: left; }}\n\
         .down {{ color: #b00020; }}\n\
         .up {{ color: #1b5e20; }}\n\
         </style>\n</head>\n<body>\n\
         <h1>Market recap — {date}</h1>\n\
         <table>\n\
         <tr><th>Symbol</th><th>Rank</th><th>Price</th><th>Change</th>\
         <th>RSI</th><th>SMA50</th><th>SMA200</th><th>Signals</th></tr>\n"
    );

    for entry in book.sorted_entries() {
        let class = if entry.change_pct < 0.0 { "down" } else { "up" };
        html.push_str(&format!(
            "<tr><td>{symbol}</td><td>{rank}</td><td>{price:.2}</td>\
             <td class=\"{class}\">{change:+.2}%</td><td>{rsi:.1}</td>\
             <td>{sma50:.2}</td><td>{sma200:.2}</td><td>{signals}</td></tr>\n",
            symbol = entry.symbol,
            rank = entry.rank,
            price = entry.price,
            change = entry.change_pct,
            rsi = entry.rsi,
            sma50 = entry.sma50,
            sma200 = entry.sma200,
            signals = entry.flag_labels().join(", "),
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
