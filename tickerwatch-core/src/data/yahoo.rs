//! Yahoo Finance quote provider.
//!
//! Fetches one year of daily OHLC bars from Yahoo's v8 chart API and derives
//! the snapshot from the tail of the series: the in-progress daily bar
//! supplies the current price and today's low, the bar before it the
//! previous close.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; the CSV provider is the fallback when it misbehaves.

use std::time::Duration;

use serde::Deserialize;

use super::provider::{ProviderError, QuoteProvider};
use crate::domain::{Bar, PriceSnapshot};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

/// Yahoo Finance chart-API provider. One attempt per fetch; the request
/// timeout bounds how long a row can hold up the run.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    fn chart_url(symbol: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?range=1y&interval=1d&includePrePost=false"
        )
    }

    /// Parse the chart API response into ordered daily bars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, ProviderError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    ProviderError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    ProviderError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    ))
                }
            } else {
                ProviderError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| ProviderError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    ProviderError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();

            // Holidays/non-trading days come back as all-None rows
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            bars.push(Bar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
            });
        }

        if bars.is_empty() {
            return Err(ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }
}

/// Derive the snapshot from the tail of an ordered daily history.
///
/// Shared with the CSV provider: last bar = today (price, low), the bar
/// before it = previous close.
pub(crate) fn snapshot_from_bars(
    symbol: &str,
    bars: Vec<Bar>,
) -> Result<PriceSnapshot, ProviderError> {
    if bars.len() < 2 {
        return Err(ProviderError::NoHistory {
            symbol: symbol.to_string(),
        });
    }
    let price = bars[bars.len() - 1].close;
    let today_low = bars[bars.len() - 1].low;
    let prev_close = bars[bars.len() - 2].close;
    let snapshot = PriceSnapshot {
        price,
        prev_close,
        today_low,
        history: bars,
    };
    if !snapshot.is_valid() {
        return Err(ProviderError::InvalidQuote {
            symbol: symbol.to_string(),
            reason: format!(
                "price={} prev_close={}",
                snapshot.price, snapshot.prev_close
            ),
        });
    }
    Ok(snapshot)
}

impl QuoteProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let url = Self::chart_url(symbol);
        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ProviderError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Other(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            ProviderError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, chart)?;
        snapshot_from_bars(symbol, bars)
    }
}
