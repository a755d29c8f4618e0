//! Quote provider trait and structured error types.

use thiserror::Error;

use crate::domain::PriceSnapshot;

/// Structured error types for quote fetches.
///
/// Every variant is a row-level failure: the affected symbol is skipped for
/// the run and the run itself carries on.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("provider timed out: {0}")]
    Timeout(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid quote for {symbol}: {reason}")]
    InvalidQuote { symbol: String, reason: String },

    #[error("no usable history for '{symbol}'")]
    NoHistory { symbol: String },

    #[error("all providers exhausted for {symbol}")]
    Exhausted { symbol: String },

    #[error("provider error: {0}")]
    Other(String),
}

/// Trait for quote providers.
///
/// `symbol` is the provider-facing ticker (index aliases already applied).
/// Implementations perform exactly one attempt per call — retry policy
/// belongs to the external scheduler, not to a run.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the current snapshot plus ≈1 year of daily history.
    fn fetch(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError>;
}
