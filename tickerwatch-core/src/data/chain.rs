//! Ordered provider strategies — first valid snapshot wins.
//!
//! Replaces ad hoc nested fallbacks with one explicit chain: each strategy
//! is tried in sequence; a strategy that errors or returns an invalid
//! snapshot is logged and skipped.

use tracing::warn;

use super::provider::{ProviderError, QuoteProvider};
use crate::domain::PriceSnapshot;

pub struct ProviderChain {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }
}

impl QuoteProvider for ProviderChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSnapshot, ProviderError> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.fetch(symbol) {
                Ok(snapshot) if snapshot.is_valid() => return Ok(snapshot),
                Ok(snapshot) => {
                    warn!(
                        provider = provider.name(),
                        symbol, "provider returned an invalid snapshot, trying next"
                    );
                    last_error = Some(ProviderError::InvalidQuote {
                        symbol: symbol.to_string(),
                        reason: format!(
                            "price={} prev_close={}",
                            snapshot.price, snapshot.prev_close
                        ),
                    });
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        symbol, error = %e, "provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or(ProviderError::Exhausted {
            symbol: symbol.to_string(),
        }))
    }
}
