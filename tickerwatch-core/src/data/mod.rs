//! Quote providers — how the monitor gets prices.
//!
//! The `QuoteProvider` trait abstracts over sources (Yahoo chart API, local
//! CSV files) so the run controller can swap implementations and tests can
//! mock. `ProviderChain` tries an ordered list of strategies until one
//! returns a valid snapshot.

pub mod chain;
pub mod csv_files;
pub mod provider;
pub mod symbols;
pub mod yahoo;

pub use chain::ProviderChain;
pub use csv_files::CsvProvider;
pub use provider::{ProviderError, QuoteProvider};
pub use symbols::provider_symbol;
pub use yahoo::YahooProvider;
