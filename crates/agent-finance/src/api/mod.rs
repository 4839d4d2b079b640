//! Upstream market-data provider
//!
//! Only the dispatch endpoint talks to the provider. The raw shapes here are
//! reshaped into [`crate::model`] types by the dispatch tools.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::model::{Interval, Period};
use async_trait::async_trait;

/// Quote fields as reported by the provider, before defaults are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamQuote {
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub currency: Option<String>,
    pub market_cap: Option<u64>,
    pub trailing_pe: Option<f64>,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub long_business_summary: Option<String>,
}

/// One OHLCV bar as reported by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Source of quotes and price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch current quote and profile fields for `ticker`
    async fn quote(&self, ticker: &str) -> Result<UpstreamQuote>;

    /// Fetch bars for `ticker` covering `period` at `interval`
    ///
    /// An unknown ticker or empty range yields an empty vector, not an error.
    async fn history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>>;
}
