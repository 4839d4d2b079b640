//! Tool for fetching a current quote

use super::{TickerParams, Tool};
use crate::api::{MarketDataProvider, UpstreamQuote};
use crate::error::{FinanceError, Result};
use crate::model::{NOT_AVAILABLE, QuoteSnapshot};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Longest company description kept in a snapshot, in characters
pub const DESCRIPTION_LIMIT: usize = 200;

/// Tool for fetching price, valuation and profile fields of a security
pub struct QuoteTool {
    provider: Arc<dyn MarketDataProvider>,
}

impl QuoteTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and reshape the quote for `ticker`
    pub async fn fetch(&self, ticker: &str) -> Result<QuoteSnapshot> {
        info!("Fetching stock data for {}", ticker);

        let raw = self.provider.quote(ticker).await.map_err(|e| {
            error!("Failed to fetch stock price for {}: {}", ticker, e);
            FinanceError::FetchFailed {
                what: "stock price",
                ticker: ticker.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(reshape_quote(ticker, raw))
    }
}

#[async_trait]
impl Tool for QuoteTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let ticker = TickerParams::parse(params)?.ticker()?;
        let snapshot = self.fetch(&ticker).await?;
        Ok(serde_json::to_value(snapshot)?)
    }

    fn name(&self) -> &'static str {
        "fetch_stock_data"
    }
}

/// Apply defaults to raw provider fields
///
/// Price falls back from the live price to the regular-market price, then 0.
pub fn reshape_quote(ticker: &str, raw: UpstreamQuote) -> QuoteSnapshot {
    let or_na = |value: Option<String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let description = raw
        .long_business_summary
        .filter(|d| !d.trim().is_empty())
        .map_or_else(
            || NOT_AVAILABLE.to_string(),
            |d| d.chars().take(DESCRIPTION_LIMIT).collect(),
        );

    QuoteSnapshot {
        ticker: ticker.to_string(),
        price: raw
            .current_price
            .or(raw.regular_market_price)
            .unwrap_or(0.0),
        currency: raw
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "USD".to_string()),
        market_cap: raw.market_cap.into(),
        pe_ratio: raw.trailing_pe.into(),
        name: or_na(raw.long_name),
        sector: or_na(raw.sector),
        industry: or_na(raw.industry),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::model::Reported;
    use serde_json::json;

    #[test]
    fn test_price_fallback_order() {
        let raw = UpstreamQuote {
            current_price: Some(151.0),
            regular_market_price: Some(150.2),
            ..Default::default()
        };
        assert_eq!(reshape_quote("AAPL", raw).price, 151.0);

        let raw = UpstreamQuote {
            regular_market_price: Some(150.2),
            ..Default::default()
        };
        assert_eq!(reshape_quote("AAPL", raw).price, 150.2);

        assert_eq!(reshape_quote("AAPL", UpstreamQuote::default()).price, 0.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = reshape_quote("XYZ", UpstreamQuote::default());
        assert_eq!(snapshot.ticker, "XYZ");
        assert_eq!(snapshot.currency, "USD");
        assert_eq!(snapshot.market_cap, Reported::NotAvailable);
        assert_eq!(snapshot.pe_ratio, Reported::NotAvailable);
        assert_eq!(snapshot.name, "N/A");
        assert_eq!(snapshot.sector, "N/A");
        assert_eq!(snapshot.industry, "N/A");
        assert_eq!(snapshot.description, "N/A");
    }

    #[test]
    fn test_description_truncated() {
        let raw = UpstreamQuote {
            long_business_summary: Some("é".repeat(500)),
            currency: Some("EUR".into()),
            market_cap: Some(12_000_000),
            trailing_pe: Some(14.2),
            ..Default::default()
        };
        let snapshot = reshape_quote("SAP", raw);
        assert_eq!(snapshot.description.chars().count(), DESCRIPTION_LIMIT);
        assert_eq!(snapshot.currency, "EUR");
        assert_eq!(snapshot.market_cap, Reported::Value(12_000_000));
        assert_eq!(snapshot.pe_ratio, Reported::Value(14.2));
    }

    #[tokio::test]
    async fn test_execute_requires_ticker() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_quote().times(0);

        let tool = QuoteTool::new(Arc::new(provider));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "ticker parameter is required");
    }

    #[tokio::test]
    async fn test_execute_wraps_provider_failure() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_quote()
            .withf(|ticker| ticker == "ZZZZ")
            .times(1)
            .returning(|_| Err(FinanceError::Upstream("Not Found".into())));

        let tool = QuoteTool::new(Arc::new(provider));
        let err = tool.execute(json!({"ticker": "zzzz"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch stock price for ZZZZ: Not Found");
        assert_eq!(err.status_code(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_execute_returns_snapshot_json() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_quote().returning(|_| {
            Ok(UpstreamQuote {
                regular_market_price: Some(150.2),
                long_name: Some("Apple Inc.".into()),
                ..Default::default()
            })
        });

        let tool = QuoteTool::new(Arc::new(provider));
        let value = tool.execute(json!({"ticker": "AAPL"})).await.unwrap();
        assert_eq!(value["price"], json!(150.2));
        assert_eq!(value["name"], json!("Apple Inc."));
        assert_eq!(value["peRatio"], json!("N/A"));
    }
}
