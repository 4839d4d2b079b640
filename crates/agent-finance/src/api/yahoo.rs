//! Yahoo Finance API client
//!
//! Price history goes through `yahoo_finance_api`. Quote and profile fields
//! come from the `quoteSummary` endpoint, which needs a session cookie plus a
//! crumb token obtained once per process.

use super::{Bar, MarketDataProvider, UpstreamQuote};
use crate::error::{FinanceError, Result};
use crate::model::{Interval, Period};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;
use yahoo_finance_api as yahoo;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary/";
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData,assetProfile";
const REFERER: &str = "https://finance.yahoo.com/";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    http: Client,
    connector: yahoo::YahooConnector,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let connector =
            yahoo::YahooConnector::new().map_err(|e| FinanceError::Upstream(e.to_string()))?;

        Ok(Self {
            http,
            connector,
            crumb: Mutex::new(None),
        })
    }

    /// Current crumb, fetching one on first use
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<String> {
        // The cookie response status is irrelevant; only the jar matters
        self.http
            .get(COOKIE_URL)
            .header("referer", REFERER)
            .send()
            .await?;

        let response = self
            .http
            .get(CRUMB_URL)
            .header("referer", REFERER)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let crumb = body.trim();

        if !status.is_success()
            || crumb.is_empty()
            || crumb.len() > 100
            || crumb.contains(['<', ' '])
        {
            return Err(FinanceError::Upstream(format!(
                "could not obtain Yahoo crumb (HTTP {status})"
            )));
        }

        debug!("Obtained Yahoo crumb");
        Ok(crumb.to_string())
    }

    fn summary_url(ticker: &str) -> Result<Url> {
        let mut url = Url::parse(QUOTE_SUMMARY_URL)?;
        url.path_segments_mut()
            .map_err(|()| FinanceError::Config("quote endpoint cannot be a base".to_string()))?
            .pop_if_empty()
            .push(ticker);
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    #[instrument(skip(self))]
    async fn quote(&self, ticker: &str) -> Result<UpstreamQuote> {
        let crumb = self.crumb().await?;

        let response = self
            .http
            .get(Self::summary_url(ticker)?)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .header("referer", REFERER)
            .send()
            .await?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            // Stale session; the next request starts a fresh one
            warn!("Yahoo rejected the session ({status}), dropping crumb");
            *self.crumb.lock().await = None;
        }

        let body = response.text().await?;
        parse_quote_summary(&body)
    }

    #[instrument(skip(self))]
    async fn history(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>> {
        let response = self
            .connector
            .get_quote_range(ticker, interval.code(), period.code())
            .await
            .map_err(|e| FinanceError::Upstream(e.to_string()))?;

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                debug!("No quotes in response for {}: {}", ticker, e);
                return Ok(Vec::new());
            }
        };

        Ok(quotes
            .iter()
            .map(|q| Bar {
                timestamp: q.timestamp as i64,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }
}

/// Extract quote fields from a `quoteSummary` response body
pub(crate) fn parse_quote_summary(body: &str) -> Result<UpstreamQuote> {
    let envelope: SummaryEnvelope = serde_json::from_str(body)?;
    let summary = envelope.quote_summary;

    if let Some(error) = summary.error {
        return Err(FinanceError::Upstream(
            error
                .description
                .or(error.code)
                .unwrap_or_else(|| "quote lookup failed".to_string()),
        ));
    }

    let result = summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FinanceError::Upstream("no quote data returned".to_string()))?;

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let profile = result.asset_profile.unwrap_or_default();

    let market_cap = RawValue::get(price.market_cap)
        .or_else(|| RawValue::get(detail.market_cap))
        .filter(|cap| *cap > 0.0)
        .map(|cap| cap as u64);

    Ok(UpstreamQuote {
        current_price: RawValue::get(financial.current_price),
        regular_market_price: RawValue::get(price.regular_market_price),
        currency: price.currency.or(detail.currency),
        market_cap,
        trailing_pe: RawValue::get(detail.trailing_pe),
        long_name: price.long_name,
        sector: profile.sector,
        industry: profile.industry,
        long_business_summary: profile.long_business_summary,
    })
}

// quoteSummary wire format

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetailModule>,
    financial_data: Option<FinancialDataModule>,
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    regular_market_price: Option<RawValue>,
    currency: Option<String>,
    long_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    market_cap: Option<RawValue>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    current_price: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfileModule {
    sector: Option<String>,
    industry: Option<String>,
    long_business_summary: Option<String>,
}

/// Numeric field wrapped as `{"raw": 1.0, "fmt": "1.00"}`; missing values are `{}`
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn get(value: Option<Self>) -> Option<f64> {
        value.and_then(|v| v.raw).filter(|v| v.is_finite())
    }
}
