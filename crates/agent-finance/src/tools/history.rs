//! Tool for fetching price history

use super::{TickerParams, Tool};
use crate::api::{Bar, MarketDataProvider};
use crate::error::{FinanceError, Result};
use crate::model::{HistoricalSeries, Period, PricePoint};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Tool for fetching a truncated OHLCV series
pub struct HistoryTool {
    provider: Arc<dyn MarketDataProvider>,
}

impl HistoryTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch and reshape the series for `ticker` over `period`
    pub async fn fetch(&self, ticker: &str, period: Period) -> Result<HistoricalSeries> {
        let interval = period.interval();
        info!(
            "Fetching historical data for {} with period {} ({} interval)",
            ticker, period, interval
        );

        self.provider
            .history(ticker, period, interval)
            .await
            .and_then(|bars| reshape_history(ticker, period, bars))
            .map_err(|e| {
                error!("Failed to fetch historical data for {}: {}", ticker, e);
                FinanceError::FetchFailed {
                    what: "historical data",
                    ticker: ticker.to_string(),
                    reason: e.to_string(),
                }
            })
    }
}

#[async_trait]
impl Tool for HistoryTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params = TickerParams::parse(params)?;
        let ticker = params.ticker()?;
        let period = match params.period() {
            Some(code) => code.to_lowercase().parse()?,
            None => Period::default(),
        };

        let series = self.fetch(&ticker, period).await?;
        Ok(serde_json::to_value(series)?)
    }

    fn name(&self) -> &'static str {
        "fetch_historical_data"
    }
}

/// Sort bars by date, format dates and keep the trailing window for `period`
///
/// An empty input is a "no data" error.
pub fn reshape_history(
    ticker: &str,
    period: Period,
    mut bars: Vec<Bar>,
) -> Result<HistoricalSeries> {
    if bars.is_empty() {
        return Err(FinanceError::NoData {
            ticker: ticker.to_string(),
        });
    }

    bars.sort_by_key(|bar| bar.timestamp);
    let row_count = bars.len();
    let skip = row_count.saturating_sub(period.window());

    let points = bars
        .into_iter()
        .skip(skip)
        .map(|bar| PricePoint {
            date: format_date(bar.timestamp),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })
        .collect();

    Ok(HistoricalSeries {
        ticker: ticker.to_string(),
        period,
        interval: period.interval(),
        row_count,
        points,
    })
}

fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::model::Interval;
    use serde_json::json;

    const DAY: i64 = 86_400;
    // 2024-01-01T00:00:00Z
    const START: i64 = 1_704_067_200;

    fn daily_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    timestamp: START + i as i64 * DAY,
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                    volume: 1_000 + i as u64,
                }
            })
            .collect()
    }

    #[test]
    fn test_one_month_keeps_last_twenty_ascending() {
        let mut bars = daily_bars(400);
        bars.reverse();

        let series = reshape_history("AAPL", Period::OneMonth, bars).unwrap();
        assert_eq!(series.row_count, 400);
        assert_eq!(series.points.len(), 20);
        assert_eq!(series.interval, Interval::Daily);
        assert_eq!(series.points.first().unwrap().close, 480.0);
        assert_eq!(series.points.last().unwrap().close, 499.0);
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_window_per_period() {
        let cases = [
            (Period::ThreeMonths, 40),
            (Period::SixMonths, 100),
            (Period::OneYear, 52),
            (Period::TwoYears, 52),
            (Period::FiveYears, 52),
        ];
        for (period, expected) in cases {
            let series = reshape_history("MSFT", period, daily_bars(300)).unwrap();
            assert_eq!(series.points.len(), expected, "period {period}");
        }
    }

    #[test]
    fn test_short_series_is_kept_whole() {
        let series = reshape_history("NVDA", Period::SixMonths, daily_bars(12)).unwrap();
        assert_eq!(series.row_count, 12);
        assert_eq!(series.points.len(), 12);
    }

    #[test]
    fn test_dates_are_plain_strings() {
        let series = reshape_history("KO", Period::OneMonth, daily_bars(2)).unwrap();
        assert_eq!(series.points[0].date, "2024-01-01");
        assert_eq!(series.points[1].date, "2024-01-02");
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let err = reshape_history("XYZ", Period::OneMonth, Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "No historical data found for XYZ");
    }

    #[tokio::test]
    async fn test_execute_defaults_to_one_month() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .withf(|ticker, period, interval| {
                ticker == "TSLA" && *period == Period::OneMonth && *interval == Interval::Daily
            })
            .times(1)
            .returning(|_, _, _| Ok(daily_bars(30)));

        let tool = HistoryTool::new(Arc::new(provider));
        let value = tool.execute(json!({"ticker": "TSLA"})).await.unwrap();
        assert_eq!(value["period"], json!("1mo"));
        assert_eq!(value["interval"], json!("1d"));
        assert_eq!(value["rowCount"], json!(30));
        assert_eq!(value["points"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_execute_long_period_uses_weekly_interval() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .withf(|_, period, interval| {
                *period == Period::OneYear && *interval == Interval::Weekly
            })
            .times(1)
            .returning(|_, _, _| Ok(daily_bars(53)));

        let tool = HistoryTool::new(Arc::new(provider));
        let value = tool
            .execute(json!({"ticker": "F", "period": "1Y"}))
            .await
            .unwrap();
        assert_eq!(value["interval"], json!("1wk"));
        assert_eq!(value["points"].as_array().unwrap().len(), 52);
    }

    #[tokio::test]
    async fn test_execute_rejects_unknown_period() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_history().times(0);

        let tool = HistoryTool::new(Arc::new(provider));
        let err = tool
            .execute(json!({"ticker": "F", "period": "10y"}))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_execute_empty_series() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|_, _, _| Ok(Vec::new()));

        let tool = HistoryTool::new(Arc::new(provider));
        let err = tool.execute(json!({"ticker": "XYZ"})).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch historical data for XYZ: No historical data found for XYZ"
        );
    }
}
