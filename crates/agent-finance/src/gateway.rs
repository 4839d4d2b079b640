//! Client side of the dispatch endpoint

use crate::error::{FinanceError, Result};
use crate::model::{HistoricalSeries, Period, QuoteSnapshot};
use crate::server::ToolCall;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use tracing::{debug, instrument};
use url::Url;

/// Operations the gateway can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Quote,
    History,
}

impl Operation {
    /// Tool name understood by the dispatch endpoint
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Quote => "fetch_stock_data",
            Self::History => "fetch_historical_data",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// HTTP client for the dispatch endpoint
///
/// Holds one `reqwest::Client`; create it once per process and share it.
#[derive(Debug, Clone)]
pub struct FinanceClient {
    http: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    error: Option<String>,
}

impl FinanceClient {
    /// Create a client for the dispatch endpoint at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing HTTP client
    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    /// Base URL of the dispatch endpoint
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Forward one operation to the dispatch endpoint
    ///
    /// Transport failures and `{"error": ...}` payloads both come back as `Err`.
    #[instrument(skip(self))]
    pub async fn dispatch(
        &self,
        operation: Operation,
        ticker: &str,
        period: Option<Period>,
    ) -> Result<Value> {
        let mut parameters = json!({ "ticker": ticker });
        if let Some(period) = period {
            parameters["period"] = json!(period.code());
        }

        let call = ToolCall {
            name: Some(operation.tool_name().to_string()),
            parameters,
        };

        let response = self
            .http
            .post(self.base.join("tool_call")?)
            .json(&call)
            .send()
            .await?;

        let status = response.status();
        let envelope: Envelope = response.json().await?;
        debug!("Dispatch {} answered {}", operation, status);

        if let Some(message) = envelope.error {
            return Err(FinanceError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(FinanceError::Gateway {
                status: status.as_u16(),
                message: format!("dispatch endpoint returned HTTP {status}"),
            });
        }

        envelope.data.ok_or_else(|| FinanceError::Gateway {
            status: status.as_u16(),
            message: "dispatch response carried no data".to_string(),
        })
    }

    /// Fetch the current quote for `ticker`
    pub async fn fetch_quote(&self, ticker: &str) -> Result<QuoteSnapshot> {
        self.dispatch_as(Operation::Quote, ticker, None).await
    }

    /// Fetch the price history for `ticker` over `period`
    pub async fn fetch_history(&self, ticker: &str, period: Period) -> Result<HistoricalSeries> {
        self.dispatch_as(Operation::History, ticker, Some(period))
            .await
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<()> {
        let response = self.http.get(self.base.join("health")?).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FinanceError::Gateway {
                status: status.as_u16(),
                message: format!("health check returned HTTP {status}"),
            })
        }
    }

    async fn dispatch_as<T: DeserializeOwned>(
        &self,
        operation: Operation,
        ticker: &str,
        period: Option<Period>,
    ) -> Result<T> {
        let data = self.dispatch(operation, ticker, period).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_tool_names() {
        assert_eq!(Operation::Quote.tool_name(), "fetch_stock_data");
        assert_eq!(Operation::History.tool_name(), "fetch_historical_data");
    }

    #[test]
    fn test_base_url_normalised() {
        let client = FinanceClient::new("http://localhost:5001").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5001/");
        assert_eq!(
            client.base_url().join("tool_call").unwrap().as_str(),
            "http://localhost:5001/tool_call"
        );

        let client = FinanceClient::new("http://gateway.local/finance").unwrap();
        assert_eq!(
            client.base_url().join("tool_call").unwrap().as_str(),
            "http://gateway.local/finance/tool_call"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            FinanceClient::new("not a url"),
            Err(FinanceError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        // Nothing listens on the loopback discard port
        let client = FinanceClient::new("http://127.0.0.1:9").unwrap();
        let result = client.fetch_quote("AAPL").await;
        assert!(matches!(result, Err(FinanceError::Network(_))));
        assert!(client.health().await.is_err());
    }
}
