//! HTTP dispatch endpoint
//!
//! `POST /tool_call` runs a registered tool by name and answers `{"data": ...}`
//! or `{"error": "..."}`; `GET /health` answers `{"status": "ok"}`.

use crate::error::{FinanceError, Result};
use crate::tools::ToolRegistry;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Body of a dispatch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Value,
}

impl IntoResponse for FinanceError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the dispatch router
pub fn router(registry: Arc<ToolRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tool_call", post(tool_call))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

/// Serve the dispatch router on `listener` until the process exits
pub async fn serve(listener: TcpListener, registry: Arc<ToolRegistry>) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| FinanceError::Config(e.to_string()))?;
    info!("Dispatch endpoint listening on http://{}", addr);

    axum::serve(listener, router(registry))
        .await
        .map_err(|e| FinanceError::Config(format!("server error: {e}")))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn tool_call(
    State(registry): State<Arc<ToolRegistry>>,
    payload: std::result::Result<Json<ToolCall>, JsonRejection>,
) -> Response {
    let call = match payload {
        Ok(Json(call)) => call,
        Err(rejection) => {
            warn!("Rejected dispatch request: {}", rejection.body_text());
            return FinanceError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    let name = call.name.unwrap_or_default();
    debug!("Tool name: {}, parameters: {}", name, call.parameters);

    match registry.call(&name, call.parameters).await {
        Ok(data) => Json(json!({ "data": data })).into_response(),
        Err(e) => {
            if matches!(e, FinanceError::UnknownTool(_)) {
                warn!("Unknown tool name: {}", name);
            }
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMarketDataProvider, UpstreamQuote};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app(provider: MockMarketDataProvider) -> Router {
        router(Arc::new(ToolRegistry::with_market_tools(Arc::new(provider))))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/tool_call")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(MockMarketDataProvider::new()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_quote_call() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_quote().times(1).returning(|_| {
            Ok(UpstreamQuote {
                regular_market_price: Some(150.2),
                ..Default::default()
            })
        });

        let request = post_json(r#"{"name":"fetch_stock_data","parameters":{"ticker":"AAPL"}}"#);
        let (status, body) = send(app(provider), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ticker"], json!("AAPL"));
        assert_eq!(body["data"]["price"], json!(150.2));
    }

    #[tokio::test]
    async fn test_missing_ticker_is_bad_request() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_quote().times(0);
        provider.expect_history().times(0);
        let app = app(provider);

        for name in ["fetch_stock_data", "fetch_historical_data"] {
            let body = format!(r#"{{"name":"{name}","parameters":{{}}}}"#);
            let (status, body) = send(app.clone(), post_json(&body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "ticker parameter is required"}));
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let request = post_json(r#"{"name":"fetch_financials","parameters":{"ticker":"AAPL"}}"#);
        let (status, body) = send(app(MockMarketDataProvider::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "unknown tool name"}));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, body) = send(app(MockMarketDataProvider::new()), post_json("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid request"}));
    }

    #[tokio::test]
    async fn test_provider_failure_is_server_error() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_history()
            .returning(|_, _, _| Ok(Vec::new()));

        let request = post_json(
            r#"{"name":"fetch_historical_data","parameters":{"ticker":"XYZ","period":"3mo"}}"#,
        );
        let (status, body) = send(app(provider), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("No historical data found for XYZ")
        );
    }
}
