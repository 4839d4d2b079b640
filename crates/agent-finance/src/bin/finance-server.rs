//! Dispatch endpoint server
//!
//! Serves `POST /tool_call` and `GET /health` backed by Yahoo Finance.
//!
//! # Usage
//!
//! ```bash
//! PORT=5001 cargo run --bin finance-server -p agent-finance
//! ```

use agent_finance::server;
use agent_finance::{FinanceConfig, ToolRegistry, YahooFinanceClient};
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_utils::load_dotenv();
    agent_utils::init_tracing("info,agent_finance=debug,tower_http=debug");

    let config = FinanceConfig::from_env()?;

    let provider = Arc::new(YahooFinanceClient::new()?);
    let registry = Arc::new(ToolRegistry::with_market_tools(provider));
    info!("Registered tools: {}", registry.names().join(", "));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    server::serve(listener, registry).await?;
    Ok(())
}
