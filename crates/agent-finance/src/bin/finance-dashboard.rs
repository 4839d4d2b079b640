//! Web dashboard
//!
//! Renders the query form and reports as HTML. Needs `GROQ_API_KEY` and a
//! running `finance-server`.
//!
//! # Usage
//!
//! ```bash
//! DASHBOARD_PORT=8501 cargo run --bin finance-dashboard -p agent-finance
//! ```

use agent_finance::{DashboardPage, FinanceAssistant, FinanceConfig, HtmlRenderer};
use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use axum::routing::get;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

struct Dashboard {
    assistant: FinanceAssistant,
    renderer: HtmlRenderer,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agent_utils::load_dotenv();
    agent_utils::init_tracing("info,agent_finance=debug");

    let config = FinanceConfig::from_env()?;
    let assistant = FinanceAssistant::from_config(&config)?;

    if let Err(e) = assistant.client().health().await {
        warn!(
            "Dispatch endpoint at {} is not reachable yet: {}",
            assistant.client().base_url(),
            e
        );
    }

    let state = Arc::new(Dashboard {
        assistant,
        renderer: HtmlRenderer::new()?,
    });

    let app = Router::new()
        .route("/", get(index))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.dashboard_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(
    State(dashboard): State<Arc<Dashboard>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();

    let page = if query.is_empty() {
        dashboard.renderer.render(DashboardPage::Empty)
    } else {
        match dashboard.assistant.run(query).await {
            Ok(report) => dashboard.renderer.render(DashboardPage::Report(&report)),
            Err(e) => {
                warn!("Query '{}' failed: {}", query, e);
                dashboard.renderer.render(DashboardPage::Failed { query, error: &e })
            }
        }
    };

    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}
