//! Natural-language stock query assistant
//!
//! This crate answers questions such as "How has Tesla done over the past
//! year?" in four steps:
//!
//! - A language model turns the query into a ticker and an optional timeframe
//! - Quote and price history are fetched through the dispatch endpoint
//!   (`POST /tool_call`), which wraps Yahoo Finance
//! - The model writes a short analysis of the fetched data
//! - The result is rendered for the console or the web dashboard
//!
//! # Architecture
//!
//! - [`server`]: axum router exposing the [`tools`] registry over HTTP
//! - [`gateway`]: typed client for that router
//! - [`interpreter`] and [`analysis`]: the two model-backed steps
//! - [`assistant`]: the pipeline tying them together
//! - [`presentation`]: console and HTML renderers
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_finance::{FinanceAssistant, FinanceConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     agent_utils::load_dotenv();
//!     let config = FinanceConfig::from_env()?;
//!     let assistant = FinanceAssistant::from_config(&config)?;
//!
//!     let report = assistant.run("Show me Apple over the past 6 months").await?;
//!     println!("{}", report.summary.unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interpreter;
pub mod model;
pub mod presentation;
pub mod prompts;
pub mod server;
pub mod tools;

// Re-export main types for convenience
pub use analysis::AnalysisSummarizer;
pub use api::{MarketDataProvider, YahooFinanceClient};
pub use assistant::{FinanceAssistant, Interpretation, Report};
pub use config::FinanceConfig;
pub use error::{FinanceError, Result};
pub use gateway::{FinanceClient, Operation};
pub use interpreter::QueryInterpreter;
pub use model::{
    ExtractionResult, HistoricalSeries, Interval, Period, PricePoint, QuoteSnapshot, Reported,
};
pub use presentation::{ConsoleRenderer, DashboardPage, HtmlRenderer, ReportRenderer};
pub use tools::{Tool, ToolRegistry};
