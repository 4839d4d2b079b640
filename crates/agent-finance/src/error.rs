//! Error types for the finance assistant

use agent_llm::LLMError;
use reqwest::StatusCode;
use thiserror::Error;

/// Finance assistant errors
///
/// Shared by the dispatch server (where each variant maps onto an HTTP status)
/// and by the client side (gateway, assistant pipeline).
#[derive(Debug, Error)]
pub enum FinanceError {
    /// A required tool parameter was not supplied
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    /// A tool parameter was supplied but is not acceptable
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The dispatch endpoint does not know the requested tool
    #[error("unknown tool name")]
    UnknownTool(String),

    /// The request body could not be understood
    #[error("invalid request")]
    InvalidRequest(String),

    /// The user query was blank
    #[error("Empty query")]
    EmptyQuery,

    /// The interpreter found no usable ticker in the query
    #[error("Could not extract a valid stock ticker from your query")]
    NoTicker,

    /// The upstream provider returned an empty price series
    #[error("No historical data found for {ticker}")]
    NoData { ticker: String },

    /// The upstream market-data provider failed
    #[error("{0}")]
    Upstream(String),

    /// An operation against the provider failed, with the ticker for context
    #[error("Failed to fetch {what} for {ticker}: {reason}")]
    FetchFailed {
        what: &'static str,
        ticker: String,
        reason: String,
    },

    /// The dispatch endpoint answered with an error payload
    #[error("{message}")]
    Gateway { status: u16, message: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Language-model call failed
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for finance operations
pub type Result<T> = std::result::Result<T, FinanceError>;

impl FinanceError {
    /// HTTP status the dispatch endpoint answers with for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_)
            | Self::InvalidParameter(_)
            | Self::UnknownTool(_)
            | Self::InvalidRequest(_)
            | Self::EmptyQuery
            | Self::NoTicker => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<agent_utils::EnvError> for FinanceError {
    fn from(err: agent_utils::EnvError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<url::ParseError> for FinanceError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {err}"))
    }
}
