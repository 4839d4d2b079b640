//! Natural-language query interpretation
//!
//! The model is asked for a single `TICKER,TIMEFRAME` line which is then
//! parsed permissively: only the first line and the first two comma-separated
//! fields are looked at. Model failures never propagate; they degrade to an
//! empty [`ExtractionResult`].

use crate::error::Result;
use crate::model::{ExtractionResult, Period};
use crate::prompts::{extraction_prompt, ticker_only_prompt};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Longest accepted ticker symbol
pub const MAX_TICKER_LEN: usize = 10;

const INVALID_TICKER: &str = "INVALID";
const NO_TIMEFRAME: &str = "none";
const EXTRACTION_MAX_TOKENS: usize = 15;
const TICKER_ONLY_MAX_TOKENS: usize = 10;

/// Extracts a ticker and timeframe from free text via the language model
pub struct QueryInterpreter {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl QueryInterpreter {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Extract `(ticker, timeframe)` from `query`
    #[instrument(skip(self))]
    pub async fn extract(&self, query: &str) -> ExtractionResult {
        match self.ask(extraction_prompt(query), EXTRACTION_MAX_TOKENS).await {
            Some(raw) => {
                debug!("LLM response: {}", raw);
                let result = parse_extraction(&raw);
                debug!(
                    "Extracted ticker: {:?}, timeframe: {:?}",
                    result.ticker, result.timeframe
                );
                result
            }
            None => ExtractionResult::none(),
        }
    }

    /// Extract only a ticker from `query`
    #[instrument(skip(self))]
    pub async fn extract_ticker_only(&self, query: &str) -> Option<String> {
        let raw = self
            .ask(ticker_only_prompt(query), TICKER_ONLY_MAX_TOKENS)
            .await?;
        debug!("LLM response: {}", raw);
        raw.lines().next().and_then(normalize_ticker)
    }

    /// One deterministic completion; any failure is logged and yields `None`
    async fn ask(&self, prompt: Result<String>, max_tokens: usize) -> Option<String> {
        let prompt = match prompt {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Failed to render prompt: {}", e);
                return None;
            }
        };

        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(max_tokens)
            .temperature(0.0)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => Some(response.message.text().trim().to_string()),
            Err(e) => {
                error!("LLM error: {}", e);
                None
            }
        }
    }
}

/// Parse a raw `TICKER,TIMEFRAME` model answer
///
/// A malformed ticker discards the whole answer; `INVALID` and `none` clear
/// their own field only. Timeframes outside the supported set are dropped.
pub fn parse_extraction(raw: &str) -> ExtractionResult {
    let Some(line) = raw.trim().lines().next().map(str::trim) else {
        return ExtractionResult::none();
    };

    let mut parts = line.split(',');
    let (Some(ticker), Some(timeframe)) = (parts.next(), parts.next()) else {
        return ExtractionResult::none();
    };

    let ticker = ticker.trim().to_uppercase();
    if !is_valid_ticker(&ticker) {
        return ExtractionResult::none();
    }

    let timeframe = timeframe.trim().to_lowercase();
    let timeframe = if timeframe == NO_TIMEFRAME {
        None
    } else {
        match timeframe.parse::<Period>() {
            Ok(period) => Some(period),
            Err(_) => {
                debug!("Ignoring unsupported timeframe '{}'", timeframe);
                None
            }
        }
    };

    ExtractionResult {
        ticker: (ticker != INVALID_TICKER).then_some(ticker),
        timeframe,
    }
}

/// Uppercase and validate a bare ticker answer; `INVALID` yields `None`
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    (is_valid_ticker(&ticker) && ticker != INVALID_TICKER).then_some(ticker)
}

fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker.chars().all(|c| c.is_ascii_alphanumeric())
}
