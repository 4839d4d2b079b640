//! Language-model analysis of fetched market data

use crate::model::{HistoricalSeries, QuoteSnapshot};
use crate::prompts::summary_prompt;
use agent_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::{debug, error, instrument};

const SUMMARY_MAX_TOKENS: usize = 800;
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Produces a free-text analysis from a quote and optional history
pub struct AnalysisSummarizer {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl AnalysisSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Ask the model to analyse `quote`, answering `question` when given
    ///
    /// Returns `None` when the model call fails or the answer is blank.
    #[instrument(skip(self, quote, history))]
    pub async fn summarize(
        &self,
        ticker: &str,
        quote: &QuoteSnapshot,
        history: Option<&HistoricalSeries>,
        question: Option<&str>,
    ) -> Option<String> {
        let prompt = match summary_prompt(ticker, quote, history, question) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Failed to render summary prompt: {}", e);
                return None;
            }
        };

        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(SUMMARY_MAX_TOKENS)
            .temperature(SUMMARY_TEMPERATURE)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => {
                debug!("Summary used {} tokens", response.usage.total());
                let text = response.message.text().trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                error!("LLM error: {}", e);
                None
            }
        }
    }
}
