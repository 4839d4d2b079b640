//! End-to-end query pipeline
//!
//! interpret → fetch quote → fetch history (when a timeframe was asked for)
//! → summarise. Shared by the CLI and the dashboard.

use crate::analysis::AnalysisSummarizer;
use crate::config::FinanceConfig;
use crate::error::{FinanceError, Result};
use crate::gateway::FinanceClient;
use crate::interpreter::QueryInterpreter;
use crate::model::{ExtractionResult, HistoricalSeries, QuoteSnapshot};
use agent_llm::LLMProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Everything gathered for one query
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub query: String,
    pub extraction: ExtractionResult,
    pub ticker: String,
    pub quote: QuoteSnapshot,
    pub history: Option<HistoricalSeries>,
    pub summary: Option<String>,
}

/// A query whose ticker has been resolved
#[derive(Debug, Clone)]
pub struct Interpretation {
    pub query: String,
    pub ticker: String,
    pub extraction: ExtractionResult,
}

/// Runs queries through interpreter, gateway and summarizer
pub struct FinanceAssistant {
    interpreter: QueryInterpreter,
    summarizer: AnalysisSummarizer,
    client: FinanceClient,
}

impl FinanceAssistant {
    pub fn new(
        interpreter: QueryInterpreter,
        summarizer: AnalysisSummarizer,
        client: FinanceClient,
    ) -> Self {
        Self {
            interpreter,
            summarizer,
            client,
        }
    }

    /// Wire up an assistant sharing one model client
    pub fn with_provider(
        provider: Arc<dyn LLMProvider>,
        model: &str,
        client: FinanceClient,
    ) -> Self {
        Self::new(
            QueryInterpreter::new(Arc::clone(&provider), model),
            AnalysisSummarizer::new(provider, model),
            client,
        )
    }

    /// Build from configuration; fails without a model credential
    pub fn from_config(config: &FinanceConfig) -> Result<Self> {
        let provider = config.llm_provider()?;
        let client = FinanceClient::new(&config.server_url)?;
        Ok(Self::with_provider(provider, &config.model, client))
    }

    pub fn client(&self) -> &FinanceClient {
        &self.client
    }

    /// Run the whole pipeline for `query`
    pub async fn run(&self, query: &str) -> Result<Report> {
        let interpretation = self.interpret(query).await?;
        self.complete(interpretation).await
    }

    /// Resolve the ticker and timeframe of `query`
    #[instrument(skip(self))]
    pub async fn interpret(&self, query: &str) -> Result<Interpretation> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FinanceError::EmptyQuery);
        }

        let extraction = self.interpreter.extract(query).await;
        let ticker = extraction.ticker.clone().ok_or(FinanceError::NoTicker)?;
        info!("Resolved '{}' to {} ({:?})", query, ticker, extraction.timeframe);

        Ok(Interpretation {
            query: query.to_string(),
            ticker,
            extraction,
        })
    }

    /// Fetch data and summary for an interpreted query
    ///
    /// A failed quote aborts; a failed history fetch only drops the history.
    #[instrument(skip(self, interpretation), fields(ticker = %interpretation.ticker))]
    pub async fn complete(&self, interpretation: Interpretation) -> Result<Report> {
        let Interpretation {
            query,
            ticker,
            extraction,
        } = interpretation;

        let quote = self.client.fetch_quote(&ticker).await?;

        let history = match extraction.timeframe {
            Some(period) => match self.client.fetch_history(&ticker, period).await {
                Ok(series) => Some(series),
                Err(e) => {
                    warn!("Continuing without history for {}: {}", ticker, e);
                    None
                }
            },
            None => None,
        };

        let summary = self
            .summarizer
            .summarize(&ticker, &quote, history.as_ref(), Some(&query))
            .await;

        Ok(Report {
            query,
            extraction,
            ticker,
            quote,
            history,
            summary,
        })
    }
}
