//! Named operations served by the dispatch endpoint

pub mod history;
pub mod quote;

pub use history::HistoryTool;
pub use quote::QuoteTool;

use crate::api::MarketDataProvider;
use crate::error::{FinanceError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// An operation the dispatch endpoint can run by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the request's `parameters` object
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Name used in `{"name": ...}` of a dispatch request
    fn name(&self) -> &'static str;
}

/// Registry of tools keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the quote and history tools backed by `provider`
    pub fn with_market_tools(provider: Arc<dyn MarketDataProvider>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(QuoteTool::new(Arc::clone(&provider))));
        registry.register(Arc::new(HistoryTool::new(provider)));
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Run the named tool
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| FinanceError::UnknownTool(name.to_string()))?;
        tool.execute(params).await
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Parameters shared by both market tools
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TickerParams {
    #[serde(default)]
    ticker: Option<String>,
    #[serde(default)]
    period: Option<String>,
}

impl TickerParams {
    /// Parse the `parameters` object; `null` counts as empty
    pub(crate) fn parse(params: Value) -> Result<Self> {
        if params.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(params).map_err(|e| FinanceError::InvalidParameter(e.to_string()))
    }

    /// Trimmed, uppercased ticker; missing or blank is an error
    pub(crate) fn ticker(&self) -> Result<String> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
            .ok_or(FinanceError::MissingParameter("ticker"))
    }

    pub(crate) fn period(&self) -> Option<&str> {
        self.period.as_deref()
    }
}
