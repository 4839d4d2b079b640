//! The seam between components and a hosted model

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A chat-completion backend
///
/// Components hold an `Arc<dyn LLMProvider>` so the hosted model can be
/// swapped for a fake in tests.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Run one completion; only the first choice is returned
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider identifier used in logs, e.g. `"openai"`
    fn name(&self) -> &'static str;
}
