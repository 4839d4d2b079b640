//! Prompt templates for the language model
//!
//! Templates are MiniJinja sources rendered without auto-escaping; user text
//! is inserted verbatim.

mod analysis;
mod extraction;

pub use analysis::summary_prompt;
pub use extraction::{COMPANY_TICKERS, TIME_PHRASES, extraction_prompt, ticker_only_prompt};

use crate::error::Result;
use minijinja::Environment;
use serde::Serialize;

/// A named MiniJinja template
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    name: &'static str,
    source: &'static str,
}

impl Prompt {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render with the given context
    pub fn render<S: Serialize>(&self, ctx: S) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(self.name, self.source)?;
        Ok(env.get_template(self.name)?.render(ctx)?)
    }
}
