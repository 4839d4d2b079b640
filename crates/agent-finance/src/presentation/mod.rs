//! Rendering of assistant reports
//!
//! Two renderers share one trait: plain console text for the CLI and an HTML
//! page for the dashboard. Both tolerate every `N/A` or missing field.

pub mod console;
pub mod format;
pub mod html;

pub use console::ConsoleRenderer;
pub use html::{DashboardPage, HtmlRenderer};

use crate::assistant::Report;
use crate::error::{FinanceError, Result};

/// Turns a [`Report`] or a pipeline error into displayable text
pub trait ReportRenderer: Send + Sync {
    /// Render a complete report
    fn render_report(&self, report: &Report) -> Result<String>;

    /// Render a failure of the current request
    fn render_error(&self, error: &FinanceError) -> String;
}
