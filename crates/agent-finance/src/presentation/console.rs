//! Console output for the CLI

use super::ReportRenderer;
use super::format::{format_market_cap, format_money, format_price, format_ratio, group_thousands};
use crate::assistant::{Interpretation, Report};
use crate::error::{FinanceError, Result};
use crate::model::{ExtractionResult, HistoricalSeries, QuoteSnapshot};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;

const TICKER_HINT: &str =
    "Try asking for a specific stock, e.g., 'Show me Apple stock' or just provide the ticker (e.g., 'AAPL')";

/// Plain-text renderer; `show_data` adds quote and history tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer {
    show_data: bool,
}

impl ConsoleRenderer {
    pub fn new(show_data: bool) -> Self {
        Self { show_data }
    }

    /// The `✓ Extracted ...` lines
    pub fn render_interpretation(&self, interpretation: &Interpretation) -> String {
        extraction_lines(&interpretation.ticker, &interpretation.extraction)
    }

    /// Everything printed after the data has been fetched
    pub fn render_body(&self, report: &Report) -> String {
        let mut out = String::from("\n✓ Financial data retrieved successfully.\n\n");

        if self.show_data {
            out.push_str(&format!("{}\n\n", quote_table(&report.quote)));
            if let Some(history) = &report.history {
                out.push_str(&format!(
                    "Price history ({}, {} of {} rows):\n",
                    history.period,
                    history.points.len(),
                    history.row_count
                ));
                out.push_str(&format!("{}\n\n", history_table(history)));
            }
        }

        if let Some(summary) = &report.summary {
            out.push_str(&format!("📊 Analysis:\n\n{summary}\n"));
        }

        out
    }
}

impl ReportRenderer for ConsoleRenderer {
    fn render_report(&self, report: &Report) -> Result<String> {
        Ok(format!(
            "{}{}",
            extraction_lines(&report.ticker, &report.extraction),
            self.render_body(report)
        ))
    }

    fn render_error(&self, error: &FinanceError) -> String {
        match error {
            FinanceError::NoTicker => format!("❌ Error: {error}\n{TICKER_HINT}"),
            _ => format!("❌ Error: {error}"),
        }
    }
}

fn extraction_lines(ticker: &str, extraction: &ExtractionResult) -> String {
    let mut out = format!("✓ Extracted ticker: {ticker}\n");
    if let Some(timeframe) = extraction.timeframe {
        out.push_str(&format!("✓ Extracted timeframe: {timeframe}\n"));
    }
    out
}

fn quote_table(quote: &QuoteSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec!["Name".to_string(), quote.display_name().to_string()]);
    table.add_row(vec![
        "Price".to_string(),
        format!("{} {}", format_price(quote.price), quote.currency),
    ]);
    table.add_row(vec!["Market Cap".to_string(), format_market_cap(&quote.market_cap)]);
    table.add_row(vec!["P/E Ratio".to_string(), format_ratio(&quote.pe_ratio)]);
    table.add_row(vec!["Sector".to_string(), quote.sector.clone()]);
    table.add_row(vec!["Industry".to_string(), quote.industry.clone()]);
    table
}

fn history_table(history: &HistoricalSeries) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Open", "High", "Low", "Close", "Volume"]);

    for point in &history.points {
        table.add_row(vec![
            point.date.clone(),
            format_money(point.open),
            format_money(point.high),
            format_money(point.low),
            format_money(point.close),
            group_thousands(point.volume),
        ]);
    }
    table
}
