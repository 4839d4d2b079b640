//! Stock analysis summary prompt

use super::Prompt;
use crate::error::Result;
use crate::model::{HistoricalSeries, QuoteSnapshot};
use crate::presentation::format::{format_change, format_market_cap, format_price, format_ratio};
use minijinja::context;
use serde::Serialize;

const DEFAULT_QUESTION: &str = "Provide a summary of this stock.";

const SUMMARY: Prompt = Prompt::new(
    "summary",
    "{{ ticker }} Stock Analysis

Question: {{ question }}

Current Data:
- Price: {{ price }}
- P/E Ratio: {{ pe_ratio }}
- Market Cap: {{ market_cap }}
- Sector: {{ sector }}
- Industry: {{ industry }}
{% if performance %}
Historical Performance ({{ performance.period }}): {{ performance.first }} → {{ performance.last }} ({{ performance.change }})
{% endif %}
Please provide a comprehensive and detailed analysis addressing the user's question. Include:
1. Direct answer to their question
2. Key metrics analysis and what they mean
3. Historical trend analysis if data is available
4. Market position and competitive context
5. Risk and opportunity assessment
6. Investment perspective (if relevant)

Be thorough, informative, and use specific data points to support your analysis.",
);

#[derive(Serialize)]
struct Performance {
    period: String,
    first: String,
    last: String,
    change: String,
}

impl Performance {
    fn from_series(series: &HistoricalSeries) -> Option<Self> {
        let change = series.change_percent()?;
        Some(Self {
            period: series.period.to_string(),
            first: format_price(series.first_close()?),
            last: format_price(series.last_close()?),
            change: format_change(change),
        })
    }
}

/// Prompt asking for an analysis of `quote` (and `history`, when usable)
pub fn summary_prompt(
    ticker: &str,
    quote: &QuoteSnapshot,
    history: Option<&HistoricalSeries>,
    question: Option<&str>,
) -> Result<String> {
    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUESTION);

    SUMMARY.render(context! {
        ticker => ticker,
        question => question,
        price => format_price(quote.price),
        pe_ratio => format_ratio(&quote.pe_ratio),
        market_cap => format_market_cap(&quote.market_cap),
        sector => &quote.sector,
        industry => &quote.industry,
        performance => history.and_then(Performance::from_series),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interval, Period, PricePoint, Reported};

    fn quote() -> QuoteSnapshot {
        QuoteSnapshot {
            ticker: "AAPL".into(),
            price: 189.5,
            currency: "USD".into(),
            market_cap: Reported::Value(2_950_000_000_000),
            pe_ratio: Reported::Value(29.4),
            name: "Apple Inc.".into(),
            sector: "Technology".into(),
            industry: "Consumer Electronics".into(),
            description: "N/A".into(),
        }
    }

    fn series(closes: &[f64]) -> HistoricalSeries {
        HistoricalSeries {
            ticker: "AAPL".into(),
            period: Period::ThreeMonths,
            interval: Interval::Daily,
            row_count: closes.len(),
            points: closes
                .iter()
                .map(|&close| PricePoint {
                    date: "2024-03-01".into(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 10,
                })
                .collect(),
        }
    }

    #[test]
    fn test_summary_without_history() {
        let prompt = summary_prompt("AAPL", &quote(), None, None).unwrap();

        assert!(
            prompt.starts_with("AAPL Stock Analysis\n\nQuestion: Provide a summary of this stock.\n")
        );
        assert!(prompt.contains("- Price: $189.50\n"));
        assert!(prompt.contains("- P/E Ratio: 29.40\n"));
        assert!(prompt.contains("- Market Cap: $2950.0B\n"));
        assert!(prompt.contains("- Industry: Consumer Electronics\n\nPlease provide"));
        assert!(!prompt.contains("Historical Performance"));
        assert!(prompt.contains("6. Investment perspective (if relevant)"));
        assert!(prompt.ends_with("use specific data points to support your analysis."));
    }

    #[test]
    fn test_summary_with_history() {
        let history = series(&[100.0, 110.0, 105.0]);
        let prompt =
            summary_prompt("AAPL", &quote(), Some(&history), Some("Is it a buy?")).unwrap();

        assert!(prompt.contains("Question: Is it a buy?\n"));
        assert!(prompt.contains(
            "- Industry: Consumer Electronics\n\nHistorical Performance (3mo): $100.00 → $105.00 (+5.0%)\n\nPlease provide"
        ));
    }

    #[test]
    fn test_summary_skips_unusable_history() {
        let history = series(&[0.0, 105.0]);
        let prompt = summary_prompt("AAPL", &quote(), Some(&history), None).unwrap();
        assert!(!prompt.contains("Historical Performance"));

        let empty = series(&[]);
        let prompt = summary_prompt("AAPL", &quote(), Some(&empty), None).unwrap();
        assert!(!prompt.contains("Historical Performance"));
    }

    #[test]
    fn test_summary_with_missing_metrics() {
        let mut quote = quote();
        quote.pe_ratio = Reported::NotAvailable;
        quote.market_cap = Reported::NotAvailable;
        quote.sector = "N/A".into();

        let prompt = summary_prompt("AAPL", &quote, None, Some("  ")).unwrap();
        assert!(prompt.contains("- P/E Ratio: N/A\n- Market Cap: N/A\n- Sector: N/A\n"));
        assert!(prompt.contains("Question: Provide a summary of this stock."));
    }
}
