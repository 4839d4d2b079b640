//! HTML page for the dashboard
//!
//! Templates carry an `.html` name so minijinja escapes every interpolated
//! value, including model output and upstream company text.

use super::ReportRenderer;
use super::format::{format_market_cap, format_money, format_price, format_ratio, group_thousands};
use crate::assistant::Report;
use crate::error::{FinanceError, Result};
use crate::model::{NOT_AVAILABLE, Period, PricePoint};
use minijinja::{Environment, context};
use serde::Serialize;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 240.0;

const PAGE_TEMPLATE: &str = "page.html";
const REPORT_TEMPLATE: &str = "report.html";

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Financial Analysis Dashboard</title>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; background: #0F1419; color: #E8EAED; display: flex; }
  aside { width: 280px; padding: 24px; background: #1A1F26; border-right: 1px solid #2A3139; min-height: 100vh; }
  main { flex: 1; padding: 32px 48px; }
  h1 { color: #1E88E5; margin: 0; }
  .subtitle { color: #9E9E9E; margin-top: 6px; }
  .card { background: #1A1F26; border: 1px solid #2A3139; border-radius: 12px; padding: 20px; }
  .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; margin: 24px 0; }
  .label { color: #9E9E9E; font-size: 0.9em; text-transform: uppercase; letter-spacing: 1px; margin: 0; }
  .value { color: #1E88E5; font-size: 1.6em; font-weight: 700; margin: 10px 0 0 0; }
  .section { color: #1E88E5; border-bottom: 2px solid #2A3139; padding-bottom: 8px; margin-top: 36px; }
  .analysis { white-space: pre-wrap; line-height: 1.6; }
  .error { background: #3B1F1F; border-left: 5px solid #E53935; padding: 14px; border-radius: 8px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { padding: 6px 10px; border-bottom: 1px solid #2A3139; text-align: right; }
  th:first-child, td:first-child { text-align: left; }
  input[type=text] { width: 70%; padding: 10px; border-radius: 8px; border: 1px solid #2A3139; background: #1A1F26; color: #E8EAED; }
  button { padding: 10px 18px; border-radius: 8px; border: 0; background: #1E88E5; color: white; }
</style>
</head>
<body>
<aside>
  <h2>📖 Guide</h2>
  <h4>How to Use:</h4>
  <ol>
    <li>Enter a natural language query about any stock</li>
    <li>Include the company name or ticker symbol</li>
    <li>Optionally specify a time period</li>
  </ol>
  <h4>Example Queries:</h4>
  <ul>
    <li>"How is Apple stock performing?"</li>
    <li>"Show me Tesla's performance over the past year"</li>
    <li>"Tell me about John Deere stock"</li>
  </ul>
  <h4>Supported Timeframes:</h4>
  <ul>
  {%- for tf in timeframes %}
    <li><strong>{{ tf.code }}</strong> - {{ tf.label }}</li>
  {%- endfor %}
  </ul>
</aside>
<main>
  <h1>📈 FinanceHub</h1>
  <p class="subtitle">Intelligent Financial Analysis with AI-Powered Insights</p>
  <form method="get" action="/">
    <input type="text" name="q" value="{{ query }}" placeholder="e.g., 'How is Apple stock performing?' or 'Show me Tesla over the past year'">
    <button type="submit">🔍 Analyze</button>
  </form>
  {%- if error %}
  <p class="error">{{ error }}</p>
  {%- endif %}
  {%- if report %}
  {% include "report.html" %}
  {%- endif %}
</main>
</body>
</html>
"#;

const REPORT: &str = r##"<div class="card" style="margin-top: 24px;">
    <h2 style="color: #1E88E5; margin: 0;">{{ report.name }}</h2>
    <p class="label" style="margin-top: 8px;">{{ report.ticker }}</p>
  </div>
  <div class="metrics">
  {%- for metric in report.metrics %}
    <div class="card"><p class="label">{{ metric.label }}</p><p class="value">{{ metric.value }}</p></div>
  {%- endfor %}
  </div>
  {%- if report.history %}
  <h3 class="section">📊 Price History ({{ report.history.period }})</h3>
  <div class="card">
    <svg viewBox="0 0 {{ chart_width }} {{ chart_height }}" width="100%" height="{{ chart_height }}" preserveAspectRatio="none">
      <polyline fill="none" stroke="#1E88E5" stroke-width="2" points="{{ report.history.chart }}"/>
    </svg>
  </div>
  <details>
    <summary>📋 View Detailed Historical Data</summary>
    <table>
      <tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume</th></tr>
      {%- for row in report.history.rows %}
      <tr><td>{{ row.date }}</td><td>{{ row.open }}</td><td>{{ row.high }}</td><td>{{ row.low }}</td><td>{{ row.close }}</td><td>{{ row.volume }}</td></tr>
      {%- endfor %}
    </table>
  </details>
  {%- endif %}
  {%- if report.summary %}
  <h3 class="section">🤖 AI Analysis</h3>
  <div class="card analysis">{{ report.summary }}</div>
  {%- endif %}
  <h3 class="section">ℹ️ Company Details</h3>
  <div class="metrics" style="grid-template-columns: repeat(3, 1fr);">
    <div class="card"><p class="label">Industry</p><p>{{ report.industry }}</p></div>
    <div class="card"><p class="label">Sector</p><p>{{ report.sector }}</p></div>
    <div class="card"><p class="label">Currency</p><p>{{ report.currency }}</p></div>
  </div>
  {%- if report.description %}
  <div class="card"><p class="label">About</p><p>{{ report.description }}</p></div>
  {%- endif %}"##;

/// What the dashboard shows for one request
#[derive(Debug, Clone, Copy)]
pub enum DashboardPage<'a> {
    /// No query submitted yet
    Empty,
    Report(&'a Report),
    Failed {
        query: &'a str,
        error: &'a FinanceError,
    },
}

/// Renders dashboard pages from compiled templates
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, PAGE)?;
        env.add_template(REPORT_TEMPLATE, REPORT)?;
        Ok(Self { env })
    }

    /// Render a full page
    pub fn render(&self, page: DashboardPage<'_>) -> Result<String> {
        let (query, report, error) = match page {
            DashboardPage::Empty => ("", None, None),
            DashboardPage::Report(report) => (
                report.query.as_str(),
                Some(ReportView::new(report)),
                None,
            ),
            DashboardPage::Failed { query, error } => (query, None, Some(error_message(error))),
        };

        let template = self.env.get_template(PAGE_TEMPLATE)?;
        Ok(template.render(context! {
            query,
            report,
            error,
            timeframes => timeframes(),
            chart_width => CHART_WIDTH,
            chart_height => CHART_HEIGHT,
        })?)
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render_report(&self, report: &Report) -> Result<String> {
        self.render(DashboardPage::Report(report))
    }

    fn render_error(&self, error: &FinanceError) -> String {
        error_message(error)
    }
}

/// Inline error text shown above the results
pub fn error_message(error: &FinanceError) -> String {
    match error {
        FinanceError::NoTicker => {
            "❌ Could not extract a valid stock ticker from your query. Try being more specific!"
                .to_string()
        }
        _ => format!("❌ Error: {error}"),
    }
}

/// SVG polyline coordinates for the close prices of `points`
///
/// The lowest close sits on the bottom edge and the highest on the top edge;
/// a flat series is drawn through the middle.
pub fn chart_points(points: &[PricePoint], width: f64, height: f64) -> String {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.close), hi.max(p.close))
        });
    let range = max - min;
    let step = if points.len() > 1 {
        width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let mut out = String::new();
    for (i, point) in points.iter().enumerate() {
        let x = if points.len() > 1 { i as f64 * step } else { width / 2.0 };
        let y = if range > 0.0 {
            height - (point.close - min) / range * height
        } else {
            height / 2.0
        };
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{x:.1},{y:.1}"));
    }
    out
}

fn period_label(period: Period) -> &'static str {
    match period {
        Period::OneMonth => "Past month",
        Period::ThreeMonths => "Past 3 months",
        Period::SixMonths => "Past 6 months",
        Period::OneYear => "Past year",
        Period::TwoYears => "Past 2 years",
        Period::FiveYears => "Past 5 years",
    }
}

#[derive(Serialize)]
struct TimeframeView {
    code: &'static str,
    label: &'static str,
}

fn timeframes() -> Vec<TimeframeView> {
    Period::ALL
        .iter()
        .map(|p| TimeframeView {
            code: p.code(),
            label: period_label(*p),
        })
        .collect()
}

#[derive(Serialize)]
struct Metric {
    label: &'static str,
    value: String,
}

#[derive(Serialize)]
struct HistoryRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
}

#[derive(Serialize)]
struct HistoryView {
    period: &'static str,
    chart: String,
    rows: Vec<HistoryRow>,
}

#[derive(Serialize)]
struct ReportView {
    name: String,
    ticker: String,
    metrics: Vec<Metric>,
    history: Option<HistoryView>,
    summary: Option<String>,
    industry: String,
    sector: String,
    currency: String,
    description: Option<String>,
}

impl ReportView {
    fn new(report: &Report) -> Self {
        let quote = &report.quote;

        let metrics = vec![
            Metric {
                label: "💰 Price",
                value: format_price(quote.price),
            },
            Metric {
                label: "📊 P/E Ratio",
                value: format_ratio(&quote.pe_ratio),
            },
            Metric {
                label: "🏢 Market Cap",
                value: format_market_cap(&quote.market_cap),
            },
            Metric {
                label: "🏭 Sector",
                value: quote.sector.clone(),
            },
        ];

        let history = report
            .history
            .as_ref()
            .filter(|h| !h.points.is_empty())
            .map(|h| HistoryView {
                period: h.period.code(),
                chart: chart_points(&h.points, CHART_WIDTH, CHART_HEIGHT),
                rows: h
                    .points
                    .iter()
                    .map(|p| HistoryRow {
                        date: p.date.clone(),
                        open: format_money(p.open),
                        high: format_money(p.high),
                        low: format_money(p.low),
                        close: format_money(p.close),
                        volume: group_thousands(p.volume),
                    })
                    .collect(),
            });

        Self {
            name: quote.display_name().to_string(),
            ticker: report.ticker.clone(),
            metrics,
            history,
            summary: report.summary.clone(),
            industry: quote.industry.clone(),
            sector: quote.sector.clone(),
            currency: quote.currency.clone(),
            description: (quote.description != NOT_AVAILABLE && !quote.description.is_empty())
                .then(|| quote.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractionResult, HistoricalSeries, Interval, QuoteSnapshot, Reported};

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            date: date.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000_000,
        }
    }

    fn report() -> Report {
        Report {
            query: "Tesla over the past year".into(),
            extraction: ExtractionResult {
                ticker: Some("TSLA".into()),
                timeframe: Some(Period::OneYear),
            },
            ticker: "TSLA".into(),
            quote: QuoteSnapshot {
                ticker: "TSLA".into(),
                price: 177.5,
                currency: "USD".into(),
                market_cap: Reported::Value(565_000_000_000),
                pe_ratio: Reported::Value(45.123),
                name: "Tesla, Inc.".into(),
                sector: "Consumer Cyclical".into(),
                industry: "Auto Manufacturers".into(),
                description: "Tesla designs & sells <electric> vehicles.".into(),
            },
            history: Some(HistoricalSeries {
                ticker: "TSLA".into(),
                period: Period::OneYear,
                interval: Interval::Weekly,
                row_count: 53,
                points: vec![point("2024-01-05", 240.0), point("2024-01-12", 1218.5)],
            }),
            summary: Some("Volatile year.\nWatch <margins>.".into()),
        }
    }

    #[test]
    fn test_chart_points() {
        let points = [point("a", 10.0), point("b", 20.0), point("c", 15.0)];
        assert_eq!(
            chart_points(&points, 100.0, 50.0),
            "0.0,50.0 50.0,0.0 100.0,25.0"
        );
    }

    #[test]
    fn test_chart_points_degenerate() {
        assert_eq!(chart_points(&[], 100.0, 50.0), "");
        assert_eq!(chart_points(&[point("a", 3.0)], 100.0, 50.0), "50.0,25.0");
        let flat = [point("a", 7.0), point("b", 7.0)];
        assert_eq!(chart_points(&flat, 100.0, 50.0), "0.0,25.0 100.0,25.0");
    }

    #[test]
    fn test_render_report_page() {
        let html = HtmlRenderer::new().unwrap().render_report(&report()).unwrap();
        assert!(html.contains("📈 FinanceHub"));
        assert!(html.contains("Tesla, Inc."));
        assert!(html.contains("$177.50"));
        assert!(html.contains("45.12"));
        assert!(html.contains("$565.0B"));
        assert!(html.contains("$1,218.50"));
        assert!(html.contains("1,000,000"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("🤖 AI Analysis"));
        assert!(html.contains("<li><strong>5y</strong> - Past 5 years</li>"));
    }

    #[test]
    fn test_render_escapes_text() {
        let html = HtmlRenderer::new().unwrap().render_report(&report()).unwrap();
        assert!(html.contains("Watch &lt;margins&gt;."));
        assert!(html.contains("&lt;electric&gt;"));
        assert!(!html.contains("<margins>"));
    }

    #[test]
    fn test_render_without_optional_sections() {
        let mut report = report();
        report.history = None;
        report.summary = None;
        report.quote.name = NOT_AVAILABLE.into();
        report.quote.description = NOT_AVAILABLE.into();

        let html = HtmlRenderer::new().unwrap().render_report(&report).unwrap();
        assert!(!html.contains("<polyline"));
        assert!(!html.contains("AI Analysis"));
        assert!(!html.contains("About"));
        assert!(html.contains(r#"<h2 style="color: #1E88E5; margin: 0;">TSLA</h2>"#));
    }

    #[test]
    fn test_render_errors() {
        let renderer = HtmlRenderer::new().unwrap();

        let html = renderer
            .render(DashboardPage::Failed {
                query: "best stock?",
                error: &FinanceError::NoTicker,
            })
            .unwrap();
        assert!(html.contains(
            "❌ Could not extract a valid stock ticker from your query. Try being more specific!"
        ));
        assert!(html.contains(r#"value="best stock?""#));

        let error = FinanceError::Gateway {
            status: 500,
            message: "Failed to fetch stock price for ZZZZ: not found".into(),
        };
        assert_eq!(
            renderer.render_error(&error),
            "❌ Error: Failed to fetch stock price for ZZZZ: not found"
        );
    }

    #[test]
    fn test_render_empty_page() {
        let html = HtmlRenderer::new().unwrap().render(DashboardPage::Empty).unwrap();
        assert!(html.contains(r#"name="q" value="""#));
        assert!(!html.contains(r#"class="error""#));
    }
}
