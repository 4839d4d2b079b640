//! Ticker and timeframe extraction prompts

use super::Prompt;
use crate::error::Result;
use crate::model::Period;
use minijinja::context;

/// Company names the model should map to symbols
pub const COMPANY_TICKERS: &[(&str, &str)] = &[
    ("Tesla", "TSLA"),
    ("Apple", "AAPL"),
    ("Microsoft", "MSFT"),
    ("Amazon", "AMZN"),
    ("Google", "GOOGL"),
    ("Alphabet", "GOOGL"),
    ("Meta", "META"),
    ("Nvidia", "NVDA"),
    ("John Deere", "DE"),
    ("Toyota", "TM"),
    ("Ford", "F"),
    ("Coca Cola", "KO"),
    ("McDonald's", "MCD"),
    ("Netflix", "NFLX"),
    ("Uber", "UBER"),
    ("Adani Ports", "ADANIPORTS"),
];

/// Natural-language phrases and the period they stand for
pub const TIME_PHRASES: &[(&str, Period)] = &[
    ("past month OR this month OR 1 month", Period::OneMonth),
    ("past 3 months OR quarter", Period::ThreeMonths),
    ("past 6 months OR half year", Period::SixMonths),
    ("past year OR 1 year", Period::OneYear),
    ("past 2 years", Period::TwoYears),
    ("past 5 years", Period::FiveYears),
];

const EXTRACTION: Prompt = Prompt::new(
    "extraction",
    r#"EXTRACT ONLY - NO EXPLANATIONS

Extract the stock ticker and time period from this request.
Return EXACTLY in this format: TICKER,TIMEFRAME

Company ticker mappings:
{% for company in companies %}{{ company[0] }}={{ company[1] }}{% if not loop.last %}, {% endif %}{% endfor %}

Time period mappings:
{% for phrase in phrases %}{{ phrase[0] }}={{ phrase[1] }}
{% endfor %}No time period mentioned=NONE

User: "{{ query }}"
Response: TICKER,TIMEFRAME"#,
);

const TICKER_ONLY: Prompt = Prompt::new(
    "ticker_only",
    r"Extract the stock ticker symbol from the user's request.
Return ONLY the ticker symbol (e.g., AAPL, TSLA, GOOGL) with no additional text.
If no valid ticker is found, return 'INVALID'.

User request: {{ query }}

Ticker:",
);

/// Prompt asking for `TICKER,TIMEFRAME`
pub fn extraction_prompt(query: &str) -> Result<String> {
    EXTRACTION.render(context! {
        query => query,
        companies => COMPANY_TICKERS,
        phrases => TIME_PHRASES,
    })
}

/// Prompt asking for a bare ticker or `INVALID`
pub fn ticker_only_prompt(query: &str) -> Result<String> {
    TICKER_ONLY.render(context! { query => query })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt() {
        let prompt = extraction_prompt("How did Tesla do over the past year?").unwrap();

        assert!(prompt.starts_with("EXTRACT ONLY - NO EXPLANATIONS"));
        assert!(prompt.contains("Return EXACTLY in this format: TICKER,TIMEFRAME"));
        assert!(prompt.contains("Tesla=TSLA, Apple=AAPL, Microsoft=MSFT"));
        assert!(
            prompt.contains("McDonald's=MCD, Netflix=NFLX, Uber=UBER, Adani Ports=ADANIPORTS\n")
        );
        assert!(prompt.contains("past 3 months OR quarter=3mo\n"));
        assert!(prompt.contains("past 5 years=5y\nNo time period mentioned=NONE"));
        assert!(prompt.ends_with(
            "User: \"How did Tesla do over the past year?\"\nResponse: TICKER,TIMEFRAME"
        ));
    }

    #[test]
    fn test_query_is_not_escaped() {
        let prompt = extraction_prompt("AT&T <stock>").unwrap();
        assert!(prompt.contains("User: \"AT&T <stock>\""));
    }

    #[test]
    fn test_ticker_only_prompt() {
        let prompt = ticker_only_prompt("show me nvidia").unwrap();
        assert!(prompt.contains("return 'INVALID'"));
        assert!(prompt.contains("User request: show me nvidia"));
        assert!(prompt.ends_with("Ticker:"));
    }
}
