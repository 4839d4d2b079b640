//! Domain types exchanged between the interpreter, the dispatch endpoint and
//! the presentation layer
//!
//! Everything here is a transient request/response structure. The JSON shape
//! of [`QuoteSnapshot`] and [`HistoricalSeries`] is the payload carried in the
//! `data` field of a dispatch response.

use crate::error::FinanceError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentinel used on the wire for fields the provider did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Lookback window for historical price queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    /// Every supported period, shortest first
    pub const ALL: [Period; 6] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    /// Short code used in prompts, on the wire and by the upstream provider
    pub fn code(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Periods of a year or more
    pub fn is_long(&self) -> bool {
        matches!(self, Self::OneYear | Self::TwoYears | Self::FiveYears)
    }

    /// Sampling interval requested from the provider
    pub fn interval(&self) -> Interval {
        if self.is_long() {
            Interval::Weekly
        } else {
            Interval::Daily
        }
    }

    /// Number of trailing points kept after fetching
    pub fn window(&self) -> usize {
        match self {
            Self::OneMonth => 20,
            Self::ThreeMonths => 40,
            Self::SixMonths => 100,
            Self::OneYear | Self::TwoYears | Self::FiveYears => 52,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Period {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| FinanceError::InvalidParameter(format!("unsupported period '{code}'")))
    }
}

/// Sampling interval of a historical series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
}

impl Interval {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What the interpreter understood from a free-text query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Uppercase alphanumeric symbol, at most 10 characters
    pub ticker: Option<String>,
    /// Requested lookback; `None` means no history was asked for
    pub timeframe: Option<Period>,
}

impl ExtractionResult {
    /// Nothing could be extracted
    pub fn none() -> Self {
        Self::default()
    }
}

/// A numeric field that may be reported as `"N/A"`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Reported<T> {
    Value(T),
    #[default]
    NotAvailable,
}

impl<T> Reported<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl<T> From<Option<T>> for Reported<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotAvailable, Self::Value)
    }
}

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Value(T),
            Other(serde_json::Value),
        }

        // "N/A", null or anything else non-numeric collapses to NotAvailable
        Ok(match Raw::<T>::deserialize(deserializer)? {
            Raw::Value(v) => Self::Value(v),
            Raw::Other(_) => Self::NotAvailable,
        })
    }
}

/// Current price and descriptive fields for a security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    pub ticker: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub market_cap: Reported<u64>,
    #[serde(default)]
    pub pe_ratio: Reported<f64>,
    pub name: String,
    pub sector: String,
    pub industry: String,
    /// At most 200 characters
    pub description: String,
}

impl QuoteSnapshot {
    /// Company name, or the ticker when the provider had none
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() || self.name == NOT_AVAILABLE {
            &self.ticker
        } else {
            &self.name
        }
    }
}

/// One observation of a historical series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history for a security, ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSeries {
    pub ticker: String,
    pub period: Period,
    pub interval: Interval,
    /// Rows returned by the provider before the trailing window was applied
    pub row_count: usize,
    pub points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn first_close(&self) -> Option<f64> {
        self.points.first().map(|p| p.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Percent change from first to last close
    ///
    /// `None` when the series is empty or either close is zero.
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.first_close()?;
        let last = self.last_close()?;
        if first == 0.0 || last == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}
