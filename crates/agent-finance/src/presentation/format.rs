//! Number formatting shared by prompts, console output and the dashboard

use crate::model::{NOT_AVAILABLE, Reported};

/// `$150.20`
pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

/// `$1,234.56`
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Two-decimal ratio, or `N/A`
pub fn format_ratio(value: &Reported<f64>) -> String {
    value
        .value()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Market cap abbreviated to billions above 1e9, millions otherwise
pub fn format_market_cap(value: &Reported<u64>) -> String {
    match value.value() {
        Some(&cap) if cap as f64 > 1e9 => format!("${:.1}B", cap as f64 / 1e9),
        Some(&cap) => format!("${:.1}M", cap as f64 / 1e6),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Signed percentage with one decimal, e.g. `+5.3%`
pub fn format_change(percent: f64) -> String {
    format!("{percent:+.1}%")
}

/// `1234567` becomes `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(150.2), "$150.20");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(999.999), "$1,000.00");
        assert_eq!(format_money(12.0), "$12.00");
        assert_eq!(format_money(-1500.25), "-$1,500.25");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(&Reported::Value(29.456)), "29.46");
        assert_eq!(format_ratio(&Reported::NotAvailable), "N/A");
    }

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(&Reported::Value(2_950_000_000_000)), "$2950.0B");
        assert_eq!(format_market_cap(&Reported::Value(1_500_000_000)), "$1.5B");
        assert_eq!(format_market_cap(&Reported::Value(850_000_000)), "$850.0M");
        assert_eq!(format_market_cap(&Reported::NotAvailable), "N/A");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(5.26), "+5.3%");
        assert_eq!(format_change(-12.04), "-12.0%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(52_345_678), "52,345,678");
    }
}
