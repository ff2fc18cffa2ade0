//! Currency and percentage formatting for report tables.

use serde::{Deserialize, Serialize};

/// Display currency. Only the symbol varies; amounts are always shown with
/// two decimals and comma thousands separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl Currency {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }

    /// `1234567.891` -> `₹1,234,567.89`; negatives as `-₹12.00`.
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("{}{}", self.symbol, amount);
        }
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}{}{}", self.symbol, group_thousands(amount.abs()))
    }
}

/// Format with two decimals and comma grouping, no symbol.
pub fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{grouped}.{frac_part}")
}

/// `12.3456` -> `12.35%`
pub fn format_percent(pct: f64) -> String {
    format!("{:.2}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.5), "999.50");
        assert_eq!(group_thousands(1000.0), "1,000.00");
        assert_eq!(group_thousands(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_currency_format() {
        let inr = Currency::default();
        assert_eq!(inr.format(1500.0), "₹1,500.00");
        assert_eq!(inr.format(-12.0), "-₹12.00");

        let usd = Currency::new("$");
        assert_eq!(usd.format(100000.25), "$100,000.25");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(-33.333333), "-33.33%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
