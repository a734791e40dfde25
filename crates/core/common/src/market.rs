//! Market index quotes

use serde::{Deserialize, Serialize};

/// Latest quote for a market index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    /// Ticker symbol, e.g. `^NSEI`
    pub symbol: String,
    /// Display name, e.g. `NIFTY 50`
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl IndexQuote {
    /// Non-negative change counts as positive
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }

    /// Signed percent change with two decimals, e.g. `+0.62%`
    #[must_use]
    pub fn display_change(&self) -> String {
        format!("{:+.2}%", self.change_percent)
    }

    /// Price with thousands separators and two decimals, e.g. `22,475.22`
    #[must_use]
    pub fn display_price(&self) -> String {
        let fixed = format!("{:.2}", self.price.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.price < 0.0 { "-" } else { "" };
        format!("{sign}{grouped}.{frac}")
    }
}
