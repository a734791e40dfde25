//! Core value types: scheme codes, price samples and ratio sets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scheme code identifying a mutual fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemeCode(pub u32);

impl SchemeCode {
    /// Create a new scheme code
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Raw numeric code
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SchemeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a scheme code cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scheme code: {0:?}")]
pub struct ParseSchemeCodeError(pub String);

impl FromStr for SchemeCode {
    type Err = ParseSchemeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseSchemeCodeError(s.to_string()))
    }
}

/// One observation of an instrument's price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Observation date as reported by the source
    pub date: String,
    /// Close price or NAV
    pub price: f64,
}

impl PriceSample {
    /// Create a new sample
    #[must_use]
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }
}

/// Period-over-period simple returns, as decimal fractions (0.01 = 1%)
pub type ReturnSeries = Vec<f64>;

/// Where the ratios attached to a fund record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioSource {
    /// Raw metadata, no ratios attached
    #[default]
    None,
    /// Randomly drawn placeholder values
    Placeholder,
    /// Values computed from historical series
    Computed,
}

/// Financial ratios displayed for a fund
///
/// Every field is optional; `None` means not computed yet. Present values are
/// rounded to two decimal places by whoever produced them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioSet {
    pub expense_ratio: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub alpha: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub information_ratio: Option<f64>,
    pub tracking_error: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
}

impl RatioSet {
    /// Field names paired with their values, in display order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("expense_ratio", self.expense_ratio),
            ("sharpe_ratio", self.sharpe_ratio),
            ("beta", self.beta),
            ("alpha", self.alpha),
            ("standard_deviation", self.standard_deviation),
            ("sortino_ratio", self.sortino_ratio),
            ("information_ratio", self.information_ratio),
            ("tracking_error", self.tracking_error),
            ("pe_ratio", self.pe_ratio),
            ("pb_ratio", self.pb_ratio),
        ]
    }

    /// True when every ratio is present
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_some())
    }

    /// True when no ratio is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

/// Round to two decimal places, half away from zero
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
