//! Fund ratio service configuration

use crate::error::{FundError, FundResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Approximate Indian government bond yield
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.055;
/// Nifty 50
pub const DEFAULT_BENCHMARK_SYMBOL: &str = "^NSEI";
pub const DEFAULT_HISTORY_PERIOD: &str = "1y";
pub const DEFAULT_HISTORY_INTERVAL: &str = "1mo";
pub const DEFAULT_FUND_API_URL: &str = "https://api.mfapi.in";
pub const DEFAULT_MARKET_API_URL: &str = "https://yahoo-finance15.p.rapidapi.com";
pub const DEFAULT_MARKET_API_HOST: &str = "yahoo-finance15.p.rapidapi.com";

/// Fund ratio service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRatiosConfig {
    /// Annual risk-free rate as a decimal fraction
    pub risk_free_rate_annual: f64,
    /// Benchmark instrument for beta, alpha and tracking error
    pub benchmark_symbol: String,
    /// History window requested from the series source
    pub history_period: String,
    /// Sampling interval requested from the series source
    pub history_interval: String,
    /// Deadline for each historical series fetch
    pub series_timeout_ms: u64,
    /// Deadline for each metadata fetch
    pub metadata_timeout_ms: u64,
    /// Freshness window of the market index cache
    pub market_index_ttl_secs: u64,
    /// Capacity of the event broadcast channel
    pub event_channel_capacity: usize,
    /// Collaborator endpoints
    pub endpoints: Endpoints,
}

/// Collaborator endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub fund_api_url: String,
    pub market_api_url: String,
    pub market_api_host: String,
    /// RapidAPI key; never serialized
    #[serde(skip_serializing, default)]
    pub market_api_key: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            fund_api_url: DEFAULT_FUND_API_URL.to_string(),
            market_api_url: DEFAULT_MARKET_API_URL.to_string(),
            market_api_host: DEFAULT_MARKET_API_HOST.to_string(),
            market_api_key: None,
        }
    }
}

impl Default for FundRatiosConfig {
    fn default() -> Self {
        Self {
            risk_free_rate_annual: DEFAULT_RISK_FREE_RATE,
            benchmark_symbol: DEFAULT_BENCHMARK_SYMBOL.to_string(),
            history_period: DEFAULT_HISTORY_PERIOD.to_string(),
            history_interval: DEFAULT_HISTORY_INTERVAL.to_string(),
            series_timeout_ms: 10_000,
            metadata_timeout_ms: 15_000,
            market_index_ttl_secs: 300, // 5 minutes
            event_channel_capacity: 1000,
            endpoints: Endpoints::default(),
        }
    }
}

impl FundRatiosConfig {
    /// Defaults overridden by `FUND_RATIOS_*` environment variables
    pub fn from_env() -> FundResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key
    pub fn from_lookup<F>(lookup: F) -> FundResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rate) = parse_var(&lookup, "FUND_RATIOS_RISK_FREE_RATE")? {
            config.risk_free_rate_annual = rate;
        }
        if let Some(symbol) = lookup("FUND_RATIOS_BENCHMARK") {
            config.benchmark_symbol = symbol;
        }
        if let Some(period) = lookup("FUND_RATIOS_HISTORY_PERIOD") {
            config.history_period = period;
        }
        if let Some(interval) = lookup("FUND_RATIOS_HISTORY_INTERVAL") {
            config.history_interval = interval;
        }
        if let Some(ms) = parse_var(&lookup, "FUND_RATIOS_SERIES_TIMEOUT_MS")? {
            config.series_timeout_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "FUND_RATIOS_METADATA_TIMEOUT_MS")? {
            config.metadata_timeout_ms = ms;
        }
        if let Some(secs) = parse_var(&lookup, "FUND_RATIOS_MARKET_TTL_SECS")? {
            config.market_index_ttl_secs = secs;
        }
        if let Some(url) = lookup("FUND_RATIOS_FUND_API_URL") {
            config.endpoints.fund_api_url = url;
        }
        if let Some(url) = lookup("FUND_RATIOS_MARKET_API_URL") {
            config.endpoints.market_api_url = url;
        }
        if let Some(host) = lookup("FUND_RATIOS_MARKET_API_HOST") {
            config.endpoints.market_api_host = host;
        }
        config.endpoints.market_api_key = lookup("RAPIDAPI_KEY");
        if config.endpoints.market_api_key.is_none() {
            tracing::warn!("RAPIDAPI_KEY not set, historical series requests will be unauthenticated");
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot work with
    pub fn validate(&self) -> FundResult<()> {
        if !self.risk_free_rate_annual.is_finite() {
            return Err(FundError::InvalidConfig(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate_annual
            )));
        }
        if self.benchmark_symbol.trim().is_empty() {
            return Err(FundError::InvalidConfig("benchmark symbol is empty".to_string()));
        }
        if self.series_timeout_ms == 0 || self.metadata_timeout_ms == 0 {
            return Err(FundError::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        if self.event_channel_capacity == 0 {
            return Err(FundError::InvalidConfig(
                "event channel capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn series_timeout(&self) -> Duration {
        Duration::from_millis(self.series_timeout_ms)
    }

    #[must_use]
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }

    #[must_use]
    pub fn market_index_ttl(&self) -> Duration {
        Duration::from_secs(self.market_index_ttl_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> FundResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| FundError::InvalidConfig(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
