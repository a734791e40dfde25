//! Fund Ratios Service
//!
//! Serves mutual fund details with risk and return ratios in two tiers:
//! a placeholder set returned immediately on first access, and a computed set
//! derived from monthly fund and benchmark returns in the background. Once the
//! computed set is stored it is always preferred.
//!
//! Also carries the fund catalog, favorites and market index quotes used by
//! the dashboard.

pub mod cache;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod market;
pub mod placeholder;
pub mod ratios;
pub mod returns;
pub mod service;

pub use cache::{CacheStats, RatioCache};
pub use catalog::FundCatalog;
pub use clients::{
    FundMetadataSource, HistoricalSeriesSource, IndexQuoteSource, MfApiClient,
    RapidApiMarketClient,
};
pub use config::FundRatiosConfig;
pub use error::{FundError, FundResult};
pub use market::MarketIndexCache;
pub use placeholder::PlaceholderGenerator;
pub use ratios::{DEFAULT_RATIOS, compute_ratios, compute_ratios_from_prices};
pub use returns::build_returns;
pub use service::FundDetailsServiceImpl;

use async_trait::async_trait;
use common::{FundDetails, FundSummary, IndexQuote, SchemeCode};
use std::sync::Arc;
use std::time::Duration;

/// Fund ratio service events
#[derive(Debug, Clone)]
pub enum FundEvent {
    /// Computed ratios were stored for a fund
    RatiosConfirmed {
        scheme_code: SchemeCode,
        details: Arc<FundDetails>,
    },
    /// Background computation failed; the placeholder stays in place
    RatiosUnavailable {
        scheme_code: SchemeCode,
        reason: String,
    },
}

impl FundEvent {
    #[must_use]
    pub fn scheme_code(&self) -> SchemeCode {
        match self {
            Self::RatiosConfirmed { scheme_code, .. } | Self::RatiosUnavailable { scheme_code, .. } => {
                *scheme_code
            }
        }
    }
}

/// Fund details service trait
#[async_trait]
pub trait FundDetailsService: Send + Sync {
    /// Best available details for `code`
    ///
    /// First access fetches metadata and returns placeholder ratios while the
    /// computed ratios are produced in the background. Fails only when the
    /// metadata cannot be fetched.
    async fn get_mutual_fund_details(&self, code: SchemeCode) -> FundResult<Arc<FundDetails>>;

    /// Cached details for `code` without any I/O: computed, else placeholder
    fn get_latest_fund_details(&self, code: SchemeCode) -> Option<Arc<FundDetails>>;

    /// Drop every cached tier and placeholder for every fund
    fn clear_cache(&self);

    /// Subscribe to ratio events
    fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<FundEvent>;

    /// Resolve with the computed details for `code` once stored
    ///
    /// Returns `None` if `within` elapses or the computation reports failure.
    /// Dropping the future does not affect the background computation.
    async fn wait_for_confirmed(&self, code: SchemeCode, within: Duration)
    -> Option<Arc<FundDetails>>;

    /// Full fund list, loaded on first use
    async fn all_funds(&self) -> FundResult<Arc<Vec<FundSummary>>>;

    /// Popular funds from the catalog
    async fn popular_funds(&self) -> FundResult<Vec<FundSummary>>;

    /// Top performing funds from the catalog
    async fn top_performing_funds(&self) -> FundResult<Vec<FundSummary>>;

    /// Tracked market index quotes
    async fn market_indices(&self, force_refresh: bool) -> Vec<IndexQuote>;
}
