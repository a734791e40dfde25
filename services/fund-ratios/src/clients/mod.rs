//! Collaborator interfaces and their HTTP implementations

pub mod mfapi;
pub mod rapidapi;

pub use mfapi::MfApiClient;
pub use rapidapi::RapidApiMarketClient;

use crate::error::FundResult;
use async_trait::async_trait;
use common::{FundDetails, FundSummary, IndexQuote, PriceSample, SchemeCode};

/// Source of historical close prices for funds and indices
#[async_trait]
pub trait HistoricalSeriesSource: Send + Sync {
    /// Chronologically ordered samples; may be empty
    async fn fetch_historical_series(
        &self,
        instrument: &str,
        period: &str,
        interval: &str,
    ) -> FundResult<Vec<PriceSample>>;
}

/// Source of fund metadata and the fund list
#[async_trait]
pub trait FundMetadataSource: Send + Sync {
    /// Raw details for one scheme, without ratios
    async fn fetch_fund_metadata(&self, code: SchemeCode) -> FundResult<FundDetails>;

    /// Every listed scheme
    async fn fetch_fund_list(&self) -> FundResult<Vec<FundSummary>>;
}

/// Source of live market index quotes
#[async_trait]
pub trait IndexQuoteSource: Send + Sync {
    async fn fetch_index_quote(&self, symbol: &str, name: &str) -> FundResult<IndexQuote>;
}
