//! Market data client for the RapidAPI Yahoo Finance endpoints
//!
//! History: `GET /api/v1/markets/stock/history?symbol&period&interval`,
//! samples under `body.items[].{date, close}`.
//! Quotes: `GET /api/v1/markets/quote?symbol`, fields under `body`.

use super::{HistoricalSeriesSource, IndexQuoteSource};
use crate::error::{FundError, FundResult};
use async_trait::async_trait;
use common::{IndexQuote, PriceSample};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const HOST_HEADER: &str = "x-rapidapi-host";
const KEY_HEADER: &str = "x-rapidapi-key";

/// HTTP client for historical series and index quotes
#[derive(Clone)]
pub struct RapidApiMarketClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for RapidApiMarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiMarketClient")
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    body: Option<HistoryBody>,
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    items: Option<Vec<HistoryItem>>,
}

#[derive(Debug, Deserialize)]
struct HistoryItem {
    date: String,
    close: f64,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    body: Option<QuoteBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody {
    regular_market_price: f64,
    regular_market_change: f64,
    regular_market_change_percent: f64,
}

impl RapidApiMarketClient {
    /// Create a client; requests are sent without a key header when `api_key`
    /// is `None`
    pub fn new(
        base_url: impl Into<String>,
        host: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> FundResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("fund-ratios/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FundError::Http(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            host: host.into(),
            api_key,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> FundResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "market API request");

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(HOST_HEADER, &self.host);
        if let Some(key) = &self.api_key {
            request = request.header(KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FundError::Http(format!("{url} returned {status}")));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl HistoricalSeriesSource for RapidApiMarketClient {
    async fn fetch_historical_series(
        &self,
        instrument: &str,
        period: &str,
        interval: &str,
    ) -> FundResult<Vec<PriceSample>> {
        let response: HistoryResponse = self
            .get(
                "/api/v1/markets/stock/history",
                &[("symbol", instrument), ("period", period), ("interval", interval)],
            )
            .await
            .map_err(|e| e.into_series(instrument))?;

        let Some(items) = response.body.and_then(|body| body.items) else {
            warn!(instrument, "history response has no body.items, treating as empty");
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .map(|item| PriceSample::new(item.date, item.close))
            .collect())
    }
}

#[async_trait]
impl IndexQuoteSource for RapidApiMarketClient {
    async fn fetch_index_quote(&self, symbol: &str, name: &str) -> FundResult<IndexQuote> {
        let response: QuoteResponse = self
            .get("/api/v1/markets/quote", &[("symbol", symbol)])
            .await?;
        let body = response
            .body
            .ok_or_else(|| FundError::Decode(format!("quote for {symbol} has no body")))?;

        Ok(IndexQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price: body.regular_market_price,
            change: body.regular_market_change,
            change_percent: body.regular_market_change_percent,
        })
    }
}
