//! Mutual fund API client
//!
//! Speaks the mfapi.in layout: `GET /mf` for the fund list and
//! `GET /mf/{code}` for one scheme's metadata and NAV history.

use super::FundMetadataSource;
use crate::error::{FundError, FundResult};
use async_trait::async_trait;
use common::{FundDetails, FundSummary, SchemeCode};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the fund API
#[derive(Debug, Clone)]
pub struct MfApiClient {
    client: Client,
    base_url: String,
}

impl MfApiClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FundResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("fund-ratios/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FundError::Http(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> FundResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fund API request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FundError::Http(format!("{url} returned {status}")));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl FundMetadataSource for MfApiClient {
    async fn fetch_fund_metadata(&self, code: SchemeCode) -> FundResult<FundDetails> {
        let details: FundDetails = self
            .get_json(&format!("/mf/{code}"))
            .await
            .map_err(|e| e.into_metadata(code))?;

        if details.scheme_code() != code {
            return Err(FundError::MetadataUnavailable {
                scheme_code: code,
                reason: format!("response was for scheme {}", details.scheme_code()),
            });
        }
        // The raw tier never carries ratios, whatever the API sent
        Ok(details.without_ratios())
    }

    async fn fetch_fund_list(&self) -> FundResult<Vec<FundSummary>> {
        self.get_json("/mf").await
    }
}
