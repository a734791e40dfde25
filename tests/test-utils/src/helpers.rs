//! Test helper functions and utilities

use crate::mocks::{MockMetadataSource, MockQuoteSource, MockSeriesSource};
use anyhow::Result;
use fund_ratios::{FundDetailsServiceImpl, FundRatiosConfig, PlaceholderGenerator};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing_subscriber::EnvFilter;

/// Seed for the placeholder generator of services built here
pub const TEST_PLACEHOLDER_SEED: u64 = 42;

/// Initialize test logging with environment-based configuration.
///
/// Safe to call multiple times - subsequent calls are ignored.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wait for a condition to become true with timeout and polling.
///
/// Ok(()) if the condition becomes true, Err if the timeout expires.
pub async fn wait_for<F>(condition: F, timeout_duration: Duration, poll_interval: Duration) -> Result<()>
where
    F: Fn() -> bool,
{
    timeout(timeout_duration, async {
        while !condition() {
            sleep(poll_interval).await;
        }
    })
    .await
    .map_err(|_| anyhow::anyhow!("Timeout waiting for condition"))
}

/// Create a test timeout wrapper for async operations.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl std::future::Future<Output = T>,
) -> Result<T> {
    timeout(duration, future)
        .await
        .map_err(|_| anyhow::anyhow!("Test timeout after {:?}", duration))
}

/// Configuration with short timeouts for tests
pub fn test_config() -> FundRatiosConfig {
    FundRatiosConfig {
        series_timeout_ms: 500,
        metadata_timeout_ms: 500,
        ..FundRatiosConfig::default()
    }
}

/// Mocks wired into a service, kept for call count assertions
#[derive(Debug, Clone)]
pub struct TestHarness {
    pub service: FundDetailsServiceImpl,
    pub metadata: Arc<MockMetadataSource>,
    pub series: Arc<MockSeriesSource>,
    pub quotes: Arc<MockQuoteSource>,
}

impl TestHarness {
    pub fn new(metadata: MockMetadataSource, series: MockSeriesSource) -> Self {
        Self::with_config(test_config(), metadata, series, MockQuoteSource::new())
    }

    pub fn with_config(
        config: FundRatiosConfig,
        metadata: MockMetadataSource,
        series: MockSeriesSource,
        quotes: MockQuoteSource,
    ) -> Self {
        let metadata = Arc::new(metadata);
        let series = Arc::new(series);
        let quotes = Arc::new(quotes);
        let service = FundDetailsServiceImpl::new(
            config,
            metadata.clone(),
            series.clone(),
            quotes.clone(),
        )
        .with_placeholder_generator(PlaceholderGenerator::with_seed(TEST_PLACEHOLDER_SEED));
        Self {
            service,
            metadata,
            series,
            quotes,
        }
    }

    /// Wait until no background computation is running for `code`
    pub async fn settle(&self, code: common::SchemeCode) -> Result<()> {
        let service = self.service.clone();
        wait_for(
            move || !service.is_computing(code),
            Duration::from_secs(5),
            Duration::from_millis(5),
        )
        .await
    }
}
