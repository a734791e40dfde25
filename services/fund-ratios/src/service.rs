//! Fund details orchestration
//!
//! Request flow per scheme code:
//! 1. computed details cached: serve them
//! 2. placeholder cached: serve it and make sure a computation is running
//! 3. otherwise, under the code's lock: fetch metadata (errors propagate),
//!    attach the pinned placeholder set, cache and serve it, start computing
//!
//! The computation fetches the fund and benchmark histories concurrently,
//! runs the ratio engine and stores the result unless the cache was cleared
//! meanwhile. Failures are logged and reported as events; the placeholder
//! stays.

use crate::cache::{CacheStats, RatioCache};
use crate::catalog::FundCatalog;
use crate::clients::{
    FundMetadataSource, HistoricalSeriesSource, IndexQuoteSource, MfApiClient,
    RapidApiMarketClient,
};
use crate::config::FundRatiosConfig;
use crate::error::{FundError, FundResult};
use crate::market::MarketIndexCache;
use crate::placeholder::PlaceholderGenerator;
use crate::ratios::compute_ratios_from_prices;
use crate::{FundDetailsService, FundEvent};
use async_trait::async_trait;
use common::{FundDetails, FundSummary, IndexQuote, PriceSample, RatioSource, SchemeCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Main fund details service implementation
#[derive(Clone)]
pub struct FundDetailsServiceImpl {
    /// Tiered details cache
    cache: Arc<RatioCache>,
    /// Pinned placeholder ratio sets
    placeholders: Arc<PlaceholderGenerator>,
    metadata: Arc<dyn FundMetadataSource>,
    series: Arc<dyn HistoricalSeriesSource>,
    /// Event broadcaster
    events: broadcast::Sender<FundEvent>,
    config: Arc<FundRatiosConfig>,
    catalog: Arc<FundCatalog>,
    market: Arc<MarketIndexCache>,
}

impl std::fmt::Debug for FundDetailsServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundDetailsServiceImpl")
            .field("cache", &self.cache)
            .field("placeholders", &self.placeholders)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FundDetailsServiceImpl {
    /// Create a service over the given collaborators
    pub fn new(
        config: FundRatiosConfig,
        metadata: Arc<dyn FundMetadataSource>,
        series: Arc<dyn HistoricalSeriesSource>,
        quotes: Arc<dyn IndexQuoteSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let market = MarketIndexCache::new(quotes, config.market_index_ttl());
        Self {
            cache: Arc::new(RatioCache::new()),
            placeholders: Arc::new(PlaceholderGenerator::new()),
            catalog: Arc::new(FundCatalog::new(Arc::clone(&metadata))),
            market: Arc::new(market),
            metadata,
            series,
            events,
            config: Arc::new(config),
        }
    }

    /// Create a service talking to the configured HTTP endpoints
    pub fn from_config(config: FundRatiosConfig) -> FundResult<Self> {
        config.validate()?;
        let endpoints = &config.endpoints;
        let fund_api = Arc::new(MfApiClient::new(
            endpoints.fund_api_url.clone(),
            config.metadata_timeout(),
        )?);
        let market_api = Arc::new(RapidApiMarketClient::new(
            endpoints.market_api_url.clone(),
            endpoints.market_api_host.clone(),
            endpoints.market_api_key.clone(),
            config.series_timeout(),
        )?);
        Ok(Self::new(config, fund_api, market_api.clone(), market_api))
    }

    /// Replace the placeholder generator, e.g. with a seeded one
    #[must_use]
    pub fn with_placeholder_generator(mut self, generator: PlaceholderGenerator) -> Self {
        self.placeholders = Arc::new(generator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &FundRatiosConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &FundCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn market(&self) -> &MarketIndexCache {
        &self.market
    }

    #[must_use]
    pub fn placeholders(&self) -> &PlaceholderGenerator {
        &self.placeholders
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether a background computation for `code` is running
    #[must_use]
    pub fn is_computing(&self, code: SchemeCode) -> bool {
        self.cache.is_computing(code)
    }

    async fn fetch_metadata(&self, code: SchemeCode) -> FundResult<FundDetails> {
        let timeout = self.config.metadata_timeout();
        let fetched = tokio::time::timeout(timeout, self.metadata.fetch_fund_metadata(code))
            .await
            .map_err(|_| FundError::Timeout {
                operation: format!("metadata fetch for {code}"),
                after_ms: self.config.metadata_timeout_ms,
            })
            .and_then(|result| result);
        fetched.map_err(|e| e.into_metadata(code))
    }

    async fn fetch_series(&self, instrument: &str) -> FundResult<Vec<PriceSample>> {
        let timeout = self.config.series_timeout();
        let request = self.series.fetch_historical_series(
            instrument,
            &self.config.history_period,
            &self.config.history_interval,
        );
        let samples = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| FundError::Timeout {
                operation: format!("history fetch for {instrument}"),
                after_ms: self.config.series_timeout_ms,
            })?
            .map_err(|e| e.into_series(instrument))?;

        if samples.is_empty() {
            return Err(FundError::EmptySeries {
                instrument: instrument.to_string(),
            });
        }
        debug!(instrument, samples = samples.len(), "history fetched");
        Ok(samples)
    }

    /// Fetch both histories, compute and store; `None` if discarded by a clear
    async fn compute_confirmed(
        &self,
        code: SchemeCode,
        generation: u64,
    ) -> FundResult<Option<Arc<FundDetails>>> {
        let Some(raw) = self.cache.raw(code) else {
            return Ok(None);
        };

        let instrument = code.to_string();
        let (fund, benchmark) = tokio::join!(
            self.fetch_series(&instrument),
            self.fetch_series(&self.config.benchmark_symbol)
        );
        let (fund, benchmark) = (fund?, benchmark?);

        let ratios = compute_ratios_from_prices(&fund, &benchmark, self.config.risk_free_rate_annual);
        debug_assert!(ratios.is_complete(), "ratio engine returned a partial set");
        Ok(self
            .cache
            .confirm(code, raw.with_ratios(ratios, RatioSource::Computed), generation))
    }

    /// Start the background computation for `code` unless one is running
    fn spawn_computation(&self, code: SchemeCode) {
        let Some(guard) = self.cache.try_begin_computation(code) else {
            debug!(scheme_code = %code, "ratio computation already in flight");
            return;
        };

        let service = self.clone();
        tokio::spawn(async move {
            let outcome = service.compute_confirmed(code, guard.generation()).await;
            drop(guard);

            let event = match outcome {
                Ok(Some(details)) => {
                    info!(scheme_code = %code, "computed ratios confirmed");
                    FundEvent::RatiosConfirmed {
                        scheme_code: code,
                        details,
                    }
                }
                Ok(None) => {
                    debug!(scheme_code = %code, "cache cleared during computation, result discarded");
                    return;
                }
                Err(e) => {
                    warn!(scheme_code = %code, error = %e, "ratio computation failed, keeping placeholder");
                    FundEvent::RatiosUnavailable {
                        scheme_code: code,
                        reason: e.to_string(),
                    }
                }
            };
            // No subscribers is fine
            let _ = service.events.send(event);
        });
    }
}

#[async_trait]
impl FundDetailsService for FundDetailsServiceImpl {
    async fn get_mutual_fund_details(&self, code: SchemeCode) -> FundResult<Arc<FundDetails>> {
        if let Some(confirmed) = self.cache.confirmed(code) {
            return Ok(confirmed);
        }
        if let Some(placeholder) = self.cache.placeholder(code) {
            self.spawn_computation(code);
            return Ok(placeholder);
        }

        let lock = self.cache.key_lock(code);
        let guard = lock.lock().await;

        // Another request may have finished first access while we waited
        if let Some(confirmed) = self.cache.confirmed(code) {
            return Ok(confirmed);
        }
        if let Some(placeholder) = self.cache.placeholder(code) {
            drop(guard);
            self.spawn_computation(code);
            return Ok(placeholder);
        }

        let raw = match self.cache.raw(code) {
            Some(raw) => raw,
            None => {
                let fetched = self.fetch_metadata(code).await?;
                info!(scheme_code = %code, "fund metadata fetched");
                self.cache.insert_raw(code, fetched)
            }
        };

        let ratios = self.placeholders.generate_or_get_cached(code);
        let placeholder = self
            .cache
            .insert_placeholder(code, raw.with_ratios(ratios, RatioSource::Placeholder));
        drop(guard);

        self.spawn_computation(code);
        Ok(placeholder)
    }

    fn get_latest_fund_details(&self, code: SchemeCode) -> Option<Arc<FundDetails>> {
        self.cache.latest(code)
    }

    fn clear_cache(&self) {
        // Pinned placeholder sets survive; a code is never re-randomized
        self.cache.clear();
        self.catalog.reset();
        info!(generation = self.cache.generation(), "fund caches cleared");
    }

    fn subscribe_events(&self) -> broadcast::Receiver<FundEvent> {
        self.events.subscribe()
    }

    async fn wait_for_confirmed(
        &self,
        code: SchemeCode,
        within: Duration,
    ) -> Option<Arc<FundDetails>> {
        // Subscribe before checking so a confirmation in between is not missed
        let mut events = self.events.subscribe();
        if let Some(confirmed) = self.cache.confirmed(code) {
            return Some(confirmed);
        }

        let wait = async {
            loop {
                match events.recv().await {
                    Ok(FundEvent::RatiosConfirmed {
                        scheme_code,
                        details,
                    }) if scheme_code == code => return Some(details),
                    Ok(FundEvent::RatiosUnavailable { scheme_code, .. }) if scheme_code == code => {
                        return None;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "event receiver lagged");
                        if let Some(confirmed) = self.cache.confirmed(code) {
                            return Some(confirmed);
                        }
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        };

        tokio::time::timeout(within, wait).await.ok().flatten()
    }

    async fn all_funds(&self) -> FundResult<Arc<Vec<FundSummary>>> {
        self.catalog.all_funds().await
    }

    async fn popular_funds(&self) -> FundResult<Vec<FundSummary>> {
        self.catalog.popular_funds().await
    }

    async fn top_performing_funds(&self) -> FundResult<Vec<FundSummary>> {
        self.catalog.top_performing_funds().await
    }

    async fn market_indices(&self, force_refresh: bool) -> Vec<IndexQuote> {
        self.market.fetch_indices(force_refresh).await
    }
}
