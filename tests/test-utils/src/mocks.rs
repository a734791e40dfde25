//! Mock collaborators for testing
//!
//! Each mock counts its calls so tests can assert single-flight behaviour,
//! and can be slowed down or gated to hold a request open.

use async_trait::async_trait;
use common::{FundDetails, FundSummary, IndexQuote, PriceSample, SchemeCode};
use fund_ratios::{
    FundError, FundMetadataSource, FundResult, HistoricalSeriesSource, IndexQuoteSource,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

const OPEN_GATE_PERMITS: usize = 1 << 20;

/// Latch that holds calls until opened
#[derive(Debug, Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Gate {
    /// A closed gate
    pub fn closed() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let every current and future caller through
    pub fn open(&self) {
        self.permits.add_permits(OPEN_GATE_PERMITS);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// Fund metadata source backed by an in-memory table
#[derive(Debug, Default)]
pub struct MockMetadataSource {
    funds: RwLock<HashMap<SchemeCode, FundDetails>>,
    list: RwLock<Vec<FundSummary>>,
    delay: RwLock<Option<Duration>>,
    failing: AtomicBool,
    metadata_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `details` for its scheme code
    pub fn with_fund(self, details: FundDetails) -> Self {
        self.funds.write().insert(details.scheme_code(), details);
        self
    }

    /// Serve `funds` as the fund list
    pub fn with_list(self, funds: Vec<FundSummary>) -> Self {
        *self.list.write() = funds;
        self
    }

    /// Sleep before answering
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write() = Some(delay);
        self
    }

    /// Make every call fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl FundMetadataSource for MockMetadataSource {
    async fn fetch_fund_metadata(&self, code: SchemeCode) -> FundResult<FundDetails> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(FundError::Http("mock metadata source is failing".to_string()));
        }
        self.funds
            .read()
            .get(&code)
            .cloned()
            .ok_or_else(|| FundError::Http(format!("404 for scheme {code}")))
    }

    async fn fetch_fund_list(&self) -> FundResult<Vec<FundSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(FundError::Http("mock metadata source is failing".to_string()));
        }
        Ok(self.list.read().clone())
    }
}

/// Scripted answer for one instrument
#[derive(Debug, Clone)]
pub enum SeriesScript {
    Prices(Vec<PriceSample>),
    Fail(String),
    /// Never answers; exercises the caller's timeout
    Hang,
}

/// Historical series source answering from per-instrument scripts
///
/// Unscripted instruments receive an empty series.
#[derive(Debug, Default)]
pub struct MockSeriesSource {
    scripts: RwLock<HashMap<String, SeriesScript>>,
    calls: RwLock<HashMap<String, usize>>,
    total_calls: AtomicUsize,
    delay: RwLock<Option<Duration>>,
    gate: RwLock<Option<Gate>>,
}

impl MockSeriesSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(self, instrument: impl Into<String>, prices: Vec<PriceSample>) -> Self {
        self.script(instrument, SeriesScript::Prices(prices));
        self
    }

    pub fn with_failure(self, instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        self.script(instrument, SeriesScript::Fail(reason.into()));
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write() = Some(delay);
        self
    }

    /// Hold every call until `gate` opens
    pub fn with_gate(self, gate: Gate) -> Self {
        *self.gate.write() = Some(gate);
        self
    }

    /// Replace the script for `instrument`
    pub fn script(&self, instrument: impl Into<String>, script: SeriesScript) {
        self.scripts.write().insert(instrument.into(), script);
    }

    /// Calls made for `instrument`
    pub fn calls_for(&self, instrument: &str) -> usize {
        self.calls.read().get(instrument).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoricalSeriesSource for MockSeriesSource {
    async fn fetch_historical_series(
        &self,
        instrument: &str,
        _period: &str,
        _interval: &str,
    ) -> FundResult<Vec<PriceSample>> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.write().entry(instrument.to_string()).or_default() += 1;

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let gate = self.gate.read().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        let script = self.scripts.read().get(instrument).cloned();
        match script {
            None => Ok(Vec::new()),
            Some(SeriesScript::Prices(prices)) => Ok(prices),
            Some(SeriesScript::Fail(reason)) => Err(FundError::Http(reason)),
            Some(SeriesScript::Hang) => std::future::pending().await,
        }
    }
}

/// Index quote source with fixed prices; unknown symbols fail
#[derive(Debug, Default)]
pub struct MockQuoteSource {
    prices: RwLock<HashMap<String, (f64, f64)>>,
    calls: AtomicUsize,
}

impl MockQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote `symbol` at `price` with `change_percent`
    pub fn with_quote(self, symbol: &str, price: f64, change_percent: f64) -> Self {
        self.prices
            .write()
            .insert(symbol.to_string(), (price, change_percent));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexQuoteSource for MockQuoteSource {
    async fn fetch_index_quote(&self, symbol: &str, name: &str) -> FundResult<IndexQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let quote = self.prices.read().get(symbol).copied();
        let (price, change_percent) =
            quote.ok_or_else(|| FundError::Http(format!("no quote for {symbol}")))?;
        Ok(IndexQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change: price * change_percent / 100.0,
            change_percent,
        })
    }
}
