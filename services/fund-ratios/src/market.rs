//! Market index quotes with a short-lived cache

use crate::clients::IndexQuoteSource;
use common::IndexQuote;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Indices shown on the dashboard: (symbol, display name)
pub const TRACKED_INDICES: [(&str, &str); 3] = [
    ("^NSEI", "NIFTY 50"),
    ("^BSESN", "SENSEX"),
    ("^NSEBANK", "BANK NIFTY"),
];

/// Default freshness window
pub const DEFAULT_INDEX_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct Snapshot {
    quotes: Vec<IndexQuote>,
    fetched_at: Instant,
}

/// Cache of the tracked index quotes
pub struct MarketIndexCache {
    source: Arc<dyn IndexQuoteSource>,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl std::fmt::Debug for MarketIndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketIndexCache")
            .field("ttl", &self.ttl)
            .field("cached", &self.snapshot.read().as_ref().map(|s| s.quotes.len()))
            .finish()
    }
}

impl MarketIndexCache {
    #[must_use]
    pub fn new(source: Arc<dyn IndexQuoteSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    fn fresh(&self) -> Option<Vec<IndexQuote>> {
        let snapshot = self.snapshot.read();
        snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .map(|s| s.quotes.clone())
    }

    /// Quotes for the tracked indices
    ///
    /// Serves the cached quotes while fresh unless `force_refresh` is set.
    /// Indices that fail to fetch are skipped; the cache is replaced only when
    /// at least one index was fetched, otherwise the previous quotes (possibly
    /// none) are returned.
    pub async fn fetch_indices(&self, force_refresh: bool) -> Vec<IndexQuote> {
        if !force_refresh {
            if let Some(quotes) = self.fresh() {
                debug!("serving cached index quotes");
                return quotes;
            }
        }

        let mut quotes = Vec::with_capacity(TRACKED_INDICES.len());
        for (symbol, name) in TRACKED_INDICES {
            match self.source.fetch_index_quote(symbol, name).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => warn!(symbol, error = %e, "index quote unavailable"),
            }
        }

        if quotes.is_empty() {
            return self.cached().unwrap_or_default();
        }

        *self.snapshot.write() = Some(Snapshot {
            quotes: quotes.clone(),
            fetched_at: Instant::now(),
        });
        quotes
    }

    /// Last fetched quotes regardless of age
    #[must_use]
    pub fn cached(&self) -> Option<Vec<IndexQuote>> {
        self.snapshot.read().as_ref().map(|s| s.quotes.clone())
    }

    /// Last fetched quotes, or fixed fallback values when nothing was fetched
    #[must_use]
    pub fn cached_or_default(&self) -> Vec<IndexQuote> {
        self.cached().unwrap_or_else(default_quotes)
    }
}

/// Fallback quotes shown before any live data arrives
#[must_use]
pub fn default_quotes() -> Vec<IndexQuote> {
    let quote = |symbol: &str, name: &str, price: f64, change: f64, change_percent: f64| {
        IndexQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_percent,
        }
    };
    vec![
        quote("^NSEI", "NIFTY 50", 22_475.22, 138.49, 0.62),
        quote("^BSESN", "SENSEX", 73_906.15, 426.18, 0.58),
        quote("^NSEBANK", "BANK NIFTY", 48_285.45, -58.01, -0.12),
    ]
}
