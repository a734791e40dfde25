//! Fund catalog and favorites
//!
//! Holds the full fund list once loaded, the derived popular and top lists,
//! and the user's favorite funds.

use crate::clients::FundMetadataSource;
use crate::error::FundResult;
use common::{DebtSubcategory, FundSummary, SchemeCode};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Number of funds in the popular and top performing lists
pub const HIGHLIGHT_LIST_LEN: usize = 10;

/// In-memory fund catalog
pub struct FundCatalog {
    source: Arc<dyn FundMetadataSource>,
    funds: RwLock<Arc<Vec<FundSummary>>>,
    favorites: RwLock<Vec<FundSummary>>,
    loaded: AtomicBool,
    load_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for FundCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundCatalog")
            .field("funds", &self.funds.read().len())
            .field("favorites", &self.favorites.read().len())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl FundCatalog {
    #[must_use]
    pub fn new(source: Arc<dyn FundMetadataSource>) -> Self {
        Self {
            source,
            funds: RwLock::new(Arc::new(Vec::new())),
            favorites: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether the fund list has been loaded
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Load the full fund list unless already loaded
    ///
    /// On failure the catalog stays unloaded and the error is returned.
    pub async fn load_all_funds(&self) -> FundResult<()> {
        if self.is_loaded() {
            return Ok(());
        }
        let _guard = self.load_lock.lock().await;
        if self.is_loaded() {
            return Ok(());
        }

        match self.source.fetch_fund_list().await {
            Ok(funds) => {
                info!(count = funds.len(), "fund list loaded");
                *self.funds.write() = Arc::new(funds);
                self.loaded.store(true, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load fund list");
                Err(e)
            }
        }
    }

    /// Every fund, loading the list first if needed
    pub async fn all_funds(&self) -> FundResult<Arc<Vec<FundSummary>>> {
        self.load_all_funds().await?;
        Ok(Arc::clone(&self.funds.read()))
    }

    /// First funds of the list
    pub async fn popular_funds(&self) -> FundResult<Vec<FundSummary>> {
        let funds = self.all_funds().await?;
        Ok(funds.iter().take(HIGHLIGHT_LIST_LEN).cloned().collect())
    }

    /// Last funds of the list
    pub async fn top_performing_funds(&self) -> FundResult<Vec<FundSummary>> {
        let funds = self.all_funds().await?;
        let skip = funds.len().saturating_sub(HIGHLIGHT_LIST_LEN);
        Ok(funds[skip..].to_vec())
    }

    /// Loaded funds belonging to a debt sub-category, in table order
    pub async fn funds_in_subcategory(
        &self,
        subcategory: &DebtSubcategory,
    ) -> FundResult<Vec<FundSummary>> {
        let funds = self.all_funds().await?;
        Ok(subcategory
            .scheme_codes()
            .filter_map(|code| funds.iter().find(|f| f.scheme_code == code).cloned())
            .collect())
    }

    /// Add a fund to favorites; returns `false` if it was already there
    pub fn save_favorite(&self, fund: FundSummary) -> bool {
        let mut favorites = self.favorites.write();
        if favorites.contains(&fund) {
            return false;
        }
        favorites.push(fund);
        true
    }

    /// Remove a favorite by scheme code; returns whether one was removed
    pub fn remove_favorite(&self, code: SchemeCode) -> bool {
        let mut favorites = self.favorites.write();
        let before = favorites.len();
        favorites.retain(|f| f.scheme_code != code);
        favorites.len() != before
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<FundSummary> {
        self.favorites.read().clone()
    }

    /// Forget the loaded flag so the next access reloads the list
    pub fn reset(&self) {
        self.loaded.store(false, Ordering::Release);
    }
}
