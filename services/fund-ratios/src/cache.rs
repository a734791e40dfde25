//! Tiered per-fund cache
//!
//! Three tiers keyed by scheme code: raw metadata, details with placeholder
//! ratios and details with computed ratios. Tiers are populated at most once
//! per code and only [`RatioCache::clear`] removes entries. The cache also
//! carries the per-code locks and in-flight markers the service uses to keep
//! first access and background computation single-flight.

use common::{FundDetails, SchemeCode};
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cache occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub raw: usize,
    pub placeholder: usize,
    pub confirmed: usize,
    pub in_flight: usize,
    pub key_locks: usize,
    pub generation: u64,
}

/// Tiered fund details cache
#[derive(Default)]
pub struct RatioCache {
    raw: DashMap<SchemeCode, Arc<FundDetails>>,
    placeholder: DashMap<SchemeCode, Arc<FundDetails>>,
    confirmed: DashMap<SchemeCode, Arc<FundDetails>>,
    key_locks: Arc<DashMap<SchemeCode, Arc<tokio::sync::Mutex<()>>>>,
    /// Running computations, tagged with the generation they started in
    in_flight: Arc<DashSet<(SchemeCode, u64)>>,
    generation: AtomicU64,
}

impl std::fmt::Debug for RatioCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatioCache").field("stats", &self.stats()).finish()
    }
}

impl RatioCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw metadata for `code`
    #[must_use]
    pub fn raw(&self, code: SchemeCode) -> Option<Arc<FundDetails>> {
        self.raw.get(&code).map(|entry| Arc::clone(&entry))
    }

    /// Store raw metadata unless present; returns the stored record
    pub fn insert_raw(&self, code: SchemeCode, details: FundDetails) -> Arc<FundDetails> {
        Arc::clone(&self.raw.entry(code).or_insert_with(|| Arc::new(details)))
    }

    /// Details carrying placeholder ratios for `code`
    #[must_use]
    pub fn placeholder(&self, code: SchemeCode) -> Option<Arc<FundDetails>> {
        self.placeholder.get(&code).map(|entry| Arc::clone(&entry))
    }

    /// Store placeholder details unless present; returns the stored record
    pub fn insert_placeholder(&self, code: SchemeCode, details: FundDetails) -> Arc<FundDetails> {
        Arc::clone(&self.placeholder.entry(code).or_insert_with(|| Arc::new(details)))
    }

    /// Details carrying computed ratios for `code`
    #[must_use]
    pub fn confirmed(&self, code: SchemeCode) -> Option<Arc<FundDetails>> {
        self.confirmed.get(&code).map(|entry| Arc::clone(&entry))
    }

    /// Store computed details if the cache was not cleared since `generation`
    ///
    /// Returns the stored record, or `None` when the write was discarded
    /// because the cache was cleared in the meantime. An existing confirmed
    /// entry is never replaced.
    pub fn confirm(
        &self,
        code: SchemeCode,
        details: FundDetails,
        generation: u64,
    ) -> Option<Arc<FundDetails>> {
        let entry = self.confirmed.entry(code);
        // Checked while holding the shard lock; clear() bumps the generation
        // before emptying the maps.
        if self.generation() != generation {
            return None;
        }
        Some(Arc::clone(&entry.or_insert_with(|| Arc::new(details))))
    }

    /// Best available details: computed, else placeholder
    #[must_use]
    pub fn latest(&self, code: SchemeCode) -> Option<Arc<FundDetails>> {
        self.confirmed(code).or_else(|| self.placeholder(code))
    }

    /// Lock serialising first access for `code`
    ///
    /// The entry is shared by every live handle for the code and removed when
    /// the last one drops.
    #[must_use]
    pub fn key_lock(&self, code: SchemeCode) -> KeyLock {
        let lock = Arc::clone(&self.key_locks.entry(code).or_default());
        KeyLock {
            code,
            lock,
            locks: Arc::clone(&self.key_locks),
        }
    }

    /// Mark a background computation for `code` as running
    ///
    /// Returns `None` when one started in the current generation is already
    /// running. A computation left over from before a clear does not block a
    /// new one. The marker is removed when the returned guard drops.
    #[must_use]
    pub fn try_begin_computation(&self, code: SchemeCode) -> Option<InFlightGuard> {
        let generation = self.generation();
        if !self.in_flight.insert((code, generation)) {
            return None;
        }
        Some(InFlightGuard {
            code,
            generation,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Whether any background computation for `code` is running
    #[must_use]
    pub fn is_computing(&self, code: SchemeCode) -> bool {
        self.in_flight.iter().any(|entry| entry.key().0 == code)
    }

    /// Current cache generation; bumped by every clear
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Drop every tier for every code
    ///
    /// Running computations keep their in-flight markers until they finish,
    /// but their results are discarded by [`RatioCache::confirm`] and they no
    /// longer block computations started afterwards.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.raw.clear();
        self.placeholder.clear();
        self.confirmed.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            raw: self.raw.len(),
            placeholder: self.placeholder.len(),
            confirmed: self.confirmed.len(),
            in_flight: self.in_flight.len(),
            key_locks: self.key_locks.len(),
            generation: self.generation(),
        }
    }
}

/// Shared handle on one code's first-access lock
#[derive(Debug)]
pub struct KeyLock {
    code: SchemeCode,
    lock: Arc<tokio::sync::Mutex<()>>,
    locks: Arc<DashMap<SchemeCode, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLock {
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        // The map and this handle hold two references; more means another
        // request still needs the entry. Runs under the shard lock, so no
        // handle can be created in between.
        self.locks.remove_if(&self.code, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) <= 2
        });
    }
}

/// In-flight marker for one background computation
#[derive(Debug)]
pub struct InFlightGuard {
    code: SchemeCode,
    generation: u64,
    in_flight: Arc<DashSet<(SchemeCode, u64)>>,
}

impl InFlightGuard {
    #[must_use]
    pub fn code(&self) -> SchemeCode {
        self.code
    }

    /// Cache generation observed when the computation started
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&(self.code, self.generation));
    }
}
