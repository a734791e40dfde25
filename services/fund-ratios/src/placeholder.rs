//! Placeholder ratio generation
//!
//! Before real ratios are available each fund is shown a plausible random
//! ratio set. The set is drawn once per scheme code and then pinned, so every
//! consumer of the same fund sees the same numbers.

use common::{RatioSet, SchemeCode, round2};
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

/// Uniform draw ranges per field
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const EXPENSE_RATIO: RangeInclusive<f64> = 0.5..=2.0;
    pub const SHARPE_RATIO: RangeInclusive<f64> = 0.8..=2.0;
    pub const BETA: RangeInclusive<f64> = 0.7..=1.3;
    pub const ALPHA: RangeInclusive<f64> = -2.0..=4.0;
    pub const STANDARD_DEVIATION: RangeInclusive<f64> = 10.0..=25.0;
    pub const SORTINO_RATIO: RangeInclusive<f64> = 0.6..=2.0;
    pub const INFORMATION_RATIO: RangeInclusive<f64> = -0.5..=1.5;
    pub const TRACKING_ERROR: RangeInclusive<f64> = 2.0..=8.0;
    pub const PE_RATIO: RangeInclusive<f64> = 15.0..=40.0;
    pub const PB_RATIO: RangeInclusive<f64> = 1.0..=5.0;
}

/// Draws and pins placeholder ratio sets per scheme code
pub struct PlaceholderGenerator {
    cache: DashMap<SchemeCode, RatioSet>,
    rng: Mutex<StdRng>,
    draws: AtomicU64,
}

impl std::fmt::Debug for PlaceholderGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderGenerator")
            .field("cached", &self.cache.len())
            .field("draws", &self.draws.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderGenerator {
    /// Generator seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible generator for tests and replays
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            cache: DashMap::new(),
            rng: Mutex::new(rng),
            draws: AtomicU64::new(0),
        }
    }

    /// Pinned ratio set for `code`, drawing it on first request
    ///
    /// The draw happens under the map's entry lock, so concurrent first
    /// requests for the same code observe a single draw.
    pub fn generate_or_get_cached(&self, code: SchemeCode) -> RatioSet {
        *self.cache.entry(code).or_insert_with(|| {
            self.draws.fetch_add(1, Ordering::Relaxed);
            let ratios = self.draw();
            tracing::debug!(scheme_code = %code, "drew placeholder ratios");
            ratios
        })
    }

    /// Pinned ratio set for `code`, if one was drawn
    #[must_use]
    pub fn cached(&self, code: SchemeCode) -> Option<RatioSet> {
        self.cache.get(&code).map(|entry| *entry)
    }

    /// Number of sets drawn since creation
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.draws.load(Ordering::Relaxed)
    }

    fn draw(&self) -> RatioSet {
        let mut rng = self.rng.lock();
        let mut sample = |range: RangeInclusive<f64>| Some(round2(rng.gen_range(range)));
        RatioSet {
            expense_ratio: sample(ranges::EXPENSE_RATIO),
            sharpe_ratio: sample(ranges::SHARPE_RATIO),
            beta: sample(ranges::BETA),
            alpha: sample(ranges::ALPHA),
            standard_deviation: sample(ranges::STANDARD_DEVIATION),
            sortino_ratio: sample(ranges::SORTINO_RATIO),
            information_ratio: sample(ranges::INFORMATION_RATIO),
            tracking_error: sample(ranges::TRACKING_ERROR),
            pe_ratio: sample(ranges::PE_RATIO),
            pb_ratio: sample(ranges::PB_RATIO),
        }
    }
}
