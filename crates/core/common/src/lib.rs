//! Core types for the fund ratio workspace
//!
//! Shared by the ratio service, its HTTP collaborators and the test support
//! crate. Nothing here performs I/O.

pub mod categories;
pub mod fund;
pub mod market;
pub mod types;

pub use categories::{DEBT_SUBCATEGORIES, DebtSubcategory};
pub use fund::{FundDetails, FundMeta, FundSummary, NAV_DATE_FORMAT, NavPoint};
pub use market::IndexQuote;
pub use types::{
    ParseSchemeCodeError, PriceSample, RatioSet, RatioSource, ReturnSeries, SchemeCode, round2,
};
