//! Fund metadata and details as served by the fund API

use crate::types::{PriceSample, RatioSet, RatioSource, SchemeCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date layout used by the NAV history (`dd-mm-yyyy`)
pub const NAV_DATE_FORMAT: &str = "%d-%m-%Y";

/// Entry in the full fund list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    pub scheme_code: SchemeCode,
    pub scheme_name: String,
    #[serde(default)]
    pub isin_growth: Option<String>,
    #[serde(default)]
    pub isin_div_reinvestment: Option<String>,
}

/// Scheme metadata plus the ratios attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMeta {
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: SchemeCode,
    pub scheme_name: String,
    #[serde(default)]
    pub isin_growth: Option<String>,
    #[serde(default)]
    pub isin_div_reinvestment: Option<String>,
    #[serde(flatten)]
    pub ratios: RatioSet,
}

/// One NAV observation; the API reports NAV as a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: String,
    pub nav: String,
}

/// Full fund record: metadata, NAV history and ratio provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundDetails {
    pub meta: FundMeta,
    #[serde(default)]
    pub data: Vec<NavPoint>,
    #[serde(default)]
    pub ratio_source: RatioSource,
}

impl FundDetails {
    /// Scheme code of this fund
    #[must_use]
    pub fn scheme_code(&self) -> SchemeCode {
        self.meta.scheme_code
    }

    /// Ratios currently attached
    #[must_use]
    pub fn ratios(&self) -> &RatioSet {
        &self.meta.ratios
    }

    /// Copy of this record with `ratios` attached and tagged with `source`
    #[must_use]
    pub fn with_ratios(&self, ratios: RatioSet, source: RatioSource) -> Self {
        let mut details = self.clone();
        details.meta.ratios = ratios;
        details.ratio_source = source;
        details
    }

    /// Copy of this record with every ratio cleared
    #[must_use]
    pub fn without_ratios(&self) -> Self {
        self.with_ratios(RatioSet::default(), RatioSource::None)
    }

    /// NAV history as chronologically ordered price samples
    ///
    /// The API lists newest first. Rows whose date or NAV do not parse are
    /// dropped.
    #[must_use]
    pub fn nav_series(&self) -> Vec<PriceSample> {
        let mut dated: Vec<(NaiveDate, PriceSample)> = self
            .data
            .iter()
            .filter_map(|point| {
                let date = NaiveDate::parse_from_str(&point.date, NAV_DATE_FORMAT).ok()?;
                let nav = point.nav.trim().parse::<f64>().ok()?;
                Some((date, PriceSample::new(date.format("%Y-%m-%d").to_string(), nav)))
            })
            .collect();
        dated.sort_by_key(|(date, _)| *date);
        dated.into_iter().map(|(_, sample)| sample).collect()
    }
}
