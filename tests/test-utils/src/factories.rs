//! Factory patterns for generating test data

use chrono::{Months, NaiveDate};
use common::{
    FundDetails, FundMeta, FundSummary, NAV_DATE_FORMAT, NavPoint, PriceSample, RatioSet,
    RatioSource, SchemeCode,
};
use fake::Fake;
use fake::faker::company::en::CompanyName;

/// First sample date used by the series factories
pub fn series_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

/// Monthly price samples with the given closes, starting at [`series_start`]
pub fn monthly_prices(closes: &[f64]) -> Vec<PriceSample> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let date = series_start()
                .checked_add_months(Months::new(i as u32))
                .unwrap_or_else(series_start);
            PriceSample::new(date.format("%Y-%m-%d").to_string(), close)
        })
        .collect()
}

/// Monthly prices compounding `returns` from `start_price`
///
/// The result has `returns.len() + 1` samples.
pub fn prices_from_returns(start_price: f64, returns: &[f64]) -> Vec<PriceSample> {
    let mut closes = Vec::with_capacity(returns.len() + 1);
    closes.push(start_price);
    let mut price = start_price;
    for r in returns {
        price *= 1.0 + r;
        closes.push(price);
    }
    monthly_prices(&closes)
}

/// Builder for raw fund records as the fund API returns them
#[derive(Debug, Clone)]
pub struct FundDetailsFactory {
    code: SchemeCode,
    name: Option<String>,
    fund_house: String,
    category: String,
    navs: Vec<(String, String)>,
}

impl FundDetailsFactory {
    pub fn new(code: u32) -> Self {
        Self {
            code: SchemeCode::new(code),
            name: None,
            fund_house: "Test Mutual Fund".to_string(),
            category: "Equity Scheme - Large Cap Fund".to_string(),
            navs: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// NAV history, newest first like the fund API
    pub fn with_navs(mut self, navs: &[(&str, &str)]) -> Self {
        self.navs = navs
            .iter()
            .map(|(date, nav)| ((*date).to_string(), (*nav).to_string()))
            .collect();
        self
    }

    /// Monthly NAV history from `closes`, newest first
    pub fn with_monthly_navs(mut self, closes: &[f64]) -> Self {
        self.navs = closes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, close)| {
                let date = series_start()
                    .checked_add_months(Months::new(i as u32))
                    .unwrap_or_else(series_start);
                (date.format(NAV_DATE_FORMAT).to_string(), format!("{close:.4}"))
            })
            .collect();
        self
    }

    pub fn build(&self) -> FundDetails {
        let scheme_name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("{} Growth", CompanyName().fake::<String>()));
        FundDetails {
            meta: FundMeta {
                fund_house: self.fund_house.clone(),
                scheme_type: "Open Ended Schemes".to_string(),
                scheme_category: self.category.clone(),
                scheme_code: self.code,
                scheme_name,
                isin_growth: Some(format!("INF{:09}", self.code.as_u32())),
                isin_div_reinvestment: None,
                ratios: RatioSet::default(),
            },
            data: self
                .navs
                .iter()
                .map(|(date, nav)| NavPoint {
                    date: date.clone(),
                    nav: nav.clone(),
                })
                .collect(),
            ratio_source: RatioSource::None,
        }
    }

    pub fn build_summary(&self) -> FundSummary {
        let details = self.build();
        FundSummary {
            scheme_code: self.code,
            scheme_name: details.meta.scheme_name,
            isin_growth: details.meta.isin_growth,
            isin_div_reinvestment: None,
        }
    }
}

/// Fund list entries for codes `1..=count`
pub fn fund_list(count: u32) -> Vec<FundSummary> {
    (1..=count)
        .map(|code| {
            FundDetailsFactory::new(code)
                .with_name(format!("Scheme {code}"))
                .build_summary()
        })
        .collect()
}
