//! Test fixtures for common test data

use crate::factories::{FundDetailsFactory, prices_from_returns};
use common::{FundDetails, PriceSample, SchemeCode};
use rstest::*;

/// Scheme code used by most service tests
pub const TEST_SCHEME_CODE: u32 = 123;

/// Benchmark symbol used by the default configuration
pub const TEST_BENCHMARK: &str = "^NSEI";

#[fixture]
pub fn scheme_code() -> SchemeCode {
    SchemeCode::new(TEST_SCHEME_CODE)
}

/// Raw record for [`TEST_SCHEME_CODE`]
#[fixture]
pub fn raw_fund() -> FundDetails {
    FundDetailsFactory::new(TEST_SCHEME_CODE)
        .with_name("Test Bluechip Fund - Direct Plan - Growth")
        .build()
}

/// Paired monthly return series with hand-checked ratios
#[derive(Debug, Clone)]
pub struct ReturnsFixture {
    pub fund: Vec<f64>,
    pub benchmark: Vec<f64>,
    pub risk_free_rate: f64,
}

impl ReturnsFixture {
    pub fn fund_prices(&self) -> Vec<PriceSample> {
        prices_from_returns(100.0, &self.fund)
    }

    pub fn benchmark_prices(&self) -> Vec<PriceSample> {
        prices_from_returns(20_000.0, &self.benchmark)
    }
}

/// Three months of fund and benchmark returns at 5.5% annual risk-free rate
#[fixture]
pub fn three_month_returns() -> ReturnsFixture {
    ReturnsFixture {
        fund: vec![0.01, 0.02, -0.01],
        benchmark: vec![0.005, 0.01, 0.0],
        risk_free_rate: 0.055,
    }
}

/// A year of monthly returns for a fund tracking its benchmark loosely
#[fixture]
pub fn twelve_month_returns() -> ReturnsFixture {
    ReturnsFixture {
        fund: vec![
            0.021, -0.013, 0.034, 0.008, -0.027, 0.015, 0.011, 0.029, -0.006, 0.018, -0.011, 0.024,
        ],
        benchmark: vec![
            0.017, -0.009, 0.025, 0.006, -0.021, 0.012, 0.009, 0.022, -0.004, 0.014, -0.008, 0.019,
        ],
        risk_free_rate: 0.055,
    }
}
