//! Ratio engine
//!
//! Computes the displayed ratio set from a fund's return series and a
//! benchmark return series. Return values are decimal fractions
//! (0.01 = 1%) sampled monthly, so the annual risk-free rate is divided by 12.
//! All statistics are population statistics (divide by N).

use common::{PriceSample, RatioSet, round2};

use crate::returns::build_returns;

/// Expense ratio reported by the computed path until a data source exists
pub const FIXED_EXPENSE_RATIO: f64 = 1.5;
/// P/E reported by the computed path until a data source exists
pub const FIXED_PE_RATIO: f64 = 20.0;
/// P/B reported by the computed path until a data source exists
pub const FIXED_PB_RATIO: f64 = 3.0;
/// Denominator used for Sortino when no return falls below the risk-free rate
pub const DOWNSIDE_DEVIATION_FLOOR: f64 = 0.0001;
/// Sampling periods per year
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Ratio set served when either series is empty
pub const DEFAULT_RATIOS: RatioSet = RatioSet {
    expense_ratio: Some(FIXED_EXPENSE_RATIO),
    sharpe_ratio: Some(1.0),
    beta: Some(1.0),
    alpha: Some(0.0),
    standard_deviation: Some(15.0),
    sortino_ratio: Some(1.0),
    information_ratio: Some(0.0),
    tracking_error: Some(5.0),
    pe_ratio: Some(FIXED_PE_RATIO),
    pb_ratio: Some(FIXED_PB_RATIO),
};

/// Compute the full ratio set
///
/// Either series empty yields [`DEFAULT_RATIOS`]. Otherwise the series are
/// aligned with [`align_by_position_truncating`] and every statistic is taken
/// over the aligned pair. Degenerate inputs fall back to fixed values rather
/// than producing NaN or infinity:
/// - zero benchmark variance: beta 1.0
/// - zero fund deviation: Sharpe 1.0
/// - nothing below the risk-free rate: Sortino denominator 0.0001
/// - zero tracking error: information ratio 0.0
#[must_use]
pub fn compute_ratios(
    fund_returns: &[f64],
    benchmark_returns: &[f64],
    risk_free_rate_annual: f64,
) -> RatioSet {
    if fund_returns.is_empty() || benchmark_returns.is_empty() {
        return DEFAULT_RATIOS;
    }

    let (fund, benchmark) = align_by_position_truncating(fund_returns, benchmark_returns);
    let rf = risk_free_rate_annual / PERIODS_PER_YEAR;

    let fund_mean = mean(fund);
    let benchmark_mean = mean(benchmark);
    let fund_sd = std_dev(fund);

    let benchmark_variance = variance(benchmark);
    let beta = if benchmark_variance > 0.0 {
        covariance(fund, benchmark) / benchmark_variance
    } else {
        1.0
    };

    let alpha = fund_mean - (rf + beta * (benchmark_mean - rf));

    let sharpe = if fund_sd > 0.0 {
        (fund_mean - rf) / fund_sd
    } else {
        1.0
    };

    let sortino = (fund_mean - rf) / downside_deviation(fund, rf);

    let active: Vec<f64> = fund.iter().zip(benchmark).map(|(f, b)| f - b).collect();
    let tracking_error = std_dev(&active);
    let information_ratio = if tracking_error > 0.0 {
        (fund_mean - benchmark_mean) / tracking_error
    } else {
        0.0
    };

    RatioSet {
        expense_ratio: Some(round2(FIXED_EXPENSE_RATIO)),
        sharpe_ratio: Some(round2(sharpe)),
        beta: Some(round2(beta)),
        alpha: Some(round2(alpha)),
        standard_deviation: Some(round2(fund_sd)),
        sortino_ratio: Some(round2(sortino)),
        information_ratio: Some(round2(information_ratio)),
        tracking_error: Some(round2(tracking_error)),
        pe_ratio: Some(FIXED_PE_RATIO),
        pb_ratio: Some(FIXED_PB_RATIO),
    }
}

/// Price series convenience wrapper around [`compute_ratios`]
#[must_use]
pub fn compute_ratios_from_prices(
    fund_prices: &[PriceSample],
    benchmark_prices: &[PriceSample],
    risk_free_rate_annual: f64,
) -> RatioSet {
    compute_ratios(
        &build_returns(fund_prices),
        &build_returns(benchmark_prices),
        risk_free_rate_annual,
    )
}

/// Pair the series index by index, dropping the tail of the longer one
///
/// No date matching happens here: callers must supply series sampled at the
/// same frequency from the same start date.
#[must_use]
pub fn align_by_position_truncating<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let len = a.len().min(b.len());
    (&a[..len], &b[..len])
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

#[allow(clippy::cast_precision_loss)]
fn covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let (ma, mb) = (mean(a), mean(b));
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / a.len() as f64
}

/// Root mean square shortfall below `threshold`, over the returns that fall
/// strictly below it
#[allow(clippy::cast_precision_loss)]
fn downside_deviation(returns: &[f64], threshold: f64) -> f64 {
    let below: Vec<f64> = returns.iter().copied().filter(|r| *r < threshold).collect();
    if below.is_empty() {
        return DOWNSIDE_DEVIATION_FLOOR;
    }
    let shortfall = below.iter().map(|r| (r - threshold).powi(2)).sum::<f64>() / below.len() as f64;
    shortfall.sqrt()
}
