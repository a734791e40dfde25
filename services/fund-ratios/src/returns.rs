//! Price series to return series conversion

use common::{PriceSample, ReturnSeries};

/// Simple period-over-period returns of `prices`
///
/// Pairs whose earlier price is not positive are skipped so one malformed
/// sample does not abort the whole series. Fewer than two samples yield an
/// empty series.
#[must_use]
pub fn build_returns(prices: &[PriceSample]) -> ReturnSeries {
    prices
        .windows(2)
        .filter(|pair| pair[0].price > 0.0)
        .map(|pair| (pair[1].price - pair[0].price) / pair[0].price)
        .collect()
}

/// Total compounded return of a return series
#[must_use]
pub fn cumulative_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}
