//! Aggregate statistics over an entire indicator series.

use std::fmt;

use serde::Serialize;

use crate::engine::IndicatorSeries;
use crate::stats;

/// Number of trailing rows inspected for the recent direction.
pub const TREND_LOOKBACK: usize = 10;

/// Direction of the most recent rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// The last rate is above the first rate of the lookback.
    Up,
    /// Anything else, including an unchanged rate.
    Down,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

/// Whole-range statistics of the rate column plus a few indicator readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of rows summarized.
    pub observations: usize,
    /// Most recent rate.
    pub latest: f64,
    /// Rate before the most recent one (equals `latest` for a single row).
    pub previous: f64,
    /// `latest - previous`.
    pub change: f64,
    /// Change relative to `previous` in percent; `0` when `previous` is zero.
    pub change_pct: f64,
    /// Lowest rate.
    pub min: f64,
    /// Highest rate.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// Mean rate.
    pub mean: f64,
    /// Median rate.
    pub median: f64,
    /// Population standard deviation of the rate.
    pub std_dev: f64,
    /// Standard deviation relative to the mean.
    pub coefficient_of_variation: Option<f64>,
    /// Sample skewness.
    pub skewness: Option<f64>,
    /// Sample excess kurtosis.
    pub kurtosis: Option<f64>,
    /// Direction over the last [`TREND_LOOKBACK`] rows.
    pub recent_trend: TrendDirection,
    /// Population standard deviation of the defined daily returns.
    pub daily_return_std: Option<f64>,
    /// Rolling volatility on the latest row.
    pub latest_volatility: Option<f64>,
}

/// Summarizes `series`; `None` when it has no rows.
pub fn summarize(series: &IndicatorSeries) -> Option<Summary> {
    let rates = series.rates();
    let latest_row = series.latest()?;
    let latest = latest_row.rate;
    let previous = match rates.len() {
        0 | 1 => latest,
        len => rates[len - 2],
    };
    let change = latest - previous;
    let change_pct = if previous == 0.0 {
        0.0
    } else {
        change / previous * 100.0
    };

    let (min, max) = stats::min_max(&rates)?;
    let mean = stats::mean(&rates)?;
    let std_dev = stats::population_std(&rates)?;
    let returns: Vec<f64> = series.iter().filter_map(|row| row.daily_return).collect();

    Some(Summary {
        observations: rates.len(),
        latest,
        previous,
        change,
        change_pct,
        min,
        max,
        range: max - min,
        mean,
        median: stats::median(&rates)?,
        std_dev,
        coefficient_of_variation: (mean != 0.0).then(|| std_dev / mean),
        skewness: stats::skewness(&rates),
        kurtosis: stats::excess_kurtosis(&rates),
        recent_trend: recent_trend(&rates),
        daily_return_std: stats::population_std(&returns),
        latest_volatility: latest_row.volatility,
    })
}

fn recent_trend(rates: &[f64]) -> TrendDirection {
    let recent = &rates[rates.len().saturating_sub(TREND_LOOKBACK)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) if last > first => TrendDirection::Up,
        _ => TrendDirection::Down,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fxlens_core::{PricePoint, PriceSeries};

    use super::*;
    use crate::engine::compute;

    fn indicators(rates: &[f64]) -> IndicatorSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| PricePoint::new(start + chrono::Days::new(i as u64), *rate))
            .collect();
        compute(&PriceSeries::new(points).unwrap())
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert_eq!(summarize(&IndicatorSeries::default()), None);
    }

    #[test]
    fn single_row_compares_against_itself() {
        let summary = summarize(&indicators(&[150.0])).unwrap();
        assert_eq!(summary.previous, 150.0);
        assert_eq!(summary.change, 0.0);
        assert_eq!(summary.change_pct, 0.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.skewness, None);
        assert_eq!(summary.daily_return_std, None);
        assert_eq!(summary.recent_trend, TrendDirection::Down);
    }

    #[test]
    fn aggregates_whole_range() {
        let summary = summarize(&indicators(&[100.0, 101.0, 99.0, 102.0, 105.0])).unwrap();
        assert_eq!(summary.latest, 105.0);
        assert_eq!(summary.previous, 102.0);
        assert_eq!(summary.change, 3.0);
        assert!((summary.change_pct - 3.0 / 102.0 * 100.0).abs() < 1e-12);
        assert_eq!(summary.min, 99.0);
        assert_eq!(summary.max, 105.0);
        assert_eq!(summary.range, 6.0);
        assert_eq!(summary.median, 101.0);
        assert!((summary.mean - 101.4).abs() < 1e-9);
        assert_eq!(summary.recent_trend, TrendDirection::Up);
        assert!(summary.kurtosis.is_some());
    }

    #[test]
    fn trend_uses_only_last_ten_rows() {
        let mut rates = vec![200.0];
        rates.extend((0..10).map(|i| 150.0 - i as f64));
        rates.push(151.0);
        // last ten rows run from 149 to 151
        let summary = summarize(&indicators(&rates)).unwrap();
        assert_eq!(summary.recent_trend, TrendDirection::Up);
    }

    #[test]
    fn zero_previous_rate_reports_zero_percent() {
        let summary = summarize(&indicators(&[0.0, 1.0])).unwrap();
        assert_eq!(summary.change, 1.0);
        assert_eq!(summary.change_pct, 0.0);
    }

    #[test]
    fn unbounded_return_leaves_dispersion_undefined() {
        let out = indicators(&[0.0, 1.0, 1.1, 1.2]);
        assert_eq!(out.rows()[1].daily_return, Some(f64::INFINITY));
        let summary = summarize(&out).unwrap();
        assert_eq!(summary.daily_return_std, None);
        assert!(summary.skewness.is_some_and(f64::is_finite));
        assert!(summary.kurtosis.is_some_and(f64::is_finite));
    }
}
