//! Side-by-side metrics, rebased rates, and rate correlation across pairs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use fxlens_core::CurrencyPair;
use serde::Serialize;

use crate::engine::IndicatorSeries;
use crate::stats;
use crate::summary::summarize;

/// Base value that normalized series start from.
pub const NORMALIZED_BASE: f64 = 100.0;

/// Headline metrics for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairMetrics {
    /// Pair the metrics describe.
    pub pair: CurrencyPair,
    /// Number of observations.
    pub observations: usize,
    /// Most recent rate.
    pub current: f64,
    /// Change against the previous observation.
    pub change: f64,
    /// Change against the previous observation, in percent.
    pub change_pct: f64,
    /// Highest rate in range.
    pub max: f64,
    /// Lowest rate in range.
    pub min: f64,
    /// Mean rate.
    pub mean: f64,
    /// Population standard deviation of the rate.
    pub std_dev: f64,
    /// Standard deviation relative to the mean.
    pub coefficient_of_variation: Option<f64>,
    /// Sample skewness of the rate.
    pub skewness: Option<f64>,
    /// Standard deviation of daily returns, in percent.
    pub volatility_pct: Option<f64>,
}

/// One rebased observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    /// Observation date.
    pub date: NaiveDate,
    /// Rate relative to the first rate, scaled to [`NORMALIZED_BASE`].
    pub value: Option<f64>,
}

/// Rates of one pair rebased so the first observation equals [`NORMALIZED_BASE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    /// Pair the series belongs to.
    pub pair: CurrencyPair,
    /// Rebased observations.
    pub points: Vec<NormalizedPoint>,
}

/// Symmetric matrix of pairwise Pearson correlations of rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column labels.
    pub pairs: Vec<CurrencyPair>,
    /// `values[i][j]` correlates `pairs[i]` with `pairs[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two pairs, if both are present and it is defined.
    pub fn between(&self, a: &CurrencyPair, b: &CurrencyPair) -> Option<f64> {
        let i = self.pairs.iter().position(|pair| pair == a)?;
        let j = self.pairs.iter().position(|pair| pair == b)?;
        self.values[i][j]
    }
}

/// Result of comparing several pairs over the same date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Metrics per pair, in input order.
    pub metrics: Vec<PairMetrics>,
    /// Rebased rate series per pair.
    pub normalized: Vec<NormalizedSeries>,
    /// Rate correlations.
    pub correlation: CorrelationMatrix,
}

/// Compares pairs; empty series are skipped.
///
/// Correlations only use dates observed for both pairs of a cell.
pub fn compare(inputs: &[(CurrencyPair, IndicatorSeries)]) -> Comparison {
    let inputs: Vec<_> = inputs
        .iter()
        .filter(|(_, series)| !series.is_empty())
        .collect();

    let metrics = inputs
        .iter()
        .filter_map(|(pair, series)| pair_metrics(pair, series))
        .collect();
    let normalized = inputs
        .iter()
        .map(|(pair, series)| normalize(pair, series))
        .collect();

    let by_date: Vec<BTreeMap<NaiveDate, f64>> = inputs
        .iter()
        .map(|(_, series)| series.iter().map(|row| (row.date, row.rate)).collect())
        .collect();
    let values = (0..by_date.len())
        .map(|i| {
            (0..by_date.len())
                .map(|j| correlate(&by_date[i], &by_date[j], i == j))
                .collect()
        })
        .collect();

    Comparison {
        metrics,
        normalized,
        correlation: CorrelationMatrix {
            pairs: inputs.iter().map(|(pair, _)| pair.clone()).collect(),
            values,
        },
    }
}

fn pair_metrics(pair: &CurrencyPair, series: &IndicatorSeries) -> Option<PairMetrics> {
    let summary = summarize(series)?;
    Some(PairMetrics {
        pair: pair.clone(),
        observations: summary.observations,
        current: summary.latest,
        change: summary.change,
        change_pct: summary.change_pct,
        max: summary.max,
        min: summary.min,
        mean: summary.mean,
        std_dev: summary.std_dev,
        coefficient_of_variation: summary.coefficient_of_variation,
        skewness: summary.skewness,
        volatility_pct: summary.daily_return_std.map(|std| std * 100.0),
    })
}

fn normalize(pair: &CurrencyPair, series: &IndicatorSeries) -> NormalizedSeries {
    let base = series.rows().first().map(|row| row.rate).unwrap_or_default();
    let points = series
        .iter()
        .map(|row| NormalizedPoint {
            date: row.date,
            value: (base != 0.0).then(|| row.rate * NORMALIZED_BASE / base),
        })
        .collect();
    NormalizedSeries {
        pair: pair.clone(),
        points,
    }
}

fn correlate(
    left: &BTreeMap<NaiveDate, f64>,
    right: &BTreeMap<NaiveDate, f64>,
    diagonal: bool,
) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = left
        .iter()
        .filter_map(|(date, x)| right.get(date).map(|y| (*x, *y)))
        .unzip();
    let correlation = stats::pearson(&xs, &ys)?;
    Some(if diagonal { 1.0 } else { correlation })
}
