//! Full-series indicator computation.

use chrono::NaiveDate;
use fxlens_core::{PricePoint, PriceSeries};
use serde::Serialize;

use crate::core::{Indicator, IndicatorError};
use crate::indicators::{
    BollingerBands, Directional, Macd, Rsi, RollingStdDev, SimpleReturn, Sma, Stochastic,
};

/// Short moving average window.
pub const MA_SHORT: usize = 5;
/// Medium moving average window (also the Bollinger middle band).
pub const MA_MEDIUM: usize = 20;
/// Long moving average window.
pub const MA_LONG: usize = 50;
/// Trend moving average window, the longest window in the engine.
pub const MA_TREND: usize = 200;
/// Bollinger band window.
pub const BOLLINGER_PERIOD: usize = 20;
/// Bollinger band width in standard deviations.
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;
/// RSI window.
pub const RSI_PERIOD: usize = 14;
/// MACD fast EMA span.
pub const MACD_FAST: usize = 12;
/// MACD slow EMA span.
pub const MACD_SLOW: usize = 26;
/// MACD signal EMA span.
pub const MACD_SIGNAL: usize = 9;
/// Stochastic %K window.
pub const STOCH_K_PERIOD: usize = 14;
/// Stochastic %D smoothing window.
pub const STOCH_D_PERIOD: usize = 3;
/// ATR, DI and ADX window.
pub const DIRECTIONAL_PERIOD: usize = 14;
/// Rolling volatility window.
pub const VOLATILITY_PERIOD: usize = 20;

/// One input observation enriched with every derived indicator.
///
/// `None` means the field has no value on this row, usually because the
/// window has not filled yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    /// Observation date.
    pub date: NaiveDate,
    /// Observed rate.
    pub rate: f64,
    /// 5-row simple moving average.
    pub ma_5: Option<f64>,
    /// 20-row simple moving average.
    pub ma_20: Option<f64>,
    /// 50-row simple moving average.
    pub ma_50: Option<f64>,
    /// 200-row simple moving average.
    pub ma_200: Option<f64>,
    /// Bollinger middle band.
    pub bb_middle: Option<f64>,
    /// Bollinger upper band.
    pub bb_upper: Option<f64>,
    /// Bollinger lower band.
    pub bb_lower: Option<f64>,
    /// Relative strength index.
    pub rsi: Option<f64>,
    /// MACD line.
    pub macd: Option<f64>,
    /// MACD signal line.
    pub macd_signal: Option<f64>,
    /// MACD minus signal.
    pub macd_histogram: Option<f64>,
    /// Stochastic %K.
    pub stoch_k: Option<f64>,
    /// Stochastic %D.
    pub stoch_d: Option<f64>,
    /// Average absolute day-over-day move.
    pub atr: Option<f64>,
    /// Upward directional indicator.
    pub di_plus: Option<f64>,
    /// Downward directional indicator.
    pub di_minus: Option<f64>,
    /// Directional index.
    pub dx: Option<f64>,
    /// Average directional index.
    pub adx: Option<f64>,
    /// Rolling population standard deviation of the rate.
    pub volatility: Option<f64>,
    /// Simple return against the previous row.
    pub daily_return: Option<f64>,
}

/// Indicator rows aligned one-to-one with the input series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndicatorSeries {
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    /// Number of rows (equal to the input length).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, oldest first.
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Iterates rows, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, IndicatorRow> {
        self.rows.iter()
    }

    /// Row at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&IndicatorRow> {
        self.rows.get(index)
    }

    /// Most recent row.
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// The last `count` rows (fewer if the series is shorter).
    pub fn tail(&self, count: usize) -> &[IndicatorRow] {
        &self.rows[self.rows.len().saturating_sub(count)..]
    }

    /// Rate column.
    pub fn rates(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.rate).collect()
    }

    /// Extracts one derived column.
    pub fn column<F>(&self, field: F) -> Vec<Option<f64>>
    where
        F: Fn(&IndicatorRow) -> Option<f64>,
    {
        self.rows.iter().map(field).collect()
    }
}

impl<'a> IntoIterator for &'a IndicatorSeries {
    type Item = &'a IndicatorRow;
    type IntoIter = std::slice::Iter<'a, IndicatorRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Computes the full indicator set over a [`PriceSeries`].
///
/// Each call starts from fresh indicator state, so identical input always
/// yields identical output.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    prototype: Pipeline,
}

impl IndicatorEngine {
    /// Creates an engine using the reference windows defined in this module.
    pub fn new() -> Self {
        Self {
            prototype: Pipeline::reference()
                .expect("reference indicator windows are non-zero and ordered"),
        }
    }

    /// Enriches every observation of `series`. Never fails: rows without
    /// enough history carry `None` in the affected fields.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSeries {
        let mut pipeline = self.prototype.clone();
        let rows = series.iter().map(|point| pipeline.next(point)).collect();
        IndicatorSeries { rows }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `IndicatorEngine::new().compute(series)`.
pub fn compute(series: &PriceSeries) -> IndicatorSeries {
    IndicatorEngine::new().compute(series)
}

#[derive(Debug, Clone)]
struct Pipeline {
    ma_short: Sma,
    ma_medium: Sma,
    ma_long: Sma,
    ma_trend: Sma,
    bands: BollingerBands,
    rsi: Rsi,
    macd: Macd,
    stochastic: Stochastic,
    directional: Directional,
    volatility: RollingStdDev,
    daily_return: SimpleReturn,
}

impl Pipeline {
    fn reference() -> Result<Self, IndicatorError> {
        Ok(Self {
            ma_short: Sma::new(MA_SHORT)?,
            ma_medium: Sma::new(MA_MEDIUM)?,
            ma_long: Sma::new(MA_LONG)?,
            ma_trend: Sma::new(MA_TREND)?,
            bands: BollingerBands::new(BOLLINGER_PERIOD, BOLLINGER_MULTIPLIER)?,
            rsi: Rsi::new(RSI_PERIOD)?,
            macd: Macd::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)?,
            stochastic: Stochastic::new(STOCH_K_PERIOD, STOCH_D_PERIOD)?,
            directional: Directional::new(DIRECTIONAL_PERIOD)?,
            volatility: RollingStdDev::new(VOLATILITY_PERIOD)?,
            daily_return: SimpleReturn::new(),
        })
    }

    fn next(&mut self, point: &PricePoint) -> IndicatorRow {
        let rate = point.rate;
        let bands = self.bands.next(rate);
        let macd = self.macd.next(rate);
        let stochastic = self.stochastic.next(rate);
        let directional = self.directional.next(rate);

        IndicatorRow {
            date: point.date,
            rate,
            ma_5: self.ma_short.next(rate),
            ma_20: self.ma_medium.next(rate),
            ma_50: self.ma_long.next(rate),
            ma_200: self.ma_trend.next(rate),
            bb_middle: bands.map(|b| b.middle),
            bb_upper: bands.map(|b| b.upper),
            bb_lower: bands.map(|b| b.lower),
            rsi: self.rsi.next(rate),
            macd: macd.map(|m| m.macd),
            macd_signal: macd.map(|m| m.signal),
            macd_histogram: macd.map(|m| m.histogram),
            stoch_k: stochastic.map(|s| s.k),
            stoch_d: stochastic.and_then(|s| s.d),
            atr: directional.map(|d| d.atr),
            di_plus: directional.and_then(|d| d.di_plus),
            di_minus: directional.and_then(|d| d.di_minus),
            dx: directional.and_then(|d| d.dx),
            adx: directional.and_then(|d| d.adx),
            volatility: self.volatility.next(rate),
            daily_return: self.daily_return.next(rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rates: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| PricePoint::new(start + chrono::Days::new(i as u64), *rate))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    #[test]
    fn worked_example_from_five_rows() {
        let out = compute(&series(&[100.0, 101.0, 99.0, 102.0, 105.0]));
        assert_eq!(out.len(), 5);
        assert_eq!(out.rows()[0].daily_return, None);
        assert_eq!(out.rows()[1].daily_return, Some(0.01));
        assert!(out.rows()[..4].iter().all(|row| row.ma_5.is_none()));
        assert!((out.rows()[4].ma_5.unwrap() - 101.4).abs() < 1e-9);
        assert!(out.rows().iter().all(|row| row.ma_20.is_none()));
    }

    #[test]
    fn first_defined_rows_follow_window_lengths() {
        let rates: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let out = compute(&series(&rates));
        let first = |field: fn(&IndicatorRow) -> Option<f64>| {
            out.iter().position(|row| field(row).is_some())
        };
        assert_eq!(first(|r| r.ma_20), Some(19));
        assert_eq!(first(|r| r.ma_50), Some(49));
        assert_eq!(first(|r| r.bb_upper), Some(19));
        assert_eq!(first(|r| r.rsi), Some(13));
        assert_eq!(first(|r| r.macd), Some(0));
        assert_eq!(first(|r| r.macd_signal), Some(0));
        assert_eq!(first(|r| r.stoch_k), Some(13));
        assert_eq!(first(|r| r.stoch_d), Some(15));
        assert_eq!(first(|r| r.atr), Some(14));
        assert_eq!(first(|r| r.di_plus), Some(14));
        assert_eq!(first(|r| r.adx), Some(27));
        assert_eq!(first(|r| r.volatility), Some(19));
        assert_eq!(first(|r| r.daily_return), Some(1));
        assert_eq!(first(|r| r.ma_200), None);
    }

    #[test]
    fn bollinger_middle_matches_medium_average() {
        let rates: Vec<f64> = (0..40).map(|i| 1.1 + (i % 7) as f64 * 0.01).collect();
        let out = compute(&series(&rates));
        for row in out.iter() {
            assert_eq!(row.bb_middle, row.ma_20);
        }
    }

    #[test]
    fn empty_series_yields_empty_output() {
        let out = compute(&PriceSeries::empty());
        assert!(out.is_empty());
        assert!(out.latest().is_none());
    }

    #[test]
    fn tail_clamps_to_length() {
        let out = compute(&series(&[1.0, 2.0, 3.0]));
        assert_eq!(out.tail(2).len(), 2);
        assert_eq!(out.tail(10).len(), 3);
        assert_eq!(out.tail(2)[0].rate, 2.0);
    }
}
