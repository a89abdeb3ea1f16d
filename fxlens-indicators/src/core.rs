//! Foundational traits, the rolling window buffer, and the crate error type.

use std::collections::VecDeque;
use std::fmt::Display;

use thiserror::Error;

/// A streaming indicator that consumes one observation at a time.
pub trait Indicator {
    /// Observation type fed into the indicator.
    type Input;
    /// Value produced once enough history has been observed.
    type Output;

    /// Pushes the next observation and returns the current reading, if any.
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Discards all accumulated history.
    fn reset(&mut self);
}

/// Anything that can be read as a (possibly missing) numeric observation.
pub trait Input {
    /// Returns the numeric value, or `None` when the observation carries no value.
    fn value(&self) -> Option<f64>;
}

impl Input for f64 {
    fn value(&self) -> Option<f64> {
        (!self.is_nan()).then_some(*self)
    }
}

impl Input for Option<f64> {
    fn value(&self) -> Option<f64> {
        self.and_then(|value| value.value())
    }
}

/// Errors raised while configuring indicators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A window or span of zero (or otherwise unusable length) was supplied.
    #[error("{indicator}: invalid period {period}")]
    InvalidPeriod {
        /// Indicator that rejected the value.
        indicator: &'static str,
        /// Offending period.
        period: usize,
    },
    /// A non-period parameter is outside its domain.
    #[error("{indicator}: invalid {parameter} = {value}")]
    InvalidParameter {
        /// Indicator that rejected the value.
        indicator: &'static str,
        /// Name of the parameter.
        parameter: &'static str,
        /// Rendered offending value.
        value: String,
    },
}

impl IndicatorError {
    /// Builds an [`IndicatorError::InvalidPeriod`].
    pub fn invalid_period(indicator: &'static str, period: usize) -> Self {
        Self::InvalidPeriod { indicator, period }
    }

    /// Builds an [`IndicatorError::InvalidParameter`].
    pub fn invalid_parameter(
        indicator: &'static str,
        parameter: &'static str,
        value: impl Display,
    ) -> Self {
        Self::InvalidParameter {
            indicator,
            parameter,
            value: value.to_string(),
        }
    }
}

/// Quotient that maps the indeterminate `0/0` case to `None`.
///
/// Division of a non-zero value by zero keeps its IEEE infinity.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let quotient = numerator / denominator;
    (!quotient.is_nan()).then_some(quotient)
}

/// Trailing window of fixed length over possibly-missing values.
///
/// The window is only `complete` once it holds `period` values and none of
/// them is missing.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    period: usize,
    values: VecDeque<Option<f64>>,
    missing: usize,
}

impl Window {
    pub(crate) fn new(period: usize) -> Self {
        Self {
            period,
            values: VecDeque::with_capacity(period + 1),
            missing: 0,
        }
    }

    pub(crate) fn push(&mut self, value: Option<f64>) {
        if value.is_none() {
            self.missing += 1;
        }
        self.values.push_back(value);
        if self.values.len() > self.period {
            if let Some(None) = self.values.pop_front() {
                self.missing -= 1;
            }
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.values.len() == self.period && self.missing == 0
    }

    /// Values of a complete window, oldest first.
    pub(crate) fn complete_values(&self) -> Option<impl Iterator<Item = f64> + '_> {
        self.is_complete().then(|| self.values.iter().flatten().copied())
    }

    /// Mean of a complete window; exactly the shared value when the window is
    /// constant.
    pub(crate) fn mean(&self) -> Option<f64> {
        let (lo, hi) = self.min_max()?;
        if lo == hi {
            return Some(lo);
        }
        let sum: f64 = self.complete_values()?.sum();
        Some(sum / self.period as f64)
    }

    /// Population standard deviation (divides by the window length); exactly
    /// `0` for a constant window.
    pub(crate) fn std_dev(&self) -> Option<f64> {
        let (lo, hi) = self.min_max()?;
        if lo == hi {
            return Some(0.0);
        }
        let mean = self.mean()?;
        let squares: f64 = self
            .complete_values()?
            .map(|value| (value - mean) * (value - mean))
            .sum();
        Some((squares / self.period as f64).sqrt())
    }

    pub(crate) fn min_max(&self) -> Option<(f64, f64)> {
        self.complete_values()?
            .fold(None, |acc: Option<(f64, f64)>, value| match acc {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.missing = 0;
    }
}

pub(crate) fn ensure_period(indicator: &'static str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        Err(IndicatorError::invalid_period(indicator, period))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_waits_until_full() {
        let mut window = Window::new(3);
        window.push(Some(1.0));
        window.push(Some(2.0));
        assert_eq!(window.mean(), None);
        window.push(Some(3.0));
        assert_eq!(window.mean(), Some(2.0));
    }

    #[test]
    fn missing_values_poison_the_window_until_evicted() {
        let mut window = Window::new(2);
        window.push(Some(1.0));
        window.push(None);
        assert!(!window.is_complete());
        window.push(Some(3.0));
        assert!(!window.is_complete());
        window.push(Some(5.0));
        assert_eq!(window.mean(), Some(4.0));
    }

    #[test]
    fn std_dev_is_population() {
        let mut window = Window::new(4);
        for value in [2.0, 4.0, 4.0, 6.0] {
            window.push(Some(value));
        }
        // mean 4, squared deviations 4+0+0+4 = 8, 8 / 4 = 2
        assert!((window.std_dev().unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn constant_window_is_exact() {
        for value in [110.37, 0.1, 1.1] {
            let mut window = Window::new(20);
            for _ in 0..20 {
                window.push(Some(value));
            }
            assert_eq!(window.mean(), Some(value));
            assert_eq!(window.std_dev(), Some(0.0));
        }
    }

    #[test]
    fn ratio_distinguishes_indeterminate_from_unbounded() {
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(1.0, 0.0), Some(f64::INFINITY));
        assert_eq!(ratio(3.0, 2.0), Some(1.5));
    }

    #[test]
    fn nan_inputs_read_as_missing() {
        assert_eq!(f64::NAN.value(), None);
        assert_eq!(Some(1.5).value(), Some(1.5));
        assert_eq!(None::<f64>.value(), None);
    }
}
