//! Stochastic oscillator (%K / %D) over a single price column.

use crate::core::{ensure_period, ratio, Indicator, IndicatorError, Window};
use crate::indicators::sma::Sma;

/// Output of the stochastic oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticOutput {
    /// %K: position of the latest price within the trailing range, in percent.
    pub k: f64,
    /// %D: simple average of recent %K readings, once enough are available.
    pub d: Option<f64>,
}

/// Stochastic oscillator where the range is taken from the price itself.
///
/// A flat range (`max == min`) has no %K reading.
#[derive(Debug, Clone)]
pub struct Stochastic {
    window: Window,
    smoothing: Sma<Option<f64>>,
}

impl Stochastic {
    /// Creates an oscillator with a `k_period` lookback and `d_period` smoothing.
    pub fn new(k_period: usize, d_period: usize) -> Result<Self, IndicatorError> {
        ensure_period("Stochastic", k_period)?;
        Ok(Self {
            window: Window::new(k_period),
            smoothing: Sma::new(d_period)?,
        })
    }
}

impl Indicator for Stochastic {
    type Input = f64;
    type Output = StochasticOutput;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.window.push(Some(input));
        let k = self
            .window
            .min_max()
            .and_then(|(low, high)| ratio(input - low, high - low))
            .map(|fraction| 100.0 * fraction);
        let d = self.smoothing.next(k);
        k.map(|k| StochasticOutput { k, d })
    }

    fn reset(&mut self) {
        self.window.clear();
        self.smoothing.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::Stochastic;
    use crate::Indicator;

    #[test]
    fn measures_position_in_range() {
        let mut stoch = Stochastic::new(3, 2).unwrap();
        assert_eq!(stoch.next(10.0), None);
        assert_eq!(stoch.next(20.0), None);
        let out = stoch.next(15.0).unwrap();
        assert_eq!(out.k, 50.0);
        assert_eq!(out.d, None);
        let out = stoch.next(25.0).unwrap();
        assert_eq!(out.k, 100.0);
        assert_eq!(out.d, Some(75.0));
    }

    #[test]
    fn flat_range_has_no_reading_and_breaks_smoothing() {
        let mut stoch = Stochastic::new(2, 2).unwrap();
        stoch.next(1.0);
        assert!(stoch.next(2.0).is_some());
        assert_eq!(stoch.next(2.0), None);
        let out = stoch.next(3.0).unwrap();
        assert_eq!(out.k, 100.0);
        assert_eq!(out.d, None);
    }
}
