//! Simple Moving Average (SMA).

use std::marker::PhantomData;

use crate::core::{ensure_period, Indicator, IndicatorError, Input, Window};

/// Computes the arithmetic mean over a trailing window.
///
/// A window that contains a missing observation yields no value until that
/// observation has rolled out.
#[derive(Debug, Clone)]
pub struct Sma<I = f64> {
    period: usize,
    window: Window,
    marker: PhantomData<I>,
}

impl<I> Sma<I>
where
    I: Input,
{
    /// Creates a new SMA with the provided period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        ensure_period("SMA", period)?;
        Ok(Self {
            period,
            window: Window::new(period),
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }
}

impl<I> Indicator for Sma<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.window.push(input.value());
        self.window.mean()
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Sma;
    use crate::Indicator;

    #[test]
    fn waits_for_full_window() {
        let mut sma = Sma::<f64>::new(3).unwrap();
        assert_eq!(sma.next(1.0), None);
        assert_eq!(sma.next(2.0), None);
        assert_eq!(sma.next(3.0), Some(2.0));
    }

    #[test]
    fn rolls_forward() {
        let mut sma = Sma::<f64>::new(3).unwrap();
        sma.next(1.0);
        sma.next(2.0);
        sma.next(3.0);
        assert_eq!(sma.next(4.0), Some(3.0));
        assert_eq!(sma.next(5.0), Some(4.0));
    }

    #[test]
    fn gaps_in_derived_input_suppress_output() {
        let mut sma = Sma::<Option<f64>>::new(2).unwrap();
        assert_eq!(sma.next(None), None);
        assert_eq!(sma.next(Some(4.0)), None);
        assert_eq!(sma.next(Some(6.0)), Some(5.0));
    }

    #[test]
    fn reset_clears_internal_state() {
        let mut sma = Sma::<f64>::new(2).unwrap();
        sma.next(5.0);
        sma.next(7.0);
        assert_eq!(sma.next(9.0), Some(8.0));
        sma.reset();
        assert_eq!(sma.next(9.0), None);
    }

    #[test]
    fn rejects_zero_period() {
        assert!(Sma::<f64>::new(0).is_err());
    }
}
