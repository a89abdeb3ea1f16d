//! Relative Strength Index (RSI).

use std::marker::PhantomData;

use crate::core::{ensure_period, ratio, Indicator, IndicatorError, Input, Window};

/// RSI computed from simple rolling means of gains and losses.
///
/// The first observation has no predecessor and counts as a zero move, so a
/// reading is available once `period` observations have been seen. When the
/// window holds only gains the reading is 100; a window with neither gains nor
/// losses has no reading.
#[derive(Debug, Clone)]
pub struct Rsi<I = f64> {
    period: usize,
    prev_value: Option<f64>,
    gains: Window,
    losses: Window,
    marker: PhantomData<I>,
}

impl<I> Rsi<I>
where
    I: Input,
{
    /// Creates a new RSI with the provided period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        ensure_period("RSI", period)?;
        Ok(Self {
            period,
            prev_value: None,
            gains: Window::new(period),
            losses: Window::new(period),
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }

    fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        let rs = ratio(avg_gain, avg_loss)?;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

impl<I> Indicator for Rsi<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value();
        let change = match (self.prev_value, value) {
            (Some(prev), Some(current)) => current - prev,
            _ => 0.0,
        };
        self.prev_value = value;

        self.gains.push(Some(change.max(0.0)));
        self.losses.push(Some((-change).max(0.0)));

        let avg_gain = self.gains.mean()?;
        let avg_loss = self.losses.mean()?;
        Self::compute_rsi(avg_gain, avg_loss)
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.gains.clear();
        self.losses.clear();
    }
}
