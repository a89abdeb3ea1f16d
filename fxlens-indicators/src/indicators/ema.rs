//! Exponential Moving Average (EMA).

use std::marker::PhantomData;

use crate::core::{ensure_period, Indicator, IndicatorError, Input};

/// Recursive exponential average with smoothing factor `2 / (span + 1)`.
///
/// The first observation seeds the average directly, so a value is produced
/// from the very first input. No bias correction is applied.
#[derive(Debug, Clone)]
pub struct Ema<I = f64> {
    span: usize,
    alpha: f64,
    state: Option<f64>,
    marker: PhantomData<I>,
}

impl<I> Ema<I>
where
    I: Input,
{
    /// Creates a new EMA with the provided span.
    pub fn new(span: usize) -> Result<Self, IndicatorError> {
        ensure_period("EMA", span)?;
        Ok(Self {
            span,
            alpha: 2.0 / (span as f64 + 1.0),
            state: None,
            marker: PhantomData,
        })
    }

    /// Returns the configured span.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Returns the current EMA value, if the indicator has produced one.
    pub fn value(&self) -> Option<f64> {
        self.state
    }
}

impl<I> Indicator for Ema<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let value = input.value()?;
        let next = match self.state {
            None => value,
            Some(current) => self.alpha * value + (1.0 - self.alpha) * current,
        };
        self.state = Some(next);
        Some(next)
    }

    fn reset(&mut self) {
        self.state = None;
    }
}
