//! Bollinger Bands and the rolling standard deviation they are built on.

use std::marker::PhantomData;

use crate::core::{ensure_period, Indicator, IndicatorError, Input, Window};

/// Output value of the Bollinger Bands indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBandsOutput {
    /// Upper band (mean + k * std dev).
    pub upper: f64,
    /// Middle band (rolling mean).
    pub middle: f64,
    /// Lower band (mean - k * std dev).
    pub lower: f64,
}

impl BollingerBandsOutput {
    /// Distance between the upper and lower band.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Produces Bollinger Bands from a trailing window using population deviation.
#[derive(Debug, Clone)]
pub struct BollingerBands<I = f64> {
    period: usize,
    std_multiplier: f64,
    window: Window,
    marker: PhantomData<I>,
}

impl<I> BollingerBands<I>
where
    I: Input,
{
    /// Creates a new Bollinger Bands indicator.
    pub fn new(period: usize, std_multiplier: f64) -> Result<Self, IndicatorError> {
        ensure_period("BollingerBands", period)?;
        if !std_multiplier.is_finite() || std_multiplier.is_sign_negative() {
            return Err(IndicatorError::invalid_parameter(
                "BollingerBands",
                "std_multiplier",
                std_multiplier,
            ));
        }

        Ok(Self {
            period,
            std_multiplier,
            window: Window::new(period),
            marker: PhantomData,
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }
}

impl<I> Indicator for BollingerBands<I>
where
    I: Input,
{
    type Input = I;
    type Output = BollingerBandsOutput;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.window.push(input.value());
        let middle = self.window.mean()?;
        let offset = self.std_multiplier * self.window.std_dev()?;
        Some(BollingerBandsOutput {
            upper: middle + offset,
            middle,
            lower: middle - offset,
        })
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

/// Rolling population standard deviation.
#[derive(Debug, Clone)]
pub struct RollingStdDev<I = f64> {
    window: Window,
    marker: PhantomData<I>,
}

impl<I> RollingStdDev<I>
where
    I: Input,
{
    /// Creates a rolling standard deviation over `period` observations.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        ensure_period("RollingStdDev", period)?;
        Ok(Self {
            window: Window::new(period),
            marker: PhantomData,
        })
    }
}

impl<I> Indicator for RollingStdDev<I>
where
    I: Input,
{
    type Input = I;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        self.window.push(input.value());
        self.window.std_dev()
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
