//! Simple day-over-day return.

use crate::core::{ratio, Indicator};

/// `(value[t] - value[t-1]) / value[t-1]`; the first observation has no return.
#[derive(Debug, Clone, Default)]
pub struct SimpleReturn {
    prev_value: Option<f64>,
}

impl SimpleReturn {
    /// Creates the indicator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for SimpleReturn {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let prev = self.prev_value.replace(input)?;
        ratio(input - prev, prev)
    }

    fn reset(&mut self) {
        self.prev_value = None;
    }
}
