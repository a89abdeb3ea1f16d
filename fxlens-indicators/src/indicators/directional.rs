//! Average range and directional movement (ATR, DI+/DI-, DX, ADX) on a close-only series.

use crate::core::{ensure_period, ratio, Indicator, IndicatorError, Window};

/// Snapshot of the directional movement state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalOutput {
    /// Rolling mean of the absolute day-over-day move.
    pub atr: f64,
    /// Upward directional indicator, in percent of ATR.
    pub di_plus: Option<f64>,
    /// Downward directional indicator, in percent of ATR.
    pub di_minus: Option<f64>,
    /// Directional index.
    pub dx: Option<f64>,
    /// Rolling mean of DX.
    pub adx: Option<f64>,
}

/// Directional movement system computed from a single price column.
///
/// The true range of a row is the absolute move from the previous row, which
/// the first row does not have. Directional moves treat that first row as a
/// zero move. Upward and downward moves of a row add up to its true range, so
/// whenever DI+ and DI- have a value they sum to 100. A flat market instead
/// has ATR `0`, which leaves DI+, DI-, DX and ADX without a value.
#[derive(Debug, Clone)]
pub struct Directional {
    period: usize,
    prev_value: Option<f64>,
    true_range: Window,
    plus_move: Window,
    minus_move: Window,
    dx: Window,
}

impl Directional {
    /// Creates the indicator with one period shared by ATR, DI and ADX.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        ensure_period("Directional", period)?;
        Ok(Self {
            period,
            prev_value: None,
            true_range: Window::new(period),
            plus_move: Window::new(period),
            minus_move: Window::new(period),
            dx: Window::new(period),
        })
    }

    /// Returns the configured lookback period.
    pub fn period(&self) -> usize {
        self.period
    }

    fn directional_index(di_plus: Option<f64>, di_minus: Option<f64>) -> Option<f64> {
        let (plus, minus) = (di_plus?, di_minus?);
        let total = plus + minus;
        if total == 0.0 {
            return Some(0.0);
        }
        ratio((plus - minus).abs(), total).map(|fraction| 100.0 * fraction)
    }
}

impl Indicator for Directional {
    type Input = f64;
    type Output = DirectionalOutput;

    fn next(&mut self, input: Self::Input) -> Option<Self::Output> {
        let delta = self.prev_value.map(|prev| input - prev);
        self.prev_value = Some(input);

        self.true_range.push(delta.map(f64::abs));
        self.plus_move.push(Some(delta.map_or(0.0, |d| d.max(0.0))));
        self.minus_move.push(Some(delta.map_or(0.0, |d| (-d).max(0.0))));

        let Some(atr) = self.true_range.mean() else {
            self.dx.push(None);
            return None;
        };
        let di = |window: &Window| {
            window
                .mean()
                .and_then(|movement| ratio(movement, atr))
                .map(|fraction| 100.0 * fraction)
        };
        let di_plus = di(&self.plus_move);
        let di_minus = di(&self.minus_move);
        let dx = Self::directional_index(di_plus, di_minus);
        self.dx.push(dx);

        Some(DirectionalOutput {
            atr,
            di_plus,
            di_minus,
            dx,
            adx: self.dx.mean(),
        })
    }

    fn reset(&mut self) {
        self.prev_value = None;
        self.true_range.clear();
        self.plus_move.clear();
        self.minus_move.clear();
        self.dx.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Directional;
    use crate::Indicator;

    #[test]
    fn atr_needs_period_moves() {
        let mut dir = Directional::new(3).unwrap();
        assert!(dir.next(10.0).is_none());
        assert!(dir.next(11.0).is_none());
        assert!(dir.next(13.0).is_none());
        let out = dir.next(12.0).unwrap();
        // |+1| + |+2| + |-1| over 3
        assert!((out.atr - 4.0 / 3.0).abs() < 1e-12);
        assert!((out.di_plus.unwrap() - 75.0).abs() < 1e-9);
        assert!((out.di_minus.unwrap() - 25.0).abs() < 1e-9);
        assert!((out.dx.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(out.adx, None);
    }

    #[test]
    fn adx_averages_directional_index() {
        let mut dir = Directional::new(2).unwrap();
        let mut last = None;
        for price in [1.0, 2.0, 3.0, 4.0, 5.0] {
            last = dir.next(price);
        }
        let out = last.unwrap();
        assert_eq!(out.di_plus, Some(100.0));
        assert_eq!(out.di_minus, Some(0.0));
        assert_eq!(out.dx, Some(100.0));
        assert_eq!(out.adx, Some(100.0));
    }

    #[test]
    fn flat_market_has_no_directional_reading() {
        let mut dir = Directional::new(2).unwrap();
        let mut last = None;
        for _ in 0..6 {
            last = dir.next(3.0);
        }
        let out = last.unwrap();
        assert_eq!(out.atr, 0.0);
        assert_eq!(out.di_plus, None);
        assert_eq!(out.dx, None);
        assert_eq!(out.adx, None);
    }

    #[test]
    fn directional_indicators_sum_to_one_hundred() {
        let mut dir = Directional::new(3).unwrap();
        for price in [1.30, 1.31, 1.305, 1.29, 1.29, 1.32, 1.315, 1.33] {
            if let Some(out) = dir.next(price) {
                if let (Some(plus), Some(minus)) = (out.di_plus, out.di_minus) {
                    assert!((plus + minus - 100.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn balanced_zero_indicators_read_as_zero_dx() {
        assert_eq!(Directional::directional_index(Some(0.0), Some(0.0)), Some(0.0));
        assert_eq!(Directional::directional_index(None, Some(0.0)), None);
    }
}
