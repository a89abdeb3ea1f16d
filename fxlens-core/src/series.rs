use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Single dated observation of an exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}

/// Date-ordered sequence of rates for one currency pair.
///
/// Dates are strictly increasing and every rate is finite. Calendar gaps are
/// allowed: downstream windows count rows, not days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates an already-ordered list of observations.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        for point in &points {
            if !point.rate.is_finite() {
                return Err(CoreError::NonFiniteRate {
                    date: point.date,
                    rate: point.rate,
                });
            }
        }
        for pair in points.windows(2) {
            let (previous, current) = (pair[0].date, pair[1].date);
            if current == previous {
                return Err(CoreError::DuplicateDate(current));
            }
            if current < previous {
                return Err(CoreError::OutOfOrder { previous, current });
            }
        }
        Ok(Self { points })
    }

    /// Sorts observations by date before validating them.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|point| point.date);
        Self::new(points)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Copies the rate column.
    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.rate).collect()
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = CoreError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}
