use chrono::{Days, NaiveDate};

use crate::error::{DataError, DataResult};

/// Lookback used when only an end date is known.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 365;

/// Inclusive calendar date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DataResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DataError::InvalidRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The `days` calendar days up to and including `end`.
    pub fn trailing(end: NaiveDate, days: u64) -> Self {
        Self {
            start: end.checked_sub_days(Days::new(days)),
            end: Some(end),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))).unwrap();
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(!range.contains(date(2023, 12, 31)));
    }

    #[test]
    fn open_bounds_accept_everything_on_that_side() {
        let range = DateRange::new(None, Some(date(2024, 1, 31))).unwrap();
        assert!(range.contains(date(1999, 1, 1)));
        assert!(DateRange::unbounded().contains(date(2100, 1, 1)));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(Some(date(2024, 2, 1)), Some(date(2024, 1, 1))).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }

    #[test]
    fn trailing_window() {
        let range = DateRange::trailing(date(2024, 12, 31), DEFAULT_LOOKBACK_DAYS);
        assert_eq!(range.start(), Some(date(2024, 1, 1)));
        assert_eq!(range.end(), Some(date(2024, 12, 31)));
    }
}
