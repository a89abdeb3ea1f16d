use chrono::NaiveDate;
use thiserror::Error;

/// Result alias for core domain operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Validation failures raised while building domain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid currency pair '{0}': expected BASE/QUOTE")]
    InvalidPair(String),
    #[error("rate on {date} is not a finite number ({rate})")]
    NonFiniteRate { date: NaiveDate, rate: f64 },
    #[error("duplicate observation for {0}")]
    DuplicateDate(NaiveDate),
    #[error("observation for {current} follows {previous}; dates must be ascending")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },
}
