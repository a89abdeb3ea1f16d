use chrono::NaiveDate;
use fxlens_core::{CoreError, CurrencyPair};
use thiserror::Error;

/// Result alias for data loading.
pub type DataResult<T> = Result<T, DataError>;

/// Error type surfaced while reading rate files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("line {line}: {message}")]
    InvalidRow { line: u64, message: String },
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("file holds several pairs ({}); choose one", format_pairs(.0))]
    AmbiguousPair(Vec<CurrencyPair>),
    #[error("file has no pair columns, so it cannot supply {0} distinct pairs")]
    UnlabelledPairs(usize),
    #[error(transparent)]
    Series(#[from] CoreError),
}

fn format_pairs(pairs: &[CurrencyPair]) -> String {
    pairs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
