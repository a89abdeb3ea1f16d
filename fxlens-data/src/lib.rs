//! Loading daily exchange-rate series from CSV exports.

pub mod error;
pub mod range;
pub mod table;

use std::path::Path;

use fxlens_core::{CurrencyPair, PriceSeries};
use tracing::{info, warn};

pub use error::{DataError, DataResult};
pub use range::{DateRange, DEFAULT_LOOKBACK_DAYS};
pub use table::{RateRecord, RateTable};

/// Upper bound on the number of pairs compared side by side.
pub const MAX_COMPARED_PAIRS: usize = 5;

/// Pairs present in the file at `path`, sorted.
pub fn available_pairs(path: impl AsRef<Path>) -> DataResult<Vec<CurrencyPair>> {
    Ok(RateTable::from_path(path)?.pairs())
}

/// Reads one pair's series from `path` restricted to `range`.
pub fn load_series(
    path: impl AsRef<Path>,
    pair: Option<&CurrencyPair>,
    range: &DateRange,
) -> DataResult<PriceSeries> {
    let table = RateTable::from_path(path)?;
    let series = table.series(pair, range)?;
    info!(
        pair = pair.map(ToString::to_string).unwrap_or_default(),
        observations = series.len(),
        "loaded series"
    );
    Ok(series)
}

/// Reads up to [`MAX_COMPARED_PAIRS`] series from one file.
///
/// Pairs past the limit are dropped with a warning, as are pairs with no
/// rows in `range`. Order follows `pairs`. A file without pair columns can
/// only stand in for a single pair.
pub fn load_many(
    path: impl AsRef<Path>,
    pairs: &[CurrencyPair],
    range: &DateRange,
) -> DataResult<Vec<(CurrencyPair, PriceSeries)>> {
    if pairs.len() > MAX_COMPARED_PAIRS {
        warn!(
            requested = pairs.len(),
            limit = MAX_COMPARED_PAIRS,
            "too many pairs requested; extra pairs ignored"
        );
    }
    let mut requested: Vec<&CurrencyPair> = Vec::new();
    for pair in pairs {
        if !requested.contains(&pair) {
            requested.push(pair);
        }
    }
    requested.truncate(MAX_COMPARED_PAIRS);

    let table = RateTable::from_path(path)?;
    if !table.has_pairs() && requested.len() > 1 {
        return Err(DataError::UnlabelledPairs(requested.len()));
    }
    let mut loaded = Vec::new();
    for pair in requested {
        let series = table.series(Some(pair), range)?;
        if series.is_empty() {
            warn!(%pair, "no observations in range; pair skipped");
            continue;
        }
        loaded.push((pair.clone(), series));
    }
    Ok(loaded)
}
