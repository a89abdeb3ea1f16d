use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use fxlens_core::{CurrencyPair, PricePoint, PriceSeries};
use tracing::{debug, info, warn};

use crate::error::{DataError, DataResult};
use crate::range::DateRange;

const DATE_COLUMNS: &[&str] = &["date"];
const RATE_COLUMNS: &[&str] = &["exchange_rate", "rate", "value"];
const BASE_COLUMNS: &[&str] = &["base_currency_id", "base"];
const QUOTE_COLUMNS: &[&str] = &["quote_currency_id", "quote"];
const PAIR_COLUMNS: &[&str] = &["pair", "currency_pair"];

#[derive(Debug, Clone, Copy)]
enum PairColumns {
    Split { base: usize, quote: usize },
    Combined(usize),
    Absent,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    date: usize,
    rate: usize,
    pair: PairColumns,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> DataResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|header| names.iter().any(|name| header.trim().eq_ignore_ascii_case(name)))
        };
        let date = find(DATE_COLUMNS).ok_or(DataError::MissingColumn("date"))?;
        let rate = find(RATE_COLUMNS).ok_or(DataError::MissingColumn("rate"))?;
        let pair = match (find(BASE_COLUMNS), find(QUOTE_COLUMNS), find(PAIR_COLUMNS)) {
            (Some(base), Some(quote), _) => PairColumns::Split { base, quote },
            (_, _, Some(column)) => PairColumns::Combined(column),
            _ => PairColumns::Absent,
        };
        Ok(Self { date, rate, pair })
    }
}

/// One row of a rate file. A missing rate (holiday, null export) is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub pair: Option<CurrencyPair>,
    pub date: NaiveDate,
    pub rate: Option<f64>,
}

/// In-memory view of a daily rate export, optionally holding several pairs.
///
/// Expected columns (case-insensitive): `DATE`, one of
/// `EXCHANGE_RATE`/`RATE`/`VALUE`, and optionally either
/// `BASE_CURRENCY_ID` + `QUOTE_CURRENCY_ID` or a combined `PAIR` column.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    records: Vec<RateRecord>,
    has_pairs: bool,
}

impl RateTable {
    pub fn from_path(path: impl AsRef<Path>) -> DataResult<Self> {
        let path = path.as_ref();
        let table = Self::from_csv(csv::Reader::from_path(path)?)?;
        info!(
            path = %path.display(),
            rows = table.records.len(),
            pairs = table.pairs().len(),
            "loaded rate table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> DataResult<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> DataResult<Self> {
        let layout = Layout::from_headers(reader.headers()?)?;
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map_or(0, |pos| pos.line());
            records.push(parse_record(&row, layout, line)?);
        }
        Ok(Self {
            records,
            has_pairs: !matches!(layout.pair, PairColumns::Absent),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    /// Whether rows identify their currency pair.
    pub fn has_pairs(&self) -> bool {
        self.has_pairs
    }

    /// Distinct pairs present in the table, sorted.
    pub fn pairs(&self) -> Vec<CurrencyPair> {
        self.records
            .iter()
            .filter_map(|record| record.pair.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Builds the series for `pair` restricted to `range`.
    ///
    /// Files without pair columns hold a single series; a requested `pair`
    /// cannot be checked against them and is logged at warn level.
    /// When `pair` is `None` the table must contain exactly one pair. Rows
    /// without a rate are dropped. An unknown pair yields an empty series.
    pub fn series(&self, pair: Option<&CurrencyPair>, range: &DateRange) -> DataResult<PriceSeries> {
        let selected = match pair {
            Some(pair) if self.has_pairs => Some(pair.clone()),
            Some(pair) => {
                warn!(%pair, "rate table carries no pair columns; pair label is not verified");
                None
            }
            None if self.has_pairs => {
                let pairs = self.pairs();
                match pairs.as_slice() {
                    [only] => Some(only.clone()),
                    [] => None,
                    _ => return Err(DataError::AmbiguousPair(pairs)),
                }
            }
            None => None,
        };

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for record in &self.records {
            if selected.is_some() && record.pair != selected {
                continue;
            }
            if !range.contains(record.date) {
                continue;
            }
            match record.rate {
                Some(rate) => points.push(PricePoint::new(record.date, rate)),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "dropped rows without a rate");
        }
        Ok(PriceSeries::from_unsorted(points)?)
    }
}

fn parse_record(row: &StringRecord, layout: Layout, line: u64) -> DataResult<RateRecord> {
    let invalid = |message: String| DataError::InvalidRow { line, message };
    let cell = |index: usize| row.get(index).map(str::trim).unwrap_or_default();

    let raw_date = cell(layout.date);
    let date = parse_date(raw_date).ok_or_else(|| invalid(format!("invalid date '{raw_date}'")))?;

    let raw_rate = cell(layout.rate);
    let rate = if raw_rate.is_empty() || raw_rate.eq_ignore_ascii_case("null") {
        None
    } else {
        let value: f64 = raw_rate
            .parse()
            .map_err(|_| invalid(format!("invalid rate '{raw_rate}'")))?;
        (!value.is_nan()).then_some(value)
    };

    let pair = match layout.pair {
        PairColumns::Absent => None,
        PairColumns::Split { base, quote } => Some(
            CurrencyPair::new(cell(base), cell(quote)).map_err(|err| invalid(err.to_string()))?,
        ),
        PairColumns::Combined(column) => Some(
            cell(column)
                .parse::<CurrencyPair>()
                .map_err(|err| invalid(err.to_string()))?,
        ),
    };

    Ok(RateRecord { pair, date, rate })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and RFC 3339 timestamps.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
