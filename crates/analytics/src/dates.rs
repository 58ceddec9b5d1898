//! Derivation of the `date` column from the raw `date_id` column.
//!
//! `date_id` values arrive in several encodings. Each encoding is handled by a
//! [`DateStrategy`]; strategies are tried in policy order, each one gated on the
//! column as a whole, and the first strategy that parses every value wins. Parse
//! failures never leave this module: when no strategy succeeds the table is
//! returned without a date column.

use chrono::{DateTime, Days, NaiveDate};
use core_types::{DateId, DateKeyed, Table};
use std::fmt;
use thiserror::Error;

/// Failure to interpret a single `date_id` value. Consumed inside [`derive_dates`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("row has no date_id value")]
    Missing,

    #[error("'{value}' cannot be read as {strategy}")]
    Malformed { strategy: DateStrategy, value: String },

    #[error("'{0}' does not name a representable calendar date")]
    OutOfRange(String),
}

/// One way of turning a raw `date_id` into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// Fixed-width `YYYYMMDD` digits, as integer or string.
    CompactYmd,
    /// `YYYY-MM-DD` text.
    IsoDate,
    /// A whole number of days since 1970-01-01; fractional values are truncated.
    EpochDayOffset,
}

/// The order in which strategies are attempted.
pub const DEFAULT_POLICY: [DateStrategy; 3] = [
    DateStrategy::CompactYmd,
    DateStrategy::IsoDate,
    DateStrategy::EpochDayOffset,
];

impl fmt::Display for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStrategy::CompactYmd => f.write_str("YYYYMMDD"),
            DateStrategy::IsoDate => f.write_str("YYYY-MM-DD"),
            DateStrategy::EpochDayOffset => f.write_str("a day offset from 1970-01-01"),
        }
    }
}

impl DateStrategy {
    /// Column-level gate, decided from the first present value (and, for
    /// `CompactYmd`, the widest rendered value).
    pub fn applies_to(&self, column: &[Option<&DateId>]) -> bool {
        let Some(first) = column.iter().flatten().next() else {
            return false;
        };
        match self {
            DateStrategy::CompactYmd => {
                let widest = column
                    .iter()
                    .flatten()
                    .map(|value| value.render().len())
                    .max()
                    .unwrap_or(0);
                first.is_digit_string() && widest == 8
            }
            DateStrategy::IsoDate => matches!(first, DateId::Text(_)) && !first.is_digit_string(),
            DateStrategy::EpochDayOffset => first.is_numeric(),
        }
    }

    pub fn parse(&self, raw: Option<&DateId>) -> Result<NaiveDate, DateParseError> {
        let raw = raw.ok_or(DateParseError::Missing)?;
        match self {
            DateStrategy::CompactYmd => parse_compact(raw),
            DateStrategy::IsoDate => parse_iso(raw),
            DateStrategy::EpochDayOffset => parse_day_offset(raw),
        }
    }

    fn malformed(&self, raw: &DateId) -> DateParseError {
        DateParseError::Malformed {
            strategy: *self,
            value: raw.render(),
        }
    }
}

fn parse_compact(raw: &DateId) -> Result<NaiveDate, DateParseError> {
    let text = raw.render();
    if text.len() != 8 || !raw.is_digit_string() {
        return Err(DateStrategy::CompactYmd.malformed(raw));
    }
    let field = |range: std::ops::Range<usize>| {
        text[range]
            .parse::<u32>()
            .map_err(|_| DateStrategy::CompactYmd.malformed(raw))
    };
    let year = field(0..4)? as i32;
    let month = field(4..6)?;
    let day = field(6..8)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateParseError::OutOfRange(text))
}

fn parse_iso(raw: &DateId) -> Result<NaiveDate, DateParseError> {
    match raw {
        DateId::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| DateStrategy::IsoDate.malformed(raw)),
        _ => Err(DateStrategy::IsoDate.malformed(raw)),
    }
}

fn parse_day_offset(raw: &DateId) -> Result<NaiveDate, DateParseError> {
    let offset = match raw {
        DateId::Integer(value) => *value,
        // Anything this large is far outside chrono's calendar anyway.
        DateId::Float(value) if value.is_finite() && value.abs() < 1e12 => value.trunc() as i64,
        _ => return Err(DateStrategy::EpochDayOffset.malformed(raw)),
    };
    let epoch = DateTime::UNIX_EPOCH.date_naive();
    let days = Days::new(offset.unsigned_abs());
    let date = if offset >= 0 {
        epoch.checked_add_days(days)
    } else {
        epoch.checked_sub_days(days)
    };
    date.ok_or_else(|| DateParseError::OutOfRange(raw.render()))
}

/// Runs `policy` over a raw column and returns the first complete parse.
pub fn derive_dates(column: &[Option<&DateId>], policy: &[DateStrategy]) -> Option<Vec<NaiveDate>> {
    for strategy in policy {
        if !strategy.applies_to(column) {
            continue;
        }
        let parsed: Result<Vec<NaiveDate>, DateParseError> =
            column.iter().map(|raw| strategy.parse(*raw)).collect();
        match parsed {
            Ok(dates) => {
                tracing::debug!(strategy = %strategy, rows = dates.len(), "Derived date column.");
                return Some(dates);
            }
            Err(e) => {
                tracing::warn!(strategy = %strategy, error = %e, "Date derivation failed, trying next strategy.");
            }
        }
    }
    None
}

/// Returns a copy of `table` with a derived date (and month) column.
///
/// The input is never modified. Tables that are empty, already dated, or have no
/// `date_id` values come back as they are, and so do tables whose `date_id`
/// column no strategy can read.
pub fn with_date_column<R: DateKeyed>(table: &Table<R>) -> Table<R> {
    if table.is_empty() || table.has_date_column() {
        return table.clone();
    }

    let column: Vec<Option<&DateId>> = table.rows().iter().map(DateKeyed::date_id).collect();
    if column.iter().all(Option::is_none) {
        tracing::debug!("Table has no date_id column; skipping date derivation.");
        return table.clone();
    }

    match derive_dates(&column, &DEFAULT_POLICY) {
        Some(dates) => match table.with_dates(dates) {
            Ok(dated) => dated,
            Err(e) => {
                tracing::warn!(error = %e, "Derived date column rejected.");
                table.clone()
            }
        },
        None => {
            tracing::warn!(rows = table.len(), "Unable to add a date column; no strategy could read date_id.");
            table.clone()
        }
    }
}
