use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type LogId = i64;
pub type ProductId = i64;
pub type CategoryId = i64;
pub type ManufacturerId = i64;
pub type StoreId = i64;

/// The raw date identifier carried by every log record.
///
/// Upstream sources are not consistent about its encoding: most rows carry a
/// `YYYYMMDD` number, some carry a day offset, and hand-made files may carry an
/// ISO date string. The value is kept as-is and only interpreted when a date
/// column is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DateId {
    /// The value as it would be written out as text.
    pub fn render(&self) -> String {
        match self {
            DateId::Integer(value) => value.to_string(),
            DateId::Float(value) => format!("{:?}", value),
            DateId::Text(value) => value.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DateId::Integer(_) | DateId::Float(_))
    }

    /// True for non-negative integers and for non-empty strings made only of ASCII digits.
    pub fn is_digit_string(&self) -> bool {
        match self {
            DateId::Integer(value) => *value >= 0,
            DateId::Float(_) => false,
            DateId::Text(value) => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

impl fmt::Display for DateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for DateId {
    fn from(value: i64) -> Self {
        DateId::Integer(value)
    }
}

impl From<i32> for DateId {
    fn from(value: i32) -> Self {
        DateId::Integer(i64::from(value))
    }
}

impl From<f64> for DateId {
    fn from(value: f64) -> Self {
        DateId::Float(value)
    }
}

impl From<&str> for DateId {
    fn from(value: &str) -> Self {
        DateId::Text(value.to_string())
    }
}

impl From<String> for DateId {
    fn from(value: String) -> Self {
        DateId::Text(value)
    }
}

/// Implemented by records that carry a `date_id` column.
pub trait DateKeyed {
    fn date_id(&self) -> Option<&DateId>;
}

/// One entry of the product listing log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(alias = "logID")]
    pub log_id: LogId,
    #[serde(alias = "prodID")]
    pub prod_id: ProductId,
    #[serde(alias = "catID")]
    pub cat_id: CategoryId,
    #[serde(alias = "fabID")]
    pub fab_id: ManufacturerId,
    #[serde(alias = "dateID", default)]
    pub date_id: Option<DateId>,
}

impl ProductRecord {
    pub fn new(
        log_id: LogId,
        prod_id: ProductId,
        cat_id: CategoryId,
        fab_id: ManufacturerId,
        date_id: impl Into<DateId>,
    ) -> Self {
        Self {
            log_id,
            prod_id,
            cat_id,
            fab_id,
            date_id: Some(date_id.into()),
        }
    }
}

impl DateKeyed for ProductRecord {
    fn date_id(&self) -> Option<&DateId> {
        self.date_id.as_ref()
    }
}

/// One entry of the sale agreement log: a product listed in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(alias = "logID")]
    pub log_id: LogId,
    #[serde(alias = "prodID")]
    pub prod_id: ProductId,
    #[serde(alias = "catID")]
    pub cat_id: CategoryId,
    #[serde(alias = "fabID")]
    pub fab_id: ManufacturerId,
    #[serde(alias = "magID")]
    pub mag_id: StoreId,
    #[serde(alias = "dateID", default)]
    pub date_id: Option<DateId>,
}

impl SaleRecord {
    pub fn new(
        log_id: LogId,
        prod_id: ProductId,
        cat_id: CategoryId,
        fab_id: ManufacturerId,
        mag_id: StoreId,
        date_id: impl Into<DateId>,
    ) -> Self {
        Self {
            log_id,
            prod_id,
            cat_id,
            fab_id,
            mag_id,
            date_id: Some(date_id.into()),
        }
    }
}

impl DateKeyed for SaleRecord {
    fn date_id(&self) -> Option<&DateId> {
        self.date_id.as_ref()
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// An immutable log table with an optional derived `date` column.
///
/// Rows and the date column are shared behind `Arc`s, so cloning a table is cheap
/// and a clone is a snapshot: replacing a table elsewhere never changes one
/// already handed out.
#[derive(Debug)]
pub struct Table<R> {
    rows: Arc<[R]>,
    dates: Option<Arc<[NaiveDate]>>,
}

impl<R> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::from(rows),
            dates: None,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_date_column(&self) -> bool {
        self.dates.is_some()
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|dates| dates.get(index).copied())
    }

    pub fn month(&self, index: usize) -> Option<u32> {
        self.date(index).map(|date| date.month())
    }

    /// Iterates rows together with their derived date, `None` when no date column exists.
    pub fn iter_dated(&self) -> impl Iterator<Item = (&R, Option<NaiveDate>)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, row)| (row, self.date(index)))
    }

    /// Returns a copy of this table sharing the same rows, with `dates` attached as its date column.
    pub fn with_dates(&self, dates: Vec<NaiveDate>) -> Result<Self, CoreError> {
        if dates.len() != self.rows.len() {
            return Err(CoreError::ColumnLength {
                rows: self.rows.len(),
                values: dates.len(),
            });
        }
        Ok(Self {
            rows: Arc::clone(&self.rows),
            dates: Some(Arc::from(dates)),
        })
    }
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            dates: self.dates.clone(),
        }
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R> From<Vec<R>> for Table<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
