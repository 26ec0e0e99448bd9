// src/dataset/mod.rs
//! Column layouts of the datasets the site charts.

use crate::config::Config;
use crate::error::MalformedRow;
use std::fmt::Debug;

mod chapter2;
mod economic;

pub use chapter2::{Chapter2, Chapter2Record};
pub use economic::{Economic, EconomicRecord};

/// One delimited-text dataset: where it lives, how its rows split, and how a
/// row becomes a record.
pub trait Dataset: Send + Sync + 'static {
    /// Used in logs and error messages.
    const NAME: &'static str;
    const DELIMITER: char;

    type Record: Clone + Debug + Send + Sync + 'static;

    /// Path relative to the configured base URL.
    fn path(cfg: &Config) -> &str;

    /// Map one cleaned data row. `Err` means the row is dropped.
    fn from_row(row: &[String]) -> Result<Self::Record, MalformedRow>;

    /// The category key (country) of a record.
    fn category(record: &Self::Record) -> &str;
}

/// Field `idx` of `row`, if the row is that long.
pub(crate) fn field(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

/// First column, required to be non-empty.
pub(crate) fn required_category(row: &[String]) -> Result<String, MalformedRow> {
    match field(row, 0) {
        Some(c) if !c.is_empty() => Ok(c.to_string()),
        _ => Err(MalformedRow::MissingCategory),
    }
}
