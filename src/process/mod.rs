// src/process/mod.rs
pub mod raw_table;
pub mod utils;

use crate::dataset::Dataset;
use crate::error::MalformedRow;
use raw_table::RawTable;
use tracing::{debug, trace};

/// Result of turning a `RawTable` into typed records.
#[derive(Debug)]
pub struct Parsed<R> {
    pub records: Vec<R>,
    pub categories: Vec<String>,
    /// Data rows rejected by `Dataset::from_row`.
    pub dropped: usize,
}

/// Parse dataset text end to end: split, derive categories, map rows.
/// Rows that fail the dataset's required-field checks are counted, not kept.
pub fn parse_dataset<D: Dataset>(text: &str) -> Parsed<D::Record> {
    let table = RawTable::parse(text, D::DELIMITER);
    trace!(dataset = D::NAME, headers = ?table.headers, rows = table.rows.len(), "split table");

    let categories = table.categories();
    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0;

    // line numbers are 1-based data rows, header excluded
    for (idx, row) in table.rows.iter().enumerate() {
        match D::from_row(row) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                dropped += 1;
                log_drop(D::NAME, idx + 1, &reason);
            }
        }
    }

    Parsed {
        records,
        categories,
        dropped,
    }
}

fn log_drop(dataset: &str, row: usize, reason: &MalformedRow) {
    debug!(dataset, row, %reason, "dropping malformed row");
}
