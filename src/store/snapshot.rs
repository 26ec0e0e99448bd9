use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Observable state of one dataset store. Cloning is cheap: records and
/// categories are shared slices.
#[derive(Debug, Clone)]
pub struct Snapshot<R> {
    pub records: Arc<[R]>,
    /// Sorted unique category keys, for selection lists.
    pub categories: Arc<[String]>,
    pub is_loading: bool,
    /// Message of the last failed load, cleared when a new load starts.
    pub error: Option<String>,
    /// Set once, when the first load succeeds.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl<R> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            categories: Arc::from(Vec::new()),
            is_loading: false,
            error: None,
            loaded_at: None,
        }
    }
}

impl<R> Snapshot<R> {
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

/// Lazy, order-preserving walk over the records of one category.
/// Holds its own reference to the record slice, so later loads cannot
/// change what it yields.
pub struct CategoryRecords<R> {
    records: Arc<[R]>,
    category: String,
    category_of: fn(&R) -> &str,
    pos: usize,
}

impl<R> CategoryRecords<R> {
    pub(crate) fn new(records: Arc<[R]>, category: &str, category_of: fn(&R) -> &str) -> Self {
        Self {
            records,
            category: category.to_string(),
            category_of,
            pos: 0,
        }
    }
}

impl<R: Clone> Iterator for CategoryRecords<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        while let Some(rec) = self.records.get(self.pos) {
            self.pos += 1;
            if (self.category_of)(rec) == self.category {
                return Some(rec.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.records.len().saturating_sub(self.pos)))
    }
}
