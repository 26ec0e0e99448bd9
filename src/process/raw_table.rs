use crate::process::utils::clean_str;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names, from the first non-blank line of the file.
    pub headers: Vec<String>,
    /// Every following non-blank line, as cleaned fields.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Split `text` into lines and each line on `delimiter`. Blank lines are
    /// skipped; every field goes through `clean_str`. No quote-aware
    /// splitting: a delimiter inside quotes still splits the field.
    pub fn parse(text: &str, delimiter: char) -> Self {
        let mut lines = text
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(delimiter).map(clean_str).collect::<Vec<_>>());

        let headers = lines.next().unwrap_or_default();
        RawTable {
            headers,
            rows: lines.collect(),
        }
    }

    /// Sorted, deduplicated first field of every data row.
    pub fn categories(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
