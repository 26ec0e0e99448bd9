use super::{field, required_category, Dataset};
use crate::config::Config;
use crate::error::MalformedRow;
use crate::process::utils::parse_number;
use serde::Serialize;

/// Crisis-era indicators per country, comma separated.
pub struct Chapter2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter2Record {
    pub country: String,
    pub gdp_change: Option<f64>,
    pub unemployment: Option<f64>,
    pub inflation: Option<f64>,
    pub oil_imports_dollars: Option<f64>,
    pub oil_imports_kg: Option<f64>,
}

impl Dataset for Chapter2 {
    const NAME: &'static str = "chapter2";
    const DELIMITER: char = ',';

    type Record = Chapter2Record;

    fn path(cfg: &Config) -> &str {
        &cfg.chapter2_path
    }

    // column 2 is not used
    fn from_row(row: &[String]) -> Result<Chapter2Record, MalformedRow> {
        Ok(Chapter2Record {
            country: required_category(row)?,
            gdp_change: parse_number(field(row, 1)),
            unemployment: parse_number(field(row, 3)),
            inflation: parse_number(field(row, 4)),
            oil_imports_dollars: parse_number(field(row, 5)),
            oil_imports_kg: parse_number(field(row, 6)),
        })
    }

    fn category(record: &Chapter2Record) -> &str {
        &record.country
    }
}
