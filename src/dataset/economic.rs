use super::{field, required_category, Dataset};
use crate::config::Config;
use crate::error::MalformedRow;
use crate::process::utils::{parse_number, parse_year};
use serde::Serialize;

const MIN_COLUMNS: usize = 5;

/// GDP, unemployment and emissions per country and year, semicolon separated.
pub struct Economic;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicRecord {
    pub country: String,
    pub year: i32,
    pub gdp: Option<f64>,
    pub unemployment: Option<f64>,
    pub emission: Option<f64>,
}

impl Dataset for Economic {
    const NAME: &'static str = "economic";
    const DELIMITER: char = ';';

    type Record = EconomicRecord;

    fn path(cfg: &Config) -> &str {
        &cfg.economic_path
    }

    fn from_row(row: &[String]) -> Result<EconomicRecord, MalformedRow> {
        if row.len() < MIN_COLUMNS {
            return Err(MalformedRow::TooFewColumns {
                expected: MIN_COLUMNS,
                found: row.len(),
            });
        }
        let year = parse_year(&row[1]).ok_or_else(|| MalformedRow::InvalidYear(row[1].clone()))?;
        let country = required_category(row)?;

        Ok(EconomicRecord {
            country,
            year,
            gdp: parse_number(field(row, 2)),
            unemployment: parse_number(field(row, 3)),
            emission: parse_number(field(row, 4)),
        })
    }

    fn category(record: &EconomicRecord) -> &str {
        &record.country
    }
}
