use once_cell::sync::Lazy;
use regex::Regex;

/// Longest leading decimal literal, the way a browser's `parseFloat` reads it.
static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix regex should compile")
});

static INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("int prefix regex should compile"));

/// 1) Trim whitespace, then drop one leading and one trailing `"` if present.
/// Inner quotes are left alone.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// 2) Locale-tolerant number: strip thousands commas, parse with `.` as the
/// decimal point. Empty or absent input, or no numeric prefix, is `None`.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let stripped = raw.replace(',', "");
    let s = stripped.trim_start();
    let m = FLOAT_PREFIX.find(s)?;
    let lit = m.as_str();

    let value = match lit.trim_start_matches(['+', '-']) {
        "Infinity" if lit.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => lit.parse::<f64>().ok()?,
    };
    (!value.is_nan()).then_some(value)
}

/// 3) Leading integer, e.g. `"2008"` or `"2008.0"`. Zero counts as absent,
/// and so does anything outside `i32` (eleven or more digits).
pub fn parse_year(raw: &str) -> Option<i32> {
    let m = INT_PREFIX.find(raw.trim_start())?;
    m.as_str().parse::<i32>().ok().filter(|y| *y != 0)
}
