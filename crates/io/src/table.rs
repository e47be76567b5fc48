// Header + typed rows, shared by the CSV and workbook readers

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::IoError;

/// Latest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Plain decimal, or comma-grouped thousands such as `1,250,000.5`.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+|\d{1,3}(,\d{3})+)(\.\d+)?$").expect("number pattern compiles")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Trimmed text; `None` for blank cells. Integral numbers render
    /// without a decimal part so a numeric train `101` reads as "101".
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() { None } else { Some(s.to_string()) }
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Numeric value; `Ok(None)` for blank cells, `Err(raw)` when not a
    /// finite number. Commas are accepted only as thousands separators, so a
    /// decimal comma (`12,5`) is rejected rather than read as `125`.
    pub fn as_number(&self) -> Result<Option<f64>, String> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Number(n) if n.is_finite() => Ok(Some(*n)),
            Cell::Number(n) => Err(n.to_string()),
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                parse_number(s).map(Some).ok_or_else(|| s.to_string())
            }
            Cell::DateTime(dt) => Err(dt.to_string()),
        }
    }

    /// Timestamp; numbers are treated as Excel serials (1900 system).
    pub fn as_datetime(&self) -> Result<NaiveDateTime, String> {
        match self {
            Cell::Empty => Err(String::new()),
            Cell::DateTime(dt) => Ok(*dt),
            Cell::Number(n) => excel_serial_to_datetime(*n).ok_or_else(|| format_number(*n)),
            Cell::Text(s) => parse_datetime(s.trim()).ok_or_else(|| s.trim().to_string()),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if !NUMBER.is_match(s) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub(crate) fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // Day zero is 1899-12-30 once the phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    Some(epoch + Duration::milliseconds(millis))
}

pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// One sheet: a header row and the data rows beneath it.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Source row number (1-based) of each entry in `rows`.
    source_rows: Vec<usize>,
}

impl Table {
    /// Build from raw rows numbered from 1; the first non-blank row is the
    /// header. Header names are trimmed.
    pub fn from_rows(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self::from_numbered_rows(name, rows.into_iter().enumerate().map(|(i, r)| (i + 1, r)))
    }

    /// Build from rows tagged with their row number in the source file, for
    /// readers that drop blank lines or start past row 1.
    pub fn from_numbered_rows(name: &str, rows: impl IntoIterator<Item = (usize, Vec<Cell>)>) -> Self {
        let mut rows = rows.into_iter().skip_while(|(_, r)| r.iter().all(|c| c.as_text().is_none()));
        let headers = rows
            .next()
            .map(|(_, r)| r.iter().map(|c| c.as_text().unwrap_or_default()).collect())
            .unwrap_or_default();
        let (source_rows, rows) = rows.unzip();
        Self {
            name: name.to_string(),
            headers,
            rows,
            source_rows,
        }
    }

    /// Index of a column by trimmed header name.
    pub fn column(&self, name: &str) -> Result<usize, IoError> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h == wanted).ok_or_else(|| IoError::MissingColumn {
            sheet: self.name.clone(),
            column: wanted.to_string(),
        })
    }

    /// Row number of a data row as the user sees it in the source file.
    pub fn row_number(&self, data_idx: usize) -> usize {
        self.source_rows.get(data_idx).copied().unwrap_or(data_idx + 2)
    }
}

/// Cell at `idx`, treating short rows as blank.
pub fn cell(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&Cell::Empty)
}
