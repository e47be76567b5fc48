// Excel import (xlsx, xlsm, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::IoError;
use crate::table::{excel_serial_to_datetime, Cell, Table};

/// An opened workbook with its sheet names, ready for lookups.
pub struct WorkbookSource {
    sheets: calamine::Sheets<std::io::BufReader<std::fs::File>>,
    names: Vec<String>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        let sheets = open_workbook_auto(path).map_err(|e| IoError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let names = sheets.sheet_names().to_vec();
        debug!(path = %path.display(), sheets = ?names, "opened workbook");
        Ok(Self { sheets, names })
    }

    /// Sheet names with surrounding whitespace removed.
    pub fn sheet_names(&self) -> Vec<String> {
        self.names.iter().map(|s| s.trim().to_string()).collect()
    }

    /// Read a sheet by name, ignoring surrounding whitespace on both sides
    /// ("LoadWheelData " matches "LoadWheelData").
    pub fn table(&mut self, wanted: &str) -> Result<Table, IoError> {
        let wanted = wanted.trim();
        let actual = self
            .names
            .iter()
            .find(|n| n.trim() == wanted)
            .cloned()
            .ok_or_else(|| IoError::MissingSheet {
                name: wanted.to_string(),
                available: self.sheet_names(),
            })?;

        let range = self
            .sheets
            .worksheet_range(&actual)
            .map_err(|e| IoError::Io(format!("failed to read sheet '{actual}': {e}")))?;

        // The used range may begin below row 1.
        let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);
        let rows = range
            .rows()
            .enumerate()
            .map(|(i, row)| (first_row + i, row.iter().map(convert_cell).collect()));
        Ok(Table::from_numbered_rows(wanted, rows))
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        // 1900 date system assumed; 1904 workbooks are rare in practice.
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(ts) => Cell::DateTime(ts),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
