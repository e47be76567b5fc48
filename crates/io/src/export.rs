// Export of traces and summaries (csv, json, xlsx)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rimtrack_recon::{FinalMileage, Reconciliation, Summary};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    /// Infer from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(IoError::UnsupportedFormat(format!(
                "cannot export to '.{other}' (expected .csv, .json or .xlsx)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Empty,
    Text(String),
    Number(f64),
}

impl GridCell {
    fn text(s: Option<&str>) -> Self {
        match s {
            Some(s) => Self::Text(s.to_string()),
            None => Self::Empty,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
        }
    }
}

/// Headers plus rows, one sheet's worth of output.
#[derive(Debug, Clone)]
pub struct Grid {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<GridCell>>,
}

/// Trace rows as displayed: action label, location, mileages, and
/// optionally the status remark.
pub fn moves_grid(reconciliation: &Reconciliation, with_status: bool) -> Grid {
    let mut headers = vec!["Action", "Train", "Car", "Position", "Mileage", "Rim Mileage"];
    if with_status {
        headers.push("Status");
    }

    let rows = reconciliation
        .trace
        .iter()
        .map(|m| {
            let mut row = vec![
                GridCell::Text(m.label.to_string()),
                GridCell::text(m.train_id.as_deref()),
                GridCell::text(m.car.as_deref()),
                GridCell::text(m.position.as_deref()),
                GridCell::Number(m.mileage_at_event),
                GridCell::Number(m.cumulative_rim_mileage),
            ];
            if with_status {
                row.push(GridCell::Text(m.status.to_string()));
            }
            row
        })
        .collect();

    Grid { headers, rows }
}

pub fn summary_grid(summary: &Summary) -> Grid {
    let rows = summary
        .rows
        .iter()
        .map(|r| {
            vec![
                GridCell::text(r.train_id.as_deref()),
                GridCell::text(r.car.as_deref()),
                GridCell::text(r.position.as_deref()),
                match &r.final_rim_mileage {
                    FinalMileage::Value(v) => GridCell::Number(*v),
                    err @ FinalMileage::Error(_) => GridCell::Text(err.to_string()),
                },
                GridCell::Text(r.asset_id.clone()),
            ]
        })
        .collect();

    Grid {
        headers: vec!["Train", "Car", "Position", "Final Rim Mileage", "Serial Number"],
        rows,
    }
}

pub fn export_summary(summary: &Summary, path: &Path) -> Result<(), IoError> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Json => write_json(summary, path),
        ExportFormat::Csv => write_csv(&summary_grid(summary), path),
        ExportFormat::Xlsx => write_xlsx(&summary_grid(summary), "Summary", path),
    }
}

pub fn export_moves(reconciliation: &Reconciliation, path: &Path) -> Result<(), IoError> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Json => write_json(reconciliation, path),
        ExportFormat::Csv => write_csv(&moves_grid(reconciliation, true), path),
        ExportFormat::Xlsx => write_xlsx(&moves_grid(reconciliation, true), "Moves", path),
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::Io(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| IoError::Io(e.to_string()))?;
    writer.flush().map_err(|e| IoError::Io(e.to_string()))?;
    Ok(())
}

fn write_csv(grid: &Grid, path: &Path) -> Result<(), IoError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| IoError::Io(e.to_string()))?;

    writer.write_record(&grid.headers).map_err(|e| IoError::Io(e.to_string()))?;
    for row in &grid.rows {
        let record: Vec<String> = row.iter().map(GridCell::display).collect();
        writer.write_record(&record).map_err(|e| IoError::Io(e.to_string()))?;
    }

    writer.flush().map_err(|e| IoError::Io(e.to_string()))?;
    Ok(())
}

fn write_xlsx(grid: &Grid, sheet_name: &str, path: &Path) -> Result<(), IoError> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| IoError::Io(e.to_string());

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(xlsx_err)?;

    for (col, header) in grid.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err)?;
    }

    for (i, row) in grid.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                GridCell::Empty => {}
                GridCell::Text(s) => {
                    worksheet.write_string(r, c, s).map_err(xlsx_err)?;
                }
                GridCell::Number(n) => {
                    worksheet.write_number(r, c, *n).map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}
