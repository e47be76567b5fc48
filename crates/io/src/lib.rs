//! `rimtrack-io`: loading wheel history and fleet mileage, exporting results.
//!
//! Inputs are either one workbook holding both sheets, or a pair of CSV
//! files. Either way the caller gets a [`Dataset`] the engine can consume.

pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod records;
pub mod table;
pub mod workbook;

use std::path::Path;

use rimtrack_recon::{Event, FleetMileageTable};
use tracing::info;

pub use config::IngestConfig;
pub use error::IoError;

/// Everything the engine needs, plus non-fatal notes from loading.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub events: Vec<Event>,
    pub fleet: FleetMileageTable,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Workbook,
    Csv,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "tsv" | "txt" => Ok(Self::Csv),
            other => Err(IoError::UnsupportedFormat(format!(
                "cannot read '.{other}' input (expected .xlsx, .xlsm, .xls, .ods or .csv)"
            ))),
        }
    }
}

/// Load events and fleet mileage from a workbook containing both sheets.
pub fn load_workbook(path: &Path, config: &IngestConfig) -> Result<Dataset, IoError> {
    let mut source = workbook::WorkbookSource::open(path)?;
    let events_table = source.table(&config.sheets.events)?;
    let mileage_table = source.table(&config.sheets.mileage)?;
    build_dataset(&events_table, &mileage_table, config)
}

/// Load events and fleet mileage from two delimited files.
pub fn load_csv(events_path: &Path, mileage_path: &Path, config: &IngestConfig) -> Result<Dataset, IoError> {
    let events_table = crate::csv::import(events_path, &config.sheets.events)?;
    let mileage_table = crate::csv::import(mileage_path, &config.sheets.mileage)?;
    build_dataset(&events_table, &mileage_table, config)
}

/// Same as [`load_csv`] but from in-memory text.
pub fn load_csv_from_str(events_csv: &str, mileage_csv: &str, config: &IngestConfig) -> Result<Dataset, IoError> {
    let events_table = crate::csv::import_from_str(events_csv, &config.sheets.events)?;
    let mileage_table = crate::csv::import_from_str(mileage_csv, &config.sheets.mileage)?;
    build_dataset(&events_table, &mileage_table, config)
}

/// Dispatch on the input's extension. CSV input needs a separate mileage file.
pub fn load(input: &Path, mileage: Option<&Path>, config: &IngestConfig) -> Result<Dataset, IoError> {
    match InputKind::from_path(input)? {
        InputKind::Workbook => load_workbook(input, config),
        InputKind::Csv => {
            let mileage = mileage.ok_or_else(|| {
                IoError::UnsupportedFormat("CSV input requires a separate fleet mileage file".into())
            })?;
            load_csv(input, mileage, config)
        }
    }
}

fn build_dataset(events_table: &table::Table, mileage_table: &table::Table, config: &IngestConfig) -> Result<Dataset, IoError> {
    let mut warnings = Vec::new();
    let events = records::events_from_table(events_table, &config.events, &mut warnings)?;
    let fleet = records::fleet_from_table(mileage_table, &config.mileage, &mut warnings)?;
    info!(events = events.len(), trains = fleet.len(), warnings = warnings.len(), "dataset loaded");
    Ok(Dataset { events, fleet, warnings })
}
