use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::error::AssetError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// What happened to an asset at an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Install,
    Remove,
    /// Unrecognized action text, lower-cased and trimmed.
    Unknown(String),
}

impl Action {
    /// Classify free-form action text ("Installed", " REMOVED ", ...).
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        if text.contains("installed") || text == "install" {
            Self::Install
        } else if text.contains("removed") || text == "remove" {
            Self::Remove
        } else {
            Self::Unknown(text)
        }
    }
}

/// One row of history for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub asset_id: String,
    pub timestamp: NaiveDateTime,
    pub action: Action,
    pub train_id: Option<String>,
    pub car: Option<String>,
    pub position: Option<String>,
    /// Host train odometer reading recorded at this event.
    pub train_mileage_at_event: f64,
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveLabel {
    Installed(u32),
    Removed(u32),
    UnknownAction,
    Latest,
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed(n) => write!(f, "Installed {n}"),
            Self::Removed(n) => write!(f, "Removed {n}"),
            Self::UnknownAction => write!(f, "Unknown Action"),
            Self::Latest => write!(f, "Latest"),
        }
    }
}

impl Serialize for MoveLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStatus {
    Installed(u32),
    Removed(u32),
    InvalidInstall,
    InvalidRemove,
    UnknownAction(String),
    LatestMileage,
}

impl MoveStatus {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::InvalidInstall | Self::InvalidRemove | Self::UnknownAction(_))
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed(n) => write!(f, "Installed {n}"),
            Self::Removed(n) => write!(f, "Removed {n}"),
            Self::InvalidInstall => write!(f, "Invalid install sequence"),
            Self::InvalidRemove => write!(f, "Invalid remove sequence"),
            Self::UnknownAction(raw) => write!(f, "Unknown action '{raw}'"),
            Self::LatestMileage => write!(f, "Latest mileage"),
        }
    }
}

impl Serialize for MoveStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One diagnostic row of an asset's trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub label: MoveLabel,
    pub train_id: Option<String>,
    pub car: Option<String>,
    pub position: Option<String>,
    pub mileage_at_event: f64,
    pub cumulative_rim_mileage: f64,
    pub status: MoveStatus,
}

/// Outcome of reconciling one asset. The trace is complete even on error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub asset_id: String,
    pub trace: Vec<MoveRecord>,
    #[serde(serialize_with = "serialize_result")]
    pub result: Result<f64, AssetError>,
}

fn serialize_result<S: Serializer>(
    result: &Result<f64, AssetError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    FinalMileage::from(result.clone()).serialize(serializer)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Final rim mileage, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalMileage {
    Value(f64),
    Error(AssetError),
}

impl FinalMileage {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<f64, AssetError>> for FinalMileage {
    fn from(result: Result<f64, AssetError>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Error(e),
        }
    }
}

impl fmt::Display for FinalMileage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Error(e) => write!(f, "Error: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub train_id: Option<String>,
    pub car: Option<String>,
    pub position: Option<String>,
    pub final_rim_mileage: FinalMileage,
    pub asset_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    /// Distinct assets seen in the input.
    pub assets: usize,
    /// Rows in the final table.
    pub reported: usize,
    pub excluded_zero: usize,
    pub excluded_unlocated: usize,
    pub invalid_sequences: usize,
    pub duplicate_locations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub stats: SummaryStats,
    pub rows: Vec<SummaryRow>,
}
