use std::fmt;

use serde::Serialize;

/// Errors surfaced to the caller of a single-asset query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RimError {
    /// The requested asset has no events at all.
    AssetNotFound { asset_id: String },
}

impl fmt::Display for RimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetNotFound { asset_id } => write!(f, "serial number {asset_id} not found"),
        }
    }
}

impl std::error::Error for RimError {}

/// Per-asset error carried in place of a mileage value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetError {
    /// Consecutive installs/removes, or an unrecognized action.
    InvalidSequence { asset_id: String },
    /// Two or more assets report the same (train, car, position).
    DuplicateLocation,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSequence { asset_id } => write!(f, "Invalid sequence for asset {asset_id}"),
            Self::DuplicateLocation => write!(f, "Duplicate location"),
        }
    }
}

impl std::error::Error for AssetError {}
