//! `rimtrack-recon`: rim mileage reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed install/remove events and a fleet
//! mileage table, returns per-asset traces and a fleet-wide summary.
//! No CLI or IO dependencies.

pub mod error;
pub mod fleet;
pub mod model;
pub mod reconcile;
pub mod summary;
pub mod timeline;

pub use error::{AssetError, RimError};
pub use fleet::FleetMileageTable;
pub use model::{Action, Event, FinalMileage, MoveLabel, MoveRecord, MoveStatus, Reconciliation, Summary, SummaryRow, SummaryStats};
pub use reconcile::reconcile;
pub use summary::summarize;
