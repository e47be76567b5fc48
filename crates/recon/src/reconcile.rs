//! Sequence reconciler: walks one asset's timeline and accrues rim mileage.
//!
//! Wear accrues only while the asset is mounted. An install sets the
//! baseline odometer reading; the matching removal closes the period by
//! adding `mileage - baseline`. After the last event the asset's last train
//! is looked up in the fleet table and the open period is closed "as of now".
//!
//! Installs and removes must alternate. A repeated action or an
//! unrecognized one flags the whole asset, but the walk always completes so
//! the caller gets the full trace.

use tracing::debug;

use crate::error::{AssetError, RimError};
use crate::fleet::FleetMileageTable;
use crate::model::{Action, Event, MoveLabel, MoveRecord, MoveStatus, Reconciliation};
use crate::timeline::{timeline_for, AssetTimeline};

/// Reconcile a single asset out of the full event set.
pub fn reconcile(
    events: &[Event],
    fleet: &FleetMileageTable,
    asset_id: &str,
) -> Result<Reconciliation, RimError> {
    let timeline = timeline_for(events, asset_id)?;
    Ok(reconcile_timeline(&timeline, fleet))
}

/// Reconcile an already-built timeline.
pub fn reconcile_timeline(timeline: &AssetTimeline<'_>, fleet: &FleetMileageTable) -> Reconciliation {
    let mut walk = Walk::default();
    for event in &timeline.events {
        walk.step(event);
    }
    walk.close(timeline.last(), fleet);

    debug!(
        asset_id = timeline.asset_id,
        events = timeline.events.len(),
        rim_mileage = walk.rim_mileage,
        invalid = walk.sequence_invalid,
        "reconciled asset"
    );

    let result = if walk.sequence_invalid {
        Err(AssetError::InvalidSequence { asset_id: timeline.asset_id.to_string() })
    } else {
        Ok(walk.rim_mileage)
    };

    Reconciliation {
        asset_id: timeline.asset_id.to_string(),
        trace: walk.trace,
        result,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mount {
    Installed,
    Removed,
}

#[derive(Debug)]
struct Walk {
    rim_mileage: f64,
    last_installed_mileage: Option<f64>,
    install_count: u32,
    remove_count: u32,
    is_first_event: bool,
    prev_action: Option<Mount>,
    sequence_invalid: bool,
    trace: Vec<MoveRecord>,
}

impl Default for Walk {
    fn default() -> Self {
        Self {
            rim_mileage: 0.0,
            last_installed_mileage: None,
            install_count: 0,
            remove_count: 0,
            is_first_event: true,
            prev_action: None,
            sequence_invalid: false,
            trace: Vec::new(),
        }
    }
}

impl Walk {
    fn step(&mut self, event: &Event) {
        let mileage = event.train_mileage_at_event;

        let (label, status, current) = match &event.action {
            Action::Install => {
                let repeated = self.check_alternation(Mount::Installed);
                self.install_count += 1;
                if self.is_first_event {
                    // Genesis: the asset is wear-free when first fitted.
                    self.last_installed_mileage = Some(0.0);
                    self.rim_mileage = 0.0;
                } else {
                    self.last_installed_mileage = Some(mileage);
                }
                let status = if repeated {
                    MoveStatus::InvalidInstall
                } else {
                    MoveStatus::Installed(self.install_count)
                };
                (MoveLabel::Installed(self.install_count), status, Some(Mount::Installed))
            }
            Action::Remove => {
                let repeated = self.check_alternation(Mount::Removed);
                self.remove_count += 1;
                match self.last_installed_mileage {
                    Some(baseline) => self.rim_mileage += mileage - baseline,
                    None if self.is_first_event => {
                        // History starts with a removal: attribute the whole
                        // odometer reading to the asset.
                        self.last_installed_mileage = Some(0.0);
                        self.rim_mileage = mileage;
                    }
                    None => {}
                }
                let status = if repeated {
                    MoveStatus::InvalidRemove
                } else {
                    MoveStatus::Removed(self.remove_count)
                };
                (MoveLabel::Removed(self.remove_count), status, Some(Mount::Removed))
            }
            Action::Unknown(raw) => {
                self.sequence_invalid = true;
                (MoveLabel::UnknownAction, MoveStatus::UnknownAction(raw.clone()), None)
            }
        };

        self.trace.push(MoveRecord {
            label,
            train_id: event.train_id.clone(),
            car: event.car.clone(),
            position: event.position.clone(),
            mileage_at_event: mileage,
            cumulative_rim_mileage: self.rim_mileage,
            status,
        });

        self.prev_action = current;
        self.is_first_event = false;
    }

    /// Flag the asset when the same mount action repeats back to back.
    fn check_alternation(&mut self, action: Mount) -> bool {
        let repeated = self.prev_action == Some(action);
        if repeated {
            self.sequence_invalid = true;
        }
        repeated
    }

    /// Close the open period against the last train's current mileage.
    fn close(&mut self, last: &Event, fleet: &FleetMileageTable) {
        let Some(train) = last.train_id.as_deref().map(str::trim) else {
            debug!(asset_id = %last.asset_id, "last event has no train; skipping closing accrual");
            return;
        };
        let Some(latest) = fleet.resolve(train) else {
            debug!(asset_id = %last.asset_id, train, "train not in fleet mileage table; skipping closing accrual");
            return;
        };

        self.rim_mileage += match self.last_installed_mileage {
            Some(baseline) => latest - baseline,
            None => latest,
        };

        self.trace.push(MoveRecord {
            label: MoveLabel::Latest,
            train_id: Some(train.to_string()),
            car: last.car.clone(),
            position: last.position.clone(),
            mileage_at_event: latest,
            cumulative_rim_mileage: self.rim_mileage,
            status: MoveStatus::LatestMileage,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
