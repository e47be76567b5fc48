use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::error::AssetError;
use crate::fleet::FleetMileageTable;
use crate::model::{Event, FinalMileage, Summary, SummaryRow, SummaryStats};
use crate::reconcile::reconcile_timeline;
use crate::timeline::build_timelines;

type LocationKey = (Option<String>, Option<String>, Option<String>);

/// Reconcile every asset and assemble the fleet-wide table.
///
/// Assets without a car/position, or with exactly zero mileage, are left
/// out unless their result is an error. Assets sharing a location have
/// their result replaced with [`AssetError::DuplicateLocation`].
pub fn summarize(events: &[Event], fleet: &FleetMileageTable) -> Summary {
    let timelines = build_timelines(events);
    let mut stats = SummaryStats { assets: timelines.len(), ..Default::default() };
    let mut rows: Vec<SummaryRow> = Vec::new();

    for timeline in &timelines {
        let reconciliation = reconcile_timeline(timeline, fleet);
        let last = timeline.last();

        if reconciliation.result.is_err() {
            stats.invalid_sequences += 1;
        } else if last.car.is_none() || last.position.is_none() {
            stats.excluded_unlocated += 1;
            continue;
        } else if reconciliation.result == Ok(0.0) {
            stats.excluded_zero += 1;
            continue;
        }

        rows.push(SummaryRow {
            train_id: last.train_id.clone(),
            car: last.car.clone(),
            position: last.position.clone(),
            final_rim_mileage: FinalMileage::from(reconciliation.result),
            asset_id: timeline.asset_id.to_string(),
        });
    }

    stats.duplicate_locations = mark_duplicate_locations(&mut rows);
    rows.sort_by(compare_location);
    stats.reported = rows.len();

    debug!(
        assets = stats.assets,
        reported = stats.reported,
        duplicates = stats.duplicate_locations,
        "fleet summary assembled"
    );

    Summary { stats, rows }
}

/// Overwrite every row that shares a location with another. Returns the
/// number of rows marked. A key with all three parts missing never collides.
fn mark_duplicate_locations(rows: &mut [SummaryRow]) -> usize {
    let mut groups: HashMap<LocationKey, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        let key = (row.train_id.clone(), row.car.clone(), row.position.clone());
        groups.entry(key).or_default().push(i);
    }

    let mut marked = 0;
    for (key, members) in groups {
        if members.len() < 2 || key == (None, None, None) {
            continue;
        }
        for i in members {
            rows[i].final_rim_mileage = FinalMileage::Error(AssetError::DuplicateLocation);
            marked += 1;
        }
    }
    marked
}

/// Missing values sort after present ones.
fn compare_part(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_location(a: &SummaryRow, b: &SummaryRow) -> Ordering {
    compare_part(&a.train_id, &b.train_id)
        .then_with(|| compare_part(&a.car, &b.car))
        .then_with(|| compare_part(&a.position, &b.position))
}
