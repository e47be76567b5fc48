use std::collections::HashMap;

use crate::error::RimError;
use crate::model::Event;

/// One asset's events, ordered by timestamp. Never empty.
#[derive(Debug, Clone)]
pub struct AssetTimeline<'a> {
    pub asset_id: &'a str,
    pub events: Vec<&'a Event>,
}

impl<'a> AssetTimeline<'a> {
    /// Last event by timestamp; carries the asset's reported location.
    pub fn last(&self) -> &'a Event {
        self.events[self.events.len() - 1]
    }
}

/// Partition events by asset id (first-appearance order) and sort each
/// partition by timestamp. The sort is stable so ties keep input order.
pub fn build_timelines(events: &[Event]) -> Vec<AssetTimeline<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut timelines: Vec<AssetTimeline<'_>> = Vec::new();

    for event in events {
        let key = event.asset_id.trim();
        let slot = *index.entry(key).or_insert_with(|| {
            timelines.push(AssetTimeline { asset_id: key, events: Vec::new() });
            timelines.len() - 1
        });
        timelines[slot].events.push(event);
    }

    for timeline in &mut timelines {
        timeline.events.sort_by_key(|e| e.timestamp);
    }

    timelines
}

/// Ordered timeline for a single asset.
pub fn timeline_for<'a>(events: &'a [Event], asset_id: &str) -> Result<AssetTimeline<'a>, RimError> {
    let wanted = asset_id.trim();
    let mut matching: Vec<&Event> = events.iter().filter(|e| e.asset_id.trim() == wanted).collect();

    if matching.is_empty() {
        return Err(RimError::AssetNotFound { asset_id: wanted.to_string() });
    }

    matching.sort_by_key(|e| e.timestamp);
    let asset_id = matching[0].asset_id.trim();
    Ok(AssetTimeline { asset_id, events: matching })
}
