use std::path::PathBuf;

use chrono::NaiveDate;
use rimtrack_recon::{
    reconcile, summarize, Action, AssetError, Event, FinalMileage, FleetMileageTable, MoveLabel, MoveStatus, RimError,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn opt(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn load_events() -> Vec<Event> {
    let path = fixtures_dir().join("events.csv");
    let mut reader = csv::Reader::from_path(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            Event {
                asset_id: r[0].to_string(),
                timestamp: NaiveDate::parse_from_str(&r[1], "%Y-%m-%d").unwrap().and_hms_opt(0, 0, 0).unwrap(),
                action: Action::parse(&r[2]),
                train_id: opt(&r[3]),
                car: opt(&r[4]),
                position: opt(&r[5]),
                train_mileage_at_event: r[6].parse().unwrap(),
            }
        })
        .collect()
}

fn load_fleet() -> FleetMileageTable {
    let path = fixtures_dir().join("fleet.csv");
    let mut reader = csv::Reader::from_path(&path).unwrap();
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].trim().parse::<f64>().unwrap())
        })
        .collect()
}

// -------------------------------------------------------------------------
// Single asset
// -------------------------------------------------------------------------

#[test]
fn moves_close_against_latest_fleet_mileage() {
    let r = reconcile(&load_events(), &load_fleet(), "W-100").unwrap();

    // 12000 over the first mount on T101, then 45000 - 40000 on T205.
    assert_eq!(r.result, Ok(17000.0));
    let labels: Vec<String> = r.trace.iter().map(|m| m.label.to_string()).collect();
    assert_eq!(labels, vec!["Installed 1", "Removed 1", "Installed 2", "Latest"]);

    let latest = r.trace.last().unwrap();
    assert_eq!(latest.train_id.as_deref(), Some("T205"));
    assert_eq!(latest.car.as_deref(), Some("3"));
    assert_eq!(latest.mileage_at_event, 45000.0);
}

#[test]
fn leading_removal_bootstraps_and_resolves_untrimmed_train() {
    let r = reconcile(&load_events(), &load_fleet(), "W-300").unwrap();
    assert_eq!(r.trace[0].cumulative_rim_mileage, 25000.0);
    assert_eq!(r.result, Ok(51000.0));
}

#[test]
fn invalid_sequence_keeps_trace() {
    let r = reconcile(&load_events(), &load_fleet(), "W-400").unwrap();
    assert_eq!(r.result, Err(AssetError::InvalidSequence { asset_id: "W-400".into() }));
    assert_eq!(r.trace.len(), 3);
    assert_eq!(r.trace[1].status, MoveStatus::InvalidInstall);
    assert_eq!(r.trace[2].label, MoveLabel::Latest);
    assert_eq!(
        r.result.unwrap_err().to_string(),
        "Invalid sequence for asset W-400"
    );
}

#[test]
fn unknown_serial_reports_not_found() {
    let err = reconcile(&load_events(), &load_fleet(), "W-999").unwrap_err();
    assert!(matches!(err, RimError::AssetNotFound { .. }));
    assert!(err.to_string().contains("W-999"));
}

// -------------------------------------------------------------------------
// Fleet summary
// -------------------------------------------------------------------------

#[test]
fn fleet_summary_end_to_end() {
    let summary = summarize(&load_events(), &load_fleet());

    let order: Vec<&str> = summary.rows.iter().map(|r| r.asset_id.as_str()).collect();
    assert_eq!(order, vec!["W-400", "W-200", "W-700", "W-100", "W-500", "W-300"]);

    assert_eq!(summary.stats.assets, 7);
    assert_eq!(summary.stats.reported, 6);
    assert_eq!(summary.stats.excluded_unlocated, 1);
    assert_eq!(summary.stats.excluded_zero, 0);
    assert_eq!(summary.stats.invalid_sequences, 2);
    assert_eq!(summary.stats.duplicate_locations, 2);

    let by_id = |id: &str| summary.rows.iter().find(|r| r.asset_id == id).unwrap();
    assert_eq!(by_id("W-200").final_rim_mileage, FinalMileage::Value(38000.0));
    assert_eq!(by_id("W-300").final_rim_mileage, FinalMileage::Value(51000.0));
    assert_eq!(by_id("W-100").final_rim_mileage, FinalMileage::Error(AssetError::DuplicateLocation));
    assert_eq!(by_id("W-500").final_rim_mileage, FinalMileage::Error(AssetError::DuplicateLocation));
    assert!(matches!(
        by_id("W-700").final_rim_mileage,
        FinalMileage::Error(AssetError::InvalidSequence { .. })
    ));
}

#[test]
fn summary_rows_are_ordered_by_location() {
    let summary = summarize(&load_events(), &load_fleet());
    for pair in summary.rows.windows(2) {
        let a = (&pair[0].train_id, &pair[0].car, &pair[0].position);
        let b = (&pair[1].train_id, &pair[1].car, &pair[1].position);
        assert!(a <= b, "{a:?} should not sort after {b:?}");
    }
}

#[test]
fn summary_serializes_to_json() {
    let summary = summarize(&load_events(), &load_fleet());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["stats"]["reported"], 6);
    assert_eq!(json["rows"][1]["final_rim_mileage"]["value"], 38000.0);
    assert_eq!(json["rows"][3]["final_rim_mileage"]["error"]["kind"], "duplicate_location");
}
