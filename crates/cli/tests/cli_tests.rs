// End-to-end tests for the rimtrack binary: exit codes, table output and the
// --json stdout contract.
//
// Run with: cargo test -p rimtrack-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

const EVENTS: &str = "\
SerialNumber,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-1,2024-01-05,Installed,T1,1,L1,0
W-1,2024-03-05,Removed,T1,1,L1,5000
W-1,2024-04-01,Installed,T2,2,R1,10000
W-2,2024-01-06,Installed,T1,1,L1,0
W-2,2024-01-07,Installed,T1,1,L1,100
";

const FLEET: &str = "Train,Mileage\nT1,8000\nT2,12000\n";

fn rimtrack() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rimtrack"));
    cmd.env_remove("RIMTRACK_CONFIG").env_remove("RIMTRACK_LOG");
    cmd
}

struct Inputs {
    _dir: TempDir,
    events: PathBuf,
    fleet: PathBuf,
}

impl Inputs {
    fn new(events: &str, fleet: &str) -> Self {
        let dir = tempdir().unwrap();
        let events_path = dir.path().join("events.csv");
        let fleet_path = dir.path().join("fleet.csv");
        std::fs::write(&events_path, events).unwrap();
        std::fs::write(&fleet_path, fleet).unwrap();
        Self { _dir: dir, events: events_path, fleet: fleet_path }
    }

    fn dir(&self) -> &Path {
        self._dir.path()
    }

    fn run(&self, command: &str, extra: &[&str]) -> Output {
        rimtrack()
            .arg(command)
            .arg(&self.events)
            .arg("--mileage")
            .arg(&self.fleet)
            .args(extra)
            .output()
            .expect("run rimtrack")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json(output: &Output) -> serde_json::Value {
    let text = stdout(output);
    serde_json::from_str(text.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\nstdout:\n{text}"))
}

// ===========================================================================
// moves
// ===========================================================================

#[test]
fn moves_table_prints_trace_and_total() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("moves", &["--serial", "W-1"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Moves for serial number: W-1"), "{out}");
    assert!(out.contains("Rim Mileage"));
    assert!(out.contains("Latest"));
    assert!(out.contains("Total rim mileage: 7,000"), "{out}");
    assert!(!out.contains("Status"));
}

#[test]
fn moves_json_shape() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("moves", &["--serial", " W-1 ", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = parse_json(&output);
    assert_eq!(val["asset_id"], "W-1");
    assert_eq!(val["result"], serde_json::json!({ "value": 7000.0 }));

    let trace = val["trace"].as_array().unwrap();
    let labels: Vec<&str> = trace.iter().map(|r| r["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Installed 1", "Removed 1", "Installed 2", "Latest"]);
    assert_eq!(trace[1]["cumulative_rim_mileage"], 5000.0);
    assert_eq!(trace[3]["train_id"], "T2");
}

#[test]
fn moves_invalid_sequence_exits_7_with_trace() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("moves", &["--serial", "W-2", "--status"]);

    assert_eq!(output.status.code(), Some(7));
    let out = stdout(&output);
    assert!(out.contains("Invalid install sequence"), "{out}");
    assert!(!out.contains("Total rim mileage"));
    assert!(stderr(&output).contains("Invalid sequence for asset W-2"));
}

#[test]
fn moves_unknown_serial_exits_6() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("moves", &["--serial", "W-9"]);

    assert_eq!(output.status.code(), Some(6));
    let err = stderr(&output);
    assert!(err.contains("serial number W-9 not found"), "{err}");
    assert!(err.contains("hint:"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn moves_export_csv() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let out_path = inputs.dir().join("w1.csv");
    let output = inputs.run("moves", &["--serial", "W-1", "--output", out_path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("Action,Train,Car,Position,Mileage,Rim Mileage,Status"));
    assert_eq!(written.lines().count(), 5);
}

// ===========================================================================
// summary
// ===========================================================================

#[test]
fn summary_json_sorted_by_location() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("summary", &["--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = parse_json(&output);

    let rows = val["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["asset_id"], "W-2");
    assert_eq!(rows[0]["final_rim_mileage"]["error"]["kind"], "invalid_sequence");
    assert_eq!(rows[1]["asset_id"], "W-1");
    assert_eq!(rows[1]["final_rim_mileage"]["value"], 7000.0);

    assert_eq!(val["stats"]["assets"], 2);
    assert_eq!(val["stats"]["invalid_sequences"], 1);
}

#[test]
fn summary_table_and_stats_line() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("summary", &[]);

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Train"));
    assert!(lines[2].contains("Error: Invalid sequence for asset W-2"), "{out}");
    assert!(lines[3].contains("7,000"));
    assert!(stderr(&output).contains("2 wheels: 2 reported, 1 invalid sequences"));
}

#[test]
fn summary_strict_fails_on_errors() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("summary", &["--strict"]);

    assert_eq!(output.status.code(), Some(7));
    assert!(stderr(&output).contains("summary contains errors"));
}

#[test]
fn summary_with_nothing_to_report() {
    let events = "\
SerialNumber,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-5,2024-01-05,Installed,T9,1,L1,0
";
    let inputs = Inputs::new(events, FLEET);
    let output = inputs.run("summary", &[]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "No summary data to display.");
}

#[test]
fn summary_export_xlsx() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let out_path = inputs.dir().join("summary.xlsx");
    let output = inputs.run("summary", &["-o", out_path.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let bytes = std::fs::read(&out_path).unwrap();
    assert!(bytes.starts_with(b"PK"), "xlsx is a zip container");
}

// ===========================================================================
// validate
// ===========================================================================

#[test]
fn validate_json_reports_findings() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = inputs.run("validate", &["--json"]);

    assert_eq!(output.status.code(), Some(7));
    let val = parse_json(&output);
    assert_eq!(val["wheels"], 2);
    let findings = val["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["serial"], "W-2");
    assert_eq!(findings[0]["problem"], "invalid_sequence");
    assert_eq!(findings[0]["train"], "T1");
}

#[test]
fn validate_clean_input_succeeds() {
    let events = "\
SerialNumber,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-1,2024-01-05,Installed,T1,1,L1,0
W-3,2024-01-05,Installed,T2,1,L1,0
";
    let inputs = Inputs::new(events, FLEET);
    let output = inputs.run("validate", &[]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("2 wheels checked, 0 findings"));
}

#[test]
fn validate_reports_duplicate_locations() {
    let events = "\
SerialNumber,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-1,2024-01-05,Installed,T1,1,L1,0
W-3,2024-01-05,Installed,T1,1,L1,0
";
    let inputs = Inputs::new(events, FLEET);
    let output = inputs.run("validate", &["--json"]);

    assert_eq!(output.status.code(), Some(7));
    let val = parse_json(&output);
    let problems: Vec<&str> = val["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["problem"].as_str().unwrap())
        .collect();
    assert_eq!(problems, vec!["duplicate_location", "duplicate_location"]);
}

// ===========================================================================
// input errors
// ===========================================================================

#[test]
fn csv_input_without_mileage_is_usage_error() {
    let inputs = Inputs::new(EVENTS, FLEET);
    let output = rimtrack().arg("summary").arg(&inputs.events).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("fleet mileage"));
}

#[test]
fn missing_column_suggests_config() {
    let events = "Serial,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation\n";
    let inputs = Inputs::new(events, FLEET);
    let output = inputs.run("summary", &[]);

    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("SerialNumber"), "{err}");
    assert!(err.contains("--config"));
}

#[test]
fn config_file_remaps_columns() {
    let events = "\
Serial,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-1,2024-01-05,Installed,T1,1,L1,0
";
    let inputs = Inputs::new(events, FLEET);
    let config = inputs.dir().join("rimtrack.toml");
    std::fs::write(&config, "[events]\nserial = \"Serial\"\n").unwrap();

    let output = inputs.run("moves", &["--serial", "W-1", "--config", config.to_str().unwrap(), "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(parse_json(&output)["result"]["value"], 8000.0);
}

#[test]
fn bad_number_is_parse_error() {
    let events = "\
SerialNumber,Requested_Date,Action,Train,Car,Position,Train_Mileage_at_Installation
W-1,2024-01-05,Installed,T1,1,L1,lots
";
    let inputs = Inputs::new(events, FLEET);
    let output = inputs.run("summary", &[]);

    assert_eq!(output.status.code(), Some(4));
}
