//! `rimtrack moves|summary|validate`: rim mileage reconciliation commands.

use std::path::PathBuf;

use rimtrack_io::export::{export_moves, export_summary, moves_grid, summary_grid};
use rimtrack_io::{Dataset, IngestConfig};
use rimtrack_recon::{reconcile, summarize, AssetError, FinalMileage, RimError};
use serde::Serialize;

use crate::exit_codes::{EXIT_FINDINGS, EXIT_NOT_FOUND};
use crate::render::{format_mileage, render_grid};
use crate::{CliError, InputArgs};

fn load_input(args: &InputArgs) -> Result<Dataset, CliError> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(rimtrack_io::IoError::Open { path: path.display().to_string(), message: e.to_string() }))?;
            IngestConfig::from_toml(&text).map_err(CliError::io)?
        }
        None => IngestConfig::default(),
    };

    rimtrack_io::load(&args.input, args.mileage.as_deref(), &config).map_err(CliError::io)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(crate::exit_codes::EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// moves
// ============================================================================

pub fn cmd_moves(
    args: &InputArgs,
    serial: &str,
    with_status: bool,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let data = load_input(args)?;

    let reconciliation = reconcile(&data.events, &data.fleet, serial).map_err(|e| match e {
        RimError::AssetNotFound { .. } => {
            CliError::new(EXIT_NOT_FOUND, e.to_string()).with_hint("serial numbers are matched exactly, ignoring surrounding spaces")
        }
    })?;

    if let Some(ref path) = output_file {
        export_moves(&reconciliation, path).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        print_json(&reconciliation)?;
    } else {
        println!("Moves for serial number: {}", reconciliation.asset_id);
        println!();
        print!("{}", render_grid(&moves_grid(&reconciliation, with_status)));
        println!();
        if let Ok(total) = reconciliation.result {
            println!("Total rim mileage: {}", format_mileage(total));
        }
    }

    match reconciliation.result {
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::new(EXIT_FINDINGS, e.to_string())),
    }
}

// ============================================================================
// summary
// ============================================================================

pub fn cmd_summary(
    args: &InputArgs,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let data = load_input(args)?;
    let summary = summarize(&data.events, &data.fleet);

    if let Some(ref path) = output_file {
        export_summary(&summary, path).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        print_json(&summary)?;
    } else if summary.rows.is_empty() {
        println!("No summary data to display.");
    } else {
        print!("{}", render_grid(&summary_grid(&summary)));
    }

    let s = &summary.stats;
    eprintln!(
        "{} wheels: {} reported, {} invalid sequences, {} duplicate locations, {} excluded (zero mileage {}, no car/position {})",
        s.assets,
        s.reported,
        s.invalid_sequences,
        s.duplicate_locations,
        s.excluded_zero + s.excluded_unlocated,
        s.excluded_zero,
        s.excluded_unlocated,
    );

    if strict && summary.rows.iter().any(|r| r.final_rim_mileage.is_error()) {
        return Err(CliError::new(EXIT_FINDINGS, "summary contains errors"));
    }

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

#[derive(Debug, Serialize)]
struct Finding {
    serial: String,
    train: Option<String>,
    car: Option<String>,
    position: Option<String>,
    problem: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidateReport {
    wheels: usize,
    warnings: Vec<String>,
    findings: Vec<Finding>,
}

pub fn cmd_validate(args: &InputArgs, json_output: bool) -> Result<(), CliError> {
    let data = load_input(args)?;
    let summary = summarize(&data.events, &data.fleet);

    let findings: Vec<Finding> = summary
        .rows
        .iter()
        .filter_map(|row| match &row.final_rim_mileage {
            FinalMileage::Value(_) => None,
            FinalMileage::Error(err) => Some(Finding {
                serial: row.asset_id.clone(),
                train: row.train_id.clone(),
                car: row.car.clone(),
                position: row.position.clone(),
                problem: match err {
                    AssetError::InvalidSequence { .. } => "invalid_sequence",
                    AssetError::DuplicateLocation => "duplicate_location",
                },
                message: err.to_string(),
            }),
        })
        .collect();

    let report = ValidateReport {
        wheels: summary.stats.assets,
        warnings: data.warnings,
        findings,
    };

    if json_output {
        print_json(&report)?;
    } else {
        for f in &report.findings {
            println!(
                "{}  {}/{}/{}  {}",
                f.serial,
                f.train.as_deref().unwrap_or("-"),
                f.car.as_deref().unwrap_or("-"),
                f.position.as_deref().unwrap_or("-"),
                f.message,
            );
        }
        eprintln!("{} wheels checked, {} findings", report.wheels, report.findings.len());
    }

    if report.findings.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(EXIT_FINDINGS, format!("{} findings", report.findings.len())))
    }
}
