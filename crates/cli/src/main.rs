// rimtrack CLI - rim mileage reconciliation over wheel install/remove history

mod exit_codes;
mod mileage;
mod render;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "rimtrack")]
#[command(about = "Rim mileage tracking from wheel install/remove history")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr (same as RIMTRACK_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the wheel history and fleet mileage come from.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Workbook with both sheets (.xlsx/.xlsm/.xls/.ods), or the events CSV
    pub input: PathBuf,

    /// Fleet mileage CSV (required when INPUT is a CSV)
    #[arg(long, short = 'm')]
    pub mileage: Option<PathBuf>,

    /// TOML file overriding sheet and column names
    #[arg(long, short = 'c', env = "RIMTRACK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the move history and rim mileage of one wheel
    #[command(after_help = "\
Exit code 6 means the serial number has no events; exit code 7 means its
install/remove sequence is invalid (the trace is still printed).

Examples:
  rimtrack moves wheels.xlsx --serial W-1042
  rimtrack moves wheels.xlsx --serial W-1042 --status
  rimtrack moves events.csv --mileage fleet.csv --serial W-1042 --json
  rimtrack moves wheels.xlsx --serial W-1042 --output w1042.csv")]
    Moves {
        #[command(flatten)]
        input: InputArgs,

        /// Serial number to trace
        #[arg(long, short = 's')]
        serial: String,

        /// Include the status column
        #[arg(long)]
        status: bool,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write the trace to a file (.csv, .json or .xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Final rim mileage for every wheel, by train/car/position
    #[command(after_help = "\
Wheels with zero mileage or without a car/position are left out unless they
are in error. Wheels sharing a slot are reported as duplicate locations.

Examples:
  rimtrack summary wheels.xlsx
  rimtrack summary wheels.xlsx --json
  rimtrack summary events.csv --mileage fleet.csv --output summary.xlsx")]
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Write the summary to a file (.csv, .json or .xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit 7 when the summary contains errors
        #[arg(long)]
        strict: bool,
    },

    /// Report wheels with invalid sequences or duplicate locations (exit 7 if any)
    #[command(after_help = "\
Examples:
  rimtrack validate wheels.xlsx
  rimtrack validate events.csv --mileage fleet.csv --json")]
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  rimtrack-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RIMTRACK_LOG").unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(err: rimtrack_io::IoError) -> Self {
        let code = exit_codes::io_exit_code(&err);
        let hint = match &err {
            rimtrack_io::IoError::MissingSheet { .. } | rimtrack_io::IoError::MissingColumn { .. } => {
                Some("use --config to map sheet and column names".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Moves { input, serial, status, json, output } => {
            mileage::cmd_moves(&input, &serial, status, json, output)
        }
        Commands::Summary { input, json, output, strict } => mileage::cmd_summary(&input, json, output, strict),
        Commands::Validate { input, json } => mileage::cmd_validate(&input, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
