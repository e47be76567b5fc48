//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                                              |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, unsupported file type)            |
//! | 3    | I/O error (file missing, sheet missing, write failure)   |
//! | 4    | Parse error (bad date or number in the input)            |
//! | 5    | Invalid ingest config                                    |
//! | 6    | Requested serial number not found                        |
//! | 7    | Findings: invalid sequences or duplicate locations       |

use rimtrack_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported input or output extension.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be opened or read, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// A date or number cell could not be parsed.
pub const EXIT_PARSE: u8 = 4;

/// The ingest config failed to parse or validate.
pub const EXIT_CONFIG: u8 = 5;

/// `moves --serial` named an asset with no events.
pub const EXIT_NOT_FOUND: u8 = 6;

/// Data problems were found: an invalid install/remove sequence or two
/// assets claiming the same slot.
pub const EXIT_FINDINGS: u8 = 7;

/// Map an ingestion error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    if err.is_config() {
        EXIT_CONFIG
    } else if err.is_parse() {
        EXIT_PARSE
    } else if matches!(err, IoError::UnsupportedFormat(_)) {
        EXIT_USAGE
    } else {
        EXIT_IO
    }
}
