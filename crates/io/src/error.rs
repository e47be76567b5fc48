use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Open { path: String, message: String },
    /// Required sheet is absent from the workbook.
    MissingSheet { name: String, available: Vec<String> },
    /// Required column is absent from a sheet's header row.
    MissingColumn { sheet: String, column: String },
    /// Timestamp cell could not be parsed.
    DateParse { sheet: String, row: usize, value: String },
    /// Numeric cell could not be parsed.
    NumberParse { sheet: String, row: usize, column: String, value: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty sheet or column name).
    ConfigValidation(String),
    /// Unsupported input or output file type.
    UnsupportedFormat(String),
    /// Read/write error after the file was opened.
    Io(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => write!(f, "cannot open {path}: {message}"),
            Self::MissingSheet { name, available } => {
                write!(f, "required sheet '{name}' not found (sheets: {})", available.join(", "))
            }
            Self::MissingColumn { sheet, column } => {
                write!(f, "sheet '{sheet}': missing column '{column}'")
            }
            Self::DateParse { sheet, row, value } => {
                write!(f, "sheet '{sheet}', row {row}: cannot parse date '{value}'")
            }
            Self::NumberParse { sheet, row, column, value } => {
                write!(f, "sheet '{sheet}', row {row}: cannot parse {column} '{value}'")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

impl IoError {
    /// Parse-class errors (bad cell contents) as opposed to missing files.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::DateParse { .. } | Self::NumberParse { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigParse(_) | Self::ConfigValidation(_))
    }
}
