// CSV/TSV import of event and mileage tables

use std::io::Read;
use std::path::Path;

use crate::error::IoError;
use crate::table::{Cell, Table};

/// Read a delimited file into a table. The delimiter is sniffed.
pub fn import(path: &Path, name: &str) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    import_from_str(&content, name)
}

pub fn import_from_str(content: &str, name: &str) -> Result<Table, IoError> {
    let delimiter = sniff_delimiter(content);
    import_with_delimiter(content, name, delimiter)
}

/// Pick the delimiter for an exported sheet: comma, semicolon (European
/// Excel) or tab.
///
/// The header line decides how many columns a candidate yields. A candidate
/// scores by how many of the following non-blank lines agree with that
/// count, times the count itself. Lines are split with the csv parser so
/// quoted fields such as `"45,000"` do not count as extra columns.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).take(10);
    let Some(header) = lines.next() else {
        return b',';
    };
    let body: Vec<&str> = lines.collect();

    CANDIDATES
        .iter()
        .map(|&delim| {
            let columns = field_count(header, delim);
            if columns < 2 {
                return (delim, 0);
            }
            let agreeing = body.iter().filter(|l| field_count(l, delim) == columns).count();
            (delim, (agreeing + 1) * columns)
        })
        .fold((b',', 0), |best, cand| if cand.1 > best.1 { cand } else { best })
        .0
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |r| r.len())
}

/// Read file and convert to UTF-8 if needed (Excel-exported CSVs are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let open_err = |e: std::io::Error| IoError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::Io(e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_with_delimiter(content: &str, name: &str, delimiter: u8) -> Result<Table, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    // The reader drops empty lines, so source row numbers are recovered
    // from byte offsets: a record starts after the previous one ends and
    // any line breaks that follow it.
    let bytes = content.as_bytes();
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut prev_end = 0usize;
    let mut line = 1usize;
    let mut counted = 0usize;
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| IoError::Io(format!("{name}: {e}")))?;
        if !more {
            break;
        }
        let start = prev_end + bytes[prev_end..].iter().take_while(|&&b| matches!(b, b'\r' | b'\n')).count();
        line += bytes[counted..start].iter().filter(|&&b| b == b'\n').count();
        counted = start;
        prev_end = (reader.position().byte() as usize).min(bytes.len());

        let cells = record
            .iter()
            .map(|field| if field.trim().is_empty() { Cell::Empty } else { Cell::Text(field.to_string()) })
            .collect();
        rows.push((line, cells));
    }

    Ok(Table::from_numbered_rows(name, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Train;Mileage\nT1;100\nT2;200\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Train,Mileage,Depot\nT1,100,North\nT2,200,South\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_skips_leading_blank_lines() {
        let content = "\n\nSerialNumber;Action;Mileage\nW-1;Installed;0\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_quoted_thousands_stay_one_field() {
        let content = "Train,Mileage\nT1,\"45,000\"\nT2,\"12,000\"\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_row_numbers_survive_blank_lines() {
        let table = import_from_str("\nTrain,Mileage\nT1,100\n\nT2,200\n", "LatestMileage").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.row_number(0), 3);
        assert_eq!(table.row_number(1), 5);
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Train\tMileage\nT1\t100\nT2\t200\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Train;Mileage;Note\nT1;100;\"serviced, ok\"\nT2;200;none\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_trims_headers_and_blanks() {
        let table = import_from_str(" Train , Mileage \nT1,\nT2,300\n", "LatestMileage").unwrap();
        assert_eq!(table.headers, vec!["Train", "Mileage"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Empty);
        assert_eq!(table.rows[1][1], Cell::Text("300".into()));
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Zürich" with 0xFC for ü
        fs::write(&path, b"Train,Depot\nT1,Z\xfcrich\n").unwrap();
        let table = import(&path, "fleet").unwrap();
        assert_eq!(table.rows[0][1], Cell::Text("Zürich".into()));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let dir = tempdir().unwrap();
        let err = import(&dir.path().join("nope.csv"), "x").unwrap_err();
        assert!(matches!(err, IoError::Open { .. }));
    }
}
