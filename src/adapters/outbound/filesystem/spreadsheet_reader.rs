use super::cell_format::cell_text;
use crate::ports::outbound::SpreadsheetReader;
use crate::shared::error::AuditError;
use crate::shared::security::{read_checked, MAX_SPREADSHEET_SIZE};
use crate::shared::Result;
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use std::path::Path;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// SpreadsheetFileReader adapter for reading spreadsheets from disk
///
/// `.csv` files go through the csv crate (comma or semicolon separated);
/// workbooks go through calamine, first worksheet only.
pub struct SpreadsheetFileReader;

impl SpreadsheetFileReader {
    pub fn new() -> Self {
        Self
    }

    fn read_csv(&self, path: &Path, bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        let text = std::str::from_utf8(bytes).map_err(|e| AuditError::SpreadsheetParseError {
            path: path.to_path_buf(),
            details: format!("CSV file is not valid UTF-8: {}", e),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(detect_delimiter(text))
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| AuditError::SpreadsheetParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn read_workbook(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<Vec<String>>> {
        let parse_error = |details: String| AuditError::SpreadsheetParseError {
            path: path.to_path_buf(),
            details,
        };

        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| parse_error(e.to_string()))?;

        let first_sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| parse_error("The workbook has no worksheet".to_string()))?;

        let range = workbook
            .worksheet_range(&first_sheet)
            .map_err(|e| parse_error(e.to_string()))?;

        tracing::debug!(sheet = %first_sheet, rows = range.height(), columns = range.width(), "worksheet loaded");

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }
}

impl Default for SpreadsheetFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetReader for SpreadsheetFileReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>> {
        if !path.exists() {
            return Err(AuditError::SpreadsheetNotFound {
                path: path.to_path_buf(),
                suggestion: "Check the path of the exported .xlsx or .csv file".to_string(),
            }
            .into());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if extension != "csv" && !WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AuditError::SpreadsheetParseError {
                path: path.to_path_buf(),
                details: format!(
                    "Unsupported file type '.{}'. Supported: .csv, .{}",
                    extension,
                    WORKBOOK_EXTENSIONS.join(", .")
                ),
            }
            .into());
        }

        let bytes = read_checked(path, "spreadsheet", MAX_SPREADSHEET_SIZE)?;
        if extension == "csv" {
            self.read_csv(path, &bytes)
        } else {
            self.read_workbook(path, bytes)
        }
    }
}

/// Semicolon when the header line has more semicolons than commas
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incidents.csv");
        fs::write(&path, "ID_MOSTRA,INDICADOR\n1001,REPAIR\n1002\n").unwrap();

        let rows = SpreadsheetFileReader::new().read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["ID_MOSTRA", "INDICADOR"]);
        assert_eq!(rows[2], vec!["1002"]);
    }

    #[test]
    fn test_read_semicolon_csv_with_bom() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incidents.CSV");
        fs::write(&path, "\u{feff}ID_MOSTRA;INDICADOR\n1001;REPAIR, FIELD\n").unwrap();

        let rows = SpreadsheetFileReader::new().read_rows(&path).unwrap();
        assert_eq!(rows[0][0], "ID_MOSTRA");
        assert_eq!(rows[1], vec!["1001", "REPAIR, FIELD"]);
    }

    #[test]
    fn test_missing_file() {
        let err = SpreadsheetFileReader::new()
            .read_rows(Path::new("/nonexistent/incidents.xlsx"))
            .unwrap_err();
        assert!(err.to_string().contains("Spreadsheet not found"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incidents.txt");
        fs::write(&path, "ID_MOSTRA\n1").unwrap();

        let err = SpreadsheetFileReader::new().read_rows(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type '.txt'"));
    }

    #[test]
    fn test_corrupt_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("incidents.xlsx");
        fs::write(&path, b"not a zip archive").unwrap();

        let err = SpreadsheetFileReader::new().read_rows(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse spreadsheet"));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("A;B;C\n1,5;2;3"), b';');
        assert_eq!(detect_delimiter("A,B\n"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }
}
