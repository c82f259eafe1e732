use audit_portal::prelude::*;
use std::path::Path;

/// Mock SpreadsheetReader returning fixed rows for any path
pub struct MockSpreadsheetReader {
    rows: Vec<Vec<String>>,
}

impl MockSpreadsheetReader {
    pub fn new(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }
}

impl SpreadsheetReader for MockSpreadsheetReader {
    fn read_rows(&self, _path: &Path) -> Result<Vec<Vec<String>>> {
        Ok(self.rows.clone())
    }
}
