use crate::shared::Result;
use std::path::Path;

/// SpreadsheetReader port for reading raw sheet content
///
/// This port abstracts the spreadsheet file format (CSV, Excel workbook, ...).
/// Implementations return every row of the first sheet as display text,
/// header row included; mapping onto incidents happens in the domain.
pub trait SpreadsheetReader {
    /// Reads all rows of the first sheet
    ///
    /// # Arguments
    /// * `path` - Path to the spreadsheet file
    ///
    /// # Returns
    /// Rows of cell text, in sheet order
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or fails the security checks
    /// - The file extension is not a supported spreadsheet format
    /// - The workbook has no worksheet or cannot be decoded
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>>;
}
