use crate::audit::domain::{Incident, IncidentColumn};
use crate::shared::error::AuditError;
use crate::shared::Result;
use std::collections::HashMap;

/// Result of mapping a sheet onto incidents
#[derive(Debug, Clone, Default)]
pub struct SheetMapping {
    /// Rows that carry a sample id or an indicator, in sheet order
    pub incidents: Vec<Incident>,
    /// Rows dropped because both sample id and indicator were blank
    pub discarded_rows: usize,
    /// Known columns that were not present in the header row
    pub missing_columns: Vec<&'static str>,
}

/// SheetMapper - Maps spreadsheet rows onto incident records
///
/// The first row holds the headers. Headers are trimmed and upper-cased,
/// then matched by exact name; every following row is read positionally
/// through the resulting column index.
pub struct SheetMapper;

impl SheetMapper {
    pub fn map(rows: &[Vec<String>]) -> Result<SheetMapping> {
        let (header_row, data_rows) = rows.split_first().ok_or_else(|| AuditError::Validation {
            message: "The sheet is empty: a header row is required".to_string(),
        })?;

        let headers: HashMap<String, usize> = header_row
            .iter()
            .enumerate()
            .map(|(index, header)| (header.trim().to_uppercase(), index))
            .rev() // the first occurrence of a repeated header wins
            .collect();

        let column_index: Vec<(IncidentColumn, Option<usize>)> = IncidentColumn::ALL
            .iter()
            .map(|column| (*column, headers.get(column.header()).copied()))
            .collect();

        let missing_columns = column_index
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(column, _)| column.header())
            .collect();

        let mut incidents = Vec::with_capacity(data_rows.len());
        let mut discarded_rows = 0;

        for (offset, row) in data_rows.iter().enumerate() {
            let incident = Self::map_row(row, &column_index).map_err(|e| {
                // +2: one for the header row, one for 1-based numbering
                anyhow::anyhow!("Row {}: {}", offset + 2, e)
            })?;

            if incident.has_identity() {
                incidents.push(incident);
            } else {
                discarded_rows += 1;
            }
        }

        Ok(SheetMapping {
            incidents,
            discarded_rows,
            missing_columns,
        })
    }

    fn map_row(
        row: &[String],
        column_index: &[(IncidentColumn, Option<usize>)],
    ) -> std::result::Result<Incident, AuditError> {
        let mut incident = Incident::default();
        for (column, index) in column_index {
            let value = index
                .and_then(|i| row.get(i))
                .map(String::as_str)
                .unwrap_or("");
            incident.set_column(*column, value)?;
        }
        Ok(incident)
    }
}
