//! Spreadsheet decoding seam.
//!
//! The engine never parses workbook binaries itself; it asks a
//! [`SheetDecoder`] for the first sheet as raw rows keyed by header cell text.
//! [`CalamineDecoder`] is the default implementation.

use crate::io::fields::{RawRow, value_text};
use crate::{Error, Result};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde_json::{Number, Value};
use std::io::Cursor;

/// Decodes a spreadsheet binary into rows.
pub trait SheetDecoder: Send + Sync {
    /// Decodes the first sheet of `bytes`.
    ///
    /// The first row provides the keys; each later row becomes one
    /// [`RawRow`]. Empty cells are omitted and fully empty rows are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the workbook cannot be opened or has no sheet.
    fn decode_first_sheet(&self, bytes: &[u8]) -> Result<Vec<RawRow>>;
}

/// [`SheetDecoder`] backed by `calamine`, covering `.xlsx` and `.xls`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineDecoder;

impl SheetDecoder for CalamineDecoder {
    fn decode_first_sheet(&self, bytes: &[u8]) -> Result<Vec<RawRow>> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
                Error::OperationFailed {
                    operation: "open_spreadsheet".to_string(),
                    cause: e.to_string(),
                }
            })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::EmptyInput("Spreadsheet has no worksheets".to_string()))?
            .map_err(|e| Error::OperationFailed {
                operation: "read_spreadsheet".to_string(),
                cause: e.to_string(),
            })?;

        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        Ok(rows_from_grid(grid))
    }
}

/// Converts one cell to a JSON value, `None` for empty cells.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::String(other.to_string())),
    }
}

/// Keys a decoded cell grid by its header row.
///
/// Columns whose header cell is empty are ignored.
#[must_use]
pub fn rows_from_grid(grid: Vec<Vec<Option<Value>>>) -> Vec<RawRow> {
    let mut rows = grid.into_iter();
    let Some(header_cells) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<Option<String>> = header_cells
        .iter()
        .map(|cell| {
            cell.as_ref()
                .map(value_text)
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .collect();

    rows.filter_map(|cells| {
        let row: RawRow = cells
            .into_iter()
            .zip(&headers)
            .filter_map(|(cell, header)| Some((header.clone()?, cell?)))
            .collect();
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(values: &[Value]) -> Vec<Option<Value>> {
        values
            .iter()
            .map(|v| (!v.is_null()).then(|| v.clone()))
            .collect()
    }

    #[test]
    fn test_rows_from_grid_keys_by_header() {
        let grid = vec![
            cells(&[json!("Task"), json!("Priority"), json!("Duration")]),
            cells(&[json!("Setup"), json!("high"), json!(2)]),
            cells(&[json!("Cleanup"), Value::Null, json!("3 hours")]),
        ];
        let rows = rows_from_grid(grid);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Duration"], json!(2));
        assert!(rows[1].get("Priority").is_none());
    }

    #[test]
    fn test_rows_from_grid_skips_blank_rows_and_headerless_columns() {
        let grid = vec![
            cells(&[json!("Name"), Value::Null]),
            cells(&[Value::Null, Value::Null]),
            cells(&[json!("Acme"), json!("ignored")]),
        ];
        let rows = rows_from_grid(grid);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["Name"], "Acme");
    }

    #[test]
    fn test_rows_from_empty_grid() {
        assert!(rows_from_grid(Vec::new()).is_empty());
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String(String::new())), None);
        assert_eq!(cell_value(&Data::Int(3)), Some(json!(3)));
        assert_eq!(cell_value(&Data::Float(1.5)), Some(json!(1.5)));
        assert_eq!(cell_value(&Data::Bool(true)), Some(json!(true)));
    }

    #[test]
    fn test_numeric_cells_map_like_text() {
        use crate::io::kinds::{MemberKind, RecordKind};
        use crate::models::MemberProfile;

        let grid = vec![
            vec![
                cell_value(&Data::String("Name".to_string())),
                cell_value(&Data::String("Phone".to_string())),
                cell_value(&Data::String("Offline".to_string())),
                cell_value(&Data::String("Experience".to_string())),
            ],
            vec![
                cell_value(&Data::String("Acme".to_string())),
                cell_value(&Data::Float(5_550_100.0)),
                cell_value(&Data::Float(1.0)),
                cell_value(&Data::Float(5.0)),
            ],
        ];
        let rows = rows_from_grid(grid);
        let member = MemberKind::map(&rows[0]);

        assert_eq!(member.phone, "5550100");
        assert_eq!(member.experience, "5");
        assert_eq!(
            member.profile,
            MemberProfile::Entity {
                name: "Acme".to_string(),
                offline: true
            }
        );
        assert!(MemberKind::validate(&rows[0], &member).is_empty());
    }

    #[test]
    fn test_decoder_rejects_garbage() {
        let result = CalamineDecoder.decode_first_sheet(b"definitely not a workbook");
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }
}
