//! Request/response objects for the spreadsheet REST API
//!
//! Only the slice of the vendor surface the client actually calls is
//! modeled. Field names follow the vendor's JSON (camelCase); values
//! travel as loose JSON and convert to [`CellValue`] at this boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use sheetbind_core::CellValue;

/// A block of values addressed by an A1 range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// A1 range the values cover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// "ROWS" (the only dimension this client uses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Row-major cell values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Vec<Json>>,
}

/// Statistics for a value update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    /// Range that was written
    #[serde(default)]
    pub updated_range: Option<String>,
    /// Number of rows written
    #[serde(default)]
    pub updated_rows: Option<u32>,
    /// Number of columns written
    #[serde(default)]
    pub updated_columns: Option<u32>,
    /// Number of cells written
    #[serde(default)]
    pub updated_cells: Option<u32>,
}

/// Response to a values append
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    /// Range of the table the rows were appended to
    #[serde(default)]
    pub table_range: Option<String>,
    /// Statistics for the written cells
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

/// Batch write of several value ranges in one call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesRequest {
    /// How the service interprets written values (RAW / USER_ENTERED)
    pub value_input_option: String,
    /// Ranges to write
    pub data: Vec<ValueRange>,
}

/// Response to a batch value write
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesResponse {
    /// Total cells written across all ranges
    #[serde(default)]
    pub total_updated_cells: Option<u32>,
    /// Total rows written across all ranges
    #[serde(default)]
    pub total_updated_rows: Option<u32>,
}

/// Response to a values clear
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearValuesResponse {
    /// Range that was cleared
    #[serde(default)]
    pub cleared_range: Option<String>,
}

// ============================================================================
// Spreadsheet metadata
// ============================================================================

/// Spreadsheet document metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    /// Opaque spreadsheet id
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// Document-level properties
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    /// Tabs in the document
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// Document-level properties
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
}

/// One tab of the document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Tab properties
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

/// Tab properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Numeric tab id (stable across renames)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    /// Tab title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Position of the tab in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

// ============================================================================
// Structural batch update
// ============================================================================

/// Envelope for structural requests
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    /// Requests applied atomically, in order
    pub requests: Vec<Request>,
}

/// One structural request (exactly one member set)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Delete a run of rows or columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_dimension: Option<DeleteDimensionRequest>,
    /// Add a tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_sheet: Option<AddSheetRequest>,
    /// Delete a tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_sheet: Option<DeleteSheetRequest>,
}

/// Delete a run of rows or columns from a tab
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDimensionRequest {
    /// Which rows/columns to delete
    pub range: DimensionRange,
}

/// A run of rows or columns, addressed the service's way: 0-based start
/// (inclusive) and end (exclusive).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    /// Numeric tab id
    pub sheet_id: i64,
    /// "ROWS" or "COLUMNS"
    pub dimension: String,
    /// 0-based inclusive start index
    pub start_index: u32,
    /// 0-based exclusive end index
    pub end_index: u32,
}

impl DimensionRange {
    /// Rows `start_row..=end_row` (1-based inclusive) of a tab, translated
    /// to the service's 0-based half-open indices.
    pub fn rows(sheet_id: i64, start_row: u32, end_row: u32) -> Self {
        Self {
            sheet_id,
            dimension: "ROWS".to_string(),
            start_index: start_row - 1,
            end_index: end_row,
        }
    }
}

/// Add a tab to the document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetRequest {
    /// Properties of the new tab (title is enough)
    pub properties: SheetProperties,
}

/// Delete a tab by numeric id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetRequest {
    /// Numeric tab id
    pub sheet_id: i64,
}

/// Response to a structural batch update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    /// One reply per request, in order
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Reply to one structural request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Set when the request added a tab
    #[serde(default)]
    pub add_sheet: Option<AddSheetReply>,
}

/// Reply to an add-sheet request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetReply {
    /// Properties of the created tab
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

// ============================================================================
// Error body
// ============================================================================

/// Top-level error envelope the service returns on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// The error payload
    pub error: ErrorStatus,
}

/// Error payload: HTTP code, status token, human-readable message
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorStatus {
    /// HTTP status code
    #[serde(default)]
    pub code: u16,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Status token (e.g. PERMISSION_DENIED)
    #[serde(default)]
    pub status: String,
}

// ============================================================================
// JSON <-> CellValue
// ============================================================================

/// Convert one wire cell to a [`CellValue`].
///
/// Empty strings read back as [`CellValue::Empty`]; the service does not
/// distinguish the two on output.
pub fn cell_from_json(value: &Json) -> CellValue {
    match value {
        Json::Null => CellValue::Empty,
        Json::Bool(b) => CellValue::Boolean(*b),
        Json::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::String(n.to_string()),
        },
        Json::String(s) if s.is_empty() => CellValue::Empty,
        Json::String(s) => CellValue::String(s.clone()),
        // Arrays/objects never appear in cell positions
        other => CellValue::String(other.to_string()),
    }
}

/// Convert a [`CellValue`] to its wire form.
///
/// Empty cells are written as `""`, which clears the target cell (a JSON
/// null would leave it untouched).
pub fn cell_to_json(cell: &CellValue) -> Json {
    match cell {
        CellValue::Empty => Json::String(String::new()),
        CellValue::Boolean(b) => Json::Bool(*b),
        CellValue::Number(n) => match serde_json::Number::from_f64(*n) {
            Some(num) => Json::Number(num),
            None => Json::String(n.to_string()),
        },
        CellValue::String(s) => Json::String(s.clone()),
    }
}

/// Convert a wire value grid to rows of [`CellValue`]
pub fn rows_from_wire(values: Vec<Vec<Json>>) -> Vec<Vec<CellValue>> {
    values
        .into_iter()
        .map(|row| row.iter().map(cell_from_json).collect())
        .collect()
}

/// Convert rows of [`CellValue`] to the wire value grid
pub fn rows_to_wire(rows: &[Vec<CellValue>]) -> Vec<Vec<Json>> {
    rows.iter()
        .map(|row| row.iter().map(cell_to_json).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_value_range_serializes_like_the_service() {
        let vr = ValueRange {
            range: Some("Sheet1!A1:B2".into()),
            major_dimension: Some("ROWS".into()),
            values: vec![vec![json!("a"), json!(1.0)], vec![json!(true), json!("")]],
        };
        assert_eq!(
            serde_json::to_value(&vr).unwrap(),
            json!({
                "range": "Sheet1!A1:B2",
                "majorDimension": "ROWS",
                "values": [["a", 1.0], [true, ""]],
            })
        );
    }

    #[test]
    fn test_value_range_deserialize_missing_values() {
        // A read of an empty range has no "values" member at all
        let vr: ValueRange = serde_json::from_value(json!({
            "range": "Sheet1!A1:B2",
            "majorDimension": "ROWS",
        }))
        .unwrap();
        assert!(vr.values.is_empty());
    }

    #[test]
    fn test_dimension_range_rows_translation() {
        // 1-based inclusive rows 3..=5 -> 0-based half-open [2, 5)
        let range = DimensionRange::rows(99, 3, 5);
        assert_eq!(
            serde_json::to_value(&range).unwrap(),
            json!({
                "sheetId": 99,
                "dimension": "ROWS",
                "startIndex": 2,
                "endIndex": 5,
            })
        );
    }

    #[test]
    fn test_delete_dimension_envelope() {
        let req = BatchUpdateRequest {
            requests: vec![Request {
                delete_dimension: Some(DeleteDimensionRequest {
                    range: DimensionRange::rows(0, 2, 2),
                }),
                ..Default::default()
            }],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "requests": [{
                    "deleteDimension": {
                        "range": {
                            "sheetId": 0,
                            "dimension": "ROWS",
                            "startIndex": 1,
                            "endIndex": 2,
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn test_add_sheet_request_skips_unset_fields() {
        let req = AddSheetRequest {
            properties: SheetProperties {
                title: Some("Imported".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"properties": {"title": "Imported"}})
        );
    }

    #[test]
    fn test_error_body_parse() {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED",
            }
        }))
        .unwrap();
        assert_eq!(body.error.code, 403);
        assert_eq!(body.error.status, "PERMISSION_DENIED");
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(cell_from_json(&json!(null)), CellValue::Empty);
        assert_eq!(cell_from_json(&json!("")), CellValue::Empty);
        assert_eq!(cell_from_json(&json!(true)), CellValue::Boolean(true));
        assert_eq!(cell_from_json(&json!(42.5)), CellValue::Number(42.5));
        assert_eq!(cell_from_json(&json!("x")), CellValue::from("x"));
    }

    #[test]
    fn test_cell_to_json() {
        assert_eq!(cell_to_json(&CellValue::Empty), json!(""));
        assert_eq!(cell_to_json(&CellValue::Boolean(false)), json!(false));
        assert_eq!(cell_to_json(&CellValue::Number(1.5)), json!(1.5));
        assert_eq!(cell_to_json(&CellValue::from("y")), json!("y"));
    }

    #[test]
    fn test_spreadsheet_metadata_parse() {
        let doc: Spreadsheet = serde_json::from_value(json!({
            "spreadsheetId": "abc123",
            "properties": {"title": "Ledger"},
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Sheet1", "index": 0}},
                {"properties": {"sheetId": 1534735, "title": "Archive", "index": 1}},
            ],
        }))
        .unwrap();

        assert_eq!(doc.spreadsheet_id.as_deref(), Some("abc123"));
        assert_eq!(doc.sheets.len(), 2);
        let archive = doc.sheets[1].properties.as_ref().unwrap();
        assert_eq!(archive.sheet_id, Some(1534735));
        assert_eq!(archive.title.as_deref(), Some("Archive"));
    }
}
