//! Error types for sheetbind-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetbind-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid range bounds or malformed A1 notation
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Column index is not 1-based
    #[error("Column index {0} is invalid (columns are 1-based)")]
    InvalidColumn(u32),

    /// Row index is not 1-based
    #[error("Row index {0} is invalid (rows are 1-based)")]
    InvalidRow(u32),

    /// Two fields declare the same column
    #[error("Fields '{first}' and '{second}' both map to column {column}")]
    DuplicateColumn {
        column: u32,
        first: &'static str,
        second: &'static str,
    },

    /// A record type declares no fields
    #[error("Record type declares no fields")]
    EmptyLayout,

    /// A cell could not be converted to the declared field type
    #[error("Field '{field}': cannot read {found} cell as {kind}")]
    FieldType {
        field: &'static str,
        kind: &'static str,
        found: &'static str,
    },

    /// A cell's text could not be parsed as the declared field type
    #[error("Field '{field}': cannot parse '{value}' as {kind}")]
    FieldParse {
        field: &'static str,
        kind: &'static str,
        value: String,
    },

    /// Header cell does not match the declared display name
    #[error("Header mismatch at column {column}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        column: u32,
        expected: &'static str,
        found: String,
    },

    /// Date/time serial number outside the representable range
    #[error("Date/time serial {0} is out of range")]
    SerialOutOfRange(f64),

    /// Record has no row index (it was never read from a tab)
    #[error("Record has no row index; it was not read from a tab")]
    NoRowIndex,
}
