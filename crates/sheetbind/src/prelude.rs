//! Convenient imports for typical usage
//!
//! ```rust
//! use sheetbind::prelude::*;
//! ```

pub use crate::auth::{StaticToken, TokenProvider};
pub use crate::client::{SheetsClient, SheetsConfig};
pub use crate::csv::{CsvExportOptions, CsvExporter, CsvImportOptions, CsvImporter};
pub use crate::error::{ClientError, Result};
pub use crate::repository::SheetRepository;

pub use sheetbind_core::{
    CellValue, FieldKind, FieldSpec, FieldValue, Record, RowBuilder, RowView, SheetRange,
};
