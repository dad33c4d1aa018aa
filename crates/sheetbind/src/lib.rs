//! # sheetbind
//!
//! A typed convenience layer over a remote spreadsheet API: declare how a
//! record type maps onto tab columns, then read, append, update and delete
//! rows as typed values. CSV import/export helpers round out the surface.
//!
//! Every operation translates into a single call against the spreadsheet
//! service. There is no retry, caching or coordination layer; errors
//! surface as the service reports them, and row consistency is last write
//! wins by row index.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetbind::prelude::*;
//!
//! struct Task {
//!     row: Option<u32>,
//!     title: String,
//!     done: bool,
//! }
//!
//! impl Task {
//!     const TITLE: FieldSpec = FieldSpec::new(1, "Title", FieldKind::Text);
//!     const DONE: FieldSpec = FieldSpec::new(2, "Done", FieldKind::Boolean);
//! }
//!
//! impl Record for Task {
//!     const FIELDS: &'static [FieldSpec] = &[Task::TITLE, Task::DONE];
//!
//!     fn from_row(row: &RowView<'_>) -> sheetbind_core::Result<Self> {
//!         Ok(Task {
//!             row: Some(row.row()),
//!             title: row.text(&Task::TITLE)?.unwrap_or_default(),
//!             done: row.boolean(&Task::DONE)?.unwrap_or(false),
//!         })
//!     }
//!
//!     fn to_row(&self) -> Vec<CellValue> {
//!         let mut row = RowBuilder::for_record::<Self>();
//!         row.set_text(&Task::TITLE, self.title.clone());
//!         row.set_boolean(&Task::DONE, self.done);
//!         row.into_cells()
//!     }
//!
//!     fn row_index(&self) -> Option<u32> {
//!         self.row
//!     }
//! }
//!
//! # async fn run() -> sheetbind::Result<()> {
//! let client = SheetsClient::connect(
//!     "spreadsheet-id",
//!     StaticToken::new(std::env::var("ACCESS_TOKEN").unwrap()),
//! )
//! .await?;
//!
//! let repo: SheetRepository<'_, Task> = SheetRepository::new(&client, "Tasks")?;
//! repo.validate_schema().await?;
//!
//! for task in repo.records().await? {
//!     println!("{} (row {:?})", task.title, task.row_index());
//! }
//!
//! repo.add(&Task { row: None, title: "Write docs".into(), done: false }).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod csv;
pub mod error;
pub mod prelude;
pub mod repository;
pub mod wire;

// Re-exports for convenience
pub use auth::{StaticToken, TokenProvider};
pub use client::{SheetsClient, SheetsConfig};
pub use error::{ClientError, Result};
pub use repository::SheetRepository;

pub use crate::csv::{CsvExportOptions, CsvExporter, CsvImportOptions, CsvImporter};

// The core data layer, re-exported whole for callers that want the module
pub use sheetbind_core as core;
pub use sheetbind_core::{
    CellValue, FieldKind, FieldSpec, FieldValue, Record, RowBuilder, RowView, SheetRange,
};
