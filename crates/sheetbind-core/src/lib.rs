//! # sheetbind-core
//!
//! Core row/record mapping types for the sheetbind client library.
//!
//! This crate provides the pure data layer, with no I/O:
//! - [`CellValue`] - the untyped content of one cell
//! - [`SheetRange`] - 1-based range addressing with A1-notation translation
//! - [`FieldSpec`] and [`FieldKind`] - per-field column metadata
//! - [`Record`], [`RowView`], [`RowBuilder`] - row <-> record marshalling
//! - [`schema`] - field layout and header validation
//!
//! ## Example
//!
//! ```rust
//! use sheetbind_core::{
//!     CellValue, FieldKind, FieldSpec, Record, Result, RowBuilder, RowView,
//! };
//!
//! struct Contact {
//!     row: Option<u32>,
//!     name: String,
//!     phone: Option<String>,
//! }
//!
//! impl Contact {
//!     const NAME: FieldSpec = FieldSpec::new(1, "Name", FieldKind::Text);
//!     const PHONE: FieldSpec = FieldSpec::new(2, "Phone", FieldKind::PhoneNumber);
//! }
//!
//! impl Record for Contact {
//!     const FIELDS: &'static [FieldSpec] = &[Contact::NAME, Contact::PHONE];
//!
//!     fn from_row(row: &RowView<'_>) -> Result<Self> {
//!         Ok(Contact {
//!             row: Some(row.row()),
//!             name: row.text(&Contact::NAME)?.unwrap_or_default(),
//!             phone: row.phone_number(&Contact::PHONE)?,
//!         })
//!     }
//!
//!     fn to_row(&self) -> Vec<CellValue> {
//!         let mut row = RowBuilder::for_record::<Self>();
//!         row.set_text(&Contact::NAME, self.name.clone());
//!         if let Some(phone) = &self.phone {
//!             row.set_phone_number(&Contact::PHONE, phone.clone());
//!         }
//!         row.into_cells()
//!     }
//!
//!     fn row_index(&self) -> Option<u32> {
//!         self.row
//!     }
//! }
//!
//! let cells = vec![CellValue::from("Ada"), CellValue::from("(555) 123-4567")];
//! let contact = Contact::from_row(&RowView::new(&cells, 1, 2)).unwrap();
//! assert_eq!(contact.name, "Ada");
//! assert_eq!(contact.phone.as_deref(), Some("5551234567"));
//! ```

pub mod error;
pub mod field;
pub mod range;
pub mod record;
pub mod schema;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use field::{datetime_to_serial, serial_to_datetime, FieldKind, FieldSpec, FieldValue};
pub use range::{column_to_letters, letters_to_column, quote_tab, SheetRange, MAX_COLS};
pub use record::{Record, RowBuilder, RowView};
pub use value::CellValue;
