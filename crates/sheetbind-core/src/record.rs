//! Record mapping
//!
//! A [`Record`] is a user-defined type representing one tab row. The type
//! declares a static table of [`FieldSpec`]s and converts itself to and
//! from rows through [`RowView`] (read side) and [`RowBuilder`] (write
//! side). Both address cells by the 1-based column declared in the specs.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::field::{FieldSpec, FieldValue};
use crate::schema;
use crate::value::CellValue;

/// A user-defined typed representation of one tab row.
///
/// Implementations declare their column layout in [`Record::FIELDS`] and
/// keep the row index handed to [`Record::from_row`] so the row can later
/// be updated or deleted in place.
pub trait Record: Sized {
    /// Column layout of the record: one spec per mapped field
    const FIELDS: &'static [FieldSpec];

    /// Build a record from one row of cells
    fn from_row(row: &RowView<'_>) -> Result<Self>;

    /// Convert the record into a dense row of cells covering the declared
    /// columns (see [`RowBuilder`])
    fn to_row(&self) -> Vec<CellValue>;

    /// The 1-based tab row this record was read from, if any
    fn row_index(&self) -> Option<u32>;
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Read-side cursor over one row of cells.
///
/// Cells are addressed by 1-based tab column; columns outside the fetched
/// slice read as empty. Typed getters return `None` for empty cells and an
/// error for cells that cannot be converted to the requested kind.
#[derive(Debug)]
pub struct RowView<'a> {
    cells: &'a [CellValue],
    first_column: u32,
    row: u32,
}

impl<'a> RowView<'a> {
    /// Wrap a slice of cells whose first element sits at `first_column`
    /// of tab row `row` (both 1-based).
    pub fn new(cells: &'a [CellValue], first_column: u32, row: u32) -> Self {
        Self {
            cells,
            first_column,
            row,
        }
    }

    /// The 1-based tab row this view covers
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Raw cell at a 1-based tab column
    pub fn cell(&self, column: u32) -> &CellValue {
        if column < self.first_column {
            return &EMPTY_CELL;
        }
        self.cells
            .get((column - self.first_column) as usize)
            .unwrap_or(&EMPTY_CELL)
    }

    /// Typed value of a field
    pub fn value(&self, spec: &FieldSpec) -> Result<FieldValue> {
        spec.parse(self.cell(spec.column))
    }

    /// Text field getter
    pub fn text(&self, spec: &FieldSpec) -> Result<Option<String>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            other => Err(self.kind_mismatch(spec, "text", &other)),
        }
    }

    /// Number field getter
    pub fn number(&self, spec: &FieldSpec) -> Result<Option<f64>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::Number(n) => Ok(Some(n)),
            other => Err(self.kind_mismatch(spec, "number", &other)),
        }
    }

    /// Currency field getter
    pub fn currency(&self, spec: &FieldSpec) -> Result<Option<Decimal>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::Currency(d) => Ok(Some(d)),
            other => Err(self.kind_mismatch(spec, "currency", &other)),
        }
    }

    /// Phone number field getter
    pub fn phone_number(&self, spec: &FieldSpec) -> Result<Option<String>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::PhoneNumber(p) => Ok(Some(p)),
            other => Err(self.kind_mismatch(spec, "phone number", &other)),
        }
    }

    /// Date/time field getter
    pub fn date_time(&self, spec: &FieldSpec) -> Result<Option<NaiveDateTime>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::DateTime(dt) => Ok(Some(dt)),
            other => Err(self.kind_mismatch(spec, "date/time", &other)),
        }
    }

    /// Boolean field getter
    pub fn boolean(&self, spec: &FieldSpec) -> Result<Option<bool>> {
        match self.value(spec)? {
            FieldValue::Empty => Ok(None),
            FieldValue::Boolean(b) => Ok(Some(b)),
            other => Err(self.kind_mismatch(spec, "boolean", &other)),
        }
    }

    /// Check if every cell in the view is empty
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }

    fn kind_mismatch(&self, spec: &FieldSpec, wanted: &'static str, got: &FieldValue) -> Error {
        Error::FieldType {
            field: spec.name,
            kind: wanted,
            found: got.kind_name(),
        }
    }
}

/// Write-side builder producing a dense row of cells.
///
/// The row covers the record's declared columns from the smallest to the
/// largest; columns with no field, and fields never set, stay empty.
#[derive(Debug)]
pub struct RowBuilder {
    first_column: u32,
    cells: Vec<CellValue>,
}

impl RowBuilder {
    /// Builder sized for a record type's layout
    pub fn for_record<R: Record>() -> Self {
        Self::for_fields(R::FIELDS)
    }

    /// Builder sized for an explicit field layout
    pub fn for_fields(fields: &[FieldSpec]) -> Self {
        let first = schema::min_column(fields).unwrap_or(1);
        let last = schema::max_column(fields).unwrap_or(first);
        Self {
            first_column: first,
            cells: vec![CellValue::Empty; (last - first + 1) as usize],
        }
    }

    /// First tab column the row covers (1-based)
    pub fn first_column(&self) -> u32 {
        self.first_column
    }

    /// Set a field's typed value
    pub fn set(&mut self, spec: &FieldSpec, value: FieldValue) -> &mut Self {
        if spec.column >= self.first_column {
            let idx = (spec.column - self.first_column) as usize;
            if let Some(slot) = self.cells.get_mut(idx) {
                *slot = value.to_cell();
            }
        }
        self
    }

    /// Set a text field
    pub fn set_text(&mut self, spec: &FieldSpec, value: impl Into<String>) -> &mut Self {
        self.set(spec, FieldValue::Text(value.into()))
    }

    /// Set a number field
    pub fn set_number(&mut self, spec: &FieldSpec, value: f64) -> &mut Self {
        self.set(spec, FieldValue::Number(value))
    }

    /// Set a currency field
    pub fn set_currency(&mut self, spec: &FieldSpec, value: Decimal) -> &mut Self {
        self.set(spec, FieldValue::Currency(value))
    }

    /// Set a phone number field
    pub fn set_phone_number(&mut self, spec: &FieldSpec, value: impl Into<String>) -> &mut Self {
        self.set(spec, FieldValue::PhoneNumber(value.into()))
    }

    /// Set a date/time field
    pub fn set_date_time(&mut self, spec: &FieldSpec, value: NaiveDateTime) -> &mut Self {
        self.set(spec, FieldValue::DateTime(value))
    }

    /// Set a boolean field
    pub fn set_boolean(&mut self, spec: &FieldSpec, value: bool) -> &mut Self {
        self.set(spec, FieldValue::Boolean(value))
    }

    /// Finish the row
    pub fn into_cells(self) -> Vec<CellValue> {
        self.cells
    }
}
