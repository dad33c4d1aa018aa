//! Field layout and header validation

use crate::error::{Error, Result};
use crate::field::FieldSpec;
use crate::range::MAX_COLS;
use crate::record::RowView;
use crate::value::CellValue;

/// Smallest declared column, if any fields exist
pub fn min_column(fields: &[FieldSpec]) -> Option<u32> {
    fields.iter().map(|f| f.column).min()
}

/// Largest declared column, if any fields exist
pub fn max_column(fields: &[FieldSpec]) -> Option<u32> {
    fields.iter().map(|f| f.column).max()
}

/// Validate a field layout: at least one field, all columns 1-based and
/// within the grid, no two fields on the same column.
pub fn validate_layout(fields: &[FieldSpec]) -> Result<()> {
    if fields.is_empty() {
        return Err(Error::EmptyLayout);
    }

    for field in fields {
        if field.column == 0 || field.column > MAX_COLS {
            return Err(Error::InvalidColumn(field.column));
        }
    }

    // Field tables are small; quadratic scan beats allocating a set
    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            if a.column == b.column {
                return Err(Error::DuplicateColumn {
                    column: a.column,
                    first: a.name,
                    second: b.name,
                });
            }
        }
    }

    Ok(())
}

/// Validate a header row against a field layout.
///
/// Each field's display name must appear at its declared column; the
/// comparison trims surrounding whitespace.
pub fn validate_header(fields: &[FieldSpec], header: &RowView<'_>) -> Result<()> {
    for field in fields {
        let cell = header.cell(field.column);
        let found = match cell {
            CellValue::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };

        if found != field.name.trim() {
            return Err(Error::HeaderMismatch {
                column: field.column,
                expected: field.name,
                found,
            });
        }
    }

    Ok(())
}

/// Produce the header row cells for a field layout, covering the declared
/// columns from smallest to largest. Columns with no field stay empty.
pub fn header_cells(fields: &[FieldSpec]) -> Vec<CellValue> {
    let first = match min_column(fields) {
        Some(c) => c,
        None => return Vec::new(),
    };
    let last = max_column(fields).unwrap_or(first);

    let mut cells = vec![CellValue::Empty; (last - first + 1) as usize];
    for field in fields {
        cells[(field.column - first) as usize] = CellValue::String(field.name.to_string());
    }
    cells
}
