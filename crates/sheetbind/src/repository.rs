//! Typed repository over one tab
//!
//! `SheetRepository` binds a [`SheetsClient`] and a tab name to a
//! [`Record`] type and exposes the CRUD surface: read all records, append,
//! delete by row, and save individual fields back. Each operation is one
//! client call (appends chunk when large).

use std::marker::PhantomData;

use sheetbind_core::{schema, CellValue, FieldSpec, Record, RowView, SheetRange};

use crate::client::SheetsClient;
use crate::error::{ClientError, Result};

/// Rows per append request when bulk-adding records
const APPEND_BATCH: usize = 500;

/// Typed CRUD access to one tab.
///
/// The repository assumes row 1 is a header row unless constructed with
/// `has_header = false`; data rows start right below. Records read through
/// it carry their 1-based row index so they can be updated or deleted in
/// place.
pub struct SheetRepository<'a, R: Record> {
    client: &'a SheetsClient,
    tab: String,
    has_header: bool,
    _record: PhantomData<R>,
}

impl<'a, R: Record> SheetRepository<'a, R> {
    /// Bind a record type to a tab with a header row.
    ///
    /// Fails if the record's field layout is invalid (no fields, zero or
    /// duplicate columns).
    pub fn new(client: &'a SheetsClient, tab: impl Into<String>) -> Result<Self> {
        Self::with_options(client, tab, true)
    }

    /// Bind a record type to a tab, choosing whether row 1 is a header.
    pub fn with_options(
        client: &'a SheetsClient,
        tab: impl Into<String>,
        has_header: bool,
    ) -> Result<Self> {
        schema::validate_layout(R::FIELDS)?;
        Ok(Self {
            client,
            tab: tab.into(),
            has_header,
            _record: PhantomData,
        })
    }

    /// The tab this repository reads and writes
    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// First row that holds record data (1-based)
    pub fn first_data_row(&self) -> u32 {
        if self.has_header {
            2
        } else {
            1
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read every record in the tab.
    ///
    /// Rows whose mapped cells are all empty are skipped; the service pads
    /// gaps between used rows with blanks.
    pub async fn records(&self) -> Result<Vec<R>> {
        let range = self.data_range()?;
        let rows = self.client.get_rows(&range).await?;

        let mut records = Vec::with_capacity(rows.len());
        for (i, cells) in rows.iter().enumerate() {
            let row_index = self.first_data_row() + i as u32;
            let view = RowView::new(cells, self.first_column(), row_index);
            if view.is_blank() {
                continue;
            }
            records.push(R::from_row(&view)?);
        }

        tracing::debug!("Read {} record(s) from '{}'", records.len(), self.tab);
        Ok(records)
    }

    /// Read the record at a 1-based tab row, if the row holds data.
    pub async fn record(&self, row: u32) -> Result<Option<R>> {
        if row < self.first_data_row() {
            return Err(sheetbind_core::Error::InvalidRow(row).into());
        }

        let range = self.row_range(row)?;
        let rows = self.client.get_rows(&range).await?;

        match rows.first() {
            None => Ok(None),
            Some(cells) => {
                let view = RowView::new(cells, self.first_column(), row);
                if view.is_blank() {
                    Ok(None)
                } else {
                    Ok(Some(R::from_row(&view)?))
                }
            }
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Append one record after the last data row.
    pub async fn add(&self, record: &R) -> Result<()> {
        let range = self.data_range()?;
        self.client.append_rows(&range, &[record.to_row()]).await?;
        Ok(())
    }

    /// Append many records, chunking into batches of 500 rows per call.
    ///
    /// Returns the number of rows the service reports appended.
    pub async fn add_all(&self, records: &[R]) -> Result<u32> {
        let range = self.data_range()?;
        let mut total = 0;

        for chunk in records.chunks(APPEND_BATCH) {
            let rows: Vec<Vec<CellValue>> = chunk.iter().map(Record::to_row).collect();
            total += self.client.append_rows(&range, &rows).await?;
        }

        Ok(total)
    }

    /// Delete the tab row a record was read from.
    ///
    /// Errors with [`sheetbind_core::Error::NoRowIndex`] if the record was
    /// never read from the tab. Rows below the deleted one shift up, so
    /// other in-memory records' indices go stale.
    pub async fn delete(&self, record: &R) -> Result<()> {
        let row = record.row_index().ok_or(sheetbind_core::Error::NoRowIndex)?;
        self.client.delete_row(&self.tab, row).await
    }

    /// Delete a tab row by 1-based index.
    pub async fn delete_row(&self, row: u32) -> Result<()> {
        self.client.delete_row(&self.tab, row).await
    }

    /// Write one field of a record back to its cell.
    pub async fn save_field(&self, record: &R, spec: &FieldSpec) -> Result<()> {
        let row = record.row_index().ok_or(sheetbind_core::Error::NoRowIndex)?;
        let cell = self.field_cell(record, spec)?;
        self.client
            .update_cell(&self.tab, spec.column, row, cell)
            .await
    }

    /// Write several fields of a record back in one batch call.
    pub async fn save_fields(&self, record: &R, specs: &[FieldSpec]) -> Result<u32> {
        let row = record.row_index().ok_or(sheetbind_core::Error::NoRowIndex)?;

        let mut updates = Vec::with_capacity(specs.len());
        for spec in specs {
            let cell = self.field_cell(record, spec)?;
            let range = SheetRange::cell(&self.tab, spec.column, row)?;
            updates.push((range, vec![vec![cell]]));
        }

        self.client.update_cells(updates).await
    }

    // ========================================================================
    // Schema
    // ========================================================================

    /// Check the tab's header row against the record's declared display
    /// names. A repository without a header row validates trivially.
    pub async fn validate_schema(&self) -> Result<()> {
        if !self.has_header {
            return Ok(());
        }

        let range = self.header_range()?;
        let rows = self.client.get_rows(&range).await?;
        let empty = Vec::new();
        let cells = rows.first().unwrap_or(&empty);

        let view = RowView::new(cells, self.first_column(), 1);
        schema::validate_header(R::FIELDS, &view)?;
        tracing::debug!("Schema of '{}' matches {} field(s)", self.tab, R::FIELDS.len());
        Ok(())
    }

    /// Write the record's display names into the header row.
    ///
    /// Intended for freshly created tabs (e.g. before a CSV import).
    pub async fn write_header(&self) -> Result<()> {
        if !self.has_header {
            return Err(ClientError::UnexpectedResponse(
                "repository has no header row to write".to_string(),
            ));
        }

        let range = self.header_range()?;
        let cells = schema::header_cells(R::FIELDS);
        self.client.write_rows(&range, &[cells]).await?;
        Ok(())
    }

    // ========================================================================
    // Range helpers
    // ========================================================================

    fn first_column(&self) -> u32 {
        schema::min_column(R::FIELDS).unwrap_or(1)
    }

    fn last_column(&self) -> u32 {
        schema::max_column(R::FIELDS).unwrap_or(1)
    }

    fn data_range(&self) -> Result<SheetRange> {
        Ok(SheetRange::open_ended(
            &self.tab,
            self.first_column(),
            self.first_data_row(),
            self.last_column(),
        )?)
    }

    fn row_range(&self, row: u32) -> Result<SheetRange> {
        Ok(SheetRange::new(
            &self.tab,
            self.first_column(),
            row,
            self.last_column(),
            row,
        )?)
    }

    fn header_range(&self) -> Result<SheetRange> {
        Ok(SheetRange::new(
            &self.tab,
            self.first_column(),
            1,
            self.last_column(),
            1,
        )?)
    }

    /// The cell a record currently holds for one of its declared fields.
    fn field_cell(&self, record: &R, spec: &FieldSpec) -> Result<CellValue> {
        if !R::FIELDS
            .iter()
            .any(|f| f.column == spec.column && f.name == spec.name)
        {
            return Err(ClientError::UnknownField(spec.name));
        }

        let cells = record.to_row();
        let idx = (spec.column - self.first_column()) as usize;
        Ok(cells.get(idx).cloned().unwrap_or(CellValue::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use sheetbind_core::{FieldKind, RowBuilder};

    struct Task {
        row: Option<u32>,
        title: String,
        done: bool,
    }

    impl Task {
        const TITLE: FieldSpec = FieldSpec::new(2, "Title", FieldKind::Text);
        const DONE: FieldSpec = FieldSpec::new(4, "Done", FieldKind::Boolean);
    }

    impl Record for Task {
        const FIELDS: &'static [FieldSpec] = &[Task::TITLE, Task::DONE];

        fn from_row(row: &RowView<'_>) -> sheetbind_core::Result<Self> {
            Ok(Task {
                row: Some(row.row()),
                title: row.text(&Task::TITLE)?.unwrap_or_default(),
                done: row.boolean(&Task::DONE)?.unwrap_or(false),
            })
        }

        fn to_row(&self) -> Vec<CellValue> {
            let mut row = RowBuilder::for_record::<Self>();
            row.set_text(&Task::TITLE, self.title.clone());
            row.set_boolean(&Task::DONE, self.done);
            row.into_cells()
        }

        fn row_index(&self) -> Option<u32> {
            self.row
        }
    }

    fn client() -> SheetsClient {
        SheetsClient::new("sheet-123", StaticToken::new("tok")).unwrap()
    }

    #[test]
    fn test_ranges_follow_field_layout() {
        let client = client();
        let repo: SheetRepository<'_, Task> = SheetRepository::new(&client, "Tasks").unwrap();

        // Fields span columns 2..=4, data starts below the header
        assert_eq!(repo.data_range().unwrap().to_a1(), "Tasks!B2:D");
        assert_eq!(repo.row_range(7).unwrap().to_a1(), "Tasks!B7:D7");
        assert_eq!(repo.header_range().unwrap().to_a1(), "Tasks!B1:D1");
    }

    #[test]
    fn test_no_header_starts_at_row_one() {
        let client = client();
        let repo: SheetRepository<'_, Task> =
            SheetRepository::with_options(&client, "Tasks", false).unwrap();
        assert_eq!(repo.first_data_row(), 1);
        assert_eq!(repo.data_range().unwrap().to_a1(), "Tasks!B1:D");
    }

    #[test]
    fn test_field_cell_extraction() {
        let client = client();
        let repo: SheetRepository<'_, Task> = SheetRepository::new(&client, "Tasks").unwrap();

        let task = Task {
            row: Some(3),
            title: "Ship it".into(),
            done: true,
        };

        assert_eq!(
            repo.field_cell(&task, &Task::TITLE).unwrap(),
            CellValue::from("Ship it")
        );
        assert_eq!(
            repo.field_cell(&task, &Task::DONE).unwrap(),
            CellValue::Boolean(true)
        );

        // A spec that isn't part of the layout is rejected
        let foreign = FieldSpec::new(9, "Other", FieldKind::Text);
        assert!(matches!(
            repo.field_cell(&task, &foreign),
            Err(ClientError::UnknownField("Other"))
        ));
    }

    #[test]
    fn test_duplicate_layout_rejected() {
        struct Broken;

        impl Record for Broken {
            const FIELDS: &'static [FieldSpec] = &[
                FieldSpec::new(1, "A", FieldKind::Text),
                FieldSpec::new(1, "B", FieldKind::Text),
            ];

            fn from_row(_row: &RowView<'_>) -> sheetbind_core::Result<Self> {
                Ok(Broken)
            }

            fn to_row(&self) -> Vec<CellValue> {
                Vec::new()
            }

            fn row_index(&self) -> Option<u32> {
                None
            }
        }

        let client = client();
        assert!(SheetRepository::<Broken>::new(&client, "Tasks").is_err());
    }
}
