//! CSV import/export
//!
//! Export streams a tab's cells into a CSV writer; import appends CSV
//! records to a tab in batches. Parsing and quoting mechanics belong to
//! the `csv` crate; this module only moves values between the two shapes.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use sheetbind_core::{CellValue, SheetRange};

use crate::client::SheetsClient;
use crate::error::Result;

/// Options for exporting a tab to CSV
#[derive(Debug, Clone)]
pub struct CsvExportOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Export the display strings the service renders instead of raw
    /// values (default: true, so dates and currency keep their formats)
    pub formatted: bool,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            formatted: true,
        }
    }
}

/// Options for importing CSV into a tab
#[derive(Debug, Clone)]
pub struct CsvImportOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Skip the first CSV record instead of appending it (default: false)
    pub skip_header: bool,
    /// Detect booleans and numbers instead of appending everything as
    /// text (default: true)
    pub detect_types: bool,
    /// Rows per append request (default: 500)
    pub batch_size: usize,
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_header: false,
            detect_types: true,
            batch_size: 500,
        }
    }
}

/// Tab-to-CSV exporter
pub struct CsvExporter;

impl CsvExporter {
    /// Export every used cell of a tab to a CSV file.
    pub async fn export_file<P: AsRef<Path>>(
        client: &SheetsClient,
        tab: &str,
        path: P,
        options: &CsvExportOptions,
    ) -> Result<u32> {
        let file = File::create(path)?;
        Self::export(client, tab, file, options).await
    }

    /// Export every used cell of a tab to a CSV writer.
    ///
    /// Returns the number of rows written.
    pub async fn export<W: Write>(
        client: &SheetsClient,
        tab: &str,
        writer: W,
        options: &CsvExportOptions,
    ) -> Result<u32> {
        let rows = if options.formatted {
            client.get_tab_formatted(tab).await?
        } else {
            client.get_tab(tab).await?
        };

        let written = write_rows(&rows, writer, options.delimiter)?;
        tracing::debug!("Exported {} row(s) from '{}'", written, tab);
        Ok(written)
    }
}

/// CSV-to-tab importer
pub struct CsvImporter;

impl CsvImporter {
    /// Append the records of a CSV file to a tab.
    pub async fn import_file<P: AsRef<Path>>(
        client: &SheetsClient,
        tab: &str,
        path: P,
        options: &CsvImportOptions,
    ) -> Result<u32> {
        let file = File::open(path)?;
        Self::import(client, tab, file, options).await
    }

    /// Append the records of a CSV reader to a tab, in batches.
    ///
    /// Returns the number of rows the service reports appended.
    pub async fn import<R: Read>(
        client: &SheetsClient,
        tab: &str,
        reader: R,
        options: &CsvImportOptions,
    ) -> Result<u32> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.skip_header)
            .flexible(true)
            .from_reader(reader);

        // Append after the table anchored at the tab's first cell
        let anchor = SheetRange::cell(tab, 1, 1)?;
        let batch_size = options.batch_size.max(1);

        let mut batch: Vec<Vec<CellValue>> = Vec::new();
        let mut total = 0u32;

        for result in csv_reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if options.detect_types {
                        detect_type(field)
                    } else {
                        CellValue::from(field)
                    }
                })
                .collect();
            batch.push(row);

            if batch.len() >= batch_size {
                total += client.append_rows(&anchor, &batch).await?;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            total += client.append_rows(&anchor, &batch).await?;
        }

        tracing::debug!("Imported {} row(s) into '{}'", total, tab);
        Ok(total)
    }
}

fn write_rows<W: Write>(rows: &[Vec<CellValue>], writer: W, delimiter: u8) -> Result<u32> {
    // The service omits trailing empty cells, so rows come back ragged and
    // blank rows come back with no cells at all
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    for row in rows {
        if row.is_empty() {
            csv_writer.write_record([""])?;
            continue;
        }
        let record: Vec<String> = row.iter().map(CellValue::to_string).collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(rows.len() as u32)
}

/// Detect the type of a CSV field value.
///
/// Only unambiguous booleans map to `Boolean`; "1"/"0" stay numbers so
/// numeric columns survive the import.
fn detect_type(field: &str) -> CellValue {
    let field = field.trim();

    if field.is_empty() {
        return CellValue::Empty;
    }

    match field.to_lowercase().as_str() {
        "true" => return CellValue::Boolean(true),
        "false" => return CellValue::Boolean(false),
        _ => {}
    }

    if let Ok(n) = field.parse::<f64>() {
        return CellValue::Number(n);
    }

    CellValue::String(field.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn test_detect_type() {
        assert_eq!(detect_type(""), CellValue::Empty);
        assert_eq!(detect_type("  "), CellValue::Empty);
        assert_eq!(detect_type("TRUE"), CellValue::Boolean(true));
        assert_eq!(detect_type("false"), CellValue::Boolean(false));
        assert_eq!(detect_type("42"), CellValue::Number(42.0));
        assert_eq!(detect_type("-3.5"), CellValue::Number(-3.5));
        assert_eq!(detect_type("1"), CellValue::Number(1.0));
        assert_eq!(detect_type("hello"), CellValue::from("hello"));
    }

    #[test]
    fn test_write_rows() {
        let rows = vec![
            vec![CellValue::from("Name"), CellValue::from("Balance")],
            vec![CellValue::from("Ada"), CellValue::Number(12.5)],
            vec![CellValue::from("with, comma"), CellValue::Boolean(true)],
        ];

        let mut out = Vec::new();
        let written = write_rows(&rows, &mut out, b',').unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Name,Balance\nAda,12.5\n\"with, comma\",TRUE\n");
    }

    #[test]
    fn test_write_rows_to_temp_file() {
        let rows = vec![vec![CellValue::from("a"), CellValue::Empty]];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let file = File::create(&path).unwrap();
        write_rows(&rows, file, b';').unwrap();

        let mut text = String::new();
        BufReader::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "a;\n");
    }

    #[test]
    fn test_option_defaults() {
        let export = CsvExportOptions::default();
        assert_eq!(export.delimiter, b',');
        assert!(export.formatted);

        let import = CsvImportOptions::default();
        assert!(!import.skip_header);
        assert!(import.detect_types);
        assert_eq!(import.batch_size, 500);
    }
}
