//! Integration tests against the live spreadsheet service.
//!
//! These tests need a real spreadsheet the token can edit:
//!
//! 1. Create (or pick) a scratch spreadsheet and note its id.
//! 2. Obtain an OAuth bearer token with spreadsheet scope.
//! 3. Export both before running:
//!    SHEETBIND_SPREADSHEET_ID=<id> SHEETBIND_ACCESS_TOKEN=<token> cargo test
//!
//! If either variable is absent, all tests are skipped. Each test works in
//! its own freshly created tab and deletes it afterwards.

use sheetbind::prelude::*;

fn live_config() -> Option<(String, String)> {
    let id = std::env::var("SHEETBIND_SPREADSHEET_ID").ok()?;
    let token = std::env::var("SHEETBIND_ACCESS_TOKEN").ok()?;
    Some((id, token))
}

/// Skip this test if live API credentials are not configured.
macro_rules! skip_if_no_live_api {
    () => {
        match live_config() {
            Some(config) => config,
            None => {
                eprintln!(
                    "SKIP: live API not configured.\n\
                     Set SHEETBIND_SPREADSHEET_ID and SHEETBIND_ACCESS_TOKEN to run this test."
                );
                return;
            }
        }
    };
}

/// A tab name unlikely to collide across concurrent runs.
fn scratch_tab(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{}-{}-{}", prefix, std::process::id(), nanos)
}

struct Contact {
    row: Option<u32>,
    name: String,
    phone: Option<String>,
    active: bool,
}

impl Contact {
    const NAME: FieldSpec = FieldSpec::new(1, "Name", FieldKind::Text);
    const PHONE: FieldSpec = FieldSpec::new(2, "Phone", FieldKind::PhoneNumber);
    const ACTIVE: FieldSpec = FieldSpec::new(3, "Active", FieldKind::Boolean);
}

impl Record for Contact {
    const FIELDS: &'static [FieldSpec] = &[Contact::NAME, Contact::PHONE, Contact::ACTIVE];

    fn from_row(row: &RowView<'_>) -> sheetbind_core::Result<Self> {
        Ok(Contact {
            row: Some(row.row()),
            name: row.text(&Contact::NAME)?.unwrap_or_default(),
            phone: row.phone_number(&Contact::PHONE)?,
            active: row.boolean(&Contact::ACTIVE)?.unwrap_or(false),
        })
    }

    fn to_row(&self) -> Vec<CellValue> {
        let mut row = RowBuilder::for_record::<Self>();
        row.set_text(&Contact::NAME, self.name.clone());
        if let Some(phone) = &self.phone {
            row.set_phone_number(&Contact::PHONE, phone.clone());
        }
        row.set_boolean(&Contact::ACTIVE, self.active);
        row.into_cells()
    }

    fn row_index(&self) -> Option<u32> {
        self.row
    }
}

#[tokio::test]
async fn test_record_crud_cycle() {
    let (spreadsheet_id, token) = skip_if_no_live_api!();

    let client = SheetsClient::connect(spreadsheet_id, StaticToken::new(token))
        .await
        .expect("connect");

    let tab = scratch_tab("crud");
    client.add_tab(&tab).await.expect("add_tab");

    let repo: SheetRepository<'_, Contact> =
        SheetRepository::new(&client, tab.clone()).expect("repository");
    repo.write_header().await.expect("write_header");
    repo.validate_schema().await.expect("validate_schema");

    // Append two records, read them back in order
    repo.add(&Contact {
        row: None,
        name: "Ada".into(),
        phone: Some("+15551234567".into()),
        active: true,
    })
    .await
    .expect("add Ada");
    repo.add(&Contact {
        row: None,
        name: "Grace".into(),
        phone: None,
        active: false,
    })
    .await
    .expect("add Grace");

    let records = repo.records().await.expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Ada");
    assert_eq!(records[0].row_index(), Some(2));
    assert_eq!(records[1].name, "Grace");
    assert_eq!(records[1].row_index(), Some(3));

    // Update a single field and read the row back
    let mut grace = records.into_iter().nth(1).expect("grace");
    grace.active = true;
    repo.save_field(&grace, &Contact::ACTIVE)
        .await
        .expect("save_field");

    let reread = repo
        .record(3)
        .await
        .expect("record(3)")
        .expect("row 3 present");
    assert!(reread.active);

    // Delete the first record; the second shifts up
    let ada = repo.record(2).await.expect("record(2)").expect("row 2");
    repo.delete(&ada).await.expect("delete");

    let remaining = repo.records().await.expect("records after delete");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Grace");
    assert_eq!(remaining[0].row_index(), Some(2));

    client.delete_tab(&tab).await.expect("delete_tab");
}

#[tokio::test]
async fn test_csv_import_then_export() {
    let (spreadsheet_id, token) = skip_if_no_live_api!();

    let client = SheetsClient::connect(spreadsheet_id, StaticToken::new(token))
        .await
        .expect("connect");

    let tab = scratch_tab("csv");
    client.add_tab(&tab).await.expect("add_tab");

    let input = "Name,Score\nAda,99\nGrace,97\n";
    let imported = CsvImporter::import(
        &client,
        &tab,
        input.as_bytes(),
        &CsvImportOptions::default(),
    )
    .await
    .expect("import");
    assert_eq!(imported, 3);

    let mut out = Vec::new();
    let exported = CsvExporter::export(
        &client,
        &tab,
        &mut out,
        &CsvExportOptions {
            formatted: false,
            ..Default::default()
        },
    )
    .await
    .expect("export");
    assert_eq!(exported, 3);

    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text, "Name,Score\nAda,99\nGrace,97\n");

    client.delete_tab(&tab).await.expect("delete_tab");
}
