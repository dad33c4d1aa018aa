//! List and append contacts in a spreadsheet tab.
//!
//! Usage:
//!   SHEETBIND_SPREADSHEET_ID=<id> SHEETBIND_ACCESS_TOKEN=<token> \
//!     cargo run --example contacts

use sheetbind::prelude::*;

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

    fn from_row(row: &RowView<'_>) -> sheetbind::core::Result<Self> {
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

#[tokio::main]
async fn main() -> Result<()> {
    let spreadsheet_id = std::env::var("SHEETBIND_SPREADSHEET_ID")
        .expect("set SHEETBIND_SPREADSHEET_ID to a spreadsheet id");
    let token = std::env::var("SHEETBIND_ACCESS_TOKEN")
        .expect("set SHEETBIND_ACCESS_TOKEN to an OAuth bearer token");

    let client = SheetsClient::connect(spreadsheet_id, StaticToken::new(token)).await?;

    let repo: SheetRepository<'_, Contact> = SheetRepository::new(&client, "Contacts")?;
    repo.validate_schema().await?;

    repo.add(&Contact {
        row: None,
        name: "Ada Lovelace".into(),
        phone: Some("+44 20 7946 0958".into()),
        active: true,
    })
    .await?;

    for contact in repo.records().await? {
        println!(
            "row {:>3}  {:<20} {:<16} {}",
            contact.row_index().unwrap_or(0),
            contact.name,
            contact.phone.as_deref().unwrap_or("-"),
            if contact.active { "active" } else { "inactive" },
        );
    }

    Ok(())
}
