//! Spreadsheet session
//!
//! `SheetsClient` holds the spreadsheet identity and credentials and
//! translates each operation into one request against the vendor's REST
//! API. There is no retry or backoff; service failures surface to the
//! caller as [`ClientError::Api`], and row consistency is last write wins.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;

use sheetbind_core::{quote_tab, CellValue, SheetRange};

use crate::auth::TokenProvider;
use crate::error::{ClientError, Result};
use crate::wire::{
    self, AddSheetRequest, AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse,
    BatchUpdateValuesRequest, BatchUpdateValuesResponse, ClearValuesResponse,
    DeleteDimensionRequest, DeleteSheetRequest, DimensionRange, ErrorBody, Request,
    SheetProperties, Spreadsheet, UpdateValuesResponse, ValueRange,
};

/// Configuration for a [`SheetsClient`].
pub struct SheetsConfig {
    /// Base URL of the service. Override to point at a test double.
    pub base_url: String,
    /// Per-request timeout. Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// A session against one remote spreadsheet.
///
/// The client is cheap to share by reference: every operation takes
/// `&self` and issues a single HTTP call. The only local state is a
/// tab-title to numeric sheet-id cache resolved from document metadata
/// (structural requests address tabs by id, not title).
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    token: Box<dyn TokenProvider>,
    sheet_ids: Mutex<HashMap<String, i64>>,
}

impl SheetsClient {
    /// Create a client without touching the network.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        token: impl TokenProvider + 'static,
    ) -> Result<Self> {
        Self::with_config(spreadsheet_id, token, SheetsConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(
        spreadsheet_id: impl Into<String>,
        token: impl TokenProvider + 'static,
        config: SheetsConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            token: Box::new(token),
            sheet_ids: Mutex::new(HashMap::new()),
        })
    }

    /// Create a client and verify access by fetching document metadata.
    ///
    /// Primes the sheet-id cache so later structural requests need no
    /// extra metadata round trip.
    pub async fn connect(
        spreadsheet_id: impl Into<String>,
        token: impl TokenProvider + 'static,
    ) -> Result<Self> {
        Self::connect_with_config(spreadsheet_id, token, SheetsConfig::default()).await
    }

    /// [`SheetsClient::connect`] with explicit configuration.
    pub async fn connect_with_config(
        spreadsheet_id: impl Into<String>,
        token: impl TokenProvider + 'static,
        config: SheetsConfig,
    ) -> Result<Self> {
        let client = Self::with_config(spreadsheet_id, token, config)?;
        let info = client.spreadsheet_info().await?;
        client.prime_sheet_ids(&info);

        let title = info
            .properties
            .as_ref()
            .and_then(|p| p.title.as_deref())
            .unwrap_or("<untitled>");
        tracing::info!(
            "Connected to spreadsheet '{}' ({} tab(s))",
            title,
            info.sheets.len()
        );

        Ok(client)
    }

    /// The opaque id of the spreadsheet this client talks to
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    // ========================================================================
    // Value reads
    // ========================================================================

    /// Read a range of cells with unformatted values.
    ///
    /// Numbers and booleans arrive typed; dates arrive as serial numbers
    /// ready for [`sheetbind_core::serial_to_datetime`].
    pub async fn get_rows(&self, range: &SheetRange) -> Result<Vec<Vec<CellValue>>> {
        self.read_values(range.to_a1(), "UNFORMATTED_VALUE").await
    }

    /// Read a range of cells as the display strings the service renders.
    pub async fn get_rows_formatted(&self, range: &SheetRange) -> Result<Vec<Vec<CellValue>>> {
        self.read_values(range.to_a1(), "FORMATTED_VALUE").await
    }

    /// Read every used cell of a tab, unformatted.
    pub async fn get_tab(&self, tab: &str) -> Result<Vec<Vec<CellValue>>> {
        self.read_values(quote_tab(tab), "UNFORMATTED_VALUE").await
    }

    /// Read every used cell of a tab as display strings.
    pub async fn get_tab_formatted(&self, tab: &str) -> Result<Vec<Vec<CellValue>>> {
        self.read_values(quote_tab(tab), "FORMATTED_VALUE").await
    }

    async fn read_values(&self, location: String, render: &str) -> Result<Vec<Vec<CellValue>>> {
        let url = self.values_url(&location, "");
        tracing::debug!("Reading {} ({})", location, render);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.token.access_token()?)
            .query(&[
                ("valueRenderOption", render),
                ("dateTimeRenderOption", "SERIAL_NUMBER"),
                ("majorDimension", "ROWS"),
            ])
            .send()
            .await?;

        let body: ValueRange = check(resp).await?;
        Ok(wire::rows_from_wire(body.values))
    }

    // ========================================================================
    // Value writes
    // ========================================================================

    /// Append rows after the last data row of the table the range anchors.
    ///
    /// Returns the number of rows the service reports appended.
    pub async fn append_rows(&self, range: &SheetRange, rows: &[Vec<CellValue>]) -> Result<u32> {
        if rows.is_empty() {
            return Ok(0);
        }

        let url = self.values_url(&range.to_a1(), ":append");
        let body = ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: wire::rows_to_wire(rows),
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.access_token()?)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;

        let out: AppendValuesResponse = check(resp).await?;
        let appended = out
            .updates
            .and_then(|u| u.updated_rows)
            .unwrap_or(rows.len() as u32);
        tracing::debug!("Appended {} row(s) to '{}'", appended, range.tab);
        Ok(appended)
    }

    /// Overwrite a bounded range with the given rows.
    pub async fn write_rows(&self, range: &SheetRange, rows: &[Vec<CellValue>]) -> Result<u32> {
        let url = self.values_url(&range.to_a1(), "");
        let body = ValueRange {
            range: Some(range.to_a1()),
            major_dimension: Some("ROWS".to_string()),
            values: wire::rows_to_wire(rows),
        };

        let resp = self
            .http
            .put(&url)
            .bearer_auth(self.token.access_token()?)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await?;

        let out: UpdateValuesResponse = check(resp).await?;
        tracing::debug!("Wrote {}", range.to_a1());
        Ok(out.updated_cells.unwrap_or(0))
    }

    /// Update a single cell — the smallest write the API allows.
    pub async fn update_cell(
        &self,
        tab: &str,
        column: u32,
        row: u32,
        value: CellValue,
    ) -> Result<()> {
        let range = SheetRange::cell(tab, column, row)?;
        self.write_rows(&range, &[vec![value]]).await?;
        Ok(())
    }

    /// Write several ranges in one call.
    ///
    /// Returns the total number of cells the service reports written.
    pub async fn update_cells(
        &self,
        updates: Vec<(SheetRange, Vec<Vec<CellValue>>)>,
    ) -> Result<u32> {
        if updates.is_empty() {
            return Ok(0);
        }

        let url = format!(
            "{}/v4/spreadsheets/{}/values:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let data = updates
            .into_iter()
            .map(|(range, rows)| ValueRange {
                range: Some(range.to_a1()),
                major_dimension: Some("ROWS".to_string()),
                values: wire::rows_to_wire(&rows),
            })
            .collect();
        let body = BatchUpdateValuesRequest {
            value_input_option: "USER_ENTERED".to_string(),
            data,
        };

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.access_token()?)
            .json(&body)
            .send()
            .await?;

        let out: BatchUpdateValuesResponse = check(resp).await?;
        Ok(out.total_updated_cells.unwrap_or(0))
    }

    /// Clear the values in a range, leaving the grid and formats alone.
    pub async fn clear_range(&self, range: &SheetRange) -> Result<()> {
        let url = self.values_url(&range.to_a1(), ":clear");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.access_token()?)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let _: ClearValuesResponse = check(resp).await?;
        tracing::debug!("Cleared {}", range.to_a1());
        Ok(())
    }

    // ========================================================================
    // Structural operations
    // ========================================================================

    /// Delete a single row (1-based) from a tab.
    ///
    /// Rows below shift up; any records previously read from them keep
    /// their stale indices.
    pub async fn delete_row(&self, tab: &str, row: u32) -> Result<()> {
        self.delete_rows(tab, row, row).await
    }

    /// Delete rows `start_row..=end_row` (1-based inclusive) from a tab.
    pub async fn delete_rows(&self, tab: &str, start_row: u32, end_row: u32) -> Result<()> {
        if start_row == 0 {
            return Err(sheetbind_core::Error::InvalidRow(0).into());
        }
        if end_row < start_row {
            return Err(sheetbind_core::Error::InvalidRange(format!(
                "end row {} before start row {}",
                end_row, start_row
            ))
            .into());
        }

        let sheet_id = self.sheet_id(tab).await?;
        let req = BatchUpdateRequest {
            requests: vec![Request {
                delete_dimension: Some(DeleteDimensionRequest {
                    range: DimensionRange::rows(sheet_id, start_row, end_row),
                }),
                ..Default::default()
            }],
        };
        let _: BatchUpdateResponse = self.batch_update(req).await?;
        tracing::debug!("Deleted rows {}..={} of '{}'", start_row, end_row, tab);
        Ok(())
    }

    /// Create a new tab and return its numeric sheet id.
    pub async fn add_tab(&self, title: &str) -> Result<i64> {
        let req = BatchUpdateRequest {
            requests: vec![Request {
                add_sheet: Some(AddSheetRequest {
                    properties: SheetProperties {
                        title: Some(title.to_string()),
                        ..Default::default()
                    },
                }),
                ..Default::default()
            }],
        };

        let resp = self.batch_update(req).await?;
        let sheet_id = resp
            .replies
            .first()
            .and_then(|r| r.add_sheet.as_ref())
            .and_then(|r| r.properties.as_ref())
            .and_then(|p| p.sheet_id)
            .ok_or_else(|| {
                ClientError::UnexpectedResponse("addSheet reply missing sheet id".to_string())
            })?;

        self.cache_sheet_id(title, sheet_id);
        tracing::info!("Created tab '{}' (sheet id {})", title, sheet_id);
        Ok(sheet_id)
    }

    /// Delete a tab by title.
    pub async fn delete_tab(&self, title: &str) -> Result<()> {
        let sheet_id = self.sheet_id(title).await?;
        let req = BatchUpdateRequest {
            requests: vec![Request {
                delete_sheet: Some(DeleteSheetRequest { sheet_id }),
                ..Default::default()
            }],
        };
        let _: BatchUpdateResponse = self.batch_update(req).await?;

        self.sheet_ids_lock().remove(title);
        tracing::info!("Deleted tab '{}'", title);
        Ok(())
    }

    async fn batch_update(&self, req: BatchUpdateRequest) -> Result<BatchUpdateResponse> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.access_token()?)
            .json(&req)
            .send()
            .await?;
        check(resp).await
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Fetch document metadata (title and tab properties).
    pub async fn spreadsheet_info(&self) -> Result<Spreadsheet> {
        let url = format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.token.access_token()?)
            .query(&[("fields", "spreadsheetId,properties.title,sheets.properties")])
            .send()
            .await?;
        check(resp).await
    }

    /// Resolve a tab title to its numeric sheet id.
    ///
    /// Served from the cache when possible; a miss refreshes the cache
    /// from document metadata once before failing with
    /// [`ClientError::TabNotFound`].
    pub async fn sheet_id(&self, tab: &str) -> Result<i64> {
        if let Some(id) = self.sheet_ids_lock().get(tab) {
            return Ok(*id);
        }

        let info = self.spreadsheet_info().await?;
        self.prime_sheet_ids(&info);

        self.sheet_ids_lock()
            .get(tab)
            .copied()
            .ok_or_else(|| ClientError::TabNotFound(tab.to_string()))
    }

    fn prime_sheet_ids(&self, info: &Spreadsheet) {
        let mut cache = self.sheet_ids_lock();
        for sheet in &info.sheets {
            if let Some(props) = &sheet.properties {
                if let (Some(id), Some(title)) = (props.sheet_id, &props.title) {
                    cache.insert(title.clone(), id);
                }
            }
        }
    }

    fn cache_sheet_id(&self, title: &str, sheet_id: i64) {
        self.sheet_ids_lock().insert(title.to_string(), sheet_id);
    }

    fn sheet_ids_lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.sheet_ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn values_url(&self, location: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.base_url, self.spreadsheet_id, location, suffix
        )
    }
}

/// Deserialize a successful response, or translate the service's error
/// body into [`ClientError::Api`].
async fn check<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let code = status.as_u16();
    let text = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(ClientError::Api {
            code,
            status: body.error.status,
            message: body.error.message,
        }),
        Err(_) => Err(ClientError::Api {
            code,
            status: status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_string(),
            message: truncate(&text, 200),
        }),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
