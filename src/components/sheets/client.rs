use super::models::{Row, Sheet, Spreadsheet};
use super::token::TokenManager;
use crate::components::SheetStore;
use crate::config::Config;
use crate::error::{decode_error, remote_error, SyncResult, SHEETS_SERVICE};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};
use url::Url;

/// Value input mode for every write; the API parses values as if typed
pub const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

/// A1 range for `cell` on the named sheet, quoting the sheet title
pub fn a1_range(sheet_name: &str, cell: &str) -> String {
    format!("'{}'!{}", sheet_name.replace('\'', "''"), cell)
}

/// Client for the Google Sheets v4 REST API
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    base: Url,
    token_manager: TokenManager,
}

impl SheetsClient {
    pub fn new(base: Url, token_manager: TokenManager) -> Self {
        Self {
            client: Client::new(),
            base,
            token_manager,
        }
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sheets_api_base.clone(),
            TokenManager::new(config.google_auth.clone()),
        )
    }

    /// Fetch the whole spreadsheet including grid data
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> SyncResult<Spreadsheet> {
        let mut url = self.endpoint(&["spreadsheets", spreadsheet_id])?;
        url.query_pairs_mut().append_pair("includeGridData", "true");

        let request = self.client.get(url);
        self.send(request, &format!("spreadsheets/{}", spreadsheet_id))
            .await
    }

    /// Build an endpoint URL below the API base from path segments
    fn endpoint(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| decode_error(self.base.as_str(), "Sheets API base cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the bearer token, send, and decode the JSON response
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, route: &str) -> SyncResult<T> {
        let token = self.token_manager.get_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| remote_error(SHEETS_SERVICE, route, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(remote_error(
                SHEETS_SERVICE,
                route,
                format!("HTTP {} - {}", status, error_body),
            ));
        }

        response.json().await.map_err(|e| decode_error(route, e))
    }
}

/// JSON form of a row; empty cells are sent as `""` so they get cleared
fn row_values(row: &[Option<String>]) -> Vec<Value> {
    row.iter()
        .map(|cell| Value::String(cell.clone().unwrap_or_default()))
        .collect()
}

#[async_trait]
impl SheetStore for SheetsClient {
    async fn list_sheets_by_name(&self, spreadsheet_id: &str) -> SyncResult<BTreeMap<String, Sheet>> {
        let spreadsheet = self.get_spreadsheet(spreadsheet_id).await?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| (sheet.properties.title.clone(), sheet))
            .collect())
    }

    async fn create_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        header: Option<&[String]>,
    ) -> SyncResult<()> {
        info!("Creating sheet '{}'", title);

        let frozen_row_count = if header.is_some() { 1 } else { 0 };
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "frozenRowCount": frozen_row_count }
                    }
                }
            }]
        });

        let batch_update = format!("{}:batchUpdate", spreadsheet_id);
        let url = self.endpoint(&["spreadsheets", &batch_update])?;
        let _: Value = self
            .send(
                self.client.post(url).json(&body),
                &format!("spreadsheets/{}", batch_update),
            )
            .await?;

        if let Some(header) = header {
            let row: Row = header.iter().cloned().map(Some).collect();
            self.append_row(spreadsheet_id, title, &row).await?;
        }

        Ok(())
    }

    async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row: &[Option<String>],
    ) -> SyncResult<()> {
        let append = format!("{}:append", a1_range(sheet_name, "A1:A1"));
        let mut url = self.endpoint(&["spreadsheets", spreadsheet_id, "values", &append])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION);

        let body = json!({ "values": [row_values(row)] });
        let _: Value = self
            .send(
                self.client.post(url).json(&body),
                &format!("spreadsheets/{}/values/{}", spreadsheet_id, append),
            )
            .await?;

        Ok(())
    }

    async fn write_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: &[Row],
        start_column: &str,
        start_row: usize,
    ) -> SyncResult<()> {
        let range = a1_range(sheet_name, &format!("{}{}", start_column, start_row));
        debug!("Writing {} row(s) to {}", rows.len(), range);

        let body = json!({
            "valueInputOption": VALUE_INPUT_OPTION,
            "data": [{
                "range": range,
                "values": rows.iter().map(|row| row_values(row)).collect::<Vec<_>>(),
            }]
        });

        let url = self.endpoint(&["spreadsheets", spreadsheet_id, "values:batchUpdate"])?;
        let _: Value = self
            .send(
                self.client.post(url).json(&body),
                &format!("spreadsheets/{}/values:batchUpdate", spreadsheet_id),
            )
            .await?;

        Ok(())
    }
}
