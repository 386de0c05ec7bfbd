//! Google Sheets REST backend
//!
//! Talks to the Sheets v4 `values` endpoints with a blocking client. Reads use
//! formatted values, so amount cells come back exactly as a person sees them
//! (currency glyphs and separators included). Writes use `USER_ENTERED` so
//! plain numbers land as numbers.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{column_letter, Grid, SheetStore};
use crate::error::{TallyError, TallyResult};

/// Table store backed by a Google spreadsheet
#[derive(Debug, Clone)]
pub struct SheetsApiStore {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<&'a str>,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<Vec<&'a str>>,
}

impl SheetsApiStore {
    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        token: Option<String>,
    ) -> TallyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            token,
        })
    }

    /// `{base}/spreadsheets/{id}/values/{range}` with the range percent-encoded
    fn values_url(&self, range: &str) -> TallyResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TallyError::Config(format!("Invalid sheets_api_base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TallyError::Config("sheets_api_base cannot be a base URL".into()))?
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    fn authorized(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check_status(response: Response, action: &str) -> TallyResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(TallyError::Sheet(format!(
            "{} failed (status {}): {}",
            action, status, body
        )))
    }
}

/// A1 range covering a whole table
fn table_range(table: &str) -> String {
    format!("'{}'", table.replace('\'', "''"))
}

/// A1 reference to a single cell of a table
fn cell_range(table: &str, row: usize, column: usize) -> String {
    format!("{}!{}{}", table_range(table), column_letter(column), row)
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_value_range(body: &str) -> TallyResult<Grid> {
    let range: ValueRange = serde_json::from_str(body)
        .map_err(|e| TallyError::Sheet(format!("Unexpected values response: {}", e)))?;

    Ok(range
        .values
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

impl SheetStore for SheetsApiStore {
    fn read_grid(&self, table: &str) -> TallyResult<Grid> {
        let url = self.values_url(&table_range(table))?;
        debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(url))
            .query(&[
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("majorDimension", "ROWS"),
            ])
            .send()?;
        let response = Self::check_status(response, &format!("Reading table '{}'", table))?;

        parse_value_range(&response.text()?)
    }

    fn append_row(&self, table: &str, cells: &[String]) -> TallyResult<()> {
        let range = format!("{}:append", table_range(table));
        let url = self.values_url(&range)?;
        debug!("POST {}", url);

        let body = ValueRangeBody {
            range: None,
            major_dimension: "ROWS",
            values: vec![cells.iter().map(String::as_str).collect()],
        };

        let response = self
            .authorized(self.client.post(url))
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()?;
        Self::check_status(response, &format!("Appending to table '{}'", table))?;

        Ok(())
    }

    fn update_cell(&self, table: &str, row: usize, column: usize, value: &str) -> TallyResult<()> {
        if row == 0 || column == 0 {
            return Err(TallyError::Sheet(format!(
                "invalid cell ({}, {}); rows and columns start at 1",
                row, column
            )));
        }

        let range = cell_range(table, row, column);
        let url = self.values_url(&range)?;
        debug!("PUT {}", url);

        let body = ValueRangeBody {
            range: Some(&range),
            major_dimension: "ROWS",
            values: vec![vec![value]],
        };

        let response = self
            .authorized(self.client.put(url))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()?;
        Self::check_status(response, &format!("Updating {}", range))?;

        Ok(())
    }
}
