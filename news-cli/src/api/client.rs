//! Google Sheets values API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::auth::AuthManager;
use super::models::{UpdateValuesResponse, ValueRange};
use super::range;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// A tabular source that rows can be read from and written back to
///
/// Implemented by [`SheetsClient`] for real spreadsheets. The pipeline only
/// talks to this trait so it can run against an in-memory grid in tests.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Read a block of cells as strings, first row being the headers
    async fn read_range(&self, tab: &str, range: &str) -> Result<Vec<Vec<String>>>;

    /// Replace one full row (1-based `row`) with `values`, starting at column A
    async fn write_row(&self, tab: &str, row: u32, values: &[String]) -> Result<()>;
}

/// Client bound to a single spreadsheet
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    auth: Arc<AuthManager>,
    spreadsheet_id: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(http: reqwest::Client, auth: Arc<AuthManager>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http,
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn values_url(&self, a1: &str) -> String {
        values_url(&self.base_url, &self.spreadsheet_id, a1)
    }

    /// Fetch a token up front so auth problems surface before any work starts
    pub async fn connect(&self) -> Result<()> {
        self.auth
            .access_token()
            .await
            .context("Failed to authenticate with Google")?;
        Ok(())
    }
}

/// Build the `spreadsheets.values` URL for a qualified A1 range
pub fn values_url(base_url: &str, spreadsheet_id: &str, a1: &str) -> String {
    format!(
        "{}/spreadsheets/{}/values/{}",
        base_url,
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(a1)
    )
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn read_range(&self, tab: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let a1 = range::qualified(tab, range);
        let token = self.auth.access_token().await?;

        debug!("GET values {} from {}", a1, self.spreadsheet_id);
        let response = self
            .http
            .get(self.values_url(&a1))
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to read range {}", a1))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reading {} failed with HTTP {}: {}", a1, status, body);
        }

        let values: ValueRange = response
            .json()
            .await
            .with_context(|| format!("Failed to parse values for {}", a1))?;

        Ok(values.into_grid())
    }

    async fn write_row(&self, tab: &str, row: u32, values: &[String]) -> Result<()> {
        let a1 = range::row_range(tab, row, values.len());
        let token = self.auth.access_token().await?;

        debug!("PUT values {} ({} cells)", a1, values.len());
        let response = self
            .http
            .put(self.values_url(&a1))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&ValueRange::single_row(a1.clone(), values))
            .send()
            .await
            .with_context(|| format!("Failed to update range {}", a1))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Updating {} failed with HTTP {}: {}", a1, status, body);
        }

        let body = response.text().await.unwrap_or_default();
        let updated = UpdateValuesResponse::parse_or_default(&body, &a1);
        debug!(
            "Updated {} ({} cells)",
            updated.updated_range.as_deref().unwrap_or(&a1),
            updated.updated_cells.unwrap_or_default()
        );

        Ok(())
    }
}
