//! Spreadsheet sink
//!
//! Appends one positional row per idea to the configured tabular endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::SpreadsheetSink;
use crate::config::SheetConfig;
use crate::error::IntakeError;

pub struct SheetClient {
    client: reqwest::Client,
    append_url: Option<String>,
    api_token: Option<String>,
}

impl SheetClient {
    pub fn new(config: &SheetConfig) -> Result<Self, IntakeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            append_url: config.append_url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl SpreadsheetSink for SheetClient {
    async fn append_row(&self, row: &[String]) -> Result<(), IntakeError> {
        let Some(url) = &self.append_url else {
            warn!("Spreadsheet endpoint not configured, row append skipped");
            return Ok(());
        };

        let mut request = self.client.post(url).json(&json!({ "values": [row] }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(IntakeError::Upstream(format!(
                "spreadsheet append returned HTTP {}",
                response.status()
            )));
        }

        debug!(columns = row.len(), "Spreadsheet row appended");
        Ok(())
    }
}
