//! Object storage sink
//!
//! Uploads staged media files to the external file store and hands back a
//! shareable link. An unconfigured endpoint is an upload failure, not a
//! silent skip: the orchestrator must keep the local copy in that case.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use super::ObjectStorageSink;
use crate::config::DriveConfig;
use crate::error::IntakeError;

pub struct DriveClient {
    client: reqwest::Client,
    upload_url: Option<String>,
    api_token: Option<String>,
}

impl DriveClient {
    pub fn new(config: &DriveConfig) -> Result<Self, IntakeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            upload_url: config.upload_url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl ObjectStorageSink for DriveClient {
    async fn upload(&self, local: &Path, remote_name: &str) -> Result<String, IntakeError> {
        let url = self
            .upload_url
            .as_ref()
            .ok_or_else(|| IntakeError::Upstream("object storage not configured".to_string()))?;

        let bytes = tokio::fs::read(local).await?;
        debug!(path = ?local, name = remote_name, size = bytes.len(), "Uploading media");

        let metadata = serde_json::json!({ "name": remote_name }).to_string();
        let form = Form::new()
            .part("metadata", Part::text(metadata))
            .part("file", Part::bytes(bytes).file_name(remote_name.to_string()));

        let mut request = self.client.post(url).multipart(form);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(IntakeError::Upstream(format!(
                "media upload returned HTTP {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;

        // The relay answers with a ready link, or at least the stored file id
        let link = body
            .get("web_link")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| {
                body.get("id")
                    .and_then(|v| v.as_str())
                    .map(|id| format!("https://drive.google.com/file/d/{}/view?usp=drivesdk", id))
            })
            .ok_or_else(|| {
                IntakeError::Upstream("upload response carried no link or id".to_string())
            })?;

        info!(name = remote_name, "Media uploaded");
        Ok(link)
    }
}
