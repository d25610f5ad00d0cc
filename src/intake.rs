//! Submission pipeline
//!
//! The only multi-step control flow in the service. One call: validate the
//! payload, commit the idea (the single fatal step), then fan out to the
//! object store, the spreadsheet and the mail relay. Everything after the
//! commit is best-effort: failures are logged for operators and never change
//! the submitter's acknowledgement.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::IntakeError;
use crate::media;
use crate::sinks::{mail, NotificationSink, ObjectStorageSink, SpreadsheetSink};
use crate::store::{IdeaRecord, IdeaStore, NewIdea};
use crate::uploads::{StagedMedia, StagingArea};

/// Incoming submission payload; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub professional_email: Option<String>,
    #[serde(default)]
    pub contact_mode: Option<String>,
    #[serde(default)]
    pub typed_text: Option<String>,
    #[serde(default)]
    pub audio_path: Option<String>,
    #[serde(default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub french_translation: Option<String>,
    #[serde(default)]
    pub idea_title: Option<String>,
    #[serde(default)]
    pub share_types: Vec<String>,
    #[serde(default)]
    pub impact_main: Option<String>,
    #[serde(default)]
    pub impact_other: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub media_paths: Vec<String>,
}

/// Acknowledgement returned once the idea is durably stored
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAck {
    pub id: String,
    pub created_at: String,
    pub idea_code: String,
}

/// Drives one submission through store commit and sink fan-out
pub struct Orchestrator {
    store: Arc<IdeaStore>,
    staging: Arc<StagingArea>,
    sheet: Arc<dyn SpreadsheetSink>,
    object_storage: Arc<dyn ObjectStorageSink>,
    notifier: Arc<dyn NotificationSink>,
    team_addr: String,
}

impl Orchestrator {
    pub fn new(
        store: Arc<IdeaStore>,
        staging: Arc<StagingArea>,
        sheet: Arc<dyn SpreadsheetSink>,
        object_storage: Arc<dyn ObjectStorageSink>,
        notifier: Arc<dyn NotificationSink>,
        team_addr: String,
    ) -> Self {
        Self {
            store,
            staging,
            sheet,
            object_storage,
            notifier,
            team_addr,
        }
    }

    /// Process one submission.
    ///
    /// Only the store commit can fail the call. Once it succeeds the
    /// acknowledgement is returned no matter how the fan-out goes.
    pub async fn submit(&self, payload: SubmitPayload) -> Result<SubmitAck, IntakeError> {
        let new = NewIdea {
            id: Uuid::new_v4().simple().to_string(),
            created_at: Utc::now(),
            author_name: payload.author_name,
            site: payload.site,
            department: payload.department,
            role: payload.role,
            professional_email: payload.professional_email,
            contact_mode: payload.contact_mode,
            typed_text: payload.typed_text,
            audio_path: payload.audio_path,
            detected_language: payload.detected_language,
            original_text: payload.original_text,
            french_translation: payload.french_translation,
            idea_title: payload.idea_title,
            share_types: payload.share_types,
            impact_main: payload.impact_main,
            impact_other: payload.impact_other,
            source: payload.source.unwrap_or_else(|| "web_form".to_string()),
            media_paths: payload.media_paths,
        };

        // Fatal step: code derivation and row insert, one transaction
        let record = self.store.insert(new)?;
        info!(id = %record.id, code = %record.idea_code, "Idea recorded");

        let labels = media::label_all(&record.idea_code, &record.media_paths);
        let links = self.relay_media(&record, &labels).await;

        if let Err(e) = self
            .sheet
            .append_row(&sheet_row(&record, &links, &labels))
            .await
        {
            warn!(code = %record.idea_code, error = %e, "Spreadsheet append failed");
        }

        if let Err(e) = self
            .notifier
            .send(
                &self.team_addr,
                &mail::team_subject(&record),
                &mail::team_body(&record, &links),
            )
            .await
        {
            warn!(code = %record.idea_code, error = %e, "Team notification failed");
        }

        if let Some(email) = record.professional_email.as_deref().filter(|e| !e.is_empty()) {
            if let Err(e) = self
                .notifier
                .send(
                    email,
                    &mail::confirmation_subject(&record),
                    &mail::confirmation_body(&record),
                )
                .await
            {
                warn!(code = %record.idea_code, error = %e, "Confirmation mail failed");
            }
        }

        Ok(SubmitAck {
            id: record.id,
            created_at: record.created_at,
            idea_code: record.idea_code,
        })
    }

    /// Relay each staged media file to external storage under its label.
    ///
    /// Per item: missing or failed items yield an empty placeholder link and
    /// keep their local file; successful items are deleted locally only after
    /// the upload is confirmed. One item's failure never touches its
    /// siblings.
    async fn relay_media(&self, record: &IdeaRecord, labels: &[String]) -> Vec<String> {
        let mut links = Vec::with_capacity(record.media_paths.len());

        for (path, label) in record.media_paths.iter().zip(labels) {
            let staged = self
                .staging
                .resolve(path)
                .and_then(StagedMedia::open);

            let Some(staged) = staged else {
                warn!(code = %record.idea_code, path, "Staged media missing, link left empty");
                links.push(String::new());
                continue;
            };

            let remote_name = match media::extension(path) {
                Some(ext) => format!("{}.{}", label, ext),
                None => label.clone(),
            };

            match self.object_storage.upload(staged.path(), &remote_name).await {
                Ok(link) => {
                    staged.release();
                    links.push(link);
                }
                Err(e) => {
                    // Local file retained for manual recovery
                    warn!(code = %record.idea_code, path, error = %e, "Media upload failed, link left empty");
                    links.push(String::new());
                }
            }
        }

        links
    }
}

/// The 19 positional spreadsheet columns for one idea
pub fn sheet_row(record: &IdeaRecord, links: &[String], labels: &[String]) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    vec![
        record.idea_code.clone(),
        record.created_at.clone(),
        opt(&record.author_name),
        opt(&record.site),
        opt(&record.department),
        opt(&record.role),
        opt(&record.professional_email),
        opt(&record.contact_mode),
        opt(&record.idea_title),
        record.share_types.join(", "),
        opt(&record.impact_main),
        opt(&record.impact_other),
        opt(&record.typed_text),
        opt(&record.detected_language),
        opt(&record.original_text),
        opt(&record.french_translation),
        links.join("; "),
        record.id.clone(),
        labels.join("; "),
    ]
}
