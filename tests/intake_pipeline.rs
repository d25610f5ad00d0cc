//! Submission pipeline integration tests
//!
//! Drives the orchestrator end-to-end against an on-disk store, a real
//! staging directory and mock sinks, covering:
//! - acknowledgement shape and code assignment
//! - partial-failure isolation between the three sinks
//! - per-item media relay semantics (placeholder links, local file retention)
//! - conditional confirmation email

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use idea_intake::error::IntakeError;
use idea_intake::intake::{sheet_row, Orchestrator, SubmitPayload};
use idea_intake::sinks::{NotificationSink, ObjectStorageSink, SpreadsheetSink};
use idea_intake::store::IdeaStore;
use idea_intake::uploads::StagingArea;

// =============================================================================
// Mock sinks
// =============================================================================

#[derive(Default)]
struct RecordingSheet {
    rows: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl SpreadsheetSink for RecordingSheet {
    async fn append_row(&self, row: &[String]) -> Result<(), IntakeError> {
        if self.fail {
            return Err(IntakeError::Upstream("sheet down".to_string()));
        }
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(())
    }
}

/// Uploads succeed unless the remote name contains one of the poisoned
/// substrings.
#[derive(Default)]
struct RecordingStorage {
    uploads: Mutex<Vec<String>>,
    fail_names: Vec<String>,
}

#[async_trait]
impl ObjectStorageSink for RecordingStorage {
    async fn upload(&self, _local: &Path, remote_name: &str) -> Result<String, IntakeError> {
        if self.fail_names.iter().any(|f| remote_name.contains(f)) {
            return Err(IntakeError::Upstream("storage down".to_string()));
        }
        self.uploads.lock().unwrap().push(remote_name.to_string());
        Ok(format!("https://files.example/{}", remote_name))
    }
}

#[derive(Default)]
struct RecordingMail {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

#[async_trait]
impl NotificationSink for RecordingMail {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), IntakeError> {
        if self.fail {
            return Err(IntakeError::Upstream("relay down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    _dir: TempDir,
    store: Arc<IdeaStore>,
    staging: Arc<StagingArea>,
    sheet: Arc<RecordingSheet>,
    storage: Arc<RecordingStorage>,
    mail: Arc<RecordingMail>,
    orchestrator: Orchestrator,
}

fn harness_with(
    sheet: RecordingSheet,
    storage: RecordingStorage,
    mail: RecordingMail,
) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(IdeaStore::open(dir.path().join("ideas.db")).unwrap());
    let staging = Arc::new(StagingArea::new(dir.path().join("uploads")).unwrap());

    let sheet = Arc::new(sheet);
    let storage = Arc::new(storage);
    let mail = Arc::new(mail);

    let orchestrator = Orchestrator::new(
        store.clone(),
        staging.clone(),
        sheet.clone(),
        storage.clone(),
        mail.clone(),
        "team@example.com".to_string(),
    );

    Harness {
        _dir: dir,
        store,
        staging,
        sheet,
        storage,
        mail,
        orchestrator,
    }
}

fn harness() -> Harness {
    harness_with(
        RecordingSheet::default(),
        RecordingStorage::default(),
        RecordingMail::default(),
    )
}

fn payload() -> SubmitPayload {
    SubmitPayload {
        author_name: Some("Marie Dupont".to_string()),
        idea_title: Some("Cartons réutilisables".to_string()),
        typed_text: Some("Réutiliser les cartons de livraison".to_string()),
        share_types: vec!["improvement".to_string()],
        ..Default::default()
    }
}

// =============================================================================
// Acknowledgement and persistence
// =============================================================================

#[tokio::test]
async fn submit_acknowledges_and_persists() {
    let h = harness();

    let ack = h.orchestrator.submit(payload()).await.unwrap();

    assert_eq!(ack.idea_code.len(), 14);
    assert!(ack.idea_code.starts_with("IDEA"));
    assert_eq!(ack.id.len(), 32);

    let record = h.store.get(&ack.id).unwrap().unwrap();
    assert_eq!(record.idea_code, ack.idea_code);
    assert_eq!(record.created_at, ack.created_at);
    assert_eq!(record.author_name.as_deref(), Some("Marie Dupont"));
    assert_eq!(record.source, "web_form");
}

#[tokio::test]
async fn serialized_submissions_get_consecutive_codes() {
    let h = harness();

    let first = h.orchestrator.submit(payload()).await.unwrap();
    let second = h.orchestrator.submit(payload()).await.unwrap();

    let seq_first: u64 = first.idea_code[8..].parse().unwrap();
    let seq_second: u64 = second.idea_code[8..].parse().unwrap();
    assert_eq!(seq_second, seq_first + 1);
    assert_eq!(first.idea_code[..8], second.idea_code[..8]);
}

// =============================================================================
// Media relay
// =============================================================================

#[tokio::test]
async fn media_relay_uploads_labels_and_deletes_local_files() {
    let h = harness();

    let image = h.staging.stage("a.png", b"img").unwrap();
    let video = h.staging.stage("b.mp4", b"vid").unwrap();

    let mut p = payload();
    p.media_paths = vec![image.clone(), video.clone()];
    let ack = h.orchestrator.submit(p).await.unwrap();

    let uploads = h.storage.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0], format!("{}_IMG_1.png", ack.idea_code));
    assert_eq!(uploads[1], format!("{}_VID_1.mp4", ack.idea_code));

    // Confirmed uploads delete the staged copies
    assert!(!h.staging.resolve(&image).unwrap().exists());
    assert!(!h.staging.resolve(&video).unwrap().exists());
}

#[tokio::test]
async fn one_failed_upload_leaves_placeholder_and_retains_file() {
    let h = harness_with(
        RecordingSheet::default(),
        RecordingStorage {
            fail_names: vec!["_VID_".to_string()],
            ..Default::default()
        },
        RecordingMail::default(),
    );

    let image = h.staging.stage("a.png", b"img").unwrap();
    let video = h.staging.stage("b.mp4", b"vid").unwrap();

    let mut p = payload();
    p.media_paths = vec![image.clone(), video.clone()];
    let ack = h.orchestrator.submit(p).await.unwrap();

    // Submission still succeeds
    assert!(ack.idea_code.starts_with("IDEA"));

    // The sheet row's media-links column has exactly one empty slot
    let rows = h.sheet.rows.lock().unwrap();
    let links: Vec<&str> = rows[0][16].split("; ").collect();
    assert_eq!(links.len(), 2);
    assert!(links[0].starts_with("https://files.example/"));
    assert_eq!(links[1], "");

    // Failed item's local file is retained, successful one is gone
    assert!(!h.staging.resolve(&image).unwrap().exists());
    assert!(h.staging.resolve(&video).unwrap().exists());
}

#[tokio::test]
async fn missing_staged_file_yields_empty_link() {
    let h = harness();

    let mut p = payload();
    p.media_paths = vec!["/uploads/never-staged.png".to_string()];
    h.orchestrator.submit(p).await.unwrap();

    assert!(h.storage.uploads.lock().unwrap().is_empty());
    let rows = h.sheet.rows.lock().unwrap();
    assert_eq!(rows[0][16], "");
    // Labels are still assigned for the position
    assert!(rows[0][18].contains("_IMG_1"));
}

// =============================================================================
// Sink isolation
// =============================================================================

#[tokio::test]
async fn sheet_failure_does_not_fail_submission_or_mail() {
    let h = harness_with(
        RecordingSheet {
            fail: true,
            ..Default::default()
        },
        RecordingStorage::default(),
        RecordingMail::default(),
    );

    let ack = h.orchestrator.submit(payload()).await.unwrap();

    assert!(h.store.get(&ack.id).unwrap().is_some());
    // Team digest still went out
    let sent = h.mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "team@example.com");
}

#[tokio::test]
async fn mail_failure_does_not_fail_submission_or_sheet() {
    let h = harness_with(
        RecordingSheet::default(),
        RecordingStorage::default(),
        RecordingMail {
            fail: true,
            ..Default::default()
        },
    );

    h.orchestrator.submit(payload()).await.unwrap();
    assert_eq!(h.sheet.rows.lock().unwrap().len(), 1);
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn no_confirmation_without_professional_email() {
    let h = harness();

    h.orchestrator.submit(payload()).await.unwrap();

    let sent = h.mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "only the team digest expected");
    assert_eq!(sent[0].0, "team@example.com");
}

#[tokio::test]
async fn confirmation_sent_when_email_provided() {
    let h = harness();

    let mut p = payload();
    p.professional_email = Some("marie@example.com".to_string());
    let ack = h.orchestrator.submit(p).await.unwrap();

    let sent = h.mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].0, "marie@example.com");
    assert!(sent[1].1.contains(&ack.idea_code));
}

// =============================================================================
// Spreadsheet row shape
// =============================================================================

#[tokio::test]
async fn sheet_row_has_nineteen_positional_columns() {
    let h = harness();

    let mut p = payload();
    p.site = Some("Lyon".to_string());
    p.detected_language = Some("es".to_string());
    p.share_types = vec!["difficulty".to_string(), "improvement".to_string()];
    let ack = h.orchestrator.submit(p).await.unwrap();

    let rows = h.sheet.rows.lock().unwrap();
    let row = &rows[0];
    assert_eq!(row.len(), 19);
    assert_eq!(row[0], ack.idea_code);
    assert_eq!(row[1], ack.created_at);
    assert_eq!(row[3], "Lyon");
    assert_eq!(row[9], "difficulty, improvement");
    assert_eq!(row[13], "es");
    assert_eq!(row[17], ack.id);
}

#[test]
fn sheet_row_helper_defaults_absent_fields_to_empty() {
    let record = idea_intake::store::IdeaRecord {
        id: "x".to_string(),
        created_at: "2025-11-03T12:00:00Z".to_string(),
        idea_code: "IDEA2511000001".to_string(),
        author_name: None,
        site: None,
        department: None,
        role: None,
        professional_email: None,
        contact_mode: None,
        typed_text: None,
        audio_path: None,
        detected_language: None,
        original_text: None,
        french_translation: None,
        idea_title: None,
        share_types: vec![],
        impact_main: None,
        impact_other: None,
        source: "web_form".to_string(),
        media_paths: vec![],
    };

    let row = sheet_row(&record, &[], &[]);
    assert_eq!(row.len(), 19);
    assert_eq!(row[2], "");
    assert_eq!(row[9], "");
    assert_eq!(row[16], "");
}
