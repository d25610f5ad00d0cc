//! Idea store
//!
//! Durable, insert-only record of submitted ideas over SQLite. The store owns
//! the per-month sequence behind the human-readable idea code: `insert` runs
//! the month count and the row insert inside one transaction while holding
//! the single connection, so serialized writers can never observe a gap or a
//! duplicate. A unique index on `idea_code` backstops the invariant.

pub mod schema;

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::IntakeError;

/// Input for one idea. `id` and `created_at` are assigned by the caller at
/// submission time; everything else comes straight from the payload.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub site: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub professional_email: Option<String>,
    pub contact_mode: Option<String>,
    pub typed_text: Option<String>,
    pub audio_path: Option<String>,
    pub detected_language: Option<String>,
    pub original_text: Option<String>,
    pub french_translation: Option<String>,
    pub idea_title: Option<String>,
    pub share_types: Vec<String>,
    pub impact_main: Option<String>,
    pub impact_other: Option<String>,
    pub source: String,
    pub media_paths: Vec<String>,
}

impl Default for NewIdea {
    fn default() -> Self {
        Self {
            id: String::new(),
            created_at: Utc::now(),
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
            share_types: Vec::new(),
            impact_main: None,
            impact_other: None,
            source: "web_form".to_string(),
            media_paths: Vec::new(),
        }
    }
}

/// A committed idea row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdeaRecord {
    pub id: String,
    /// UTC, second precision, RFC 3339
    pub created_at: String,
    pub idea_code: String,
    pub author_name: Option<String>,
    pub site: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub professional_email: Option<String>,
    pub contact_mode: Option<String>,
    pub typed_text: Option<String>,
    pub audio_path: Option<String>,
    pub detected_language: Option<String>,
    pub original_text: Option<String>,
    pub french_translation: Option<String>,
    pub idea_title: Option<String>,
    pub share_types: Vec<String>,
    pub impact_main: Option<String>,
    pub impact_other: Option<String>,
    pub source: String,
    pub media_paths: Vec<String>,
}

impl IdeaRecord {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let share_types: Option<String> = row.get("share_types")?;
        let media_paths: Option<String> = row.get("media_paths")?;

        Ok(Self {
            id: row.get("id")?,
            created_at: row.get("created_at")?,
            idea_code: row.get::<_, Option<String>>("idea_code")?.unwrap_or_default(),
            author_name: row.get("author_name")?,
            site: row.get("site")?,
            department: row.get("department")?,
            role: row.get("role")?,
            professional_email: row.get("professional_email")?,
            contact_mode: row.get("contact_mode")?,
            typed_text: row.get("typed_text")?,
            audio_path: row.get("audio_path")?,
            detected_language: row.get("detected_language")?,
            original_text: row.get("original_text")?,
            french_translation: row.get("french_translation")?,
            idea_title: row.get("idea_title")?,
            share_types: decode_list(share_types),
            impact_main: row.get("impact_main")?,
            impact_other: row.get("impact_other")?,
            source: row.get::<_, Option<String>>("source")?.unwrap_or_default(),
            media_paths: decode_list(media_paths),
        })
    }
}

/// Lists are stored as JSON text; a NULL from a pre-migration row decodes to
/// an empty list.
fn decode_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Format the month-scoped reference code: `IDEA` + 2-digit year + 2-digit
/// month + 1-based sequence zero-padded to 6 digits.
///
/// Known ceiling: past 999,999 ideas in one month the sequence overflows its
/// fixed width.
pub fn format_idea_code(created_at: &DateTime<Utc>, seq: i64) -> String {
    format!(
        "IDEA{:02}{:02}{:06}",
        created_at.year() % 100,
        created_at.month(),
        seq
    )
}

const SELECT_COLUMNS: &str = "id, created_at, idea_code, author_name, site, department, role, \
     professional_email, contact_mode, typed_text, audio_path, detected_language, \
     original_text, french_translation, idea_title, share_types, impact_main, \
     impact_other, source, media_paths";

/// SQLite-backed idea store
pub struct IdeaStore {
    conn: Mutex<Connection>,
}

impl IdeaStore {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IntakeError> {
        info!("Opening ideas database at {:?}", path.as_ref());
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::from_conn(conn)
    }

    /// In-memory database, for tests
    pub fn open_in_memory() -> Result<Self, IntakeError> {
        debug!("Opening in-memory ideas database");
        Self::from_conn(Connection::open_in_memory()?)
    }

    fn from_conn(conn: Connection) -> Result<Self, IntakeError> {
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Count ideas created in the given calendar month
    pub fn count_in_month(&self, year: i32, month: u32) -> Result<i64, IntakeError> {
        let prefix = format!("{:04}-{:02}", year, month);
        let conn = self.conn.lock().map_err(|_| IntakeError::LockPoisoned)?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM ideas WHERE substr(created_at, 1, 7) = ?1",
            params![prefix],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert one idea, deriving its code from the committed month count.
    ///
    /// The count and the insert share one transaction on the store's only
    /// connection, so the sequence reflects committed state and two writers
    /// cannot interleave between them. Fully succeeds or fully fails; no
    /// partial row is ever observable.
    pub fn insert(&self, new: NewIdea) -> Result<IdeaRecord, IntakeError> {
        let mut conn = self.conn.lock().map_err(|_| IntakeError::LockPoisoned)?;
        let tx = conn.transaction()?;

        let prefix = new.created_at.format("%Y-%m").to_string();
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM ideas WHERE substr(created_at, 1, 7) = ?1",
            params![prefix],
            |row| row.get(0),
        )?;
        let idea_code = format_idea_code(&new.created_at, count + 1);
        let created_at = new
            .created_at
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let share_types = serde_json::to_string(&new.share_types)?;
        let media_paths = serde_json::to_string(&new.media_paths)?;

        tx.execute(
            "INSERT INTO ideas (
                id, created_at, idea_code, author_name, site, department, role,
                professional_email, contact_mode, typed_text, audio_path,
                detected_language, original_text, french_translation, idea_title,
                share_types, impact_main, impact_other, source, media_paths
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
            params![
                new.id,
                created_at,
                idea_code,
                new.author_name,
                new.site,
                new.department,
                new.role,
                new.professional_email,
                new.contact_mode,
                new.typed_text,
                new.audio_path,
                new.detected_language,
                new.original_text,
                new.french_translation,
                new.idea_title,
                share_types,
                new.impact_main,
                new.impact_other,
                new.source,
                media_paths,
            ],
        )?;
        tx.commit()?;

        debug!(id = %new.id, code = %idea_code, "Idea committed");

        Ok(IdeaRecord {
            id: new.id,
            created_at,
            idea_code,
            author_name: new.author_name,
            site: new.site,
            department: new.department,
            role: new.role,
            professional_email: new.professional_email,
            contact_mode: new.contact_mode,
            typed_text: new.typed_text,
            audio_path: new.audio_path,
            detected_language: new.detected_language,
            original_text: new.original_text,
            french_translation: new.french_translation,
            idea_title: new.idea_title,
            share_types: new.share_types,
            impact_main: new.impact_main,
            impact_other: new.impact_other,
            source: new.source,
            media_paths: new.media_paths,
        })
    }

    /// Fetch one idea by id
    pub fn get(&self, id: &str) -> Result<Option<IdeaRecord>, IntakeError> {
        let conn = self.conn.lock().map_err(|_| IntakeError::LockPoisoned)?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM ideas WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                IdeaRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Total row count
    pub fn count(&self) -> Result<i64, IntakeError> {
        let conn = self.conn.lock().map_err(|_| IntakeError::LockPoisoned)?;
        let count = conn.query_row("SELECT COUNT(*) FROM ideas", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn idea(id: &str, created_at: DateTime<Utc>) -> NewIdea {
        NewIdea {
            id: id.to_string(),
            created_at,
            source: "web_form".to_string(),
            ..Default::default()
        }
    }

    fn code_matches_format(code: &str) {
        assert_eq!(code.len(), 14, "bad length: {}", code);
        assert!(code.starts_with("IDEA"));
        assert!(code[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn sequence_increments_within_month() {
        let store = IdeaStore::open_in_memory().unwrap();
        let when = at(2025, 11, 3);

        let first = store.insert(idea("a", when)).unwrap();
        let second = store.insert(idea("b", when)).unwrap();
        let third = store.insert(idea("c", at(2025, 11, 28))).unwrap();

        assert_eq!(first.idea_code, "IDEA2511000001");
        assert_eq!(second.idea_code, "IDEA2511000002");
        assert_eq!(third.idea_code, "IDEA2511000003");
        code_matches_format(&first.idea_code);
    }

    #[test]
    fn sequence_restarts_each_month() {
        let store = IdeaStore::open_in_memory().unwrap();

        store.insert(idea("a", at(2025, 11, 30))).unwrap();
        let december = store.insert(idea("b", at(2025, 12, 1))).unwrap();

        assert_eq!(december.idea_code, "IDEA2512000001");
        assert_eq!(store.count_in_month(2025, 11).unwrap(), 1);
        assert_eq!(store.count_in_month(2025, 12).unwrap(), 1);
    }

    #[test]
    fn failed_insert_leaves_no_row() {
        let store = IdeaStore::open_in_memory().unwrap();
        let when = at(2025, 6, 15);

        store.insert(idea("dup", when)).unwrap();
        let err = store.insert(idea("dup", when));

        assert!(err.is_err());
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.count_in_month(2025, 6).unwrap(), 1);
    }

    #[test]
    fn round_trips_every_field() {
        let store = IdeaStore::open_in_memory().unwrap();
        let new = NewIdea {
            id: "full".to_string(),
            created_at: at(2026, 1, 9),
            author_name: Some("Marie Dupont".to_string()),
            site: Some("Lyon".to_string()),
            department: Some("Logistique".to_string()),
            role: Some("Technicienne".to_string()),
            professional_email: Some("marie@example.com".to_string()),
            contact_mode: Some("mail".to_string()),
            typed_text: Some("Réduire les déchets d'emballage".to_string()),
            audio_path: Some("/uploads/abc.webm".to_string()),
            detected_language: Some("fr".to_string()),
            original_text: Some("texte".to_string()),
            french_translation: Some("texte".to_string()),
            idea_title: Some("Emballages réutilisables".to_string()),
            share_types: vec!["improvement".to_string(), "innovation".to_string()],
            impact_main: Some("environnement".to_string()),
            impact_other: None,
            source: "web_form".to_string(),
            media_paths: vec!["/uploads/a.png".to_string(), "/uploads/b.mp4".to_string()],
        };

        let inserted = store.insert(new).unwrap();
        let fetched = store.get("full").unwrap().unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(fetched.share_types.len(), 2);
        assert_eq!(fetched.media_paths[1], "/uploads/b.mp4");
        assert!(fetched.created_at.starts_with("2026-01-09T12:00:00"));
    }

    #[test]
    fn get_missing_returns_none() {
        let store = IdeaStore::open_in_memory().unwrap();
        assert!(store.get("nope").unwrap().is_none());
    }
}
