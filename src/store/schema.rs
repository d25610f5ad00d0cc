//! Database schema for the idea store

use rusqlite::Connection;
use tracing::info;

use crate::error::IntakeError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Base table; records are insert-only and never mutated afterwards
const IDEAS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS ideas (
    id TEXT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL,
    idea_code TEXT,
    author_name TEXT,
    site TEXT,
    department TEXT,
    role TEXT,
    professional_email TEXT,
    contact_mode TEXT,
    typed_text TEXT,
    audio_path TEXT,
    detected_language TEXT,
    original_text TEXT,
    french_translation TEXT,
    idea_title TEXT,
    share_types TEXT,
    impact_main TEXT,
    impact_other TEXT,
    source TEXT,
    media_paths TEXT
);

CREATE INDEX IF NOT EXISTS idx_ideas_created_at ON ideas(created_at);
"#;

/// Created after column migration so older tables pick it up too. A duplicate
/// code produced by a racing writer surfaces here as a constraint violation
/// instead of being silently accepted.
const IDEA_CODE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_ideas_code ON ideas(idea_code)";

/// Columns added after the base schema shipped. Existing rows keep NULL for
/// columns introduced later; the store never rewrites old rows.
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[
    ("idea_code", "TEXT"),
    ("author_name", "TEXT"),
    ("site", "TEXT"),
    ("department", "TEXT"),
    ("role", "TEXT"),
    ("professional_email", "TEXT"),
    ("contact_mode", "TEXT"),
    ("typed_text", "TEXT"),
    ("audio_path", "TEXT"),
    ("detected_language", "TEXT"),
    ("original_text", "TEXT"),
    ("french_translation", "TEXT"),
    ("idea_title", "TEXT"),
    ("share_types", "TEXT"),
    ("impact_main", "TEXT"),
    ("impact_other", "TEXT"),
    ("source", "TEXT"),
    ("media_paths", "TEXT"),
];

/// Initialize the schema, migrating older databases in place
pub fn init_schema(conn: &Connection) -> Result<(), IntakeError> {
    let current = get_schema_version(conn)?;

    if current == 0 {
        info!("Creating ideas schema v{}", SCHEMA_VERSION);
    } else if current < SCHEMA_VERSION {
        info!("Migrating ideas schema v{} -> v{}", current, SCHEMA_VERSION);
    }

    conn.execute_batch(IDEAS_SCHEMA)?;
    add_missing_columns(conn)?;
    conn.execute(IDEA_CODE_INDEX, [])?;
    set_schema_version(conn, SCHEMA_VERSION)?;

    Ok(())
}

/// Additive, backward-compatible migration: any column the table predates is
/// appended with `ALTER TABLE ADD COLUMN`; data is never rewritten.
fn add_missing_columns(conn: &Connection) -> Result<(), IntakeError> {
    let mut stmt = conn.prepare("PRAGMA table_info(ideas)")?;
    let existing: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<_, _>>()?;

    for (name, col_type) in ADDITIVE_COLUMNS {
        if !existing.iter().any(|c| c == name) {
            info!(column = name, "Adding missing ideas column");
            conn.execute(
                &format!("ALTER TABLE ideas ADD COLUMN {} {}", name, col_type),
                [],
            )?;
        }
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, IntakeError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), IntakeError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
    Ok(())
}
