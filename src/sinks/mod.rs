//! Fan-out sinks
//!
//! External systems the orchestrator pushes to once an idea is durably
//! stored: a spreadsheet, an object store, and a mail relay. Every sink call
//! is best-effort from the submitter's point of view; the orchestrator
//! inspects the result only to decide what to log and whether to record an
//! empty placeholder link.

pub mod drive;
pub mod mail;
pub mod sheet;

use std::path::Path;

use async_trait::async_trait;

use crate::error::IntakeError;

pub use drive::DriveClient;
pub use mail::MailRelay;
pub use sheet::SheetClient;

/// Appends one row per idea to an external tabular store
#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    async fn append_row(&self, row: &[String]) -> Result<(), IntakeError>;
}

/// Uploads staged media files, returning a durable external link
#[async_trait]
pub trait ObjectStorageSink: Send + Sync {
    async fn upload(&self, local: &Path, remote_name: &str) -> Result<String, IntakeError>;
}

/// Delivers composed emails through an external relay
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), IntakeError>;
}
