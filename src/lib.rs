//! idea-intake: multilingual idea collection service
//!
//! Employees submit free-form ideas (typed text or voice recordings) in any
//! language. The service normalizes them into French, assigns each a
//! sequential month-scoped reference code, persists them, and fans the result
//! out to a spreadsheet, an object store and two email notifications.
//!
//! The durable store write is the only step that can fail a submission;
//! every downstream sink is best-effort and isolated from its siblings.

pub mod api;
pub mod config;
pub mod error;
pub mod intake;
pub mod media;
pub mod sinks;
pub mod store;
pub mod translate;
pub mod uploads;

pub use config::Config;
pub use error::IntakeError;
pub use intake::{Orchestrator, SubmitAck, SubmitPayload};
pub use store::{IdeaRecord, IdeaStore, NewIdea};
