//! Local upload staging
//!
//! Uploaded files are staged under a single local directory before being
//! relayed to external storage. Relay uses a scoped resource: the local file
//! is deleted only after a confirmed upload, otherwise it stays on disk for
//! operator inspection.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::IntakeError;

/// Public path prefix under which staged files are served back
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// The local staging directory
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: PathBuf) -> Result<Self, IntakeError> {
        std::fs::create_dir_all(&dir)?;
        info!("Media staging directory: {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write uploaded bytes under a generated unique name and return the
    /// public `/uploads/<name>` reference.
    pub fn stage(&self, original_name: &str, bytes: &[u8]) -> Result<String, IntakeError> {
        let name = format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            sanitize_name(original_name)
        );
        std::fs::write(self.dir.join(&name), bytes)?;
        Ok(format!("{}{}", UPLOADS_PREFIX, name))
    }

    /// Map a public `/uploads/<name>` reference back to the local file path.
    /// Returns `None` when the reference points outside the staging dir.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(UPLOADS_PREFIX)?;
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}

/// Keep a conservative character set; anything else collapses to `_`
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// One staged file in flight to external storage.
///
/// Dropping it keeps the file; call [`StagedMedia::release`] after the upload
/// is confirmed to delete the local copy.
pub struct StagedMedia {
    path: PathBuf,
}

impl StagedMedia {
    /// Open the staged file, or `None` if it no longer exists
    pub fn open(path: PathBuf) -> Option<Self> {
        if path.is_file() {
            Some(Self { path })
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the local copy after a confirmed upload
    pub fn release(self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = ?self.path, error = %e, "Could not delete staged media after upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stage_and_resolve_round_trip() {
        let dir = TempDir::new().unwrap();
        let staging = StagingArea::new(dir.path().to_path_buf()).unwrap();

        let public = staging.stage("photo réforme.png", b"bytes").unwrap();
        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with(".png"));

        let local = staging.resolve(&public).unwrap();
        assert_eq!(std::fs::read(local).unwrap(), b"bytes");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let staging = StagingArea::new(dir.path().to_path_buf()).unwrap();

        assert!(staging.resolve("/uploads/../etc/passwd").is_none());
        assert!(staging.resolve("/uploads/a/b").is_none());
        assert!(staging.resolve("/elsewhere/x.png").is_none());
        assert!(staging.resolve("/uploads/").is_none());
    }

    #[test]
    fn release_deletes_drop_retains() {
        let dir = TempDir::new().unwrap();
        let kept = dir.path().join("kept.bin");
        let gone = dir.path().join("gone.bin");
        std::fs::write(&kept, b"k").unwrap();
        std::fs::write(&gone, b"g").unwrap();

        let staged = StagedMedia::open(kept.clone()).unwrap();
        drop(staged);
        assert!(kept.exists());

        let staged = StagedMedia::open(gone.clone()).unwrap();
        staged.release();
        assert!(!gone.exists());
    }

    #[test]
    fn open_missing_is_none() {
        assert!(StagedMedia::open(PathBuf::from("/nonexistent/file")).is_none());
    }
}
