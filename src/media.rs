//! Media labeling
//!
//! Assigns deterministic display names to uploaded media files so the
//! spreadsheet and the object store can reference them by a stable,
//! human-readable handle instead of the staged file name.

/// Image extensions recognized for the `_IMG_` bucket
const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Video extensions recognized for the `_VID_` bucket
const VIDEO_EXTS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm"];

/// Bucket a media path falls into, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    fn tag(self) -> &'static str {
        match self {
            MediaKind::Image => "IMG",
            MediaKind::Video => "VID",
            MediaKind::Other => "MEDIA",
        }
    }
}

/// Lowercased extension of a path, without the dot
pub fn extension(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Classify a path by extension; unknown or missing extensions are `Other`
pub fn classify(path: &str) -> MediaKind {
    match extension(path) {
        Some(ext) if IMAGE_EXTS.contains(&ext.as_str()) => MediaKind::Image,
        Some(ext) if VIDEO_EXTS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Other,
    }
}

/// Build one label per path: `{idea_code}_IMG_{n}`, `{idea_code}_VID_{n}` or
/// `{idea_code}_MEDIA_{n}`.
///
/// Each bucket keeps its own 1-based counter, independent of how the buckets
/// interleave in the input. Output is positionally aligned with the input:
/// the i-th label names the i-th path.
pub fn label_all(idea_code: &str, paths: &[String]) -> Vec<String> {
    let mut images = 0u32;
    let mut videos = 0u32;
    let mut others = 0u32;

    paths
        .iter()
        .map(|path| {
            let kind = classify(path);
            let n = match kind {
                MediaKind::Image => {
                    images += 1;
                    images
                }
                MediaKind::Video => {
                    videos += 1;
                    videos
                }
                MediaKind::Other => {
                    others += 1;
                    others
                }
            };
            format!("{}_{}_{}", idea_code, kind.tag(), n)
        })
        .collect()
}
