//! Phrase-bundle provider
//!
//! One polymorphic lookup for the four translated form surfaces: a static
//! table answers instantly for the common languages, everything else goes to
//! the text-generation service once and lands in a process-owned cache.
//!
//! The cache is read-mostly and never invalidated. Two requests racing to
//! populate the same language both compute stable, near-identical bundles,
//! so last-write-wins is acceptable.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{force_json, tables, TextGenClient};
use crate::error::IntakeError;

/// The four translated form surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Voice,
    Profile,
    Contact,
    Idea,
}

pub struct PhraseBundles {
    textgen: Arc<TextGenClient>,
    cache: DashMap<(FormKind, String), Value>,
}

impl PhraseBundles {
    pub fn new(textgen: Arc<TextGenClient>) -> Self {
        Self {
            textgen,
            cache: DashMap::new(),
        }
    }

    /// Bundle for the profile, contact, or idea form.
    ///
    /// French (or an empty language field) returns an empty override object:
    /// the client keeps its built-in French strings.
    pub async fn form_bundle(&self, kind: FormKind, language: &str) -> Result<Value, IntakeError> {
        let code = language.trim().to_lowercase();
        if code.is_empty() || code == "fr" {
            return Ok(json!({}));
        }

        if let Some(entry) = tables::static_bundle(kind, &code) {
            return Ok(entry);
        }

        self.get_or_generate(kind, &code).await
    }

    /// Voice-intro bundle. Accepts a code or a spelled-out language name and
    /// always answers with the full entry (code, labels, ui), French
    /// included.
    pub async fn voice_bundle(&self, language: &str) -> Result<Value, IntakeError> {
        let field = language.trim();
        let mut code: String = field.to_lowercase().chars().take(2).collect();

        if tables::static_bundle(FormKind::Voice, &code).is_none() {
            if let Some(resolved) = tables::voice_code_for_label(field) {
                code = resolved.to_string();
            }
        }

        if let Some(entry) = tables::static_bundle(FormKind::Voice, &code) {
            let mut full = json!({ "code": code });
            merge(&mut full, entry);
            return Ok(full);
        }

        let key = if code.is_empty() {
            field.to_lowercase()
        } else {
            code
        };
        self.get_or_generate(FormKind::Voice, &key).await
    }

    async fn get_or_generate(&self, kind: FormKind, code: &str) -> Result<Value, IntakeError> {
        let key = (kind, code.to_string());
        if let Some(cached) = self.cache.get(&key) {
            debug!(?kind, code, "Phrase bundle cache hit");
            return Ok(cached.clone());
        }

        let prompt = tables::fallback_prompt(kind, code);
        let reply = self.textgen.generate(&prompt).await?;
        let bundle = force_json(&reply);

        info!(?kind, code, "Phrase bundle generated");
        self.cache.insert(key, bundle.clone());

        // Voice replies carry their own detected code; index under it too so
        // a later exact-code lookup hits the cache.
        if kind == FormKind::Voice {
            if let Some(detected) = bundle.get("code").and_then(|v| v.as_str()) {
                if detected != code {
                    self.cache
                        .insert((FormKind::Voice, detected.to_string()), bundle.clone());
                }
            }
        }

        Ok(bundle)
    }
}

fn merge(target: &mut Value, source: Value) {
    if let (Some(target_map), Value::Object(source_map)) = (target.as_object_mut(), source) {
        for (k, v) in source_map {
            target_map.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateConfig;

    fn bundles() -> PhraseBundles {
        let textgen = Arc::new(TextGenClient::new(&TranslateConfig::default()).unwrap());
        PhraseBundles::new(textgen)
    }

    #[tokio::test]
    async fn french_form_bundle_is_empty_override() {
        let provider = bundles();
        assert_eq!(
            provider.form_bundle(FormKind::Idea, "fr").await.unwrap(),
            json!({})
        );
        assert_eq!(
            provider.form_bundle(FormKind::Contact, "").await.unwrap(),
            json!({})
        );
    }

    #[tokio::test]
    async fn static_language_skips_the_service() {
        // The client is unconfigured; a service round-trip would error.
        let provider = bundles();
        let bundle = provider.form_bundle(FormKind::Profile, "en").await.unwrap();
        assert_eq!(bundle["label_name"], "First and last name");
    }

    #[tokio::test]
    async fn voice_bundle_includes_code_and_labels() {
        let provider = bundles();
        let bundle = provider.voice_bundle("Français").await.unwrap();
        assert_eq!(bundle["code"], "fr");
        assert_eq!(bundle["native_label"], "Français");
    }

    #[tokio::test]
    async fn voice_bundle_resolves_spelled_out_names() {
        let provider = bundles();
        let bundle = provider.voice_bundle("English").await.unwrap();
        assert_eq!(bundle["code"], "en");
    }

    #[tokio::test]
    async fn rare_language_without_service_errors() {
        let provider = bundles();
        let err = provider.form_bundle(FormKind::Idea, "sw").await;
        assert!(err.is_err());
    }
}
