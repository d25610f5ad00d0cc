//! External text-generation service client
//!
//! One opaque collaborator handles speech transcription, translation and
//! profile extraction. Every call is a single prompt-and-await HTTP exchange
//! bounded by a timeout; the service is expected to be occasionally slow or
//! unreachable.

pub mod bundles;
pub mod tables;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::IntakeError;

pub use bundles::{FormKind, PhraseBundles};

pub struct TextGenClient {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: String,
}

impl TextGenClient {
    pub fn new(config: &TranslateConfig) -> Result<Self, IntakeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a text-only prompt and return the raw model reply
    pub async fn generate(&self, prompt: &str) -> Result<String, IntakeError> {
        self.generate_parts(vec![json!({ "text": prompt })]).await
    }

    /// Send a prompt plus an inline audio part
    pub async fn generate_with_audio(
        &self,
        prompt: &str,
        mime: &str,
        audio: &[u8],
    ) -> Result<String, IntakeError> {
        self.generate_parts(vec![
            json!({ "text": prompt }),
            json!({ "inline_data": { "mime_type": mime, "data": BASE64.encode(audio) } }),
        ])
        .await
    }

    async fn generate_parts(&self, parts: Vec<Value>) -> Result<String, IntakeError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| IntakeError::Upstream("text generation not configured".to_string()))?;

        let url = format!(
            "{}/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            self.model
        );

        let mut request = self
            .client
            .post(&url)
            .json(&json!({ "contents": [{ "parts": parts }] }));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(IntakeError::Upstream(format!(
                "text generation returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        debug!(model = %self.model, reply_len = text.len(), "Text generation reply");
        Ok(text)
    }

    /// Transcribe and translate one audio recording
    pub async fn transcribe(&self, mime: &str, audio: &[u8]) -> Result<Transcription, IntakeError> {
        let reply = self
            .generate_with_audio(TRANSCRIBE_PROMPT, mime, audio)
            .await?;
        let data = force_json(&reply);

        let field = |key: &str| {
            data.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let transcription = Transcription {
            language: field("language"),
            original_text: field("original_text"),
            french_translation: field("french_translation"),
            suggested_title: field("suggested_title"),
            suggested_title_fr: field("suggested_title_fr"),
        };

        if transcription.language.is_empty()
            && transcription.original_text.is_empty()
            && transcription.french_translation.is_empty()
        {
            return Err(IntakeError::Upstream(
                "empty or non-JSON transcription reply".to_string(),
            ));
        }

        Ok(transcription)
    }

    /// Extract profile fields from free text, with French hints for anything
    /// the model could not find.
    pub async fn analyze_profile(&self, text: &str) -> Result<ProfileExtraction, IntakeError> {
        let prompt = format!("{}\n\nTexte à analyser :\n\"\"\"{}\"\"\"", PROFILE_PROMPT, text);
        let reply = self.generate(&prompt).await?;
        let data = force_json(&reply);

        let profile_value = data.get("profile").cloned().unwrap_or_else(|| json!({}));
        let field = |key: &str| {
            profile_value
                .get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        let profile = ProfileFields {
            name: field("name"),
            site: field("site"),
            department: field("department"),
            role: field("role"),
        };

        let missing: Vec<String> = match data.get("missing").and_then(|v| v.as_array()) {
            Some(list) => list
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            None => profile.missing(),
        };

        let model_hints = data
            .get("hints")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let mut hints = Map::new();
        for &(key, default) in DEFAULT_HINTS {
            if missing.iter().any(|m| m == key) {
                let hint = model_hints
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or(default);
                hints.insert(key.to_string(), Value::String(hint.to_string()));
            }
        }

        Ok(ProfileExtraction {
            profile,
            missing,
            hints,
        })
    }
}

/// Structured result of one audio transcription
#[derive(Debug, Clone, Serialize)]
pub struct Transcription {
    pub language: String,
    pub original_text: String,
    pub french_translation: String,
    pub suggested_title: String,
    pub suggested_title_fr: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub site: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
}

impl ProfileFields {
    fn missing(&self) -> Vec<String> {
        [
            ("name", &self.name),
            ("site", &self.site),
            ("department", &self.department),
            ("role", &self.role),
        ]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| k.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileExtraction {
    pub profile: ProfileFields,
    pub missing: Vec<String>,
    pub hints: Map<String, Value>,
}

const DEFAULT_HINTS: &[(&str, &str)] = &[
    ("name", "Je n'ai pas bien compris ton nom, merci de le préciser ici."),
    ("site", "Je n'ai pas bien compris ton site, merci de le sélectionner ou le préciser."),
    ("department", "Je n'ai pas bien compris ton service, merci de le préciser."),
    ("role", "Je n'ai pas bien compris ta fonction, merci de la préciser."),
];

const TRANSCRIBE_PROMPT: &str = "Tu es un assistant de transcription/traduction. \
1) Transcris EXACTEMENT le contenu de l'audio dans sa langue d'origine. \
2) Détecte la langue (code ISO ou nom). \
3) Fournis une traduction fidèle en français. \
4) Génère un titre court et accrocheur (max 10 mots) qui résume l'idée principale, dans la langue d'origine. \
5) Génère ce même titre traduit en français. \
Réponds STRICTEMENT en JSON:\n\
{\"language\": \"<code ou nom>\", \"original_text\": \"<transcription>\", \
\"french_translation\": \"<traduction française>\", \"suggested_title\": \"<titre dans la langue d'origine>\", \
\"suggested_title_fr\": \"<titre en français>\"}";

const PROFILE_PROMPT: &str = "Tu es un assistant pour une plateforme interne appelée IDEA. \
À partir du texte ci-dessous, tu dois : \
1) Extraire les informations (sinon null) : name, site, department, role. \
2) Construire \"missing\" = liste des champs null. \
3) Construire \"hints\" = message d'aide en français pour chaque champ manquant. \
Réponds STRICTEMENT : \
{\"profile\": {\"name\": \"... ou null\", \"site\": \"... ou null\", \"department\": \"... ou null\", \"role\": \"... ou null\"}, \
\"missing\": [\"name\", \"site\"], \"hints\": {\"name\": \"message si manquant\"}}";

/// Lenient JSON extraction from a model reply: strip code fences, slice the
/// outermost object, fall back to an empty object.
pub fn force_json(text: &str) -> Value {
    let cleaned = text
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");
    let cleaned = cleaned.trim();

    let sliced = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => cleaned,
    };

    serde_json::from_str(sliced).unwrap_or_else(|_| json!({}))
}
