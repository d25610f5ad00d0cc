//! HTTP route handlers

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::SharedState;
use crate::error::IntakeError;
use crate::intake::SubmitPayload;
use crate::translate::FormKind;

/// Front page
pub async fn index() -> impl IntoResponse {
    Html(include_str!("../../static/index.html"))
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "ok": true, "model": state.textgen.model() }))
}

/// Parse a JSON body by hand so malformed JSON yields the structured
/// `{ok: false, error}` shape instead of axum's plain-text rejection.
fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, IntakeError> {
    serde_json::from_slice(body).map_err(|_| IntakeError::BadRequest("JSON invalide.".to_string()))
}

/// POST /api/submit
pub async fn api_submit(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    let payload: SubmitPayload = parse_json_body(&body)?;
    let ack = state.orchestrator.submit(payload).await?;

    Ok(Json(json!({
        "ok": true,
        "id": ack.id,
        "created_at": ack.created_at,
        "idea_code": ack.idea_code,
    })))
}

/// POST /api/upload_media - stage one or more binary file parts
pub async fn api_upload_media(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, IntakeError> {
    let mut paths = Vec::new();
    let mut parts_seen = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IntakeError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("media") {
            continue;
        }
        parts_seen += 1;

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| IntakeError::BadRequest(e.to_string()))?;
        paths.push(state.staging.stage(&file_name, &bytes)?);
    }

    if parts_seen == 0 {
        return Err(IntakeError::BadRequest("Aucun média reçu.".to_string()));
    }
    if paths.is_empty() {
        return Err(IntakeError::BadRequest("Aucun fichier valide.".to_string()));
    }

    Ok(Json(json!({ "ok": true, "paths": paths })))
}

/// Audio MIME types accepted by the transcription endpoint
const ALLOWED_AUDIO_MIMES: &[&str] = &[
    "audio/webm",
    "audio/ogg",
    "audio/mpeg",
    "audio/mp4",
    "audio/wav",
    "audio/x-wav",
    "audio/3gpp",
    "audio/3gpp2",
];

fn allowed_audio_mime(mime: &str) -> bool {
    let base = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
    ALLOWED_AUDIO_MIMES.contains(&base.as_str())
}

/// POST /api/transcribe - stage one audio part and forward it to the
/// transcription/translation service.
///
/// The audio is staged before the service call so a failed call can return
/// `audio_path` and let the client retry without re-uploading.
pub async fn api_transcribe(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let bad_request = |msg: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "error": msg })),
        )
    };

    let mut audio: Option<(String, String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "record.webm".to_string());
        let mime = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await.map_err(|e| bad_request(e.to_string()))?;
        audio = Some((file_name, mime, bytes));
        break;
    }

    let Some((file_name, mime_raw, bytes)) = audio else {
        return Err(bad_request("Aucun fichier audio reçu (clé 'audio').".to_string()));
    };

    if !allowed_audio_mime(&mime_raw) {
        return Err(bad_request(format!("Type audio non supporté: {}", mime_raw)));
    }
    let mime = mime_raw
        .split(';')
        .next()
        .unwrap_or(&mime_raw)
        .to_string();

    let audio_path = state
        .staging
        .stage(&file_name, &bytes)
        .map_err(|e| bad_request(e.to_string()))?;

    match state.textgen.transcribe(&mime, &bytes).await {
        Ok(transcription) => Ok(Json(json!({
            "ok": true,
            "audio_path": audio_path,
            "language": transcription.language,
            "original_text": transcription.original_text,
            "french_translation": transcription.french_translation,
            "suggested_title": transcription.suggested_title,
            "suggested_title_fr": transcription.suggested_title_fr,
        }))),
        Err(e) => {
            warn!(error = %e, "Transcription failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "ok": false,
                    "error": format!("Transcription/Traduction échouée: {}", e),
                    "audio_path": audio_path,
                })),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct LangQuery {
    #[serde(default)]
    language: String,
}

/// POST /api/voice_lang
pub async fn api_voice_lang(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    let query: LangQuery = parse_json_body(&body)?;
    let mut reply = json!({ "ok": true });
    let bundle = state.bundles.voice_bundle(&query.language).await?;
    merge_into(&mut reply, bundle);
    Ok(Json(reply))
}

/// POST /api/profile_lang
pub async fn api_profile_lang(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    form_lang(state, body, FormKind::Profile).await
}

/// POST /api/contact_lang
pub async fn api_contact_lang(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    form_lang(state, body, FormKind::Contact).await
}

/// POST /api/idea_lang
pub async fn api_idea_lang(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    form_lang(state, body, FormKind::Idea).await
}

async fn form_lang(
    state: SharedState,
    body: Bytes,
    kind: FormKind,
) -> Result<Json<Value>, IntakeError> {
    let query: LangQuery = parse_json_body(&body)?;
    let ui = state.bundles.form_bundle(kind, &query.language).await?;
    Ok(Json(json!({ "ok": true, "ui": ui })))
}

#[derive(Deserialize)]
struct AnalyzeQuery {
    #[serde(default)]
    text: String,
}

/// POST /api/analyze_profile
pub async fn api_analyze_profile(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, IntakeError> {
    let query: AnalyzeQuery = parse_json_body(&body)?;
    let text = query.text.trim();
    if text.is_empty() {
        return Err(IntakeError::BadRequest("Texte vide.".to_string()));
    }

    let extraction = state.textgen.analyze_profile(text).await?;
    Ok(Json(json!({
        "ok": true,
        "profile": extraction.profile,
        "missing": extraction.missing,
        "hints": extraction.hints,
    })))
}

fn merge_into(target: &mut Value, source: Value) {
    if let (Some(target_map), Value::Object(source_map)) = (target.as_object_mut(), source) {
        for (k, v) in source_map {
            target_map.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_mime_allowlist() {
        assert!(allowed_audio_mime("audio/webm"));
        assert!(allowed_audio_mime("audio/webm;codecs=opus"));
        assert!(allowed_audio_mime("AUDIO/WAV"));
        assert!(!allowed_audio_mime("video/mp4"));
        assert!(!allowed_audio_mime("application/octet-stream"));
    }

    #[test]
    fn malformed_json_is_a_client_error() {
        let err = parse_json_body::<LangQuery>(&Bytes::from_static(b"{nope")).unwrap_err();
        assert!(matches!(err, IntakeError::BadRequest(_)));
    }
}
