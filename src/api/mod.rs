//! HTTP API
//!
//! Thin axum layer over the intake pipeline and the phrase-bundle provider.

pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::intake::Orchestrator;
use crate::translate::{PhraseBundles, TextGenClient};
use crate::uploads::StagingArea;

/// State shared across handlers
pub struct AppState {
    pub config: Config,
    pub orchestrator: Orchestrator,
    pub staging: Arc<StagingArea>,
    pub textgen: Arc<TextGenClient>,
    pub bundles: PhraseBundles,
}

pub type SharedState = Arc<AppState>;

/// Create the API router
pub fn create_router(state: SharedState) -> Router {
    let uploads_dir = state.staging.dir().to_path_buf();
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        // Front page
        .route("/", get(routes::index))
        // Submission intake
        .route("/api/submit", post(routes::api_submit))
        // Media and audio
        .route("/api/upload_media", post(routes::api_upload_media))
        .route("/api/transcribe", post(routes::api_transcribe))
        // UI translation lookups
        .route("/api/voice_lang", post(routes::api_voice_lang))
        .route("/api/profile_lang", post(routes::api_profile_lang))
        .route("/api/contact_lang", post(routes::api_contact_lang))
        .route("/api/idea_lang", post(routes::api_idea_lang))
        // Profile extraction
        .route("/api/analyze_profile", post(routes::api_analyze_profile))
        // Health check
        .route("/health", get(routes::health))
        // Staged uploads served back for the retry flow
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
