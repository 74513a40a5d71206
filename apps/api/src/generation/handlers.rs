//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_document, GenerationOutcome};
use crate::session::handlers::find_session;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Overrides the configured default key for this call only. Never stored.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
}

/// POST /api/v1/sessions/:id/generate
///
/// Holds the session lock for the whole call, so a session has at most one
/// generation in flight. Failures leave the previous document text in place.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;

    let outcome = generate_document(
        &state.llm,
        &state.catalog,
        &mut session,
        request.api_key.as_deref(),
    )
    .await?;

    Ok(Json(GenerateResponse {
        session_id: id,
        outcome,
    }))
}
