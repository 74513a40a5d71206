//! Axum route handlers for the Session API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::document::timeline::TimelineTable;
use crate::errors::AppError;
use crate::intake::models::IntakeRecord;
use crate::session::{SessionHandle, SessionSnapshot};
use crate::state::AppState;

/// Multipart field carrying the customer logo.
const LOGO_FIELD: &str = "logo";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentUpdate {
    pub text: String,
}

/// A timeline either as structured JSON or as a pasted pipe table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TimelineUpdate {
    Table(TimelineTable),
    Markdown { markdown: String },
}

#[derive(Debug, Deserialize)]
pub struct BrandingUpdate {
    pub document_date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_logo: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} does not exist")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.sessions.create().await;
    let session = handle.lock().await;
    info!("Created session {}", session.id);
    (StatusCode::CREATED, Json(session.snapshot()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} does not exist")));
    }
    info!("Deleted session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.reset();
    info!("Reset session {id}");
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/sessions/:id/intake
///
/// Replaces the whole intake record. Blank stakeholder rows are dropped.
pub async fn handle_update_intake(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut intake): Json<IntakeRecord>,
) -> Result<Json<SessionSnapshot>, AppError> {
    intake.validate().map_err(AppError::Validation)?;
    intake.stakeholders.prune_blank_rows();

    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.intake = intake;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/sessions/:id/timeline
///
/// Rows are resized to the duration's week count before storing.
pub async fn handle_update_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<TimelineUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut timeline = match update {
        TimelineUpdate::Table(timeline) => timeline,
        TimelineUpdate::Markdown { markdown } => TimelineTable::from_markdown(&markdown)
            .ok_or_else(|| {
                AppError::Validation(
                    "markdown must contain a `| Phase | Task | Wk1 ...` table".to_string(),
                )
            })?,
    };
    timeline.normalize();

    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.timeline = timeline;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/sessions/:id/document
///
/// Stores user edits to the generated text. No structure is enforced.
pub async fn handle_update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DocumentUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    session.generated_text = update.text;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/sessions/:id/branding
pub async fn handle_update_branding(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<BrandingUpdate>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    if let Some(date) = update.document_date {
        session.branding.document_date = date;
    }
    if update.clear_logo {
        session.branding.customer_logo = None;
    }
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/logo
///
/// Multipart upload; the `logo` field must be a decodable image.
pub async fn handle_upload_logo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;

    let mut logo: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(LOGO_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read logo upload: {e}")))?;
        logo = Some(bytes);
        break;
    }

    let logo = logo.ok_or_else(|| {
        AppError::Validation(format!("Multipart field '{LOGO_FIELD}' is required"))
    })?;
    image::load_from_memory(&logo)
        .map_err(|e| AppError::Validation(format!("Logo is not a supported image: {e}")))?;

    let mut session = handle.lock().await;
    info!("Stored {} byte customer logo for session {id}", logo.len());
    session.branding.customer_logo = Some(logo);
    Ok(Json(session.snapshot()))
}
