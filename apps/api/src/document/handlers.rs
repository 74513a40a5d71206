//! Axum route handlers for preview and export.

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};
use tracing::info;
use uuid::Uuid;

use crate::document::export::{content_type, export_file_name, render_docx, CoverPage, ExportAssets};
use crate::document::interpreter::interpret;
use crate::document::preview::render_preview;
use crate::document::RenderContext;
use crate::errors::AppError;
use crate::session::handlers::find_session;
use crate::state::AppState;

/// GET /api/v1/sessions/:id/preview
///
/// Renders the current document text as an HTML fragment. An empty
/// document yields an empty preview.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;

    let use_case = state.catalog.lookup(&session.intake.use_case);
    let ctx = RenderContext {
        use_case: &use_case,
        timeline: &session.timeline,
    };
    Ok(Html(render_preview(&interpret(&session.generated_text), &ctx)))
}

/// GET /api/v1/sessions/:id/export
///
/// Streams the `.docx` download. 409 until a document has been generated.
///
/// The session lock is released once its contents are copied out; rendering
/// runs on the blocking pool.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = find_session(&state, id).await?;
    let (text, timeline, branding, use_case) = {
        let session = handle.lock().await;
        if !session.has_document() {
            return Err(AppError::Conflict(
                "No document has been generated for this session yet".to_string(),
            ));
        }
        (
            session.generated_text.clone(),
            session.timeline.clone(),
            session.branding.clone(),
            state.catalog.lookup(&session.intake.use_case),
        )
    };

    let assets = ExportAssets::load(&state.catalog, &use_case, branding.customer_logo).await;
    let file_name = export_file_name(&use_case.name);

    let bytes = tokio::task::spawn_blocking(move || {
        let cover = CoverPage {
            title: &use_case.name,
            date: branding.document_date,
        };
        let ctx = RenderContext {
            use_case: &use_case,
            timeline: &timeline,
        };
        render_docx(&interpret(&text), &ctx, &cover, &assets)
    })
    .await
    .context("Export task panicked")??;
    info!("Exported {file_name} ({} bytes) for session {id}", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
