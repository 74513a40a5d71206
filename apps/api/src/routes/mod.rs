pub mod health;
pub mod use_cases;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::document::{handlers as document, preview::DIAGRAM_ROUTE};
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let diagrams = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/use-cases", get(use_cases::list_use_cases_handler))
        // Session lifecycle and intake
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/intake",
            put(session::handle_update_intake),
        )
        .route(
            "/api/v1/sessions/:id/timeline",
            put(session::handle_update_timeline),
        )
        .route(
            "/api/v1/sessions/:id/document",
            put(session::handle_update_document),
        )
        .route(
            "/api/v1/sessions/:id/branding",
            put(session::handle_update_branding),
        )
        .route("/api/v1/sessions/:id/logo", post(session::handle_upload_logo))
        // Generation
        .route(
            "/api/v1/sessions/:id/generate",
            post(generation::handle_generate),
        )
        // Preview and export
        .route("/api/v1/sessions/:id/preview", get(document::handle_preview))
        .route("/api/v1/sessions/:id/export", get(document::handle_export))
        .nest_service(DIAGRAM_ROUTE, diagrams)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;

    fn test_app(assets_dir: &std::path::Path) -> Router {
        let config = Config {
            gemini_api_key: None,
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            gemini_model: "test-model".to_string(),
            assets_dir: assets_dir.to_path_buf(),
            session_idle_ttl: std::time::Duration::from_secs(3600),
            port: 0,
            rust_log: "info".to_string(),
        };
        build_router(AppState::new(config))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let response = send(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["service"], "sow-architect");
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_use_case_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Beauty Advisor POC SOW.png"), b"png").unwrap();
        let app = test_app(dir.path());
        let body = json_body(send(&app, "GET", "/api/v1/use-cases", None).await).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 9);
        let beauty = entries
            .iter()
            .find(|e| e["name"] == "Beauty Advisor POC SOW")
            .unwrap();
        assert_eq!(beauty["has_diagram"], true);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let id = create_session(&app).await;

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/intake"),
            Some(json!({"use_case": "Gen AI for SOP POC SOW", "industry": "Energy / Utilities"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["intake"]["industry"], "Energy / Utilities");
        assert_eq!(body["intake"]["performance"], "Near real-time");

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/timeline"),
            Some(json!({"duration": "two_weeks", "rows": [{"phase": "A", "task": "Setup", "weeks": [true, true, true]}]})),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["timeline"]["rows"][0]["weeks"], json!([true, true]));

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/timeline"),
            Some(json!({"markdown": "| Phase | Task | Wk1 | Wk2 | Wk3 |\n|---|---|---|---|---|\n| Build | API | ✔ | | ✔ |"})),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["timeline"]["duration"], json!({"custom": 3}));
        assert_eq!(body["timeline"]["rows"][0]["weeks"], json!([true, false, true]));

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/timeline"),
            Some(json!({"markdown": "no table"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/branding"),
            Some(json!({"document_date": "2026-01-05"})),
        )
        .await;
        assert_eq!(json_body(response).await["document_date"], "2026-01-05");

        let response = send(&app, "POST", &format!("/api/v1/sessions/{id}/reset"), None).await;
        let body = json_body(response).await;
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["intake"]["industry"], "Retail / E-commerce");

        let response = send(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let response = send(
            &app,
            "GET",
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_intake_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let id = create_session(&app).await;
        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/intake"),
            Some(json!({"use_case": ""})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_without_any_key_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let id = create_session(&app).await;
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/generate"),
            Some(json!({})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preview_and_export_of_edited_document() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let id = create_session(&app).await;

        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/document"),
            Some(json!({"text": "# 1 TABLE OF CONTENTS\n# 2 PROJECT OVERVIEW\nSee the Estimate"})),
        )
        .await;

        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}/preview"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("<h1>2 PROJECT OVERVIEW</h1>"));
        assert!(html.contains("target=\"_blank\">Estimate</a>"));

        let response = send(&app, "GET", &format!("/api/v1/sessions/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"SOW_L1_Support_Bot_POC_SOW.docx\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    async fn upload_logo(app: &Router, id: &str, content: &[u8]) -> Response {
        let boundary = "logo-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/logo"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_logo_upload_accepts_images_only() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let id = create_session(&app).await;

        let response = upload_logo(&app, &id, b"definitely not an image").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let path = dir.path().join("logo.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();
        let png = std::fs::read(&path).unwrap();
        let response = upload_logo(&app, &id, &png).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["has_customer_logo"], true);

        let response = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/branding"),
            Some(json!({"clear_logo": true})),
        )
        .await;
        assert_eq!(json_body(response).await["has_customer_logo"], false);
    }

    #[tokio::test]
    async fn test_export_filename_is_header_safe_for_free_text_use_cases() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        for (use_case, expected) in [
            ("Line\nBreak SOW", "SOW_Line_Break_SOW.docx"),
            ("Acme \"Pilot\" SOW", "SOW_Acme__Pilot__SOW.docx"),
        ] {
            let id = create_session(&app).await;
            send(
                &app,
                "PUT",
                &format!("/api/v1/sessions/{id}/intake"),
                Some(json!({"use_case": use_case})),
            )
            .await;
            send(
                &app,
                "PUT",
                &format!("/api/v1/sessions/{id}/document"),
                Some(json!({"text": "# 2 PROJECT OVERVIEW\nBody"})),
            )
            .await;

            let response = send(&app, "GET", &format!("/api/v1/sessions/{id}/export"), None).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::CONTENT_DISPOSITION],
                format!("attachment; filename=\"{expected}\"").as_str()
            );
        }
    }

    #[tokio::test]
    async fn test_diagrams_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Gen AI Speech To Speech.png"), b"not really a png").unwrap();
        let app = test_app(dir.path());
        let response = send(&app, "GET", "/diagrams/Gen%20AI%20Speech%20To%20Speech.png", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
