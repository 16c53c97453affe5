//! Canvas webhook endpoint handlers.
//!
//! The sheet handler is the only one with logic:
//! 1. Normalize the body into an envelope
//! 2. Decrypt the user token (advisory unless strict mode is on)
//! 3. Serve sheet.html regardless of the decryption outcome

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::canvas::{final_canvas, initial_canvas, Canvas};
use crate::envelope::{extract, RawBody};
use crate::token::{DecryptOutcome, Decryptor};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub decryptor: Decryptor,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let decryptor = Decryptor::new(config.client_secret.clone());
        Self {
            config: Arc::new(config),
            decryptor,
        }
    }
}

// =============================================================================
// Health Check & Index
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub initialize: &'static str,
    pub sheet: &'static str,
    pub submit_sheet: &'static str,
}

/// Root endpoint listing the webhook routes.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Intercom AfterShoot Review App",
        endpoints: Endpoints {
            initialize: "/initialize",
            sheet: "/sheet",
            submit_sheet: "/submit-sheet",
        },
    })
}

// =============================================================================
// Canvas Flow
// =============================================================================

/// Initialize flow - sends the initial canvas.
pub async fn initialize(State(state): State<AppState>) -> Json<Canvas> {
    info!("initialize_request_received");
    Json(initial_canvas(&state.config.sheet_url()))
}

/// Sheet endpoint.
///
/// Extraction errors fail the request with a 500. Decryption failures are
/// logged and ignored unless `require_verified_user` is set, in which case a
/// malformed or unauthenticated token gets a 401.
pub async fn sheet(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    info!(
        content_type = content_type.unwrap_or(""),
        body_length = body.len(),
        "sheet_request_received"
    );

    let envelope = match RawBody::from_bytes(content_type, &body).and_then(extract) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "sheet_extraction_failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading sheet: {}", e),
            )
                .into_response();
        }
    };

    info!(
        has_user_token = envelope.user_token.is_some(),
        "sheet_envelope_extracted"
    );

    let outcome = state.decryptor.decrypt(envelope.user_token.as_deref());
    log_decrypt_outcome(&outcome);

    if outcome.rejects(state.config.require_verified_user) {
        warn!("sheet_rejected_unverified_user");
        return (StatusCode::UNAUTHORIZED, "Unverified user").into_response();
    }

    let path = Path::new(&state.config.static_dir).join("sheet.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => {
            info!(verified = outcome.is_verified(), "sheet_served");
            Html(html).into_response()
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "sheet_file_read_failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading sheet: {}", e),
            )
                .into_response()
        }
    }
}

fn log_decrypt_outcome(outcome: &DecryptOutcome) {
    match outcome {
        DecryptOutcome::Skipped(reason) => {
            info!(reason = ?reason, "user_decrypt_skipped");
        }
        DecryptOutcome::Verified(user) => {
            info!(
                user_id = user.id().unwrap_or(""),
                field_count = user.fields().len(),
                "user_decrypt_verified"
            );
        }
        DecryptOutcome::Failed(e) => {
            warn!(kind = e.kind(), error = %e, "user_decrypt_failed");
        }
    }
}

/// Submit sheet endpoint - called when the user closes the sheet.
pub async fn submit_sheet(body: Bytes) -> Json<Canvas> {
    info!(body_length = body.len(), "sheet_submitted");
    Json(final_canvas())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllowedOrigins;
    use crate::token::decrypt::test_support::seal;
    use crate::web::router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";
    const FORM: &str = "application/x-www-form-urlencoded";

    fn test_config() -> Config {
        Config {
            client_secret: Some(SECRET.to_string()),
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
            ..Config::default()
        }
    }

    fn form_body(event: &Value) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("intercom_data", &event.to_string())
            .finish()
    }

    async fn send(config: Config, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let app = router(AppState::new(config)).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post(uri: &str, content_type: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(test_config(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, _, body) = send(test_config(), request).await;

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["endpoints"]["submitSheet"], "/submit-sheet");
    }

    #[tokio::test]
    async fn test_initialize_uses_configured_sheet_url() {
        let config = Config {
            sheet_base_url: "https://sheets.example.com".to_string(),
            ..test_config()
        };
        let request = post("/initialize", "application/json", "{}".to_string());
        let (status, _, body) = send(config, request).await;

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            value["canvas"]["content"]["components"][2]["action"]["url"],
            "https://sheets.example.com/sheet"
        );
    }

    #[tokio::test]
    async fn test_sheet_with_verified_user() {
        let token = seal(&json!({"id": "u1", "email": "a@b.com"}), SECRET);
        let request = post("/sheet", FORM, form_body(&json!({"user": token})));
        let (status, headers, body) = send(test_config(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(body.contains("AfterShoot Review"));
    }

    #[tokio::test]
    async fn test_sheet_served_when_verification_fails() {
        let token = seal(&json!({"id": "u1"}), "some-other-secret");
        let body = json!({"intercom_data": {"user": token}}).to_string();
        let (status, _, _) = send(test_config(), post("/sheet", "application/json", body)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sheet_served_without_secret() {
        let config = Config {
            client_secret: None,
            require_verified_user: true,
            ..test_config()
        };
        let body = json!({"intercom_data": {"user": "garbage"}}).to_string();
        let (status, _, _) = send(config, post("/sheet", "application/json", body)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sheet_strict_mode_rejects_bad_token() {
        let config = Config {
            require_verified_user: true,
            ..test_config()
        };
        let token = seal(&json!({"id": "u1"}), "some-other-secret");
        let request = post("/sheet", FORM, form_body(&json!({"user": token})));
        let (status, _, _) = send(config, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sheet_strict_mode_allows_verified_user() {
        let config = Config {
            require_verified_user: true,
            ..test_config()
        };
        let token = seal(&json!({"id": "u1"}), SECRET);
        let body = json!({"intercom_data": json!({"user": token}).to_string()}).to_string();
        let (status, _, _) = send(config, post("/sheet", "application/json", body)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sheet_invalid_intercom_data() {
        let request = post("/sheet", FORM, "intercom_data=%7Bbroken".to_string());
        let (status, _, body) = send(test_config(), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Error loading sheet:"));
    }

    #[tokio::test]
    async fn test_sheet_missing_file() {
        let config = Config {
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/does-not-exist").to_string(),
            ..test_config()
        };
        let (status, _, _) = send(config, post("/sheet", FORM, String::new())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_submit_sheet_returns_final_canvas() {
        let request = post("/submit-sheet", "application/json", "{}".to_string());
        let (status, _, body) = send(test_config(), request).await;

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["canvas"]["content"]["components"][0]["id"], "closing");
    }

    #[tokio::test]
    async fn test_static_files_and_csp_header() {
        let request = Request::get("/sheet.html").body(Body::empty()).unwrap();
        let (status, headers, _) = send(test_config(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_SECURITY_POLICY],
            "frame-src 'self' https://intercom-sheets.com"
        );
    }

    #[tokio::test]
    async fn test_cors_any_origin() {
        let request = Request::get("/health")
            .header(header::ORIGIN, "https://app.intercom.com")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(test_config(), request).await;

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_origin_list() {
        let config = Config {
            allowed_origins: AllowedOrigins::List(vec!["https://app.intercom.com".to_string()]),
            ..test_config()
        };
        let request = Request::get("/health")
            .header(header::ORIGIN, "https://app.intercom.com")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(config, request).await;

        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.intercom.com"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }
}
