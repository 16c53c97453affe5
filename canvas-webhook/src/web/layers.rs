//! Response layers shared by every route: CORS and the sheet framing policy.

use anyhow::{Context, Result};
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use crate::config::AllowedOrigins;

/// Build the CORS layer for the configured origins.
///
/// Credentials are only allowed for an explicit origin list; browsers refuse
/// credentialed responses carrying a wildcard origin.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ]);

    match origins {
        AllowedOrigins::Any => cors.allow_origin(Any),
        AllowedOrigins::List(list) => {
            let parsed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "cors_origin_invalid_skipped");
                        None
                    }
                })
                .collect();
            cors.allow_origin(parsed).allow_credentials(true)
        }
    }
}

/// Build the layer that lets the Intercom sheet host frame our pages.
pub fn csp_layer(frame_src: &str) -> Result<SetResponseHeaderLayer<HeaderValue>> {
    let policy = format!("frame-src 'self' {}", frame_src.trim());
    let value = HeaderValue::from_str(&policy).context("Invalid FRAME_SRC for Content-Security-Policy")?;

    Ok(SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        value,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_layer_valid() {
        assert!(csp_layer("https://intercom-sheets.com").is_ok());
    }

    #[test]
    fn test_csp_layer_trims_and_rejects_control_characters() {
        assert!(csp_layer("https://ok.example\n").is_ok());
        assert!(csp_layer("https://bad\u{7f}.example").is_err());
    }

    /// Smoke test: the layer is opaque, so only construction is checked.
    #[test]
    fn test_cors_layer_with_invalid_origin() {
        let origins = AllowedOrigins::List(vec![
            "https://ok.example.com".to_string(),
            "bad\norigin".to_string(),
        ]);
        let layer = cors_layer(&origins);
        drop(layer);
    }
}
