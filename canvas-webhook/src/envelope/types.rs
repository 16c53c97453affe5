//! Inbound body shapes and the normalized envelope extracted from them.

use serde_json::Value;
use thiserror::Error;

/// Form/JSON field holding the Intercom event payload.
pub const INTERCOM_DATA_FIELD: &str = "intercom_data";

/// Field of the event payload holding the encrypted user token.
pub const USER_FIELD: &str = "user";

/// Errors raised while normalizing the request body.
///
/// These are the only failures of the sheet flow that reach the HTTP client.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("intercom_data is not valid JSON: {0}")]
    InvalidIntercomData(#[source] serde_json::Error),

    #[error("request body is not valid JSON: {0}")]
    InvalidJsonBody(#[source] serde_json::Error),

    #[error("request body is not valid UTF-8")]
    InvalidEncoding,
}

/// Raw sheet request body as received from the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// URL-encoded form text, e.g. `intercom_data=%7B...%7D`
    Form(String),
    /// Already-structured JSON body
    Json(Value),
}

impl RawBody {
    /// Classify request bytes by content type.
    ///
    /// JSON content types are decoded (an empty body counts as `{}`); anything
    /// else is kept as text and parsed as a form later on.
    pub fn from_bytes(content_type: Option<&str>, bytes: &[u8]) -> Result<Self, ExtractionError> {
        let is_json = content_type
            .map(|ct| {
                let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false);

        if is_json {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(RawBody::Json(Value::Object(Default::default())));
            }
            let value = serde_json::from_slice(bytes).map_err(ExtractionError::InvalidJsonBody)?;
            return Ok(RawBody::Json(value));
        }

        let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::InvalidEncoding)?;
        Ok(RawBody::Form(text.to_string()))
    }
}

/// Canonical result of envelope extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEnvelope {
    /// Encoded user token, when the event carries one as a string
    pub user_token: Option<String>,
    /// The full event payload (including the `user` field, if any)
    pub event_data: Value,
}
