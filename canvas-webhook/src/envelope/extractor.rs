//! Normalizes the shapes Intercom (and its proxies) send the sheet payload in.
//!
//! ```text
//! Form("intercom_data=<json>")          ─┐
//! Json({"intercom_data": "<json>"})     ─┼─→ ExtractedEnvelope { user_token, event_data }
//! Json({"intercom_data": {...}})        ─┤
//! Json(<anything else>)                 ─┘   (body is the event itself)
//! ```

use serde_json::{Map, Value};
use tracing::warn;

use super::types::{ExtractedEnvelope, ExtractionError, RawBody, INTERCOM_DATA_FIELD, USER_FIELD};

/// Extract the user token and event payload from a raw sheet request body.
///
/// A missing token is not an error. Only JSON that cannot be decoded where
/// the platform contract says JSON lives produces an [`ExtractionError`].
pub fn extract(body: RawBody) -> Result<ExtractedEnvelope, ExtractionError> {
    let event_data = match body {
        RawBody::Form(text) => extract_from_form(&text)?,
        RawBody::Json(value) => extract_from_json(value)?,
    };

    let user_token = event_data
        .get(USER_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ExtractedEnvelope {
        user_token,
        event_data,
    })
}

fn extract_from_form(text: &str) -> Result<Value, ExtractionError> {
    let intercom_data = url::form_urlencoded::parse(text.as_bytes())
        .find(|(key, _)| key == INTERCOM_DATA_FIELD)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());

    match intercom_data {
        Some(raw) => serde_json::from_str(&raw).map_err(ExtractionError::InvalidIntercomData),
        None => Ok(Value::Object(Map::new())),
    }
}

fn extract_from_json(mut body: Value) -> Result<Value, ExtractionError> {
    let field = body
        .as_object_mut()
        .and_then(|obj| obj.remove(INTERCOM_DATA_FIELD));

    match field {
        Some(Value::String(raw)) if !raw.is_empty() => {
            serde_json::from_str(&raw).map_err(ExtractionError::InvalidIntercomData)
        }
        Some(Value::Object(data)) => Ok(Value::Object(data)),
        Some(other) => {
            // Kept for compatibility with older clients; may hide integration bugs.
            warn!(
                field = INTERCOM_DATA_FIELD,
                field_type = json_type_name(&other),
                "intercom_data_unusable_falling_back_to_body"
            );
            if let Some(obj) = body.as_object_mut() {
                obj.insert(INTERCOM_DATA_FIELD.to_string(), other);
            }
            Ok(body)
        }
        None => Ok(body),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
