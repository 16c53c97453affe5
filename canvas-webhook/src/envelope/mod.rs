//! Envelope extraction for inbound sheet requests.
//!
//! Intercom posts the sheet payload as a form field, a JSON string field or an
//! already-structured object depending on the client. This module reduces all
//! of them to one [`ExtractedEnvelope`].

pub mod extractor;
pub mod types;

pub use extractor::extract;
pub use types::{ExtractedEnvelope, ExtractionError, RawBody, INTERCOM_DATA_FIELD, USER_FIELD};
