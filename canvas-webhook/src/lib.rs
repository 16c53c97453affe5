//! AfterShoot Review - Intercom Canvas webhook backend.
//!
//! This library backs the `canvas-web` binary, which serves the messenger
//! app's canvases and the review sheet:
//! - `envelope`: normalizes sheet request bodies into a user token and event
//! - `token`: verifies and decrypts the Intercom user token
//! - `canvas`: canvas documents returned to Intercom
//! - `web`: routes, handlers and response layers
//!
//! ## Architecture
//!
//! ```text
//! POST /sheet → envelope::extract → Decryptor::decrypt → log outcome → sheet.html
//! ```

pub mod canvas;
pub mod config;
pub mod envelope;
pub mod token;
pub mod web;

// Re-export commonly used types
pub use config::{AllowedOrigins, Config};
pub use envelope::{extract, ExtractedEnvelope, ExtractionError, RawBody};
pub use token::{decrypt_user, DecryptError, DecryptOutcome, DecryptedUser, Decryptor};
pub use web::{router, AppState};
