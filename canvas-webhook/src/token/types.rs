//! Types for the encrypted Intercom user token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Length of the AES-GCM initialization vector prefix.
pub const IV_LEN: usize = 12;

/// Length of the AES-GCM authentication tag suffix.
pub const TAG_LEN: usize = 16;

/// Smallest decodable token: IV followed directly by the tag.
pub const MIN_TOKEN_LEN: usize = IV_LEN + TAG_LEN;

/// User record recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecryptedUser(pub Map<String, Value>);

impl DecryptedUser {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Why a token could not be turned into a [`DecryptedUser`].
///
/// All variants are recoverable; the caller logs them and carries on.
#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("malformed user token: {0}")]
    MalformedToken(String),

    #[error("user token failed authentication")]
    Verification,

    #[error("decrypted user payload is not a JSON object: {0}")]
    MalformedPayload(String),
}

impl DecryptError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DecryptError::MalformedToken(_) => "malformed_token",
            DecryptError::Verification => "verification_error",
            DecryptError::MalformedPayload(_) => "malformed_payload",
        }
    }
}

/// Why decryption was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SecretNotConfigured,
    TokenAbsent,
}

/// Result of one decryption attempt. Every variant is a normal return.
#[derive(Debug)]
pub enum DecryptOutcome {
    Skipped(SkipReason),
    Verified(DecryptedUser),
    Failed(DecryptError),
}

impl DecryptOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, DecryptOutcome::Verified(_))
    }

    /// Whether the request must be refused under the given trust policy.
    ///
    /// In strict mode a token that is present but malformed or fails
    /// authentication is refused. Skipped attempts and payloads that
    /// authenticated but did not parse are always let through.
    pub fn rejects(&self, require_verified_user: bool) -> bool {
        require_verified_user
            && matches!(
                self,
                DecryptOutcome::Failed(DecryptError::MalformedToken(_))
                    | DecryptOutcome::Failed(DecryptError::Verification)
            )
    }
}
