//! Intercom user token decryption.
//!
//! Intercom encrypts the user object it sends to sheets with AES-256-GCM,
//! keyed by SHA-256 of the app's client secret. The token is base64 of
//! `IV (12) || ciphertext || tag (16)` with no associated data.

use std::fmt;
use std::sync::Arc;

use aes_gcm::aead::{self, AeadInPlace, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::types::{
    DecryptError, DecryptOutcome, DecryptedUser, SkipReason, IV_LEN, MIN_TOKEN_LEN, TAG_LEN,
};

/// Standard alphabet, padding optional.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Borrowed views into a decoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParts<'a> {
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8],
}

/// Derive the AES-256 key from the client secret.
pub fn derive_key(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());

    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());
    key
}

/// Split decoded token bytes into IV, ciphertext and tag.
pub fn split_envelope(bytes: &[u8]) -> Result<EnvelopeParts<'_>, DecryptError> {
    if bytes.len() < MIN_TOKEN_LEN {
        return Err(DecryptError::MalformedToken(format!(
            "decoded length {} is below the minimum of {}",
            bytes.len(),
            MIN_TOKEN_LEN
        )));
    }

    let (iv, rest) = bytes.split_at(IV_LEN);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

    Ok(EnvelopeParts {
        iv,
        ciphertext,
        tag,
    })
}

/// Decode, authenticate and decrypt a user token.
pub fn decrypt_user(token: &str, secret: &str) -> Result<DecryptedUser, DecryptError> {
    let bytes = TOKEN_ENGINE
        .decode(token.trim())
        .map_err(|e| DecryptError::MalformedToken(e.to_string()))?;

    let parts = split_envelope(&bytes)?;

    let key = derive_key(secret);
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| DecryptError::Verification)?;

    let nonce = aead::Nonce::<Aes256Gcm>::from_slice(parts.iv);
    let tag = aead::Tag::<Aes256Gcm>::from_slice(parts.tag);

    let mut plaintext = parts.ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(nonce, b"", &mut plaintext, tag)
        .map_err(|_| DecryptError::Verification)?;

    serde_json::from_slice(&plaintext).map_err(|e| DecryptError::MalformedPayload(e.to_string()))
}

/// Token decryptor bound to the configured client secret.
///
/// Without a secret every call is skipped, which disables verification
/// for the whole process without affecting anything else.
#[derive(Clone)]
pub struct Decryptor {
    secret: Option<Arc<str>>,
}

impl Decryptor {
    /// Create a decryptor. Empty or whitespace-only secrets count as absent.
    pub fn new(secret: Option<String>) -> Self {
        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .map(Arc::<str>::from);
        Self { secret }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Attempt to decrypt an optional token. Never fails the caller.
    pub fn decrypt(&self, token: Option<&str>) -> DecryptOutcome {
        let Some(secret) = self.secret.as_deref() else {
            return DecryptOutcome::Skipped(SkipReason::SecretNotConfigured);
        };
        let Some(token) = token else {
            return DecryptOutcome::Skipped(SkipReason::TokenAbsent);
        };

        debug!(token_length = token.len(), "user_token_decrypt_start");

        match decrypt_user(token, secret) {
            Ok(user) => DecryptOutcome::Verified(user),
            Err(e) => DecryptOutcome::Failed(e),
        }
    }
}

impl fmt::Debug for Decryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decryptor")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
