//! Encrypted user token verification.

pub mod decrypt;
pub mod types;

pub use decrypt::{decrypt_user, derive_key, split_envelope, Decryptor, EnvelopeParts};
pub use types::{
    DecryptError, DecryptOutcome, DecryptedUser, SkipReason, IV_LEN, MIN_TOKEN_LEN, TAG_LEN,
};
