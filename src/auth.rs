//! API key authentication
//!
//! The gate holds the SHA-256 digest of the one configured key and the user
//! that key resolves to. Presented keys are hashed and compared digest to
//! digest; the plaintext key is never stored.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("API key required")]
    MissingCredential,

    #[error("Invalid API key")]
    InvalidCredential,
}

impl AuthError {
    /// Machine-readable code returned as `error_code`.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    key_digest: [u8; 32],
    user: User,
}

impl AuthGate {
    pub fn new(api_key: &str, user: User) -> Self {
        Self {
            key_digest: digest(api_key),
            user,
        }
    }

    /// Gate for the demo affiliate.
    pub fn demo(api_key: &str) -> Self {
        Self::new(api_key, User::demo())
    }

    /// Resolve a presented key to the configured user.
    ///
    /// A blank key counts as missing.
    pub fn authenticate(&self, presented: Option<&str>) -> Result<User, AuthError> {
        let key = presented
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        if digest(key) != self.key_digest {
            return Err(AuthError::InvalidCredential);
        }
        Ok(self.user.clone())
    }

    /// Short hex prefix of the key digest, safe to log.
    pub fn key_fingerprint(&self) -> String {
        hex::encode(&self.key_digest[..4])
    }
}

fn digest(key: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(key.as_bytes()));
    out
}
