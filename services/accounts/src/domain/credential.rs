//! One-way hashing and verification of account credentials (bcrypt).
//!
//! Hashing only happens here, on an explicit credential write. Every other
//! account write carries the stored [`CredentialHash`] through untouched, so a
//! hash is never hashed again.

use std::fmt;

use anyhow::Context as _;

use crate::error::AccountsServiceError;

/// Stored bcrypt hash. Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// bcrypt only reads this many bytes of its input.
pub const MAX_CREDENTIAL_BYTES: usize = 72;

/// Whether bcrypt sees every byte of `plaintext`.
///
/// NUL ends the input for bcrypt, so it counts as unusable too.
fn fits_bcrypt(plaintext: &str) -> bool {
    plaintext.len() <= MAX_CREDENTIAL_BYTES && !plaintext.contains('\0')
}

/// Hash a plaintext credential at the given bcrypt cost.
///
/// Empty input, input over [`MAX_CREDENTIAL_BYTES`] and input containing NUL
/// are rejected with `InvalidCredential`. CPU-bound: call from
/// `spawn_blocking` in async code.
pub fn hash_credential(plaintext: &str, cost: u32) -> Result<CredentialHash, AccountsServiceError> {
    if plaintext.is_empty() || !fits_bcrypt(plaintext) {
        return Err(AccountsServiceError::InvalidCredential);
    }
    let hash = bcrypt::hash(plaintext, cost).context("hash credential")?;
    Ok(CredentialHash(hash))
}

/// Check a candidate against the stored hash.
///
/// `false` when nothing is stored, the stored hash is malformed, or the
/// candidate could never have been hashed (see [`hash_credential`]); bcrypt
/// would otherwise compare only its first 72 bytes.
pub fn verify_credential(candidate: &str, stored: Option<&CredentialHash>) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    if !fits_bcrypt(candidate) {
        return false;
    }
    bcrypt::verify(candidate, stored.as_str()).unwrap_or(false)
}
