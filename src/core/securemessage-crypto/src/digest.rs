//! Message digests (SHA-256 and SHA-512).
//!
//! Hashing an empty message is rejected. This deviates from conventional
//! digest semantics on purpose: an empty input upstream almost always means
//! an uninitialized buffer, and callers rely on the error as a validation
//! signal.

use sha2::{Digest, Sha256, Sha512};
use tracing::debug;

use crate::error::CryptoError;

/// Output size of SHA-256 in bytes.
pub const SHA256_SIZE: usize = 32;

/// Output size of SHA-512 in bytes.
pub const SHA512_SIZE: usize = 64;

/// Computes the SHA-256 digest of a non-empty message.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `message` is empty.
pub fn sha256(message: &[u8]) -> Result<[u8; SHA256_SIZE], CryptoError> {
    ensure_non_empty(message)?;
    Ok(Sha256::digest(message).into())
}

/// Computes the SHA-512 digest of a non-empty message.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `message` is empty.
pub fn sha512(message: &[u8]) -> Result<[u8; SHA512_SIZE], CryptoError> {
    ensure_non_empty(message)?;
    let mut digest = [0u8; SHA512_SIZE];
    digest.copy_from_slice(&Sha512::digest(message));
    Ok(digest)
}

fn ensure_non_empty(message: &[u8]) -> Result<(), CryptoError> {
    if message.is_empty() {
        debug!("refusing to hash empty message");
        return Err(CryptoError::InvalidInput(
            "cannot hash an empty message".to_string(),
        ));
    }
    Ok(())
}
