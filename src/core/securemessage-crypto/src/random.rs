//! Cryptographically secure random generation.
//!
//! Uses the operating system's CSPRNG for all random number generation.
//! `OsRng` is process-wide, needs no initialization from callers and is safe
//! to use from any number of threads without external locking.

use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cipher::{IV_SIZE, KEY_SIZE};
use crate::error::CryptoError;

/// Generates `length` cryptographically secure random bytes.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `length` is zero.
pub fn secure_random(length: usize) -> Result<Vec<u8>, CryptoError> {
    if length == 0 {
        debug!("rejected zero-length random request");
        return Err(CryptoError::InvalidInput(
            "random length must be > 0".to_string(),
        ));
    }

    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    Ok(bytes)
}

/// Generates a cryptographically secure random 256-bit key.
///
/// The key is wrapped in `Zeroizing` to ensure it is cleared from memory when dropped.
pub fn generate_key_bytes() -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut *key);
    key
}

/// Generates a fresh random IV for AES-CBC.
pub fn generate_cbc_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}
