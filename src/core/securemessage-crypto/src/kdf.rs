//! Key derivation functions.
//!
//! Provides HKDF-SHA256 (RFC 5869) and the purpose-separated deriver that
//! turns one master key into independent per-algorithm AES-256 keys.

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use crate::digest::SHA256_SIZE;
use crate::error::CryptoError;
use crate::keys::SecretKey;

/// Length of every HKDF output produced by this crate.
pub const HKDF_OUTPUT_SIZE: usize = SHA256_SIZE;

/// Domain-separation salt: `SHA-256("SecureMessage")`.
///
/// This is a protocol constant. Every interoperating implementation must use
/// the same 32 bytes.
pub const SALT: [u8; SHA256_SIZE] = [
    0xbf, 0x9d, 0x2a, 0x53, 0xc6, 0x36, 0x16, 0xd7, 0x5d, 0xb0, 0xa7, 0x16, 0x5b, 0x91, 0xc1, 0xef,
    0x73, 0xe5, 0x37, 0xf2, 0x42, 0x74, 0x05, 0xfa, 0x23, 0x61, 0x0a, 0x4b, 0xe6, 0x57, 0x64, 0x2e,
];

/// Performs the HKDF-SHA256 extract step.
///
/// Returns the 32-byte pseudorandom key `HMAC-SHA256(salt, ikm)`. An empty
/// salt is allowed.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `ikm` is empty.
pub fn hkdf_sha256_extract(
    ikm: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<[u8; HKDF_OUTPUT_SIZE]>, CryptoError> {
    ensure_key_material(ikm)?;

    let (prk, _) = Hkdf::<Sha256>::extract(Some(salt), ikm);

    let mut out = Zeroizing::new([0u8; HKDF_OUTPUT_SIZE]);
    out.copy_from_slice(&prk);
    Ok(out)
}

/// Derives 32 bytes with full HKDF-SHA256 (extract then expand).
///
/// Only a single expansion block is ever produced, so the output equals the
/// first 32 bytes of the RFC 5869 OKM for the same inputs.
///
/// # Arguments
///
/// * `ikm` - Input key material (the secret to derive from)
/// * `salt` - Salt value, may be empty
/// * `info` - Context and application-specific information, may be empty
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if `ikm` is empty.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<Zeroizing<[u8; HKDF_OUTPUT_SIZE]>, CryptoError> {
    ensure_key_material(ikm)?;

    let hkdf = Hkdf::<Sha256>::new(Some(salt), ikm);

    let mut okm = Zeroizing::new([0u8; HKDF_OUTPUT_SIZE]);
    hkdf.expand(info, &mut *okm)
        .map_err(|_| CryptoError::KeyGenerationFailed("HKDF expansion failed".to_string()))?;

    Ok(okm)
}

/// Derives an AES-256 key bound to `purpose` from `master_key`.
///
/// `derived = HKDF-SHA256(master_key, SALT, purpose)`. The result is
/// deterministic for a given `(master_key, purpose)` pair and independent
/// across purposes and across master keys.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidInput`] if the master key is empty.
pub fn derive_aes256_key_for(master_key: &SecretKey, purpose: &str) -> Result<SecretKey, CryptoError> {
    let derived = hkdf_sha256(master_key.as_bytes(), &SALT, purpose.as_bytes())?;
    SecretKey::from_bytes(&*derived)
}

fn ensure_key_material(ikm: &[u8]) -> Result<(), CryptoError> {
    if ikm.is_empty() {
        debug!("rejected empty HKDF key material");
        return Err(CryptoError::InvalidInput(
            "key material must not be empty".to_string(),
        ));
    }
    Ok(())
}
