//! AES-256-CBC encryption with PKCS#7 padding.
//!
//! The cipher is deterministic: the same key, IV and plaintext always give
//! the same ciphertext. Callers own IV freshness.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::SecretKey;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a CBC initialization vector in bytes.
pub const IV_SIZE: usize = 16;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Encrypts plaintext using AES-256-CBC.
///
/// The plaintext is PKCS#7 padded, so the ciphertext is always a non-empty
/// multiple of [`BLOCK_SIZE`]. An empty plaintext yields one padding block.
///
/// # Arguments
///
/// * `key` - 32-byte encryption key
/// * `iv` - 16-byte initialization vector
/// * `plaintext` - Data to encrypt
pub fn aes256_cbc_encrypt(
    key: &SecretKey,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_key_and_iv(key, iv)?;

    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypts ciphertext using AES-256-CBC.
///
/// # Returns
///
/// Decrypted plaintext wrapped in `Zeroizing` for automatic memory cleanup.
///
/// # Errors
///
/// Fails on a wrong-size key, IV or ciphertext, and on malformed padding.
pub fn aes256_cbc_decrypt(
    key: &SecretKey,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    check_key_and_iv(key, iv)?;

    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed("invalid padding".to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

fn check_key_and_iv(key: &SecretKey, iv: &[u8]) -> Result<(), CryptoError> {
    if key.as_bytes().len() != KEY_SIZE {
        return Err(CryptoError::InvalidKey(format!(
            "expected {} bytes, got {}",
            KEY_SIZE,
            key.as_bytes().len()
        )));
    }

    if iv.len() != IV_SIZE {
        return Err(CryptoError::InvalidInput(format!(
            "expected {} byte IV, got {}",
            IV_SIZE,
            iv.len()
        )));
    }

    Ok(())
}
