//! Algorithm dispatch.
//!
//! Maps a [`SigType`] or [`EncType`] to the primitive that implements it and
//! to the purpose label used for key derivation. This is the surface the
//! message framing layer calls.
//!
//! ## Purpose labels
//!
//! | Algorithm | Wire number | Purpose |
//! |-----------|-------------|---------|
//! | `HMAC_SHA256` | 1 | `SIG:1` |
//! | `ECDSA_P256_SHA256` | 2 | `SIG:2` |
//! | `RSA2048_SHA256` | 3 | `SIG:3` |
//! | `NONE` | 1 | `ENC:1` |
//! | `AES_256_CBC` | 2 | `ENC:2` |
//!
//! The labels are part of the wire contract. Symmetric keys handed to
//! [`sign`], [`verify`], [`encrypt`] and [`decrypt`] are treated as master
//! keys: the operation first derives a per-purpose key with
//! [`derive_aes256_key_for`], so one master key is never used directly by two
//! algorithms.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::cipher::{aes256_cbc_decrypt, aes256_cbc_encrypt, IV_SIZE};
use crate::error::CryptoError;
use crate::kdf::derive_aes256_key_for;
use crate::keys::{KeyAlgorithm, KeyRef, SecretKey};
use crate::random::generate_cbc_iv;
use crate::signature;

/// Signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigType {
    /// HMAC over SHA-256 with a purpose-derived key.
    HmacSha256,
    /// ECDSA on P-256 over a SHA-256 digest.
    EcdsaP256Sha256,
    /// RSA-2048 PKCS#1 v1.5 over a SHA-256 digest.
    Rsa2048Sha256,
}

impl SigType {
    /// Every signature algorithm, in wire-number order.
    pub const ALL: [SigType; 3] = [Self::HmacSha256, Self::EcdsaP256Sha256, Self::Rsa2048Sha256];

    /// Returns the protocol wire number.
    pub const fn number(self) -> i32 {
        match self {
            Self::HmacSha256 => 1,
            Self::EcdsaP256Sha256 => 2,
            Self::Rsa2048Sha256 => 3,
        }
    }

    /// Looks up an algorithm by wire number.
    pub fn from_number(number: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.number() == number)
    }

    /// Returns the key-derivation purpose label.
    pub const fn purpose(self) -> &'static str {
        match self {
            Self::HmacSha256 => "SIG:1",
            Self::EcdsaP256Sha256 => "SIG:2",
            Self::Rsa2048Sha256 => "SIG:3",
        }
    }

    /// Returns the key algorithm this signature type requires.
    pub const fn key_algorithm(self) -> KeyAlgorithm {
        match self {
            Self::HmacSha256 => KeyAlgorithm::Aes256,
            Self::EcdsaP256Sha256 => KeyAlgorithm::Ecdsa,
            Self::Rsa2048Sha256 => KeyAlgorithm::Rsa,
        }
    }

    /// Whether signing and verification use different keys.
    pub const fn is_public_key_scheme(self) -> bool {
        !matches!(self, Self::HmacSha256)
    }
}

impl fmt::Display for SigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HmacSha256 => write!(f, "hmac-sha256"),
            Self::EcdsaP256Sha256 => write!(f, "ecdsa-p256-sha256"),
            Self::Rsa2048Sha256 => write!(f, "rsa2048-sha256"),
        }
    }
}

impl FromStr for SigType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| CryptoError::InvalidInput(format!("unknown signature type: {s}")))
    }
}

/// Encryption algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncType {
    /// No encryption; the message is signed only.
    None,
    /// AES-256 in CBC mode with PKCS#7 padding and a purpose-derived key.
    Aes256Cbc,
}

impl EncType {
    /// Every encryption algorithm, in wire-number order.
    pub const ALL: [EncType; 2] = [Self::None, Self::Aes256Cbc];

    /// Returns the protocol wire number.
    pub const fn number(self) -> i32 {
        match self {
            Self::None => 1,
            Self::Aes256Cbc => 2,
        }
    }

    /// Looks up an algorithm by wire number.
    pub fn from_number(number: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.number() == number)
    }

    /// Returns the key-derivation purpose label.
    pub const fn purpose(self) -> &'static str {
        match self {
            Self::None => "ENC:1",
            Self::Aes256Cbc => "ENC:2",
        }
    }
}

impl fmt::Display for EncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Aes256Cbc => write!(f, "aes-256-cbc"),
        }
    }
}

impl FromStr for EncType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| CryptoError::InvalidInput(format!("unknown encryption type: {s}")))
    }
}

/// Signs `data` with the algorithm selected by `sig_type`.
///
/// HMAC takes a [`SecretKey`]; ECDSA and RSA take a private key tagged with
/// the matching [`KeyAlgorithm`].
///
/// # Errors
///
/// Fails with [`CryptoError::KeyAlgorithmMismatch`] when the key does not fit
/// `sig_type`, and with [`CryptoError::InvalidKey`] when given a public key.
pub fn sign<'a>(
    sig_type: SigType,
    key: impl Into<KeyRef<'a>>,
    data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    match (sig_type, key.into()) {
        (SigType::HmacSha256, KeyRef::Secret(key)) => {
            let derived = derive_aes256_key_for(key, sig_type.purpose())?;
            Ok(signature::hmac_sha256_sign(&derived, data)?.to_vec())
        },
        (SigType::EcdsaP256Sha256, KeyRef::Private(key)) => {
            signature::ecdsa_p256_sha256_sign(key, data)
        },
        (SigType::Rsa2048Sha256, KeyRef::Private(key)) => signature::rsa2048_sha256_sign(key, data),
        (_, KeyRef::Public(_)) => Err(CryptoError::InvalidKey(
            "cannot sign with a public key".to_string(),
        )),
        (_, key) => Err(CryptoError::KeyAlgorithmMismatch {
            expected: sig_type.key_algorithm(),
            actual: key.algorithm(),
        }),
    }
}

/// Verifies `signature` over `data` with the algorithm selected by `sig_type`.
///
/// Returns `false` on any failure, including a key that does not fit
/// `sig_type`.
pub fn verify<'a>(
    sig_type: SigType,
    key: impl Into<KeyRef<'a>>,
    signature: &[u8],
    data: &[u8],
) -> bool {
    match verify_signature(sig_type, key.into(), signature, data) {
        Ok(()) => true,
        Err(e) => {
            debug!(%sig_type, error = %e, "signature rejected");
            false
        },
    }
}

fn verify_signature(
    sig_type: SigType,
    key: KeyRef<'_>,
    sig: &[u8],
    data: &[u8],
) -> Result<(), CryptoError> {
    match (sig_type, key) {
        (SigType::HmacSha256, KeyRef::Secret(key)) => {
            let derived = derive_aes256_key_for(key, sig_type.purpose())?;
            signature::hmac_sha256_verify(&derived, sig, data)
        },
        (SigType::EcdsaP256Sha256, KeyRef::Public(key)) => {
            signature::ecdsa_p256_sha256_verify(key, sig, data)
        },
        (SigType::Rsa2048Sha256, KeyRef::Public(key)) => {
            signature::rsa2048_sha256_verify(key, sig, data)
        },
        (_, KeyRef::Private(_)) => Err(CryptoError::InvalidKey(
            "cannot verify with a private key".to_string(),
        )),
        (_, key) => Err(CryptoError::KeyAlgorithmMismatch {
            expected: sig_type.key_algorithm(),
            actual: key.algorithm(),
        }),
    }
}

/// Encrypts `plaintext` under a key derived from `key` for `enc_type`.
///
/// # Errors
///
/// [`EncType::None`] is rejected with [`CryptoError::UnsupportedEncType`];
/// unencrypted messages never pass through here.
pub fn encrypt(
    key: &SecretKey,
    enc_type: EncType,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    match enc_type {
        EncType::Aes256Cbc => {
            let derived = derive_aes256_key_for(key, enc_type.purpose())?;
            aes256_cbc_encrypt(&derived, iv, plaintext)
        },
        EncType::None => Err(CryptoError::UnsupportedEncType(enc_type)),
    }
}

/// Decrypts `ciphertext` produced by [`encrypt`] with the same key, type and IV.
///
/// # Errors
///
/// Fails on [`EncType::None`], on a wrong-size IV or ciphertext, and on bad
/// padding.
pub fn decrypt(
    key: &SecretKey,
    enc_type: EncType,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    match enc_type {
        EncType::Aes256Cbc => {
            let derived = derive_aes256_key_for(key, enc_type.purpose())?;
            aes256_cbc_decrypt(&derived, iv, ciphertext).inspect_err(|e| {
                warn!(%enc_type, len = ciphertext.len(), error = %e, "decryption failed");
            })
        },
        EncType::None => Err(CryptoError::UnsupportedEncType(enc_type)),
    }
}

/// Generates a fresh IV for `enc_type`, or `None` when the type uses no IV.
pub fn generate_iv(enc_type: EncType) -> Option<[u8; IV_SIZE]> {
    match enc_type {
        EncType::Aes256Cbc => Some(generate_cbc_iv()),
        EncType::None => None,
    }
}
