//! Algorithm-tagged key types with automatic memory zeroization.
//!
//! Every key carries exactly one [`KeyAlgorithm`]. Secret and private key
//! material implements `Zeroize` and `ZeroizeOnDrop` so it is erased from
//! memory when dropped, and its `Debug` output is redacted.
//!
//! Asymmetric keys hold DER encodings:
//!
//! | Algorithm | Private key | Public key |
//! |-----------|-------------|------------|
//! | EC P-256  | PKCS#8      | SubjectPublicKeyInfo |
//! | RSA       | PKCS#1      | SubjectPublicKeyInfo |

use std::fmt;

use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::random::generate_key_bytes;

/// RSA modulus size in bits for generated key pairs.
pub const RSA_KEY_BITS: usize = 2048;

/// The kind of key material a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// 256-bit symmetric key (AES, HMAC).
    Aes256,
    /// Elliptic-curve key on NIST P-256.
    Ecdsa,
    /// RSA key.
    Rsa,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes256 => write!(f, "aes-256"),
            Self::Ecdsa => write!(f, "ecdsa"),
            Self::Rsa => write!(f, "rsa"),
        }
    }
}

/// A symmetric key, always tagged [`KeyAlgorithm::Aes256`].
///
/// Imported keys may have any non-empty length: HMAC and the purpose deriver
/// accept arbitrary master keys, while raw AES-CBC demands exactly 32 bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Generates a new random 32-byte key.
    pub fn generate() -> Self {
        let key = generate_key_bytes();
        Self { bytes: key.to_vec() }
    }

    /// Creates a secret key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::InvalidKey("secret key is empty".to_string()));
        }

        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Returns the raw key bytes.
    ///
    /// Use with caution - the returned slice is not zeroized automatically.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the algorithm tag, always [`KeyAlgorithm::Aes256`].
    #[inline]
    pub fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Aes256
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The private half of an asymmetric key pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PrivateKey {
    /// Imports a DER-encoded private key.
    ///
    /// The encoding is only checked when the key is used.
    ///
    /// # Errors
    ///
    /// Returns an error if `algorithm` is not asymmetric or `der` is empty.
    pub fn from_der(algorithm: KeyAlgorithm, der: &[u8]) -> Result<Self, CryptoError> {
        ensure_asymmetric(algorithm, der)?;
        Ok(Self {
            algorithm,
            bytes: der.to_vec(),
        })
    }

    /// Returns the DER encoding.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the algorithm tag.
    #[inline]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub(crate) fn to_p256(&self) -> Result<p256::SecretKey, CryptoError> {
        expect_algorithm(KeyAlgorithm::Ecdsa, self.algorithm)?;
        p256::SecretKey::from_pkcs8_der(&self.bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("malformed EC private key: {e}")))
    }

    pub(crate) fn to_rsa(&self) -> Result<RsaPrivateKey, CryptoError> {
        expect_algorithm(KeyAlgorithm::Rsa, self.algorithm)?;
        RsaPrivateKey::from_pkcs1_der(&self.bytes)
            .or_else(|_| RsaPrivateKey::from_pkcs8_der(&self.bytes))
            .map_err(|e| CryptoError::InvalidKey(format!("malformed RSA private key: {e}")))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The public half of an asymmetric key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Imports a DER-encoded (SubjectPublicKeyInfo) public key.
    ///
    /// # Errors
    ///
    /// Returns an error if `algorithm` is not asymmetric or `der` is empty.
    pub fn from_der(algorithm: KeyAlgorithm, der: &[u8]) -> Result<Self, CryptoError> {
        ensure_asymmetric(algorithm, der)?;
        Ok(Self {
            algorithm,
            bytes: der.to_vec(),
        })
    }

    /// Returns the DER encoding.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the algorithm tag.
    #[inline]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub(crate) fn from_p256(key: &p256::PublicKey) -> Result<Self, CryptoError> {
        let der = key
            .to_public_key_der()
            .map_err(|e| CryptoError::InvalidKey(format!("EC public key encoding failed: {e}")))?;
        Ok(Self {
            algorithm: KeyAlgorithm::Ecdsa,
            bytes: der.as_bytes().to_vec(),
        })
    }

    pub(crate) fn to_p256(&self) -> Result<p256::PublicKey, CryptoError> {
        expect_algorithm(KeyAlgorithm::Ecdsa, self.algorithm)?;
        p256::PublicKey::from_public_key_der(&self.bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("malformed EC public key: {e}")))
    }

    pub(crate) fn to_rsa(&self) -> Result<RsaPublicKey, CryptoError> {
        expect_algorithm(KeyAlgorithm::Rsa, self.algorithm)?;
        RsaPublicKey::from_public_key_der(&self.bytes)
            .map_err(|e| CryptoError::InvalidKey(format!("malformed RSA public key: {e}")))
    }
}

/// A private key and the public key generated with it.
///
/// Key pairs only come out of the generators below; the two halves are never
/// paired up after the fact.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Returns the private half.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Returns the public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Splits the pair into its halves.
    pub fn into_parts(self) -> (PrivateKey, PublicKey) {
        (self.private_key, self.public_key)
    }
}

/// A borrowed key of any kind, as accepted by the signature dispatcher.
#[derive(Debug, Clone, Copy)]
pub enum KeyRef<'a> {
    /// A symmetric key.
    Secret(&'a SecretKey),
    /// The private half of a key pair.
    Private(&'a PrivateKey),
    /// The public half of a key pair.
    Public(&'a PublicKey),
}

impl KeyRef<'_> {
    /// Returns the algorithm tag of the referenced key.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            Self::Secret(key) => key.algorithm(),
            Self::Private(key) => key.algorithm(),
            Self::Public(key) => key.algorithm(),
        }
    }
}

impl<'a> From<&'a SecretKey> for KeyRef<'a> {
    fn from(key: &'a SecretKey) -> Self {
        Self::Secret(key)
    }
}

impl<'a> From<&'a PrivateKey> for KeyRef<'a> {
    fn from(key: &'a PrivateKey) -> Self {
        Self::Private(key)
    }
}

impl<'a> From<&'a PublicKey> for KeyRef<'a> {
    fn from(key: &'a PublicKey) -> Self {
        Self::Public(key)
    }
}

/// Generates a random 32-byte AES-256 key.
pub fn generate_aes256_secret_key() -> SecretKey {
    SecretKey::generate()
}

/// Generates a fresh EC P-256 key pair.
pub fn generate_ec_p256_key_pair() -> Result<KeyPair, CryptoError> {
    let secret = p256::SecretKey::random(&mut OsRng);

    let private_der = secret
        .to_pkcs8_der()
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("PKCS#8 encoding failed: {e}")))?;
    let public_key = PublicKey::from_p256(&secret.public_key())
        .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;

    Ok(KeyPair {
        private_key: PrivateKey {
            algorithm: KeyAlgorithm::Ecdsa,
            bytes: private_der.as_bytes().to_vec(),
        },
        public_key,
    })
}

/// Generates a fresh RSA-2048 key pair.
///
/// This takes noticeably longer than EC generation.
pub fn generate_rsa2048_key_pair() -> Result<KeyPair, CryptoError> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
    let public = RsaPublicKey::from(&private);

    let private_der = private
        .to_pkcs1_der()
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("PKCS#1 encoding failed: {e}")))?;
    let public_der = public
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("SPKI encoding failed: {e}")))?;

    Ok(KeyPair {
        private_key: PrivateKey {
            algorithm: KeyAlgorithm::Rsa,
            bytes: private_der.as_bytes().to_vec(),
        },
        public_key: PublicKey {
            algorithm: KeyAlgorithm::Rsa,
            bytes: public_der.as_bytes().to_vec(),
        },
    })
}

pub(crate) fn expect_algorithm(
    expected: KeyAlgorithm,
    actual: KeyAlgorithm,
) -> Result<(), CryptoError> {
    if expected != actual {
        debug!(%expected, %actual, "key algorithm mismatch");
        return Err(CryptoError::KeyAlgorithmMismatch { expected, actual });
    }
    Ok(())
}

fn ensure_asymmetric(algorithm: KeyAlgorithm, der: &[u8]) -> Result<(), CryptoError> {
    if algorithm == KeyAlgorithm::Aes256 {
        return Err(CryptoError::InvalidKey(
            "asymmetric key cannot be tagged aes-256".to_string(),
        ));
    }
    if der.is_empty() {
        return Err(CryptoError::InvalidKey("key encoding is empty".to_string()));
    }
    Ok(())
}
