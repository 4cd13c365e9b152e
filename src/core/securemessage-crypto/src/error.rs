//! Cryptographic error types.

use thiserror::Error;

use crate::keys::KeyAlgorithm;
use crate::ops::EncType;

/// Errors that can occur during cryptographic operations.
///
/// Messages carry lengths and algorithm tags only, never key bytes.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid input data (empty digest input, bad length, oversized integer).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid key format or size.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The key is tagged for a different algorithm than the operation requires.
    #[error("key algorithm mismatch: expected {expected}, got {actual}")]
    KeyAlgorithmMismatch {
        /// Algorithm the operation requires.
        expected: KeyAlgorithm,
        /// Algorithm the supplied key carries.
        actual: KeyAlgorithm,
    },

    /// The encryption type cannot be used for encryption or decryption.
    #[error("unsupported encryption type: {0}")]
    UnsupportedEncType(EncType),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Signature creation failed.
    #[error("signature creation failed: {0}")]
    SignatureFailed(String),

    /// Signature verification failed.
    #[error("signature verification failed")]
    VerificationFailed,
}
