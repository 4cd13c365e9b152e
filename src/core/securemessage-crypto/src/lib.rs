//! # SecureMessage Crypto
//!
//! Cryptographic operations core for the SecureMessage protocol.
//!
//! This crate is the only place protocol code makes cryptographic decisions:
//! - Message digests (SHA-256, SHA-512)
//! - Key derivation (HKDF-SHA256, purpose-separated AES-256 keys)
//! - Symmetric encryption (AES-256-CBC)
//! - Signatures (HMAC-SHA256, ECDSA P-256, RSA-2048)
//! - Key agreement (ECDH P-256)
//! - Secure random generation
//! - Fixed-width integer encoding for protocol fields
//!
//! Everything is synchronous and stateless apart from the OS random source.
//! Key material is never logged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agreement;
pub mod cipher;
pub mod codec;
pub mod digest;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod ops;
pub mod random;
pub mod signature;

pub use agreement::{export_ec_p256_public_key, import_ec_p256_public_key, key_agreement_sha256};
pub use codec::{decode_int32, encode_int32};
pub use digest::{sha256, sha512};
pub use error::CryptoError;
pub use kdf::{derive_aes256_key_for, hkdf_sha256, hkdf_sha256_extract};
pub use keys::{
    generate_aes256_secret_key, generate_ec_p256_key_pair, generate_rsa2048_key_pair,
    KeyAlgorithm, KeyPair, KeyRef, PrivateKey, PublicKey, SecretKey,
};
pub use ops::{decrypt, encrypt, generate_iv, sign, verify, EncType, SigType};
pub use random::secure_random;
