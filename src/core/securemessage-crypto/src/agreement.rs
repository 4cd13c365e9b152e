//! EC P-256 key agreement.
//!
//! The shared secret is the x-coordinate of the Diffie-Hellman point, hashed
//! with SHA-256 into a 32-byte symmetric key.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{ecdh, EncodedPoint, FieldBytes};
use zeroize::Zeroizing;

use crate::digest::sha256;
use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey, SecretKey};

/// Size of one affine P-256 coordinate in bytes.
pub const COORDINATE_SIZE: usize = 32;

/// Computes `SHA-256(ECDH(private_key, peer_public_key).x)`.
///
/// Both parties arrive at the same key:
/// `agree(a.private, b.public) == agree(b.private, a.public)`.
///
/// # Errors
///
/// Fails if either key is not tagged [`crate::KeyAlgorithm::Ecdsa`] or is
/// malformed.
pub fn key_agreement_sha256(
    private_key: &PrivateKey,
    peer_public_key: &PublicKey,
) -> Result<SecretKey, CryptoError> {
    let secret = private_key.to_p256()?;
    let peer = peer_public_key.to_p256()?;

    let shared = ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let x = Zeroizing::new(shared.raw_secret_bytes().to_vec());

    let digest = Zeroizing::new(sha256(&x)?);
    SecretKey::from_bytes(&*digest)
}

/// Returns the affine `(x, y)` coordinates of an EC P-256 public key as
/// big-endian, zero-padded 32-byte arrays.
pub fn export_ec_p256_public_key(
    key: &PublicKey,
) -> Result<([u8; COORDINATE_SIZE], [u8; COORDINATE_SIZE]), CryptoError> {
    let point = key.to_p256()?.to_encoded_point(false);

    match (point.x(), point.y()) {
        (Some(x), Some(y)) => Ok(((*x).into(), (*y).into())),
        _ => Err(CryptoError::InvalidKey(
            "public key is the identity point".to_string(),
        )),
    }
}

/// Builds an EC P-256 public key from affine coordinates.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] if the point is not on the curve.
pub fn import_ec_p256_public_key(
    x: &[u8; COORDINATE_SIZE],
    y: &[u8; COORDINATE_SIZE],
) -> Result<PublicKey, CryptoError> {
    let point = EncodedPoint::from_affine_coordinates(
        &FieldBytes::clone_from_slice(x),
        &FieldBytes::clone_from_slice(y),
        false,
    );

    let key = p256::PublicKey::from_sec1_bytes(point.as_bytes())
        .map_err(|_| CryptoError::InvalidKey("point is not on P-256".to_string()))?;

    PublicKey::from_p256(&key)
}
