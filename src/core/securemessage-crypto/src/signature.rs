//! Signature primitives: HMAC-SHA256, ECDSA P-256/SHA-256 and RSA-2048/SHA-256.
//!
//! These operate on raw keys. Purpose separation of HMAC keys happens one
//! level up, in [`crate::ops`].
//!
//! The asymmetric schemes hash the payload with SHA-256 and sign the digest.
//! ECDSA signatures are ASN.1 DER encoded and have variable length; RSA uses
//! PKCS#1 v1.5 padding.

use hmac::{Hmac, Mac};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

use crate::digest::SHA256_SIZE;
use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey, SecretKey, RSA_KEY_BITS};

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag in bytes.
pub const HMAC_SHA256_SIZE: usize = SHA256_SIZE;

/// Computes `HMAC-SHA256(key, data)`.
pub fn hmac_sha256_sign(key: &SecretKey, data: &[u8]) -> Result<[u8; HMAC_SHA256_SIZE], CryptoError> {
    let mac = keyed_mac(key, data)?;
    Ok(mac.finalize().into_bytes().into())
}

/// Checks an HMAC-SHA256 tag in constant time.
pub fn hmac_sha256_verify(key: &SecretKey, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
    keyed_mac(key, data)?
        .verify_slice(signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

fn keyed_mac(key: &SecretKey, data: &[u8]) -> Result<HmacSha256, CryptoError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(data);
    Ok(mac)
}

/// Signs `data` with an EC P-256 private key, returning a DER signature.
pub fn ecdsa_p256_sha256_sign(key: &PrivateKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let signing_key = SigningKey::from(key.to_p256()?);

    let signature: Signature = signing_key
        .sign_prehash(&prehash(data))
        .map_err(|e| CryptoError::SignatureFailed(e.to_string()))?;

    Ok(signature.to_der().as_bytes().to_vec())
}

/// Verifies a DER-encoded ECDSA P-256 signature over `data`.
pub fn ecdsa_p256_sha256_verify(
    key: &PublicKey,
    signature: &[u8],
    data: &[u8],
) -> Result<(), CryptoError> {
    let verifying_key = VerifyingKey::from(&key.to_p256()?);
    let signature = Signature::from_der(signature).map_err(|_| CryptoError::VerificationFailed)?;

    verifying_key
        .verify_prehash(&prehash(data), &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// Signs `data` with an RSA-2048 private key using PKCS#1 v1.5 over SHA-256.
///
/// # Errors
///
/// Keys with any other modulus size are rejected with [`CryptoError::InvalidKey`].
pub fn rsa2048_sha256_sign(key: &PrivateKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let private = key.to_rsa()?;
    ensure_rsa2048(&private)?;

    private
        .sign_with_rng(&mut OsRng, Pkcs1v15Sign::new::<Sha256>(), &prehash(data))
        .map_err(|e| CryptoError::SignatureFailed(e.to_string()))
}

/// Verifies an RSA PKCS#1 v1.5 SHA-256 signature over `data`.
pub fn rsa2048_sha256_verify(
    key: &PublicKey,
    signature: &[u8],
    data: &[u8],
) -> Result<(), CryptoError> {
    let public = key.to_rsa()?;
    ensure_rsa2048(&public)?;

    public
        .verify(Pkcs1v15Sign::new::<Sha256>(), &prehash(data), signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

fn ensure_rsa2048(key: &impl PublicKeyParts) -> Result<(), CryptoError> {
    if key.size() * 8 != RSA_KEY_BITS {
        return Err(CryptoError::InvalidKey(format!(
            "expected a {}-bit RSA modulus, got {} bits",
            RSA_KEY_BITS,
            key.size() * 8
        )));
    }
    Ok(())
}

// Unlike `digest::sha256`, an empty payload is signable.
fn prehash(data: &[u8]) -> [u8; SHA256_SIZE] {
    Sha256::digest(data).into()
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
pub(crate) mod tests {
    use super::*;
    use crate::keys::{generate_ec_p256_key_pair, KeyAlgorithm};

    pub(crate) const EC_PRIVATE_DER: &[u8] = include_bytes!("../testdata/ec_p256_private.pk8.der");
    pub(crate) const EC_PUBLIC_DER: &[u8] = include_bytes!("../testdata/ec_p256_public.spki.der");
    pub(crate) const RSA_PRIVATE_DER: &[u8] =
        include_bytes!("../testdata/rsa2048_private.pkcs1.der");
    pub(crate) const RSA_PUBLIC_DER: &[u8] = include_bytes!("../testdata/rsa2048_public.spki.der");

    // Produced by an independent implementation over "Hi There".
    const EC_FOREIGN_SIGNATURE: &str = "30440220627b3dff593e27cb4aed4b3626d1c27d209aa90d6ef05df58cc7fb59786eeaa9022060f82285e4b11137ee54230e15a3a7805ef1b77390dc55735cd46f297418d71c";
    const RSA_EXPECTED_SIGNATURE: &str = "857c506b4e05d3c35f944ed034175984971a57df716c81be6ed411832aaa5711ceee9011e16aa2fbc3bdc1c6dc9b48fa939d7ec1f23e692a100901b7a9ef4eae0cd1ea009a4cbebac0666db8ab48e7a5a3458172f5b444fefd3f6e3b59c339c219580a66a4d3cadcd62adfb5cfcdd9fcb94eebf84c6befc1450a7d01c488a01abbf827a2a7fdafae44d8d0dd1aa098513ffae2e6b7240cd8c24c41019c77c33992e6e1c1ad4d906048bd2968ec59629f730b29659d264bcd6947278ffd00b8b355d6e761cdf0510d1c8e3b0cc8946b80ddc20f98c38384496d2fab3f75cf829c4dc0e92fe280339f2d3a362ef9756652ad6171535a5263ce4045f4415eb5c5ae";

    pub(crate) fn ec_fixture() -> (PrivateKey, PublicKey) {
        (
            PrivateKey::from_der(KeyAlgorithm::Ecdsa, EC_PRIVATE_DER).unwrap(),
            PublicKey::from_der(KeyAlgorithm::Ecdsa, EC_PUBLIC_DER).unwrap(),
        )
    }

    pub(crate) fn rsa_fixture() -> (PrivateKey, PublicKey) {
        (
            PrivateKey::from_der(KeyAlgorithm::Rsa, RSA_PRIVATE_DER).unwrap(),
            PublicKey::from_der(KeyAlgorithm::Rsa, RSA_PUBLIC_DER).unwrap(),
        )
    }

    #[test]
    fn test_hmac_rfc4231_case_1() {
        let key = SecretKey::from_bytes(&[0x0b; 20]).unwrap();

        let tag = hmac_sha256_sign(&key, b"Hi There").unwrap();

        assert_eq!(
            hex::encode(tag),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
        assert!(hmac_sha256_verify(&key, &tag, b"Hi There").is_ok());
    }

    #[test]
    fn test_hmac_rejects_tampered_tag() {
        let key = SecretKey::generate();
        let mut tag = hmac_sha256_sign(&key, b"data").unwrap();
        tag[0] ^= 0x01;

        assert!(matches!(
            hmac_sha256_verify(&key, &tag, b"data"),
            Err(CryptoError::VerificationFailed)
        ));
        assert!(hmac_sha256_verify(&key, &tag[..16], b"data").is_err());
    }

    #[test]
    fn test_ecdsa_sign_verify_fixed_keys() {
        let (private, public) = ec_fixture();

        let signature = ecdsa_p256_sha256_sign(&private, b"Hi There").unwrap();

        assert!(ecdsa_p256_sha256_verify(&public, &signature, b"Hi There").is_ok());
        assert!(ecdsa_p256_sha256_verify(&public, &signature, b"Hi there").is_err());
    }

    #[test]
    fn test_ecdsa_verifies_foreign_signature() {
        let (_, public) = ec_fixture();
        let signature = hex::decode(EC_FOREIGN_SIGNATURE).unwrap();

        assert!(ecdsa_p256_sha256_verify(&public, &signature, b"Hi There").is_ok());
    }

    #[test]
    fn test_ecdsa_wrong_key_fails() {
        let (private, _) = ec_fixture();
        let other = generate_ec_p256_key_pair().unwrap();

        let signature = ecdsa_p256_sha256_sign(&private, b"payload").unwrap();

        assert!(ecdsa_p256_sha256_verify(other.public_key(), &signature, b"payload").is_err());
    }

    #[test]
    fn test_ecdsa_garbage_signature_fails() {
        let (_, public) = ec_fixture();
        assert!(matches!(
            ecdsa_p256_sha256_verify(&public, &[0u8; 8], b"payload"),
            Err(CryptoError::VerificationFailed)
        ));
    }

    #[test]
    fn test_rsa_known_signature() {
        let (private, public) = rsa_fixture();

        let signature = rsa2048_sha256_sign(&private, b"Hi There").unwrap();

        assert_eq!(hex::encode(&signature), RSA_EXPECTED_SIGNATURE);
        assert!(rsa2048_sha256_verify(&public, &signature, b"Hi There").is_ok());
    }

    #[test]
    fn test_rsa_tampered_data_fails() {
        let (private, public) = rsa_fixture();

        let signature = rsa2048_sha256_sign(&private, b"Hi There").unwrap();

        assert!(matches!(
            rsa2048_sha256_verify(&public, &signature, b"Hi There!"),
            Err(CryptoError::VerificationFailed)
        ));
    }

    #[test]
    fn test_rsa_rejects_other_modulus_sizes() {
        use rsa::pkcs1::EncodeRsaPrivateKey;
        use rsa::pkcs8::EncodePublicKey;
        use rsa::{RsaPrivateKey, RsaPublicKey};

        let small = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
        let private_der = small.to_pkcs1_der().unwrap();
        let public_der = RsaPublicKey::from(&small).to_public_key_der().unwrap();

        let private = PrivateKey::from_der(KeyAlgorithm::Rsa, private_der.as_bytes()).unwrap();
        let public = PublicKey::from_der(KeyAlgorithm::Rsa, public_der.as_bytes()).unwrap();

        assert!(matches!(
            rsa2048_sha256_sign(&private, b"Hi There"),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            rsa2048_sha256_verify(&public, &[0u8; 128], b"Hi There"),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_empty_payload_is_signable() {
        let (private, public) = ec_fixture();
        let signature = ecdsa_p256_sha256_sign(&private, b"").unwrap();
        assert!(ecdsa_p256_sha256_verify(&public, &signature, b"").is_ok());
    }

    #[test]
    fn test_mismatched_key_algorithm() {
        let (ec_private, _) = ec_fixture();
        assert!(matches!(
            rsa2048_sha256_sign(&ec_private, b"data"),
            Err(CryptoError::KeyAlgorithmMismatch { .. })
        ));
    }
}
