//! Integration tests for SecureMessage.
//!
//! These tests drive the crypto core end to end the way a message layer would:
//! framing, key agreement feeding derivation, and concurrent callers. Tests
//! of the `securemessage` binary live with the CLI crate.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use securemessage_crypto::{
        decode_int32, decrypt, derive_aes256_key_for, encode_int32, encrypt,
        export_ec_p256_public_key, generate_ec_p256_key_pair, generate_iv,
        import_ec_p256_public_key, key_agreement_sha256, secure_random, sign, verify,
        CryptoError, EncType, KeyRef, SecretKey, SigType,
    };

    /// Frame a signed and encrypted body the way a message layer would:
    /// `len(signature) || signature || iv || ciphertext`.
    fn seal_message(
        master: &SecretKey,
        signer: KeyRef<'_>,
        sig_type: SigType,
        body: &[u8],
    ) -> Vec<u8> {
        let iv = generate_iv(EncType::Aes256Cbc).unwrap();
        let ciphertext = encrypt(master, EncType::Aes256Cbc, &iv, body).unwrap();

        let mut signed = iv.to_vec();
        signed.extend_from_slice(&ciphertext);
        let signature = sign(sig_type, signer, &signed).unwrap();

        let mut frame = encode_int32(signature.len() as i32).to_vec();
        frame.extend_from_slice(&signature);
        frame.extend_from_slice(&signed);
        frame
    }

    fn open_message(
        master: &SecretKey,
        verifier: KeyRef<'_>,
        sig_type: SigType,
        frame: &[u8],
    ) -> Option<Vec<u8>> {
        let sig_len = decode_int32(&frame[..4]).ok()? as usize;
        let signature = frame.get(4..4 + sig_len)?;
        let signed = frame.get(4 + sig_len..)?;

        if !verify(sig_type, verifier, signature, signed) {
            return None;
        }

        let (iv, ciphertext) = signed.split_at(16);
        decrypt(master, EncType::Aes256Cbc, iv, ciphertext)
            .ok()
            .map(|plaintext| plaintext.to_vec())
    }

    #[test]
    fn test_sign_then_encrypt_with_hmac() {
        let master = SecretKey::generate();
        let body = b"meet at the usual place";

        let frame = seal_message(&master, KeyRef::Secret(&master), SigType::HmacSha256, body);
        let opened = open_message(&master, KeyRef::Secret(&master), SigType::HmacSha256, &frame);

        assert_eq!(opened.as_deref(), Some(&body[..]));
    }

    #[test]
    fn test_sign_then_encrypt_with_ecdsa() {
        let master = SecretKey::generate();
        let pair = generate_ec_p256_key_pair().unwrap();
        let body = b"signed by a device key";

        let frame = seal_message(
            &master,
            pair.private_key().into(),
            SigType::EcdsaP256Sha256,
            body,
        );
        let opened = open_message(
            &master,
            pair.public_key().into(),
            SigType::EcdsaP256Sha256,
            &frame,
        );

        assert_eq!(opened.as_deref(), Some(&body[..]));
    }

    #[test]
    fn test_tampered_frame_is_rejected() {
        let master = SecretKey::generate();
        let mut frame = seal_message(
            &master,
            KeyRef::Secret(&master),
            SigType::HmacSha256,
            b"do not touch",
        );

        let last = frame.len() - 1;
        frame[last] ^= 0x01;

        assert!(open_message(&master, KeyRef::Secret(&master), SigType::HmacSha256, &frame).is_none());
    }

    #[test]
    fn test_wrong_master_key_cannot_open() {
        let master = SecretKey::generate();
        let other = SecretKey::generate();
        let frame = seal_message(&master, KeyRef::Secret(&master), SigType::HmacSha256, b"hello");

        assert!(open_message(&other, KeyRef::Secret(&other), SigType::HmacSha256, &frame).is_none());
    }

    #[test]
    fn test_agreement_over_exported_coordinates() {
        let alice = generate_ec_p256_key_pair().unwrap();
        let bob = generate_ec_p256_key_pair().unwrap();

        // Public keys travel as raw coordinates and are rebuilt on the other side.
        let (x, y) = export_ec_p256_public_key(bob.public_key()).unwrap();
        let bob_public = import_ec_p256_public_key(&x, &y).unwrap();
        let (x, y) = export_ec_p256_public_key(alice.public_key()).unwrap();
        let alice_public = import_ec_p256_public_key(&x, &y).unwrap();

        let alice_shared = key_agreement_sha256(alice.private_key(), &bob_public).unwrap();
        let bob_shared = key_agreement_sha256(bob.private_key(), &alice_public).unwrap();
        assert_eq!(alice_shared, bob_shared);

        // The shared secret is a master key: both sides reach the same derived keys.
        let iv = [7u8; 16];
        let ciphertext = encrypt(&alice_shared, EncType::Aes256Cbc, &iv, b"session start").unwrap();
        let plaintext = decrypt(&bob_shared, EncType::Aes256Cbc, &iv, &ciphertext).unwrap();
        assert_eq!(&plaintext[..], b"session start");
    }

    #[test]
    fn test_purpose_keys_are_independent() {
        let master = SecretKey::generate();
        let keys: Vec<SecretKey> = SigType::ALL
            .iter()
            .map(|t| t.purpose())
            .chain(EncType::ALL.iter().map(|t| t.purpose()))
            .map(|purpose| derive_aes256_key_for(&master, purpose).unwrap())
            .collect();

        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unencrypted_type_is_refused() {
        let master = SecretKey::generate();
        assert!(generate_iv(EncType::None).is_none());
        assert!(matches!(
            encrypt(&master, EncType::None, &[], b"plain"),
            Err(CryptoError::UnsupportedEncType(EncType::None))
        ));
    }

    #[test]
    fn test_concurrent_use_from_many_threads() {
        let master = Arc::new(SecretKey::generate());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let master = Arc::clone(&master);
                thread::spawn(move || {
                    let nonce = secure_random(32).unwrap();
                    let data = format!("message {}", i);
                    let sig = sign(SigType::HmacSha256, &*master, data.as_bytes()).unwrap();
                    assert!(verify(SigType::HmacSha256, &*master, &sig, data.as_bytes()));
                    nonce
                })
            })
            .collect();

        let nonces: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for (i, a) in nonces.iter().enumerate() {
            for b in &nonces[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
