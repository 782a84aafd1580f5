//! Tests for the AES-256-CTR body cipher

use base64::{engine::general_purpose::STANDARD, Engine};
use ota_update_client::crypto::{decrypt_from_base64, encrypt_to_base64, CryptoError};
use rand::{rngs::OsRng, Rng, RngCore};

#[test]
fn test_roundtrip_random_messages() {
    for _ in 0..32 {
        let mut key = [0u8; 32];
        let mut iv = [0u8; 16];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut iv);

        let len = OsRng.gen_range(0..512);
        let mut message = vec![0u8; len];
        OsRng.fill_bytes(&mut message);

        let cipher = encrypt_to_base64(&message, &key, &iv).unwrap();
        let plain = decrypt_from_base64(&cipher, &key, &STANDARD.encode(iv)).unwrap();
        assert_eq!(plain, message);
    }
}

#[test]
fn test_different_iv_changes_ciphertext() {
    let key = [8u8; 32];
    let a = encrypt_to_base64(b"same plaintext", &key, &[0u8; 16]).unwrap();
    let b = encrypt_to_base64(b"same plaintext", &key, &[1u8; 16]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_wrong_iv_does_not_recover_plaintext() {
    let key = [8u8; 32];
    let cipher = encrypt_to_base64(b"request body", &key, &[0u8; 16]).unwrap();
    let plain = decrypt_from_base64(&cipher, &key, &STANDARD.encode([1u8; 16])).unwrap();
    assert_ne!(plain, b"request body");
}

#[test]
fn test_invalid_key_size() {
    let result = encrypt_to_base64(b"test", &[0u8; 16], &[0u8; 16]);
    assert!(matches!(result, Err(CryptoError::EncryptionFailed { .. })));
}

#[test]
fn test_short_iv_rejected_on_decrypt() {
    let cipher = encrypt_to_base64(b"test", &[0u8; 32], &[0u8; 16]).unwrap();
    let result = decrypt_from_base64(&cipher, &[0u8; 32], &STANDARD.encode([0u8; 8]));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("session_iv"));
}
