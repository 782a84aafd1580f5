//! Tests for region public key parsing and RSA-OAEP key wrapping

use base64::{engine::general_purpose::STANDARD, Engine};
use ota_update_client::config::{resolve, Region};
use ota_update_client::crypto::{parse_public_key, wrap_key_base64, CryptoError, PublicKeyEncoding};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;

const CN_SPKI: &str = include_str!("../fixtures/cn_spki.pem");
const CN_PKCS1: &str = include_str!("../fixtures/cn_pkcs1.pem");

#[test]
fn test_fixture_encodings_match() {
    let spki = parse_public_key(CN_SPKI).unwrap();
    let pkcs1 = parse_public_key(CN_PKCS1).unwrap();

    assert_eq!(spki.encoding, PublicKeyEncoding::SubjectPublicKeyInfo);
    assert_eq!(pkcs1.encoding, PublicKeyEncoding::Pkcs1);
    assert_eq!(spki.modulus_bytes(), pkcs1.modulus_bytes());
    assert_eq!(spki.exponent_bytes(), pkcs1.exponent_bytes());
}

#[test]
fn test_single_line_fixture_parses() {
    let one_line: String = CN_SPKI.lines().map(str::trim).collect();
    assert!(!one_line.contains('\n'));

    let parsed = parse_public_key(&one_line).unwrap();
    assert_eq!(parsed.encoding, PublicKeyEncoding::SubjectPublicKeyInfo);
    assert_eq!(parsed.key, parse_public_key(CN_SPKI).unwrap().key);

    let spaced = CN_PKCS1.replace('\n', " ");
    assert_eq!(parse_public_key(&spaced).unwrap().encoding, PublicKeyEncoding::Pkcs1);
}

#[test]
fn test_generated_key_in_both_encodings() {
    let private_key = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
    let public_key = RsaPublicKey::from(&private_key);

    let spki_pem = public_key.to_public_key_pem(LineEnding::LF).unwrap();
    let pkcs1_pem = public_key.to_pkcs1_pem(LineEnding::LF).unwrap();

    let spki = parse_public_key(&spki_pem).unwrap();
    let pkcs1 = parse_public_key(&pkcs1_pem).unwrap();
    assert_eq!(spki.key, public_key);
    assert_eq!(pkcs1.key, public_key);
}

#[test]
fn test_every_region_key_parses() {
    for region in Region::ALL {
        let profile = resolve(region.as_str(), 0);
        let parsed = parse_public_key(&profile.public_key);
        assert!(parsed.is_ok(), "{} key should parse", region);
    }
}

#[test]
fn test_garbage_der_is_invalid_key() {
    let pem = format!(
        "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----",
        STANDARD.encode([0x04, 0x02, 0x01, 0x00])
    );
    match parse_public_key(&pem) {
        Err(CryptoError::InvalidKey { key_type, reason }) => {
            assert_eq!(key_type, "region_public_key");
            assert!(reason.contains("PKCS#1"));
        }
        other => panic!("Expected InvalidKey, got {:?}", other.map(|k| k.encoding)),
    }
}

#[test]
fn test_wrapped_session_key_recoverable() {
    let private_key = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
    let public_key = RsaPublicKey::from(&private_key);
    let session_key_b64 = STANDARD.encode([0x11u8; 32]);

    let wrapped = wrap_key_base64(&public_key, session_key_b64.as_bytes()).unwrap();
    let recovered = private_key
        .decrypt(Oaep::new::<Sha1>(), &STANDARD.decode(wrapped).unwrap())
        .unwrap();
    assert_eq!(recovered, session_key_b64.as_bytes());
}

#[test]
fn test_wrapping_is_randomized() {
    let key = parse_public_key(CN_SPKI).unwrap().key;
    let a = wrap_key_base64(&key, b"same").unwrap();
    let b = wrap_key_base64(&key, b"same").unwrap();
    assert_ne!(a, b);
}
