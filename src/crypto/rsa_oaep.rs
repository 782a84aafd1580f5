// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RSA-OAEP Key Wrapping
//!
//! Wraps the per-query AES key under a region's RSA public key so only the
//! update server can recover it.
//!
//! Region keys ship as PEM text in one of two encodings, sometimes under a
//! label that does not match the contents:
//!
//! - **SubjectPublicKeyInfo** (X.509 `PUBLIC KEY`): algorithm identifier + key
//! - **PKCS#1** (`RSA PUBLIC KEY`): bare `SEQUENCE { INTEGER n, INTEGER e }`
//!
//! The label is ignored. The DER body is tried as SPKI first, then walked as
//! PKCS#1.
//!
//! Padding is OAEP with SHA-1 for both the label hash and MGF1, which is what
//! the server decrypts with.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPublicKey};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::error::CryptoError;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// Which encoding a public key was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyEncoding {
    SubjectPublicKeyInfo,
    Pkcs1,
}

/// Public key plus the encoding it was decoded from
#[derive(Debug, Clone)]
pub struct ParsedPublicKey {
    pub encoding: PublicKeyEncoding,
    pub key: RsaPublicKey,
}

impl ParsedPublicKey {
    /// Modulus as unsigned big-endian bytes
    pub fn modulus_bytes(&self) -> Vec<u8> {
        self.key.n().to_bytes_be()
    }

    /// Public exponent as unsigned big-endian bytes
    pub fn exponent_bytes(&self) -> Vec<u8> {
        self.key.e().to_bytes_be()
    }
}

/// Strip PEM armour and whitespace, then base64-decode the body
///
/// Markers are removed wherever they appear, so single-line PEM text
/// (`-----BEGIN PUBLIC KEY-----MIIB...-----END PUBLIC KEY-----`) is accepted.
pub fn pem_to_der(pem: &str) -> Result<Vec<u8>, CryptoError> {
    let body: String = strip_armour(pem)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty() {
        return Err(CryptoError::InvalidKey {
            key_type: "region_public_key".to_string(),
            reason: "PEM body is empty".to_string(),
        });
    }

    STANDARD.decode(body.as_bytes()).map_err(|e| CryptoError::InvalidKey {
        key_type: "region_public_key".to_string(),
        reason: format!("PEM body is not valid base64: {}", e),
    })
}

fn strip_armour(pem: &str) -> String {
    let mut text = pem.to_string();
    for marker in ["-----BEGIN", "-----END"] {
        while let Some(start) = text.find(marker) {
            let label_start = start + marker.len();
            let end = match text[label_start..].find("-----") {
                Some(offset) => label_start + offset + "-----".len(),
                None => label_start,
            };
            text.replace_range(start..end, "");
        }
    }
    text
}

/// Parse an RSA public key from PEM text in either supported encoding
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` when the base64 is malformed or the DER
/// matches neither encoding. There is no partial result.
pub fn parse_public_key(pem: &str) -> Result<ParsedPublicKey, CryptoError> {
    let der = pem_to_der(pem)?;

    let spki_err = match RsaPublicKey::from_public_key_der(&der) {
        Ok(key) => {
            return Ok(ParsedPublicKey {
                encoding: PublicKeyEncoding::SubjectPublicKeyInfo,
                key,
            })
        }
        Err(e) => e,
    };

    match parse_pkcs1_der(&der) {
        Ok(key) => Ok(ParsedPublicKey {
            encoding: PublicKeyEncoding::Pkcs1,
            key,
        }),
        Err(pkcs1_err) => Err(CryptoError::InvalidKey {
            key_type: "region_public_key".to_string(),
            reason: format!(
                "not SubjectPublicKeyInfo ({}) and not PKCS#1 ({})",
                spki_err, pkcs1_err
            ),
        }),
    }
}

/// Minimal DER cursor for `SEQUENCE { INTEGER, INTEGER }`
struct DerReader<'a> {
    der: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(der: &'a [u8]) -> Self {
        Self { der, pos: 0 }
    }

    fn read_byte(&mut self) -> Result<u8, String> {
        let byte = *self
            .der
            .get(self.pos)
            .ok_or_else(|| format!("truncated at offset {}", self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_len(&mut self) -> Result<usize, String> {
        let first = self.read_byte()?;
        if first & 0x80 == 0 {
            return Ok(first as usize);
        }
        let num = (first & 0x7F) as usize;
        if num == 0 || num > 4 {
            return Err(format!("unsupported length encoding 0x{:02x}", first));
        }
        let mut len = 0usize;
        for _ in 0..num {
            len = (len << 8) | self.read_byte()? as usize;
        }
        Ok(len)
    }

    fn expect_tag(&mut self, expected: u8) -> Result<(), String> {
        let tag = self.read_byte()?;
        if tag != expected {
            return Err(format!(
                "expected tag 0x{:02x}, got 0x{:02x}",
                expected, tag
            ));
        }
        Ok(())
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], String> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.der.len())
            .ok_or_else(|| format!("length {} overruns input at offset {}", len, self.pos))?;
        let slice = &self.der[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read an INTEGER and drop its leading sign byte, if any
    fn read_unsigned_integer(&mut self) -> Result<&'a [u8], String> {
        self.expect_tag(TAG_INTEGER)?;
        let len = self.read_len()?;
        let bytes = self.read_slice(len)?;
        match bytes {
            [] => Err("empty INTEGER".to_string()),
            [0x00, rest @ ..] if !rest.is_empty() => Ok(rest),
            _ => Ok(bytes),
        }
    }
}

/// Walk a PKCS#1 `RSAPublicKey` DER structure
fn parse_pkcs1_der(der: &[u8]) -> Result<RsaPublicKey, String> {
    let mut reader = DerReader::new(der);
    reader.expect_tag(TAG_SEQUENCE)?;
    reader.read_len()?;

    let modulus = reader.read_unsigned_integer()?;
    let exponent = reader.read_unsigned_integer()?;

    RsaPublicKey::new(
        BigUint::from_bytes_be(modulus),
        BigUint::from_bytes_be(exponent),
    )
    .map_err(|e| format!("invalid RSA parameters: {}", e))
}

/// Encrypt `plaintext` with RSA-OAEP(SHA-1, MGF1-SHA-1) and base64 the result
pub fn wrap_key_base64(key: &RsaPublicKey, plaintext: &[u8]) -> Result<String, CryptoError> {
    let wrapped = key
        .encrypt(&mut OsRng, Oaep::new::<Sha1>(), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed {
            operation: "key_wrap".to_string(),
            reason: e.to_string(),
        })?;
    Ok(STANDARD.encode(wrapped))
}

/// Short SHA-256 fingerprint of the modulus, safe to log
pub fn fingerprint(key: &RsaPublicKey) -> String {
    let digest = Sha256::digest(key.n().to_bytes_be());
    hex::encode(&digest[..8])
}
