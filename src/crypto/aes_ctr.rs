// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-CTR Body Cipher
//!
//! Encrypts the request body and decrypts the response body of an update
//! query. Both directions share the session key; the IV differs.
//!
//! **Format**:
//! ```text
//! cipher = base64(AES-256-CTR(key, iv, plaintext))   // len(ct) == len(pt)
//! iv     = base64(16 bytes)
//! ```
//!
//! - Counter: full 128-bit block, big-endian increment
//! - No padding, no authentication tag

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use ctr::cipher::{KeyIvInit, StreamCipher};

use super::error::CryptoError;
use super::session_keys::{SESSION_IV_LEN, SESSION_KEY_LEN};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// XOR the AES-256-CTR keystream into `data` in place
///
/// Encryption and decryption are the same operation.
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the key is not 32 bytes or the IV is
/// not 16 bytes.
pub fn apply_keystream(data: &mut [u8], key: &[u8], iv: &[u8]) -> Result<(), CryptoError> {
    if key.len() != SESSION_KEY_LEN {
        return Err(CryptoError::InvalidKey {
            key_type: "session_key".to_string(),
            reason: format!(
                "expected {} bytes, got {}",
                SESSION_KEY_LEN,
                key.len()
            ),
        });
    }
    if iv.len() != SESSION_IV_LEN {
        return Err(CryptoError::InvalidKey {
            key_type: "session_iv".to_string(),
            reason: format!("expected {} bytes, got {}", SESSION_IV_LEN, iv.len()),
        });
    }

    let mut cipher = Aes256Ctr::new_from_slices(key, iv).map_err(|e| CryptoError::InvalidKey {
        key_type: "session_key".to_string(),
        reason: e.to_string(),
    })?;
    cipher.apply_keystream(data);
    Ok(())
}

/// Encrypt `plaintext` and return the ciphertext as standard base64
///
/// # Example
///
/// ```ignore
/// let session = EphemeralSession::generate();
/// let cipher = encrypt_to_base64(b"{\"mode\":\"0\"}", session.key(), session.iv())?;
/// ```
pub fn encrypt_to_base64(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<String, CryptoError> {
    let mut buf = plaintext.to_vec();
    apply_keystream(&mut buf, key, iv).map_err(|e| CryptoError::EncryptionFailed {
        operation: "request_body".to_string(),
        reason: e.to_string(),
    })?;
    Ok(STANDARD.encode(buf))
}

/// Decrypt a base64 ciphertext using a base64 IV supplied by the server
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` when either field is not valid
/// base64 or the decoded IV has the wrong length. A wrong key is not
/// detectable here; it yields garbage plaintext.
pub fn decrypt_from_base64(
    cipher_b64: &str,
    key: &[u8],
    iv_b64: &str,
) -> Result<Vec<u8>, CryptoError> {
    let mut buf = STANDARD
        .decode(cipher_b64.trim())
        .map_err(|e| CryptoError::DecryptionFailed {
            operation: "response_body".to_string(),
            reason: format!("cipher is not valid base64: {}", e),
        })?;
    let iv = STANDARD
        .decode(iv_b64.trim())
        .map_err(|e| CryptoError::DecryptionFailed {
            operation: "response_body".to_string(),
            reason: format!("iv is not valid base64: {}", e),
        })?;

    apply_keystream(&mut buf, key, &iv).map_err(|e| CryptoError::DecryptionFailed {
        operation: "response_body".to_string(),
        reason: e.to_string(),
    })?;
    Ok(buf)
}
