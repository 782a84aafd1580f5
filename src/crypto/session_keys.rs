// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ephemeral Session Key Material
//!
//! One `EphemeralSession` is generated per update query. Its key encrypts the
//! request body and later decrypts the response body; its IV is used for the
//! request only. The response carries its own IV.
//!
//! **Security**: Keys live in memory only, are never logged, and are zeroized
//! when the session is dropped.

use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key size in bytes
pub const SESSION_KEY_LEN: usize = 32;

/// AES block / CTR IV size in bytes
pub const SESSION_IV_LEN: usize = 16;

/// Key and request IV for a single protocol exchange
///
/// # Example
///
/// ```ignore
/// let session = EphemeralSession::generate();
/// let cipher = encrypt_to_base64(body, session.key(), session.iv())?;
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EphemeralSession {
    key: [u8; SESSION_KEY_LEN],
    iv: [u8; SESSION_IV_LEN],
}

impl EphemeralSession {
    /// Generate fresh key material from the operating system CSPRNG
    pub fn generate() -> Self {
        let mut key = [0u8; SESSION_KEY_LEN];
        let mut iv = [0u8; SESSION_IV_LEN];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Build a session from known material (tests, replaying captures)
    pub fn from_parts(key: [u8; SESSION_KEY_LEN], iv: [u8; SESSION_IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Symmetric key, shared by request and response directions
    pub fn key(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.key
    }

    /// Request-direction IV
    pub fn iv(&self) -> &[u8; SESSION_IV_LEN] {
        &self.iv
    }
}

impl fmt::Debug for EphemeralSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralSession")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}
