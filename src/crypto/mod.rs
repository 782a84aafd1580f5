// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Update Envelope Cryptography
//!
//! Hybrid encryption used by the update-check protocol:
//!
//! - **Session Keys**: Ephemeral 32-byte AES key + 16-byte request IV per query
//! - **RSA-OAEP**: Wraps the session key under the region's public key
//! - **AES-CTR**: Encrypts the request body and decrypts the response body
//!
//! ## Security Considerations
//!
//! - Session keys are held in memory only and zeroized on drop
//! - The response is decrypted with the session key and the server's IV,
//!   never the request IV
//! - AES-CTR is unauthenticated; a wrong key produces garbage, not an error
//!
//! ## Protocol Flow
//!
//! 1. Client generates an ephemeral key and IV
//! 2. Client wraps base64(key) with RSA-OAEP(SHA-1) under the region key
//! 3. Client encrypts the request body with AES-256-CTR(key, iv)
//! 4. Server replies with `{cipher, iv}` encrypted under the same key
//! 5. Client decrypts with AES-256-CTR(key, server iv)

pub mod aes_ctr;
pub mod error;
pub mod rsa_oaep;
pub mod session_keys;

pub use aes_ctr::{apply_keystream, decrypt_from_base64, encrypt_to_base64};
pub use error::CryptoError;
pub use rsa_oaep::{
    fingerprint, parse_public_key, pem_to_der, wrap_key_base64, ParsedPublicKey,
    PublicKeyEncoding,
};
pub use session_keys::{EphemeralSession, SESSION_IV_LEN, SESSION_KEY_LEN};
