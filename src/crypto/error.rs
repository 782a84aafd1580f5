// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error type shared by the key-wrap and body-cipher primitives.
//!
//! ## Error Variants
//!
//! - **InvalidKey**: Public key text or symmetric key/IV could not be used
//! - **EncryptionFailed**: RSA-OAEP or AES-CTR encryption failed
//! - **DecryptionFailed**: AES-CTR decryption of a response body failed
//!
//! ## Context Preservation
//!
//! Variants carry the operation or key/field that failed plus the underlying
//! reason, e.g. `key_type: "region_public_key"`, `reason: "unexpected tag 0x04"`.

use std::fmt;

/// Error type for all cryptographic operations in the update envelope
#[derive(Debug, Clone)]
pub enum CryptoError {
    /// Invalid cryptographic key
    ///
    /// This error occurs when:
    /// - PEM body is not valid base64
    /// - DER structure is neither SubjectPublicKeyInfo nor PKCS#1
    /// - Symmetric key or IV has the wrong length
    InvalidKey {
        /// Type of key that failed (e.g., "region_public_key", "session_iv")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// Encryption failed
    EncryptionFailed {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Decryption failed
    ///
    /// AES-CTR has no authentication tag, so this only covers malformed
    /// inputs (bad base64, wrong IV length), never a wrong key.
    DecryptionFailed {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKey { key_type, reason } => {
                write!(f, "Invalid key ({}): {}", key_type, reason)
            }
            CryptoError::EncryptionFailed { operation, reason } => {
                write!(f, "Encryption failed during {}: {}", operation, reason)
            }
            CryptoError::DecryptionFailed { operation, reason } => {
                write!(f, "Decryption failed during {}: {}", operation, reason)
            }
        }
    }
}

impl std::error::Error for CryptoError {}
