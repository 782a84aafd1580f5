// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Outbound Update-Check Envelope
//!
//! **Wire format**:
//! ```text
//! POST https://{host}/update/v5
//! protectedKey: {"SCENE_1":{"protectedKey":<b64 OAEP>,"version":<token>,"negotiationVersion":<key ver>}}
//! <identity headers>
//!
//! {"params":"{\"cipher\":<b64>,\"iv\":<b64>}"}
//! ```
//!
//! `params` is a JSON *string* holding the serialised cipher block.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::RequestContext;
use super::UpdaterError;
use crate::config::RegionProfile;
use crate::crypto::{encrypt_to_base64, fingerprint, parse_public_key, wrap_key_base64};
use crate::crypto::EphemeralSession;

pub const FRESHNESS_OFFSET_MS: i64 = 24 * 3600 * 1000;
/// Milliseconds to the nanosecond unit the server's `version` field uses
pub const FRESHNESS_SCALE: i64 = 1_000_000;

pub const PROTECTED_KEY_SCENE: &str = "SCENE_1";
pub const INTERFACE_VERSION: &str = "1";
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const UNKNOWN: &str = "unknown";

/// 64-character all-zero device id
pub fn placeholder_device_id() -> String {
    "0".repeat(64)
}

/// Wrapped-key validity token: (now + 24h) in ms, scaled by [`FRESHNESS_SCALE`]
pub fn freshness_token(now_ms: i64) -> String {
    ((now_ms + FRESHNESS_OFFSET_MS) * FRESHNESS_SCALE).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedKeyEntry {
    pub protected_key: String,
    pub version: String,
    pub negotiation_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectedKeyHeader {
    #[serde(rename = "SCENE_1")]
    pub scene: ProtectedKeyEntry,
}

/// Base64 ciphertext and IV, used in both directions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CipherBlock {
    pub cipher: String,
    pub iv: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestBody {
    pub params: String,
}

/// Plaintext encrypted into the request body; field order is significant
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BodyPlaintext<'a> {
    mode: &'a str,
    time: i64,
    is_rooted: &'a str,
    is_locked: bool,
    #[serde(rename = "type")]
    kind: &'a str,
    device_id: &'a str,
}

/// Transport-ready request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    /// Ordered header list
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Assembles an [`OutboundRequest`] for one query
pub struct EnvelopeBuilder<'a> {
    context: &'a RequestContext,
    profile: &'a RegionProfile,
    session: &'a EphemeralSession,
    now_ms: Option<i64>,
}

impl<'a> EnvelopeBuilder<'a> {
    pub fn new(
        context: &'a RequestContext,
        profile: &'a RegionProfile,
        session: &'a EphemeralSession,
    ) -> Self {
        Self {
            context,
            profile,
            session,
            now_ms: None,
        }
    }

    /// Pin the wall clock (milliseconds since the Unix epoch)
    pub fn at(mut self, now_ms: i64) -> Self {
        self.now_ms = Some(now_ms);
        self
    }

    /// Build headers and body
    ///
    /// # Errors
    ///
    /// `UpdaterError::Configuration` if the profile's public key cannot be
    /// parsed or used, `UpdaterError::Serialization` if the JSON parts cannot
    /// be produced.
    pub fn build(&self) -> Result<OutboundRequest, UpdaterError> {
        let now_ms = self.now_ms.unwrap_or_else(|| Utc::now().timestamp_millis());
        let ctx = self.context.normalized();

        let public_key = parse_public_key(&self.profile.public_key)?;
        let protected_key =
            wrap_key_base64(&public_key.key, STANDARD.encode(self.session.key()).as_bytes())?;
        debug!(
            "protectedKey len={}, key encoding={:?}, fingerprint={}",
            protected_key.len(),
            public_key.encoding,
            fingerprint(&public_key.key)
        );

        let protected_key_header = serde_json::to_string(&ProtectedKeyHeader {
            scene: ProtectedKeyEntry {
                protected_key,
                version: freshness_token(now_ms),
                negotiation_version: self.profile.public_key_version.clone(),
            },
        })?;

        let model = ctx.model.clone().unwrap_or_default();
        let headers: Vec<(String, String)> = [
            ("language", self.profile.language.as_str()),
            ("androidVersion", UNKNOWN),
            ("colorOSVersion", UNKNOWN),
            ("romVersion", UNKNOWN),
            ("otaVersion", ctx.ota_version.as_str()),
            ("model", model.as_str()),
            ("mode", ctx.request_mode()),
            ("nvCarrier", ctx.carrier_or(&self.profile.carrier_id)),
            ("infVersion", INTERFACE_VERSION),
            ("version", self.profile.protocol_version.as_str()),
            ("deviceId", placeholder_device_id().as_str()),
            ("Content-Type", CONTENT_TYPE_JSON),
            ("protectedKey", protected_key_header.as_str()),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let body = self.encrypted_body(&ctx, now_ms)?;

        Ok(OutboundRequest {
            url: self.profile.update_url(),
            headers,
            body,
        })
    }

    fn encrypted_body(&self, ctx: &RequestContext, now_ms: i64) -> Result<String, UpdaterError> {
        let device_id = match ctx.guid() {
            Some(guid) => guid.to_lowercase(),
            None => placeholder_device_id(),
        };

        let plaintext = serde_json::to_vec(&BodyPlaintext {
            mode: "0",
            time: now_ms,
            is_rooted: "0",
            is_locked: true,
            kind: "0",
            device_id: &device_id,
        })?;

        let block = CipherBlock {
            cipher: encrypt_to_base64(&plaintext, self.session.key(), self.session.iv())?,
            iv: STANDARD.encode(self.session.iv()),
        };

        Ok(serde_json::to_string(&RequestBody {
            params: serde_json::to_string(&block)?,
        })?)
    }
}
