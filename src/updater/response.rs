// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Update-server response parsing and body decryption
//!
//! ```text
//! {"responseCode": <int>, "errMsg": <string>, "body": <string|object|null>}
//! body (when encrypted) = {"cipher": <b64>, "iv": <b64>}
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use super::envelope::CipherBlock;
use crate::crypto::{decrypt_from_base64, EphemeralSession};

/// Code reported for transport failures and unparseable responses
pub const PARSE_ERROR_CODE: i64 = -1;

/// Substituted when the server reports failure without a message
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Shape of the response `body` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Absent,
    /// String (or other scalar) value, kept as its text
    Scalar(String),
    /// Object or array, re-serialised to JSON text
    Json(String),
}

impl ResponseBody {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => ResponseBody::Absent,
            Some(Value::String(s)) => ResponseBody::Scalar(s.clone()),
            Some(v @ (Value::Bool(_) | Value::Number(_))) => ResponseBody::Scalar(v.to_string()),
            Some(v) => ResponseBody::Json(v.to_string()),
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ResponseBody::Absent => None,
            ResponseBody::Scalar(text) | ResponseBody::Json(text) => Some(text),
        }
    }
}

/// Outcome of one update query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseResult {
    pub response_code: i64,
    pub err_msg: String,
    /// Raw `body` field text
    pub body: Option<String>,
    /// Decrypted payload; only set when `response_code == 0` and decryption succeeded
    #[serde(skip)]
    pub decrypted_body: Option<Vec<u8>>,
    /// Why an encrypted body could not be decrypted
    pub decrypt_error: Option<String>,
}

impl ResponseResult {
    /// Result for a failed exchange (transport error, unparseable reply)
    pub fn failure(message: impl Into<String>) -> Self {
        let mut result = Self {
            response_code: PARSE_ERROR_CODE,
            err_msg: message.into(),
            ..Self::default()
        };
        result.ensure_error_message();
        result
    }

    pub fn is_success(&self) -> bool {
        self.response_code == 0
    }

    /// Decrypted payload as UTF-8 text, lossily
    pub fn decrypted_text(&self) -> Option<String> {
        self.decrypted_body
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    fn ensure_error_message(&mut self) {
        if self.response_code != 0 && self.err_msg.trim().is_empty() {
            self.err_msg = DEFAULT_ERROR_MESSAGE.to_string();
        }
    }
}

/// Parse the server reply and decrypt its body with the session key
///
/// Never fails: unparseable input becomes a [`PARSE_ERROR_CODE`] result, and
/// decryption problems are recorded in `decrypt_error` without touching the
/// status fields.
pub fn parse_response(raw: &str, session: &EphemeralSession) -> ResponseResult {
    let root = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            error!("resp json parse error: top level is not an object");
            return ResponseResult::failure(format!(
                "resp json parse error: expected object, got {}",
                json_kind(&other)
            ));
        }
        Err(e) => {
            error!("resp json parse error: {}", e);
            return ResponseResult::failure(format!("resp json parse error: {}", e));
        }
    };

    let mut result = ResponseResult {
        response_code: response_code(&root),
        err_msg: error_message(&root),
        body: ResponseBody::from_value(root.get("body")).into_text(),
        ..ResponseResult::default()
    };

    if result.is_success() {
        if let Some(block) = result.body.as_deref().and_then(cipher_block) {
            match decrypt_from_base64(&block.cipher, session.key(), &block.iv) {
                Ok(bytes) => {
                    debug!("decrypt ok, bytes={}", bytes.len());
                    result.decrypted_body = Some(bytes);
                }
                Err(e) => {
                    warn!("decrypt failed: {}", e);
                    result.decrypt_error = Some(format!("decryption failed: {}", e));
                }
            }
        }
    } else {
        debug!(
            "responseCode={}, skipping body decryption",
            result.response_code
        );
    }

    result.ensure_error_message();
    result
}

fn response_code(root: &Map<String, Value>) -> i64 {
    match root.get("responseCode") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn error_message(root: &Map<String, Value>) -> String {
    match root.get("errMsg") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim_matches('"').to_string(),
        Some(other) => other.to_string().trim_matches('"').to_string(),
    }
}

/// `{cipher, iv}` inside the body text, when both are non-empty strings
fn cipher_block(body: &str) -> Option<CipherBlock> {
    if body.trim().is_empty() {
        return None;
    }
    let inner = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return None,
        Err(e) => {
            debug!("inner body is not JSON: {}", e);
            return None;
        }
    };

    let field = |name: &str| {
        inner
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some(CipherBlock {
        cipher: field("cipher")?,
        iv: field("iv")?,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
