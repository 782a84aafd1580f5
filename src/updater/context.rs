// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caller-supplied query parameters and their normalisation

use serde::Serialize;

/// Appended to OTA version strings the server would otherwise reject
pub const OTA_COMPAT_SUFFIX: &str = ".01_0001_197001010000";

pub const DEFAULT_REGION: &str = "CN";
pub const DEFAULT_REQUEST_MODE: &str = "manual";

/// Inputs for one update query
///
/// Optional fields left as `None` (or blank) are filled from the OTA version
/// string and the resolved region profile when the envelope is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub ota_version: String,
    pub region: String,
    pub model: Option<String>,
    pub carrier_id: Option<String>,
    pub device_guid: Option<String>,
    pub proxy_url: Option<String>,
    pub gray: i32,
    pub request_mode: Option<String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            ota_version: String::new(),
            region: DEFAULT_REGION.to_string(),
            model: None,
            carrier_id: None,
            device_guid: None,
            proxy_url: None,
            gray: 0,
            request_mode: None,
        }
    }
}

impl RequestContext {
    pub fn new(ota_version: impl Into<String>) -> Self {
        Self {
            ota_version: ota_version.into(),
            ..Self::default()
        }
    }

    /// Apply the OTA version shim and fill region/model defaults
    ///
    /// Idempotent: normalising an already normalised context is a no-op.
    pub fn normalized(&self) -> Self {
        let ota_version = normalize_ota_version(&self.ota_version);
        let region = if self.region.trim().is_empty() {
            DEFAULT_REGION.to_string()
        } else {
            self.region.clone()
        };
        let model = non_blank(&self.model)
            .map(str::to_string)
            .or_else(|| Some(default_model(&ota_version)));

        Self {
            ota_version,
            region,
            model,
            ..self.clone()
        }
    }

    /// Caller's carrier, or `fallback` when none was given
    pub fn carrier_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_blank(&self.carrier_id).unwrap_or(fallback)
    }

    pub fn request_mode(&self) -> &str {
        non_blank(&self.request_mode).unwrap_or(DEFAULT_REQUEST_MODE)
    }

    pub fn proxy(&self) -> Option<&str> {
        non_blank(&self.proxy_url)
    }

    pub fn guid(&self) -> Option<&str> {
        non_blank(&self.device_guid)
    }
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Ensure at least three `_` and three `.` segments
///
/// Real version strings already satisfy this and pass through untouched.
/// Short ones get [`OTA_COMPAT_SUFFIX`], preceded by `.0` padding when the
/// suffix alone would leave fewer than three `.` segments.
pub fn normalize_ota_version(ota_version: &str) -> String {
    let underscore_parts = ota_version.split('_').count();
    let dot_parts = ota_version.split('.').count();
    if underscore_parts >= 3 && dot_parts >= 3 {
        return ota_version.to_string();
    }

    let mut normalized = ota_version.to_string();
    for _ in 0..3usize.saturating_sub(dot_parts + 1) {
        normalized.push_str(".0");
    }
    normalized.push_str(OTA_COMPAT_SUFFIX);
    normalized
}

/// First `_`-delimited token of the OTA version, e.g. `RMX3820` for `RMX3820_13.1.0`
pub fn default_model(ota_version: &str) -> String {
    ota_version.split('_').next().unwrap_or_default().to_string()
}
