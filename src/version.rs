// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the OTA update client

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Update-check endpoint revision this client speaks
pub const PROTOCOL_ENDPOINT: &str = "/update/v5";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("ota-update-client {} ({})", VERSION_NUMBER, PROTOCOL_ENDPOINT)
}
