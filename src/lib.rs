// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod crypto;
pub mod updater;
pub mod version;

// Re-export main types
pub use config::{resolve, Region, RegionProfile};
pub use crypto::{CryptoError, EphemeralSession};
pub use updater::{
    query_update, query_update_with_profile, HttpTransport, RequestContext, ResponseResult,
    Transport, UpdaterError,
};
