// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Update-check query
//!
//! One call performs exactly one request/response exchange:
//!
//! 1. Normalise the caller's [`RequestContext`]
//! 2. Resolve the [`RegionProfile`] for its region and gray flag
//! 3. Generate an [`EphemeralSession`]
//! 4. Build the envelope (wrapped key header + encrypted body)
//! 5. Send it through a [`Transport`]
//! 6. Parse the reply and decrypt its body with the session key

pub mod context;
pub mod envelope;
pub mod response;
pub mod transport;

pub use context::{normalize_ota_version, RequestContext, OTA_COMPAT_SUFFIX};
pub use envelope::{freshness_token, CipherBlock, EnvelopeBuilder, OutboundRequest};
pub use response::{parse_response, ResponseBody, ResponseResult, DEFAULT_ERROR_MESSAGE, PARSE_ERROR_CODE};
pub use transport::{HttpTransport, ProxyOutcome, ProxySettings, RawResponse, Transport, TransportError};

use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{resolve, RegionProfile};
use crate::crypto::{CryptoError, EphemeralSession};

#[derive(Debug, Error)]
pub enum UpdaterError {
    /// Region key material unusable; the request was never built
    #[error("Configuration error: {0}")]
    Configuration(#[from] CryptoError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// Envelope JSON could not be produced
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Query the update server for the context's region
///
/// # Errors
///
/// Only errors raised before anything is sent (configuration, envelope
/// serialisation) are returned as `Err`. Transport failures and unparseable
/// replies come back as a [`ResponseResult`] with [`PARSE_ERROR_CODE`] and the
/// underlying message.
pub async fn query_update<T>(
    context: &RequestContext,
    transport: &T,
) -> Result<ResponseResult, UpdaterError>
where
    T: Transport + ?Sized,
{
    let context = context.normalized();
    let profile = resolve(&context.region, context.gray);
    query_update_with_profile(&context, &profile, transport).await
}

/// Query using an explicit profile instead of the built-in region table
pub async fn query_update_with_profile<T>(
    context: &RequestContext,
    profile: &RegionProfile,
    transport: &T,
) -> Result<ResponseResult, UpdaterError>
where
    T: Transport + ?Sized,
{
    let started = Instant::now();
    let context = context.normalized();
    debug!(
        "queryUpdate() start, otaVersion={}, region={}, gray={}",
        context.ota_version, context.region, context.gray
    );
    debug!(
        "cfg.host={}, carrier={}, pubKeyVer={}",
        profile.host,
        context.carrier_or(&profile.carrier_id),
        profile.public_key_version
    );

    let session = EphemeralSession::generate();
    let request = EnvelopeBuilder::new(&context, profile, &session).build()?;

    let raw = match transport.send(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("queryUpdate() failed: {}", e);
            return Ok(ResponseResult::failure(e.to_string()));
        }
    };

    let result = parse_response(&raw.body, &session);
    info!(
        "responseCode={}, http status={}, decrypted={}",
        result.response_code,
        raw.status,
        result.decrypted_body.is_some()
    );
    debug!(
        "queryUpdate() done, total={}ms",
        started.elapsed().as_millis()
    );
    Ok(result)
}
