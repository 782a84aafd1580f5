//! Tests for outbound envelope assembly

use base64::{engine::general_purpose::STANDARD, Engine};
use ota_update_client::config::resolve;
use ota_update_client::crypto::{decrypt_from_base64, EphemeralSession};
use ota_update_client::updater::envelope::{ProtectedKeyHeader, RequestBody};
use ota_update_client::updater::{
    freshness_token, normalize_ota_version, CipherBlock, EnvelopeBuilder, OutboundRequest,
    RequestContext,
};

const NOW_MS: i64 = 1_712_000_000_000;

fn build(ctx: &RequestContext, region: &str) -> (OutboundRequest, EphemeralSession) {
    let session = EphemeralSession::generate();
    let profile = resolve(region, ctx.gray);
    let request = EnvelopeBuilder::new(ctx, &profile, &session)
        .at(NOW_MS)
        .build()
        .unwrap();
    (request, session)
}

fn decrypt_body(request_body: &str, session: &EphemeralSession) -> serde_json::Value {
    let outer: RequestBody = serde_json::from_str(request_body).unwrap();
    let block: CipherBlock = serde_json::from_str(&outer.params).unwrap();
    let plain = decrypt_from_base64(&block.cipher, session.key(), &block.iv).unwrap();
    serde_json::from_slice(&plain).unwrap()
}

#[test]
fn test_required_headers_present() {
    let (request, _) = build(&RequestContext::new("RMX3820_13.1.0.130_0130_202404010000"), "IN");
    for name in [
        "language",
        "androidVersion",
        "colorOSVersion",
        "romVersion",
        "otaVersion",
        "model",
        "mode",
        "nvCarrier",
        "infVersion",
        "version",
        "deviceId",
        "Content-Type",
        "protectedKey",
    ] {
        assert!(request.header(name).is_some(), "missing header {}", name);
    }
    assert_eq!(request.header("androidVersion"), Some("unknown"));
    assert_eq!(request.header("version"), Some("2"));
    assert_eq!(request.url, "https://component-ota-in.allawnos.com/update/v5");
}

#[test]
fn test_protected_key_header_shape() {
    let (request, _) = build(&RequestContext::new("PLK110_11.A"), "EU");
    let header: ProtectedKeyHeader =
        serde_json::from_str(request.header("protectedKey").unwrap()).unwrap();

    assert_eq!(header.scene.version, freshness_token(NOW_MS));
    assert_eq!(header.scene.negotiation_version, "1615897067573");
    // 2048-bit modulus
    assert_eq!(STANDARD.decode(&header.scene.protected_key).unwrap().len(), 256);

    let raw: serde_json::Value = serde_json::from_str(request.header("protectedKey").unwrap()).unwrap();
    assert!(raw["SCENE_1"]["protectedKey"].is_string());
}

#[test]
fn test_params_is_a_json_string() {
    let (request, _) = build(&RequestContext::new("PLK110_11.A"), "CN");
    let outer: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert!(outer["params"].is_string());
    assert_eq!(outer.as_object().unwrap().len(), 1);
}

#[test]
fn test_body_uses_request_iv() {
    let (request, session) = build(&RequestContext::new("PLK110_11.A"), "CN");
    let outer: RequestBody = serde_json::from_str(&request.body).unwrap();
    let block: CipherBlock = serde_json::from_str(&outer.params).unwrap();
    assert_eq!(STANDARD.decode(block.iv).unwrap(), session.iv().to_vec());
}

#[test]
fn test_guid_lowercased_into_body() {
    let mut ctx = RequestContext::new("PLK110_11.A");
    ctx.device_guid = Some("ABCDEF0123".to_string());
    let (request, session) = build(&ctx, "CN");

    let body = decrypt_body(&request.body, &session);
    assert_eq!(body["deviceId"], "abcdef0123");
    assert_eq!(body["time"], NOW_MS);
    assert_eq!(body["isLocked"], true);
    assert_eq!(request.header("deviceId"), Some("0".repeat(64).as_str()));
}

#[test]
fn test_missing_guid_uses_placeholder() {
    let (request, session) = build(&RequestContext::new("PLK110_11.A"), "CN");
    let body = decrypt_body(&request.body, &session);
    assert_eq!(body["deviceId"], "0".repeat(64));
}

#[test]
fn test_caller_values_override_defaults() {
    let mut ctx = RequestContext::new("PLK110_11.A");
    ctx.model = Some("PLK110X".to_string());
    ctx.carrier_id = Some("00000000".to_string());
    ctx.request_mode = Some("taste".to_string());
    let (request, _) = build(&ctx, "CN");

    assert_eq!(request.header("model"), Some("PLK110X"));
    assert_eq!(request.header("nvCarrier"), Some("00000000"));
    assert_eq!(request.header("mode"), Some("taste"));
}

#[test]
fn test_gray_selects_gray_host() {
    let mut ctx = RequestContext::new("OPD2413_11.A");
    ctx.gray = 1;
    let (request, _) = build(&ctx, "CN");
    assert_eq!(request.url, "https://component-ota-gray.coloros.com/update/v5");
}

#[test]
fn test_short_ota_version_normalized() {
    let v = normalize_ota_version("X1");
    assert!(v.split('_').count() >= 3);
    assert!(v.split('.').count() >= 3);

    let (request, _) = build(&RequestContext::new("X1"), "CN");
    assert_eq!(request.header("otaVersion"), Some(v.as_str()));
    assert_eq!(request.header("model"), Some("X1.0.01"));
}
