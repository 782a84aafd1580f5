//! Tests for region profile resolution

use ota_update_client::config::{resolve, Region, RegionProfile};

#[test]
fn test_every_region_has_host_and_key() {
    for region in Region::ALL {
        for gray in [0, 1] {
            let profile = resolve(region.as_str(), gray);
            assert!(!profile.host.is_empty(), "{} host", region);
            assert!(!profile.public_key.trim().is_empty(), "{} key", region);
            assert!(!profile.public_key_version.is_empty());
            assert_eq!(profile.protocol_version, "2");
        }
    }
}

#[test]
fn test_unknown_region_falls_back() {
    assert_eq!(resolve("XX", 0), RegionProfile::fallback());
    assert_eq!(resolve("", 1), RegionProfile::fallback());
    assert_eq!(resolve("eu", 0), RegionProfile::fallback());
}

#[test]
fn test_gray_release_host() {
    assert_ne!(resolve("CN", 1).host, resolve("CN", 0).host);
}

#[test]
fn test_shared_sg_regions_differ_by_carrier_and_locale() {
    let ru = resolve("RU", 0);
    let th = resolve("TH", 0);
    assert_eq!(ru.host, th.host);
    assert_eq!(ru.public_key, th.public_key);
    assert_eq!(ru.carrier_id, "00110111");
    assert_eq!(ru.language, "ru-RU");
    assert_eq!(th.carrier_id, "00111001");
    assert_eq!(th.language, "th-TH");
}

#[test]
fn test_dedicated_regions() {
    let eu = resolve("EU", 0);
    assert_eq!(eu.host, "component-ota-eu.allawnos.com");
    assert_eq!(eu.carrier_id, "01000100");
    assert_eq!(eu.language, "en-GB");
    assert_eq!(eu.public_key_version, "1615897067573");

    let cn = resolve("CN", 0);
    assert_eq!(cn.carrier_id, "10010111");
    assert_eq!(cn.language, "zh-CN");
    assert_eq!(cn.public_key_version, "1615879139745");
}
