// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Region Profiles
//!
//! Static per-region endpoint, carrier, locale and RSA key table for the
//! update server. Lookup is a pure function; nothing here is mutable.

use serde::Serialize;
use std::fmt;

use crate::version;

const PUBLIC_KEY_CN: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEApXYGXQpNL7gmMzzvajHa
oZIHQQvBc2cOEhJc7/tsaO4sT0unoQnwQKfNQCuv7qC1Nu32eCLuewe9LSYhDXr9
KSBWjOcCFXVXteLO9WCaAh5hwnUoP/5/Wz0jJwBA+yqs3AaGLA9wJ0+B2lB1vLE4
FZNE7exUfwUc03fJxHG9nCLKjIZlrnAAHjRCd8mpnADwfkCEIPIGhnwq7pdkbamZ
coZfZud1+fPsELviB9u447C6bKnTU4AaMcR9Y2/uI6TJUTcgyCp+ilgU0JxemrSI
PFk3jbCbzamQ6Shkw/jDRzYoXpBRg/2QDkbq+j3ljInu0RHDfOeXf3VBfHSnQ66H
CwIDAQAB
-----END RSA PUBLIC KEY-----";

const PUBLIC_KEY_IN: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAwYtghkzeStC9YvAwOQmW
ylbp74Tj8hhi3f9IlK7A/CWrGbLgzz/BeKxNb45zBN8pgaaEOwAJ1qZQV5G4nPro
WCPOP1ro1PkemFJvw/vzOOT5uN0ADnHDzZkZXCU/knxqUSfLcwQlHXsYhNsAm7uO
KjY9YXF4zWzYN0eFPkML3Pj/zg7hl/ov9clB2VeyI1/blMHFfcNA/fvqDTENXcNB
IhgJvXiCpLcZqp+aLZPC5AwY/sCb3j5jTWer0Rk0ZjQBZE1AncwYvUx4mA65U59c
WpTyl4c47J29MsQ66hqWv6eBHlDNZSEsQpHePUqgsf7lmO5Wd7teB8ugQki2oz1Y
5QIDAQAB
-----END RSA PUBLIC KEY-----";

const PUBLIC_KEY_EU: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAh8/EThsK3f0WyyPgrtXb
/D0Xni6UZNppaQHUqHWo976cybl92VxmehE0ISObnxERaOtrlYmTPIxkVC9MMueD
vTwZ1l0KxevZVKU0sJRxNR9AFcw6D7k9fPzzpNJmhSlhpNbt3BEepdgibdRZbacF
3NWy3ejOYWHgxC+I/Vj1v7QU5gD+1OhgWeRDcwuV4nGY1ln2lvkRj8EiJYXfkSq/
wUI5AvPdNXdEqwou4FBcf6mD84G8pKDyNTQwwuk9lvFlcq4mRqgYaFg9DAgpDgqV
K4NTJWM7tQS1GZuRA6PhupfDqnQExyBFhzCefHkEhcFywNyxlPe953NWLFWwbGvF
KwIDAQAB
-----END RSA PUBLIC KEY-----";

const PUBLIC_KEY_SG: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAkA980wxi+eTGcFDiw2I6
RrUeO4jL/Aj3Yw4dNuW7tYt+O1sRTHgrzxPD9SrOqzz7G0KgoSfdFHe3JVLPN+U1
waK+T0HfLusVJshDaMrMiQFDUiKajb+QKr+bXQhVofH74fjat+oRJ8vjXARSpFk4
/41x5j1Bt/2bHoqtdGPcUizZ4whMwzap+hzVlZgs7BNfepo24PWPRujsN3uopl+8
u4HFpQDlQl7GdqDYDj2zNOHdFQI2UpSf0aIeKCKOpSKF72KDEESpJVQsqO4nxMwE
i2jMujQeCHyTCjBZ+W35RzwT9+0pyZv8FB3c7FYY9FdF/+lvfax5mvFEBd9jO+dp
MQIDAQAB
-----END RSA PUBLIC KEY-----";

const HOST_SG: &str = "component-ota-sg.allawnos.com";
const HOST_EU: &str = "component-ota-eu.allawnos.com";
const HOST_IN: &str = "component-ota-in.allawnos.com";
const HOST_CN: &str = "component-ota-cn.allawntech.com";
const HOST_CN_GRAY: &str = "component-ota-gray.coloros.com";

const KEY_VERSION_CN: &str = "1615879139745";
const KEY_VERSION_EU: &str = "1615897067573";
const KEY_VERSION_IN: &str = "1615896309308";
const KEY_VERSION_SG: &str = "1615895993238";

/// Protocol version sent in the `version` header for every region
pub const PROTOCOL_VERSION: &str = "2";

/// Gray flag value that selects the CN staged-rollout host
pub const GRAY_ENABLED: i32 = 1;

/// Known region codes (compared case-sensitively)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    CN,
    EU,
    IN,
    SG,
    RU,
    TR,
    TH,
    GL,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::CN,
        Region::EU,
        Region::IN,
        Region::SG,
        Region::RU,
        Region::TR,
        Region::TH,
        Region::GL,
    ];

    /// Exact, case-sensitive match against the region code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.as_str() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::CN => "CN",
            Region::EU => "EU",
            Region::IN => "IN",
            Region::SG => "SG",
            Region::RU => "RU",
            Region::TR => "TR",
            Region::TH => "TH",
            Region::GL => "GL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region-specific parameters for one update query
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionProfile {
    pub carrier_id: String,
    pub host: String,
    pub language: String,
    /// PEM text, SubjectPublicKeyInfo or PKCS#1
    pub public_key: String,
    pub public_key_version: String,
    pub protocol_version: String,
}

impl RegionProfile {
    pub fn china(gray: i32) -> Self {
        let host = if gray == GRAY_ENABLED {
            HOST_CN_GRAY
        } else {
            HOST_CN
        };
        Self::build("10010111", host, "zh-CN", PUBLIC_KEY_CN, KEY_VERSION_CN)
    }

    pub fn europe() -> Self {
        Self::build("01000100", HOST_EU, "en-GB", PUBLIC_KEY_EU, KEY_VERSION_EU)
    }

    pub fn india() -> Self {
        Self::build("00011011", HOST_IN, "en-IN", PUBLIC_KEY_IN, KEY_VERSION_IN)
    }

    /// Regions served from the shared Singapore endpoint
    fn shared_sg(carrier_id: &str, language: &str) -> Self {
        Self::build(carrier_id, HOST_SG, language, PUBLIC_KEY_SG, KEY_VERSION_SG)
    }

    /// Profile used for unrecognised region codes
    pub fn fallback() -> Self {
        Self::shared_sg("01011010", "en-US")
    }

    fn build(
        carrier_id: &str,
        host: &str,
        language: &str,
        public_key: &str,
        public_key_version: &str,
    ) -> Self {
        RegionProfile {
            carrier_id: carrier_id.to_string(),
            host: host.to_string(),
            language: language.to_string(),
            public_key: public_key.to_string(),
            public_key_version: public_key_version.to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Update-check endpoint on this profile's host
    pub fn update_url(&self) -> String {
        format!("https://{}{}", self.host, version::PROTOCOL_ENDPOINT)
    }
}

/// Profile for a known region
pub fn profile_for(region: Region, gray: i32) -> RegionProfile {
    match region {
        Region::CN => RegionProfile::china(gray),
        Region::EU => RegionProfile::europe(),
        Region::IN => RegionProfile::india(),
        Region::SG => RegionProfile::shared_sg("01011010", "en-SG"),
        Region::RU => RegionProfile::shared_sg("00110111", "ru-RU"),
        Region::TR => RegionProfile::shared_sg("01010001", "tr-TR"),
        Region::TH => RegionProfile::shared_sg("00111001", "th-TH"),
        Region::GL => RegionProfile::shared_sg("10100111", "en-US"),
    }
}

/// Resolve a region code and gray flag to a profile
///
/// Total over any input: unknown codes get [`RegionProfile::fallback`].
pub fn resolve(region: &str, gray: i32) -> RegionProfile {
    match Region::from_code(region) {
        Some(r) => profile_for(r, gray),
        None => RegionProfile::fallback(),
    }
}
