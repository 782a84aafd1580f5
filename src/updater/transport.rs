// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTPS transport for the update-check envelope

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::envelope::OutboundRequest;

/// Used when the proxy URI carries no explicit port
pub const DEFAULT_PROXY_PORT: u16 = 80;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Client build error: {0}")]
    ClientBuild(String),
    #[error("Network error: {0}")]
    Network(String),
}

/// Status code and body text of the server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one envelope and returns the raw reply
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Forward proxy endpoint parsed from a URI such as `http://user:pw@host:7890`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxySettings {
    pub fn parse(uri: &str) -> Result<Self, String> {
        let url = Url::parse(uri.trim()).map_err(|e| format!("{}: {}", uri, e))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| format!("{}: missing host", uri))?
            .to_string();
        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            host,
            port: proxy_port(&url, uri),
            username,
            password: url.password().map(str::to_string),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Explicit port from the URI, [`DEFAULT_PROXY_PORT`] when none was written
///
/// `Url::port()` hides a port equal to the scheme default (`https://h:443`),
/// so the authority text decides whether one was given.
fn proxy_port(url: &Url, uri: &str) -> u16 {
    if let Some(port) = url.port() {
        return port;
    }
    if has_explicit_port(uri) {
        url.port_or_known_default().unwrap_or(DEFAULT_PROXY_PORT)
    } else {
        DEFAULT_PROXY_PORT
    }
}

fn has_explicit_port(uri: &str) -> bool {
    let trimmed = uri.trim();
    let rest = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map(|(_, host_port)| host_port)
        .unwrap_or(authority);
    // skip the brackets of an IPv6 literal
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .split_once(':')
        .map(|(_, port)| !port.is_empty())
        .unwrap_or(false)
}

/// What happened to the caller's proxy request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyOutcome {
    pub applied: bool,
    pub endpoint: Option<String>,
    pub warning: Option<String>,
}

impl ProxyOutcome {
    fn skipped(warning: String) -> Self {
        Self {
            applied: false,
            endpoint: None,
            warning: Some(warning),
        }
    }
}

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: Client,
    proxy: ProxyOutcome,
}

impl HttpTransport {
    /// Create a client, optionally through an HTTP forward proxy
    ///
    /// A malformed proxy URI is not an error: the outcome carries a warning
    /// and the client connects directly. `timeout` of `None` keeps reqwest's
    /// default (no deadline).
    pub fn new(proxy_uri: Option<&str>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let mut outcome = ProxyOutcome::default();
        if let Some(uri) = proxy_uri.filter(|u| !u.trim().is_empty()) {
            match Self::build_proxy(uri) {
                Ok((proxy, settings)) => {
                    builder = builder.proxy(proxy);
                    debug!("use proxy={}", settings.endpoint());
                    outcome = ProxyOutcome {
                        applied: true,
                        endpoint: Some(settings.endpoint()),
                        warning: None,
                    };
                }
                Err(reason) => {
                    let warning = format!("proxy parse failed: {}", reason);
                    warn!("{}", warning);
                    outcome = ProxyOutcome::skipped(warning);
                }
            }
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            proxy: outcome,
        })
    }

    fn build_proxy(uri: &str) -> Result<(reqwest::Proxy, ProxySettings), String> {
        let settings = ProxySettings::parse(uri)?;
        let mut proxy = reqwest::Proxy::all(format!("http://{}", settings.endpoint()))
            .map_err(|e| e.to_string())?;
        if let Some(user) = &settings.username {
            proxy = proxy.basic_auth(user, settings.password.as_deref().unwrap_or(""));
        }
        Ok((proxy, settings))
    }

    pub fn proxy_outcome(&self) -> &ProxyOutcome {
        &self.proxy
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        info!("request url={}", request.url);

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let started = Instant::now();
        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!(
            "http code={}, cost={}ms, bodyLen={}",
            status,
            started.elapsed().as_millis(),
            body.len()
        );
        Ok(RawResponse { status, body })
    }
}
