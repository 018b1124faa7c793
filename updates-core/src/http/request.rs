// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request Builder
//!
//! Builds manifest and generic download requests. Header assembly never
//! fails: headers that cannot be represented in HTTP are skipped and logged.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA};
use tracing::{debug, warn};

use crate::config::{CachePolicy, UpdatesConfig};
use crate::fatal_error::PendingErrorSource;

/// Fixed timeout for every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Media types accepted for manifests, most preferred first.
pub const MANIFEST_ACCEPT: &str = "application/expo+json,application/json";

/// Longest fatal error message forwarded to the server, in characters.
pub const FATAL_ERROR_MAX_CHARS: usize = 1024;

pub const HEADER_PLATFORM: &str = "expo-platform";
pub const HEADER_API_VERSION: &str = "expo-api-version";
pub const HEADER_ENVIRONMENT: &str = "expo-updates-environment";
pub const HEADER_JSON_ERROR: &str = "expo-json-error";
pub const HEADER_ACCEPT_SIGNATURE: &str = "expo-accept-signature";
pub const HEADER_RELEASE_CHANNEL: &str = "expo-release-channel";
pub const HEADER_RUNTIME_VERSION: &str = "expo-runtime-version";
pub const HEADER_SDK_VERSION: &str = "expo-sdk-version";
pub const HEADER_FATAL_ERROR: &str = "expo-fatal-error";

/// An outgoing GET request, independent of the HTTP client executing it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Target URL.
    pub url: String,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Cache behaviour requested for this request.
    pub cache_policy: CachePolicy,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: HeaderMap::new(),
            cache_policy: CachePolicy::UseProtocolCachePolicy,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Headers as they go on the wire, including cache directives.
    ///
    /// A policy that forces a reload overrides any caller-supplied
    /// `Cache-Control`.
    pub fn wire_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        if let Some(directive) = self.cache_policy.cache_control() {
            if self.cache_policy.bypasses_cache() || !headers.contains_key(CACHE_CONTROL) {
                headers.insert(CACHE_CONTROL, HeaderValue::from_static(directive));
            }
            if self.cache_policy.bypasses_cache() {
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            }
        }
        headers
    }

    fn set(&mut self, name: &'static str, value: &str) {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(HeaderName::from_static(name), value);
            }
            Err(_) => warn!(header = name, "skipping header with invalid value"),
        }
    }

    fn merge_custom(&mut self, config: &UpdatesConfig) {
        for (name, value) in &config.request_headers {
            let parsed = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    self.headers.insert(name, value);
                }
                _ => warn!(header = %name, "skipping invalid custom header"),
            }
        }
    }
}

fn apply_default_headers(request: &mut HttpRequest, config: &UpdatesConfig) {
    request.set(HEADER_PLATFORM, &config.platform);
    request.set(HEADER_API_VERSION, &config.api_version.to_string());
    request.set(HEADER_ENVIRONMENT, &config.environment);
}

/// Build a request for a generic download (assets, arbitrary data).
pub fn build_generic_request(url: &str, config: &UpdatesConfig) -> HttpRequest {
    let mut request = HttpRequest::new(url);
    apply_default_headers(&mut request, config);
    request.merge_custom(config);
    request
}

/// Build a manifest request.
///
/// Consumes the pending fatal error, if any, from `fatal_errors`.
pub fn build_manifest_request(
    url: &str,
    config: &UpdatesConfig,
    fatal_errors: &dyn PendingErrorSource,
) -> HttpRequest {
    let mut request = HttpRequest::new(url);
    apply_default_headers(&mut request, config);

    request
        .headers
        .insert(ACCEPT, HeaderValue::from_static(MANIFEST_ACCEPT));
    request.set(HEADER_JSON_ERROR, "true");
    request.set(
        HEADER_ACCEPT_SIGNATURE,
        if config.uses_legacy_manifest { "false" } else { "true" },
    );
    request.set(HEADER_RELEASE_CHANNEL, &config.release_channel);

    if let Some(runtime_version) = &config.runtime_version {
        request.set(HEADER_RUNTIME_VERSION, runtime_version);
    } else if let Some(sdk_version) = &config.sdk_version {
        request.set(HEADER_SDK_VERSION, sdk_version);
    }

    if let Some(message) = fatal_errors.take_pending_error() {
        let value = fatal_error_header_value(&message);
        request
            .headers
            .insert(HeaderName::from_static(HEADER_FATAL_ERROR), value);
    }

    request.merge_custom(config);
    request.cache_policy = config.effective_cache_policy();

    debug!(
        url,
        legacy = config.uses_legacy_manifest,
        cache_policy = ?request.cache_policy,
        "built manifest request"
    );
    request
}

// Control characters are the only bytes HeaderValue rejects.
fn fatal_error_header_value(message: &str) -> HeaderValue {
    let truncated: String = message
        .chars()
        .take(FATAL_ERROR_MAX_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    HeaderValue::from_bytes(truncated.as_bytes()).unwrap_or_else(|_| HeaderValue::from_static(""))
}
