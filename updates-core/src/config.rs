// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for update manifest requests
//!
//! The configuration is supplied once by the host application and is
//! immutable afterwards. It can be built in code (`Default` plus `with_*`
//! methods) or loaded from the JSON document embedded in the app bundle.

use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP cache behaviour requested for manifest fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CachePolicy {
    /// Let the protocol and intermediaries decide (no directive sent)
    #[default]
    UseProtocolCachePolicy,
    /// Never use a cached response, always revalidate with the origin
    ReloadIgnoringCache,
    /// Accept stale cached data, load from origin only when nothing is cached
    ReturnCacheDataElseLoad,
    /// Only accept cached data
    ReturnCacheDataDontLoad,
}

impl CachePolicy {
    /// `Cache-Control` directive for this policy, if any
    pub fn cache_control(&self) -> Option<&'static str> {
        match self {
            CachePolicy::UseProtocolCachePolicy => None,
            CachePolicy::ReloadIgnoringCache => Some("no-cache"),
            CachePolicy::ReturnCacheDataElseLoad => Some("max-stale"),
            CachePolicy::ReturnCacheDataDontLoad => Some("only-if-cached"),
        }
    }

    /// Whether the policy forces a round trip to the origin
    pub fn bypasses_cache(&self) -> bool {
        matches!(self, CachePolicy::ReloadIgnoringCache)
    }
}

/// Configuration for the update client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatesConfig {
    /// Manifest endpoint (e.g., "https://u.expo.dev/<project>")
    pub update_url: String,

    /// Speak the legacy manifest protocol
    pub uses_legacy_manifest: bool,

    /// Release channel requested from the server
    pub release_channel: String,

    /// Runtime version of the running binary (preferred over `sdk_version`)
    pub runtime_version: Option<String>,

    /// SDK version(s), comma-separated when more than one is supported
    pub sdk_version: Option<String>,

    /// Extra headers sent with every request, overriding defaults
    pub request_headers: BTreeMap<String, String>,

    /// Cache policy for manifest requests under the current protocol
    pub cache_policy: CachePolicy,

    /// Platform identifier sent in `Expo-Platform`
    pub platform: String,

    /// Protocol API version sent in `Expo-API-Version`
    pub api_version: u32,

    /// Deployment environment sent in `Expo-Updates-Environment`
    pub environment: String,
}

impl Default for UpdatesConfig {
    fn default() -> Self {
        Self {
            update_url: String::new(),
            uses_legacy_manifest: false,
            release_channel: "default".to_string(),
            runtime_version: None,
            sdk_version: None,
            request_headers: BTreeMap::new(),
            cache_policy: CachePolicy::default(),
            platform: default_platform().to_string(),
            api_version: 1,
            environment: "BARE".to_string(),
        }
    }
}

fn default_platform() -> &'static str {
    if cfg!(target_os = "android") {
        "android"
    } else {
        "ios"
    }
}

impl UpdatesConfig {
    /// Create a config pointing at the given manifest endpoint
    pub fn new(update_url: impl Into<String>) -> Self {
        Self {
            update_url: update_url.into(),
            ..Default::default()
        }
    }

    /// Load and validate a config from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: UpdatesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config can drive a manifest request
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_url.is_empty() {
            return Err(ConfigError::MissingUpdateUrl);
        }
        Url::parse(&self.update_url)
            .map_err(|e| ConfigError::InvalidUpdateUrl(format!("{}: {}", self.update_url, e)))?;
        if self.runtime_version.is_none() && self.sdk_version.is_none() {
            return Err(ConfigError::MissingVersion);
        }
        Ok(())
    }

    /// Use the legacy manifest protocol
    pub fn with_legacy_manifest(mut self, legacy: bool) -> Self {
        self.uses_legacy_manifest = legacy;
        self
    }

    /// Set the release channel
    pub fn with_release_channel(mut self, channel: impl Into<String>) -> Self {
        self.release_channel = channel.into();
        self
    }

    /// Set the runtime version
    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    /// Set the SDK version list (comma-separated)
    pub fn with_sdk_version(mut self, versions: impl Into<String>) -> Self {
        self.sdk_version = Some(versions.into());
        self
    }

    /// Add a custom request header
    pub fn with_request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }

    /// Set the cache policy used under the current protocol
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// SDK versions this binary can run, in configured order
    pub fn supported_sdk_versions(&self) -> Vec<&str> {
        self.sdk_version
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cache policy actually applied to manifest requests
    ///
    /// The legacy protocol always revalidates with the origin.
    pub fn effective_cache_policy(&self) -> CachePolicy {
        if self.uses_legacy_manifest {
            CachePolicy::ReloadIgnoringCache
        } else {
            self.cache_policy
        }
    }
}

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be decoded
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No manifest endpoint configured
    #[error("updateUrl is required")]
    MissingUpdateUrl,

    /// Manifest endpoint is not a valid URL
    #[error("invalid updateUrl: {0}")]
    InvalidUpdateUrl(String),

    /// Neither runtime nor SDK version configured
    #[error("either runtimeVersion or sdkVersion is required")]
    MissingVersion,
}
