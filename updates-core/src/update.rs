// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Update Assembler
//!
//! An [`Update`] is the immutable record handed to the host once a manifest
//! has been fetched and verified (or explicitly marked unverified).
//! Accessors understand both legacy and current manifest field names.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::UpdatesConfig;
use crate::error::{BoxError, UpdatesError};
use crate::http::ResponseMetadata;
use crate::manifest::{JsonObject, Manifest};

/// Field injected into every assembled manifest.
pub const IS_VERIFIED_KEY: &str = "isVerified";

/// Persistence for assembled updates (the host's update database).
pub trait UpdateStore: Send + Sync {
    /// Records the update.
    fn save_update(&self, update: &Update) -> Result<(), BoxError>;
}

/// An asset listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    /// Download location.
    pub url: String,
    /// Stable asset key.
    #[serde(default)]
    pub key: Option<String>,
    /// Expected SHA-256 (base64url).
    #[serde(default)]
    pub hash: Option<String>,
    /// MIME type or file extension.
    #[serde(default, alias = "type")]
    pub content_type: Option<String>,
}

/// A fetched manifest ready for persistence and launch decisions.
#[derive(Clone)]
pub struct Update {
    manifest: JsonObject,
    is_verified: bool,
    response: ResponseMetadata,
    config: Arc<UpdatesConfig>,
    store: Arc<dyn UpdateStore>,
}

/// Build an [`Update`] from a manifest whose verification has completed.
///
/// Only `isVerified` is added to the manifest; every other field passes
/// through unchanged.
pub fn assemble_update(
    manifest: Manifest,
    response: ResponseMetadata,
    config: Arc<UpdatesConfig>,
    store: Arc<dyn UpdateStore>,
) -> Update {
    let is_verified = manifest.is_verified();
    let mut fields = manifest.into_raw();
    fields.insert(IS_VERIFIED_KEY.to_string(), Value::Bool(is_verified));

    Update {
        manifest: fields,
        is_verified,
        response,
        config,
        store,
    }
}

impl Update {
    /// Manifest fields, including `isVerified`.
    pub fn manifest(&self) -> &JsonObject {
        &self.manifest
    }

    /// Whether the manifest signature was verified.
    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// The response the manifest came from.
    pub fn response(&self) -> &ResponseMetadata {
        &self.response
    }

    /// The configuration used to fetch it.
    pub fn config(&self) -> &UpdatesConfig {
        &self.config
    }

    /// Update identifier (`id`, or legacy `releaseId`).
    pub fn id(&self) -> Option<&str> {
        self.str_field("id").or_else(|| self.str_field("releaseId"))
    }

    /// Commit time (`commitTime`, or legacy `publishedTime`).
    pub fn commit_time(&self) -> Option<&str> {
        self.str_field("commitTime")
            .or_else(|| self.str_field("publishedTime"))
    }

    /// Runtime version, derived from `sdkVersion` for legacy manifests.
    pub fn runtime_version(&self) -> Option<String> {
        self.str_field("runtimeVersion")
            .map(str::to_string)
            .or_else(|| self.str_field("sdkVersion").map(|v| format!("exposdk:{}", v)))
    }

    /// URL of the launch asset (`launchAsset.url`, or legacy `bundleUrl`).
    pub fn launch_asset_url(&self) -> Option<&str> {
        self.manifest
            .get("launchAsset")
            .and_then(|asset| asset.get("url"))
            .and_then(Value::as_str)
            .or_else(|| self.str_field("bundleUrl"))
    }

    /// Assets listed under `assets`; entries without a URL are skipped.
    pub fn assets(&self) -> Vec<AssetEntry> {
        self.manifest
            .get("assets")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Hands this update to the store.
    pub fn persist(&self) -> Result<(), UpdatesError> {
        self.store.save_update(self).map_err(UpdatesError::Store)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.manifest.get(key).and_then(Value::as_str)
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("id", &self.id())
            .field("is_verified", &self.is_verified)
            .field("status", &self.response.status)
            .field("url", &self.response.url)
            .finish_non_exhaustive()
    }
}
