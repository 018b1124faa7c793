// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Legacy multi-variant responses
//!
//! Older servers answer with an array of manifests, one per SDK version.
//! The first entry (in response order) whose `sdkVersion` is supported wins;
//! deployed manifests depend on that tie-break.

use serde_json::Value;
use tracing::debug;

use super::JsonObject;
use crate::config::UpdatesConfig;
use crate::error::UpdatesError;

/// Select the first variant whose `sdkVersion` is in the configured list.
pub fn select_compatible_variant(
    variants: Vec<Value>,
    config: &UpdatesConfig,
) -> Result<JsonObject, UpdatesError> {
    let supported = config.supported_sdk_versions();
    let count = variants.len();

    let selected = variants.into_iter().enumerate().find_map(|(index, variant)| match variant {
        Value::Object(map)
            if map
                .get("sdkVersion")
                .and_then(Value::as_str)
                .is_some_and(|v| supported.contains(&v)) =>
        {
            Some((index, map))
        }
        _ => None,
    });

    match selected {
        Some((index, map)) => {
            debug!(index, count, "selected legacy manifest variant");
            Ok(map)
        }
        None => Err(UpdatesError::NoCompatibleManifest {
            sdk_versions: config.sdk_version.clone().unwrap_or_default(),
        }),
    }
}
