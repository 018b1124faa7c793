// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest Extractor
//!
//! Resolves a response body into one manifest text, its parsed object and
//! the signature that covers it. A signature embedded in the body
//! (`manifestString` + `signature`) takes precedence over the
//! `expo-manifest-signature` header.

use reqwest::header::HeaderMap;
use serde_json::Value;

use super::legacy::select_compatible_variant;
use super::JsonObject;
use crate::config::UpdatesConfig;
use crate::error::UpdatesError;

/// Response header carrying the manifest signature.
pub const SIGNATURE_HEADER: &str = "expo-manifest-signature";

/// Signature value meaning "this manifest is not signed".
pub const UNSIGNED_SIGNATURE: &str = "UNSIGNED";

/// A manifest resolved from a response, not yet verified.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedManifest {
    /// Exact text the signature covers.
    pub manifest_text: String,
    /// Parsed manifest.
    pub manifest: JsonObject,
    /// Signature to verify; `None` when absent or the unsigned sentinel.
    pub signature: Option<String>,
}

impl ExtractedManifest {
    /// Whether verification must be skipped.
    pub fn is_unsigned(&self) -> bool {
        self.signature.is_none()
    }
}

/// Extract the manifest and its signature from a response.
///
/// # Errors
/// * [`UpdatesError::Parse`] if the body is not JSON
/// * [`UpdatesError::InvalidResponseType`] if it is neither object nor array
/// * [`UpdatesError::NoCompatibleManifest`] if no legacy variant matches
/// * [`UpdatesError::ManifestStringNotString`], [`UpdatesError::InvalidManifest`],
///   [`UpdatesError::SignatureNotString`] for malformed fields
pub fn extract_manifest(
    body: &[u8],
    headers: &HeaderMap,
    config: &UpdatesConfig,
) -> Result<ExtractedManifest, UpdatesError> {
    let parsed: Value = serde_json::from_slice(body).map_err(UpdatesError::Parse)?;

    let container = match parsed {
        Value::Object(map) => map,
        Value::Array(variants) => select_compatible_variant(variants, config)?,
        _ => return Err(UpdatesError::InvalidResponseType),
    };

    let is_embedded =
        container.contains_key("manifestString") && container.contains_key("signature");
    if !is_embedded {
        // The header signature covers the body exactly as sent, even when a
        // legacy array was narrowed down to one entry.
        let signature = header_signature(headers)?;
        return Ok(ExtractedManifest {
            manifest_text: String::from_utf8_lossy(body).into_owned(),
            manifest: container,
            signature: normalize(signature),
        });
    }

    let manifest_text = container
        .get("manifestString")
        .and_then(Value::as_str)
        .ok_or(UpdatesError::ManifestStringNotString)?
        .to_string();
    let manifest = parse_manifest_object(&manifest_text)?;
    let signature = container
        .get("signature")
        .and_then(Value::as_str)
        .ok_or(UpdatesError::SignatureNotString)?
        .to_string();

    Ok(ExtractedManifest {
        manifest_text,
        manifest,
        signature: normalize(Some(signature)),
    })
}

fn header_signature(headers: &HeaderMap) -> Result<Option<String>, UpdatesError> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|_| UpdatesError::SignatureNotString)
        })
        .transpose()
}

fn normalize(signature: Option<String>) -> Option<String> {
    signature.filter(|s| s != UNSIGNED_SIGNATURE)
}

fn parse_manifest_object(text: &str) -> Result<JsonObject, UpdatesError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(UpdatesError::InvalidManifest(format!(
            "expected an object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(UpdatesError::InvalidManifest(e.to_string())),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
