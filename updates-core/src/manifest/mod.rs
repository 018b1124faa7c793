// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest Module
//!
//! Turns a manifest response into a (possibly verified) manifest:
//! - `extractor`: payload shape detection and signature source resolution
//! - `legacy`: variant selection for legacy multi-manifest responses
//! - `signature`: dispatch to the external signature verifier
//!
//! # Example
//!
//! ```
//! use reqwest::header::HeaderMap;
//! use updates_core::config::UpdatesConfig;
//! use updates_core::manifest::extract_manifest;
//!
//! let config = UpdatesConfig::new("https://example.com").with_sdk_version("40.0.0");
//! let body = br#"{"sdkVersion":"40.0.0"}"#;
//! let extracted = extract_manifest(body, &HeaderMap::new(), &config).unwrap();
//! assert!(extracted.is_unsigned());
//! ```

mod extractor;
mod legacy;
mod signature;

pub use extractor::{extract_manifest, ExtractedManifest, SIGNATURE_HEADER, UNSIGNED_SIGNATURE};
pub use legacy::select_compatible_variant;
pub use signature::{verify_manifest, SignatureVerifier};

use serde_json::{Map, Value};

/// A JSON object.
pub type JsonObject = Map<String, Value>;

/// A parsed manifest and whether its signature was checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    raw: JsonObject,
    is_verified: bool,
}

impl Manifest {
    /// Wraps a manifest object.
    pub fn new(raw: JsonObject, is_verified: bool) -> Self {
        Self { raw, is_verified }
    }

    /// The manifest fields.
    pub fn raw(&self) -> &JsonObject {
        &self.raw
    }

    /// Whether a verifier accepted the manifest signature.
    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Consumes the manifest, returning its fields.
    pub fn into_raw(self) -> JsonObject {
        self.raw
    }
}
