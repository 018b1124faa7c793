// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Signature Verifier Bridge
//!
//! Hands signed manifests to the external verifier. Unsigned manifests skip
//! verification and are explicitly marked unverified.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::extractor::ExtractedManifest;
use super::Manifest;
use crate::config::UpdatesConfig;
use crate::error::{BoxError, UpdatesError};

/// External verifier for manifest signatures.
///
/// The cryptography lives outside this crate. Implementations may fetch
/// keys over the network or hop to another thread; the returned future must
/// be `Send`.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Returns whether `signature` is valid for `manifest_text`.
    async fn verify(
        &self,
        manifest_text: &str,
        signature: &str,
        config: &UpdatesConfig,
    ) -> Result<bool, BoxError>;
}

/// Verify an extracted manifest, producing a manifest with its verified flag.
///
/// # Errors
/// * [`UpdatesError::VerificationFailed`] if the verifier rejects the signature
/// * [`UpdatesError::Verifier`] if the verifier itself fails
pub async fn verify_manifest(
    extracted: ExtractedManifest,
    verifier: &dyn SignatureVerifier,
    config: &UpdatesConfig,
) -> Result<Manifest, UpdatesError> {
    let ExtractedManifest {
        manifest_text,
        manifest,
        signature,
    } = extracted;

    let Some(signature) = signature else {
        debug!("manifest is unsigned, skipping verification");
        return Ok(Manifest::new(manifest, false));
    };

    match verifier.verify(&manifest_text, &signature, config).await {
        Ok(true) => {
            debug!("manifest signature verified");
            Ok(Manifest::new(manifest, true))
        }
        Ok(false) => {
            warn!("manifest signature rejected");
            Err(UpdatesError::VerificationFailed)
        }
        Err(e) => Err(UpdatesError::Verifier(e)),
    }
}
