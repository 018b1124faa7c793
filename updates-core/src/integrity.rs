// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Downloaded file integrity verification using SHA-256
//!
//! Manifests describe asset hashes either as base64url (current protocol),
//! as lowercase hex, or as "sha256:hexstring". All three forms are accepted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::digest::{Context, SHA256};
use thiserror::Error;

fn sha256(data: &[u8]) -> ring::digest::Digest {
    let mut context = Context::new(&SHA256);
    context.update(data);
    context.finish()
}

/// SHA-256 of `data`, base64url-encoded without padding
///
/// # Example
/// ```
/// use updates_core::integrity::sha256_base64url;
///
/// assert_eq!(
///     sha256_base64url(b"hello world"),
///     "uU0nuZNNPgilLlLX2n2r-sSE7-N6U4DukIj3rOLvzek"
/// );
/// ```
pub fn sha256_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(sha256(data).as_ref())
}

/// SHA-256 of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data).as_ref())
}

/// Verify `data` against an expected SHA-256 hash
///
/// # Arguments
/// * `data` - The downloaded bytes
/// * `expected` - Hash as base64url, hex, or "sha256:hex"
///
/// # Returns
/// * `Ok(())` if the hash matches
/// * `Err(IntegrityError)` if it doesn't match or cannot be decoded
pub fn verify_sha256(data: &[u8], expected: &str) -> Result<(), IntegrityError> {
    let expected_bytes = decode_expected(expected)?;
    let digest = sha256(data);

    if digest.as_ref() == expected_bytes.as_slice() {
        Ok(())
    } else {
        Err(IntegrityError::HashMismatch {
            expected: expected.to_string(),
            actual: sha256_base64url(data),
        })
    }
}

fn decode_expected(expected: &str) -> Result<Vec<u8>, IntegrityError> {
    let trimmed = expected.trim();
    let bytes = if let Some(hex_part) = trimmed.strip_prefix("sha256:") {
        hex::decode(hex_part).map_err(|_| IntegrityError::InvalidFormat)?
    } else if trimmed.len() == 64 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        hex::decode(trimmed).map_err(|_| IntegrityError::InvalidFormat)?
    } else {
        URL_SAFE_NO_PAD
            .decode(trimmed.trim_end_matches('='))
            .map_err(|_| IntegrityError::InvalidFormat)?
    };

    if bytes.len() != SHA256.output_len() {
        return Err(IntegrityError::InvalidFormat);
    }
    Ok(bytes)
}

/// Errors that can occur during integrity verification
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// Expected hash could not be decoded as a SHA-256 digest
    #[error("invalid hash format, expected base64url or hex SHA-256")]
    InvalidFormat,

    /// Computed hash doesn't match the expected hash
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        /// Expected hash as given by the manifest
        expected: String,
        /// Actual hash (base64url)
        actual: String,
    },
}
