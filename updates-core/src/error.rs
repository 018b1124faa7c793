// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Update Error Types
//!
//! Unified error type for manifest retrieval, verification and downloads.
//! Codes returned by [`UpdatesError::code`] are stable and shared with the
//! host application.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::ResponseMetadata;
use crate::integrity::IntegrityError;

/// Boxed error produced by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for update operations.
pub type UpdatesResult<T> = Result<T, UpdatesError>;

/// Writing a downloaded file to disk failed.
pub const ERROR_CODE_WRITE_TO_DISK: i64 = 1002;
/// Response body was JSON but neither an object nor an array.
pub const ERROR_CODE_INVALID_RESPONSE_TYPE: i64 = 1040;
/// `manifestString` was present but not a string.
pub const ERROR_CODE_MANIFEST_STRING: i64 = 1041;
/// Manifest text did not decode to a JSON object.
pub const ERROR_CODE_MANIFEST_JSON: i64 = 1042;
/// Signature was present but not a string.
pub const ERROR_CODE_SIGNATURE_TYPE: i64 = 1043;
/// No variant of a legacy response matched the supported SDK versions.
pub const ERROR_CODE_NO_COMPATIBLE_UPDATE: i64 = 1044;
/// The verifier rejected the manifest signature.
pub const ERROR_CODE_VERIFICATION_FAILED: i64 = 1045;
/// A downloaded file did not match its expected hash.
pub const ERROR_CODE_HASH_MISMATCH: i64 = 1046;

/// Coarse classification of an [`UpdatesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network, TLS or timeout failure.
    Transport,
    /// Server answered with a non-2xx status.
    HttpStatus,
    /// Response body was not valid JSON.
    Parse,
    /// JSON had an unexpected shape or field type.
    Shape,
    /// No manifest variant matches this binary.
    Compatibility,
    /// Signature invalid or verifier failure.
    Verification,
    /// Persisting data failed.
    Persistence,
}

/// Unified error type for update operations.
#[derive(Error, Debug)]
pub enum UpdatesError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-2xx response; the message is the decoded body.
    #[error("{message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body decoded with its declared charset.
        message: String,
    },

    /// Response body could not be parsed as JSON.
    #[error("failed to parse response body: {0}")]
    Parse(#[source] serde_json::Error),

    /// Response body is neither a manifest object nor a legacy array.
    #[error("invalid update response: expected a JSON object or array")]
    InvalidResponseType,

    /// `manifestString` is present but not a string.
    #[error("manifestString should be a string")]
    ManifestStringNotString,

    /// Manifest text is not a JSON object.
    #[error("manifest should be a valid JSON object: {0}")]
    InvalidManifest(String),

    /// Signature is present but not a string.
    #[error("signature should be a string")]
    SignatureNotString,

    /// No legacy variant matches the configured SDK versions.
    #[error("no compatible update found for SDK versions {sdk_versions}")]
    NoCompatibleManifest {
        /// The configured SDK version list.
        sdk_versions: String,
    },

    /// Verifier reported the signature as invalid.
    #[error("manifest verification failed")]
    VerificationFailed,

    /// Verifier could not complete.
    #[error("manifest verifier error: {0}")]
    Verifier(#[source] BoxError),

    /// Downloaded data failed integrity verification.
    #[error("downloaded file failed integrity check: {0}")]
    Integrity(#[from] IntegrityError),

    /// Writing downloaded data to disk failed.
    #[error("could not write to {}: {source}", .path.display())]
    WriteToDisk {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The update store rejected the update.
    #[error("update store error: {0}")]
    Store(#[source] BoxError),
}

impl UpdatesError {
    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdatesError::Transport(_) => ErrorKind::Transport,
            UpdatesError::HttpStatus { .. } => ErrorKind::HttpStatus,
            UpdatesError::Parse(_) => ErrorKind::Parse,
            UpdatesError::InvalidResponseType
            | UpdatesError::ManifestStringNotString
            | UpdatesError::InvalidManifest(_)
            | UpdatesError::SignatureNotString => ErrorKind::Shape,
            UpdatesError::NoCompatibleManifest { .. } => ErrorKind::Compatibility,
            UpdatesError::VerificationFailed
            | UpdatesError::Verifier(_)
            | UpdatesError::Integrity(_) => ErrorKind::Verification,
            UpdatesError::WriteToDisk { .. } | UpdatesError::Store(_) => ErrorKind::Persistence,
        }
    }

    /// Stable interop code, or the HTTP status for non-2xx responses.
    ///
    /// Errors surfaced unchanged from a collaborator carry no code.
    pub fn code(&self) -> Option<i64> {
        match self {
            UpdatesError::HttpStatus { status, .. } => Some(i64::from(*status)),
            UpdatesError::InvalidResponseType => Some(ERROR_CODE_INVALID_RESPONSE_TYPE),
            UpdatesError::ManifestStringNotString => Some(ERROR_CODE_MANIFEST_STRING),
            UpdatesError::InvalidManifest(_) => Some(ERROR_CODE_MANIFEST_JSON),
            UpdatesError::SignatureNotString => Some(ERROR_CODE_SIGNATURE_TYPE),
            UpdatesError::NoCompatibleManifest { .. } => Some(ERROR_CODE_NO_COMPATIBLE_UPDATE),
            UpdatesError::VerificationFailed => Some(ERROR_CODE_VERIFICATION_FAILED),
            UpdatesError::Integrity(_) => Some(ERROR_CODE_HASH_MISMATCH),
            UpdatesError::WriteToDisk { .. } => Some(ERROR_CODE_WRITE_TO_DISK),
            UpdatesError::Transport(_)
            | UpdatesError::Parse(_)
            | UpdatesError::Verifier(_)
            | UpdatesError::Store(_) => None,
        }
    }
}

/// A failed fetch, with the response that caused it when there was one.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct FetchFailure {
    /// What went wrong.
    #[source]
    pub error: UpdatesError,
    /// Metadata of the originating response, if one was received.
    pub response: Option<ResponseMetadata>,
}

impl FetchFailure {
    /// Failure with no response attached.
    pub fn new(error: UpdatesError) -> Self {
        Self {
            error,
            response: None,
        }
    }

    /// Failure tied to a received response.
    pub fn with_response(error: UpdatesError, response: ResponseMetadata) -> Self {
        Self {
            error,
            response: Some(response),
        }
    }

    /// Shortcut for `self.error.kind()`.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Shortcut for `self.error.code()`.
    pub fn code(&self) -> Option<i64> {
        self.error.code()
    }
}

impl From<UpdatesError> for FetchFailure {
    fn from(error: UpdatesError) -> Self {
        FetchFailure::new(error)
    }
}
