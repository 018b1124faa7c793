// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Updates Core Library
//!
//! Over-the-air update manifest retrieval and verification.
//! Fetches the manifest describing the latest update, resolves its signature
//! (embedded in the body or sent as a header), hands signed manifests to an
//! external verifier and assembles an immutable [`Update`].
//!
//! Cryptography, the update database and launch selection are supplied by
//! the host through the [`SignatureVerifier`] and [`UpdateStore`] traits.

pub mod config;
pub mod downloader;
pub mod error;
pub mod fatal_error;
pub mod http;
pub mod integrity;
pub mod manifest;
pub mod update;

pub use config::{CachePolicy, ConfigError, UpdatesConfig};
pub use downloader::{DownloadedFile, FileDownloader};
pub use error::{BoxError, ErrorKind, FetchFailure, UpdatesError, UpdatesResult};
pub use fatal_error::{FatalErrorHolder, NoPendingError, PendingErrorSource};
pub use http::{
    HttpRequest, HttpResponse, HttpTransport, MockTransport, ReqwestTransport, ResponseMetadata,
    TransportError,
};
pub use integrity::IntegrityError;
pub use manifest::{ExtractedManifest, JsonObject, Manifest, SignatureVerifier};
pub use update::{AssetEntry, Update, UpdateStore};
