// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! File Downloader - entry point for manifest and asset downloads
//!
//! Wires the request builder, transport, extractor, verifier and assembler
//! together. Each manifest fetch moves through
//! `Requesting → Transporting → Extracting → [Verifying] → Assembling`
//! and ends with exactly one `Update` or one [`FetchFailure`]. Nothing is
//! retried here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::UpdatesConfig;
use crate::error::{FetchFailure, UpdatesError};
use crate::fatal_error::{NoPendingError, PendingErrorSource};
use crate::http::{
    build_generic_request, build_manifest_request, fetch, HttpTransport, ResponseMetadata,
};
use crate::integrity::{sha256_base64url, verify_sha256};
use crate::manifest::{extract_manifest, verify_manifest, SignatureVerifier};
use crate::update::{assemble_update, Update, UpdateStore};

/// A file written by [`FileDownloader::download_file`].
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Where the file was written.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// SHA-256 of the contents (base64url).
    pub hash: String,
    /// The response the data came from.
    pub response: ResponseMetadata,
}

/// Downloads manifests and files for one update configuration.
///
/// Cheap to clone; clones share the transport and collaborators.
#[derive(Clone)]
pub struct FileDownloader {
    config: Arc<UpdatesConfig>,
    transport: Arc<dyn HttpTransport>,
    verifier: Arc<dyn SignatureVerifier>,
    store: Arc<dyn UpdateStore>,
    fatal_errors: Arc<dyn PendingErrorSource>,
}

impl FileDownloader {
    /// Create a downloader with no pending fatal error source.
    pub fn new(
        config: UpdatesConfig,
        transport: Arc<dyn HttpTransport>,
        verifier: Arc<dyn SignatureVerifier>,
        store: Arc<dyn UpdateStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            verifier,
            store,
            fatal_errors: Arc::new(NoPendingError),
        }
    }

    /// Report the previous launch's fatal error with the next manifest request.
    pub fn with_fatal_errors(mut self, source: Arc<dyn PendingErrorSource>) -> Self {
        self.fatal_errors = source;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &UpdatesConfig {
        &self.config
    }

    /// Fetch, verify and assemble the manifest at the configured URL.
    pub async fn download_manifest(&self) -> Result<Update, FetchFailure> {
        let config = self.config.as_ref();
        let request =
            build_manifest_request(&config.update_url, config, self.fatal_errors.as_ref());
        let (body, response) = fetch(self.transport.as_ref(), &request).await?;

        let extracted = match extract_manifest(&body, &response.headers, config) {
            Ok(extracted) => extracted,
            Err(e) => return Err(FetchFailure::with_response(e, response)),
        };

        let manifest = match verify_manifest(extracted, self.verifier.as_ref(), config).await {
            Ok(manifest) => manifest,
            Err(e) => return Err(FetchFailure::with_response(e, response)),
        };

        let update = assemble_update(
            manifest,
            response,
            Arc::clone(&self.config),
            Arc::clone(&self.store),
        );
        info!(
            id = update.id().unwrap_or("<none>"),
            verified = update.is_verified(),
            "manifest downloaded"
        );
        Ok(update)
    }

    /// Continuation-style [`download_manifest`](Self::download_manifest).
    ///
    /// `on_complete` runs exactly once on a runtime worker, with either the
    /// update or the failure. If the runtime shuts down first it never runs.
    pub fn download_manifest_then<F>(&self, runtime: &Handle, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Update, FetchFailure>) + Send + 'static,
    {
        let downloader = self.clone();
        runtime.spawn(async move {
            let result = downloader.download_manifest().await;
            on_complete(result);
        })
    }

    /// Fetch arbitrary data with the default headers.
    pub async fn download_data(&self, url: &str) -> Result<(Bytes, ResponseMetadata), FetchFailure> {
        let request = build_generic_request(url, &self.config);
        fetch(self.transport.as_ref(), &request).await
    }

    /// Download `url` to `destination`, optionally checking its SHA-256.
    ///
    /// The file is written to a temp file and renamed into place, so a
    /// failed download never leaves a partial file at `destination`.
    pub async fn download_file(
        &self,
        url: &str,
        destination: &Path,
        expected_hash: Option<&str>,
    ) -> Result<DownloadedFile, FetchFailure> {
        let (data, response) = self.download_data(url).await?;

        if let Some(expected) = expected_hash {
            if let Err(e) = verify_sha256(&data, expected) {
                return Err(FetchFailure::with_response(e.into(), response));
            }
        }

        if let Err(e) = atomic_write(destination, &data).await {
            return Err(FetchFailure::with_response(e, response));
        }
        debug!(url, path = %destination.display(), size = data.len(), "file downloaded");

        Ok(DownloadedFile {
            path: destination.to_path_buf(),
            size: data.len() as u64,
            hash: sha256_base64url(&data),
            response,
        })
    }
}

/// Atomic file write (write to temp, then rename)
async fn atomic_write(path: &Path, data: &[u8]) -> Result<(), UpdatesError> {
    let write_error = |source: std::io::Error| UpdatesError::WriteToDisk {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let mut temp_name = OsString::from(path.as_os_str());
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let written = match tokio::fs::write(&temp_path, data).await {
        Ok(()) => tokio::fs::rename(&temp_path, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(write_error(e));
    }
    Ok(())
}
