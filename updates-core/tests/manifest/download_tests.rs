// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for generic data and file downloads

use tempfile::TempDir;
use updates_core::error::{ERROR_CODE_HASH_MISMATCH, ERROR_CODE_WRITE_TO_DISK};
use updates_core::http::{HEADER_ACCEPT_SIGNATURE, HEADER_PLATFORM};
use updates_core::integrity::sha256_base64url;
use updates_core::ErrorKind;

use crate::common::helpers::{fixture, test_config, Verdict};

const ASSET_URL: &str = "https://cdn.example.com/assets/logo.png";

#[tokio::test]
async fn test_download_data_uses_generic_headers() {
    let fx = fixture(test_config(), Verdict::Valid);
    fx.transport.push_response(200, &[], &b"\x89PNG"[..]);

    let (data, response) = fx.downloader.download_data(ASSET_URL).await.unwrap();

    assert_eq!(&data[..], b"\x89PNG");
    assert_eq!(response.url, ASSET_URL);
    let request = &fx.transport.requests()[0];
    assert!(request.headers.contains_key(HEADER_PLATFORM));
    assert!(request.headers.get(HEADER_ACCEPT_SIGNATURE).is_none());
}

#[tokio::test]
async fn test_download_file_verifies_and_writes() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("assets").join("logo.png");
    let contents = b"image bytes".to_vec();
    let hash = sha256_base64url(&contents);

    let fx = fixture(test_config(), Verdict::Valid);
    fx.transport.push_response(200, &[], contents.clone());

    let file = fx
        .downloader
        .download_file(ASSET_URL, &destination, Some(&hash))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), contents);
    assert_eq!(file.size, contents.len() as u64);
    assert_eq!(file.hash, hash);
    assert_eq!(file.path, destination);
}

#[tokio::test]
async fn test_download_file_hash_mismatch_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("logo.png");
    let wrong = sha256_base64url(b"something else");

    let fx = fixture(test_config(), Verdict::Valid);
    fx.transport.push_response(200, &[], &b"image bytes"[..]);

    let failure = fx
        .downloader
        .download_file(ASSET_URL, &destination, Some(&wrong))
        .await
        .unwrap_err();

    assert_eq!(failure.code(), Some(ERROR_CODE_HASH_MISMATCH));
    assert!(failure.response.is_some());
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_download_file_write_failure() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let fx = fixture(test_config(), Verdict::Valid);
    fx.transport.push_response(200, &[], &b"data"[..]);

    let failure = fx
        .downloader
        .download_file(ASSET_URL, &blocker.join("logo.png"), None)
        .await
        .unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Persistence);
    assert_eq!(failure.code(), Some(ERROR_CODE_WRITE_TO_DISK));
}

#[tokio::test]
async fn test_download_file_http_error() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("logo.png");

    let fx = fixture(test_config(), Verdict::Valid);
    fx.transport.push_response(
        403,
        &[("content-type", "text/plain; charset=utf-8")],
        "forbidden",
    );

    let failure = fx
        .downloader
        .download_file(ASSET_URL, &destination, None)
        .await
        .unwrap_err();

    assert_eq!(failure.code(), Some(403));
    assert_eq!(failure.error.to_string(), "forbidden");
    assert!(!destination.exists());
}
