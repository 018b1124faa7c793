// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for manifest and generic request construction

use proptest::prelude::*;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use updates_core::http::{
    build_generic_request, build_manifest_request, HEADER_ACCEPT_SIGNATURE, HEADER_API_VERSION,
    HEADER_ENVIRONMENT, HEADER_FATAL_ERROR, HEADER_JSON_ERROR, HEADER_PLATFORM,
    HEADER_RELEASE_CHANNEL, HEADER_RUNTIME_VERSION, HEADER_SDK_VERSION, MANIFEST_ACCEPT,
    REQUEST_TIMEOUT,
};
use updates_core::{CachePolicy, FatalErrorHolder, NoPendingError, PendingErrorSource};

use crate::common::helpers::test_config;
use crate::common::strategies::cache_policy_strategy;

const URL: &str = "https://updates.example.com/manifest";

#[test]
fn test_manifest_request_headers_current_protocol() {
    let config = test_config().with_release_channel("beta");
    let request = build_manifest_request(URL, &config, &NoPendingError);

    assert_eq!(request.url, URL);
    assert_eq!(request.headers[ACCEPT], MANIFEST_ACCEPT);
    assert_eq!(request.headers[HEADER_JSON_ERROR], "true");
    assert_eq!(request.headers[HEADER_ACCEPT_SIGNATURE], "true");
    assert_eq!(request.headers[HEADER_RELEASE_CHANNEL], "beta");
    assert_eq!(request.headers[HEADER_SDK_VERSION], "40.0.0");
    assert_eq!(request.headers[HEADER_API_VERSION], "1");
    assert_eq!(request.headers[HEADER_ENVIRONMENT], "BARE");
    assert!(request.headers.contains_key(HEADER_PLATFORM));
    assert!(request.headers.get(HEADER_FATAL_ERROR).is_none());
    assert_eq!(request.timeout, REQUEST_TIMEOUT);
}

#[test]
fn test_legacy_protocol_does_not_request_signature() {
    let config = test_config().with_legacy_manifest(true);
    let request = build_manifest_request(URL, &config, &NoPendingError);
    assert_eq!(request.headers[HEADER_ACCEPT_SIGNATURE], "false");
}

#[test]
fn test_runtime_version_replaces_sdk_version() {
    let config = test_config().with_runtime_version("1.2.0");
    let request = build_manifest_request(URL, &config, &NoPendingError);

    assert_eq!(request.headers[HEADER_RUNTIME_VERSION], "1.2.0");
    assert!(request.headers.get(HEADER_SDK_VERSION).is_none());
}

#[test]
fn test_custom_headers_override_defaults() {
    let config = test_config()
        .with_request_header("Expo-Release-Channel", "override")
        .with_request_header("Expo-Platform", "web")
        .with_request_header("X-Extra", "1");
    let request = build_manifest_request(URL, &config, &NoPendingError);

    assert_eq!(request.headers[HEADER_RELEASE_CHANNEL], "override");
    assert_eq!(request.headers[HEADER_PLATFORM], "web");
    assert_eq!(request.headers["x-extra"], "1");
    assert_eq!(request.headers.get_all(HEADER_RELEASE_CHANNEL).iter().count(), 1);
}

#[test]
fn test_fatal_error_sent_once() {
    let holder = FatalErrorHolder::with_error("TypeError: undefined is not a function");
    let config = test_config();

    let first = build_manifest_request(URL, &config, &holder);
    let second = build_manifest_request(URL, &config, &holder);

    assert_eq!(
        first.headers[HEADER_FATAL_ERROR],
        "TypeError: undefined is not a function"
    );
    assert!(second.headers.get(HEADER_FATAL_ERROR).is_none());
    assert_eq!(holder.take_pending_error(), None);
}

#[test]
fn test_generic_request_default_and_custom_headers_only() {
    let config = test_config().with_request_header("Authorization", "Bearer t");
    let request = build_generic_request("https://cdn.example.com/a.png", &config);

    assert_eq!(request.headers["authorization"], "Bearer t");
    assert_eq!(request.headers[HEADER_API_VERSION], "1");
    assert!(request.headers.get(HEADER_JSON_ERROR).is_none());
    assert!(request.headers.get(HEADER_RELEASE_CHANNEL).is_none());
    assert_eq!(request.headers.len(), 4);
}

#[test]
fn test_legacy_wire_headers_force_no_cache() {
    let config = test_config()
        .with_legacy_manifest(true)
        .with_request_header("Cache-Control", "max-age=600");
    let request = build_manifest_request(URL, &config, &NoPendingError);
    let wire = request.wire_headers();

    assert_eq!(wire[CACHE_CONTROL], "no-cache");
    assert_eq!(wire[PRAGMA], "no-cache");
}

#[test]
fn test_protocol_default_sends_no_cache_directive() {
    let request = build_manifest_request(URL, &test_config(), &NoPendingError);
    assert!(request.wire_headers().get(CACHE_CONTROL).is_none());
}

proptest! {
    #[test]
    fn prop_legacy_always_bypasses_cache(policy in cache_policy_strategy()) {
        let config = test_config().with_cache_policy(policy).with_legacy_manifest(true);
        let request = build_manifest_request(URL, &config, &NoPendingError);
        prop_assert_eq!(request.cache_policy, CachePolicy::ReloadIgnoringCache);
    }

    #[test]
    fn prop_current_protocol_honors_policy(policy in cache_policy_strategy()) {
        let config = test_config().with_cache_policy(policy);
        let request = build_manifest_request(URL, &config, &NoPendingError);
        prop_assert_eq!(request.cache_policy, policy);
    }
}
