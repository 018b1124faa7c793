// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP Layer
//!
//! Request construction and the transport abstraction.
//!
//! # Example
//!
//! ```
//! use updates_core::config::UpdatesConfig;
//! use updates_core::fatal_error::NoPendingError;
//! use updates_core::http::build_manifest_request;
//!
//! let config = UpdatesConfig::new("https://example.com/manifest").with_sdk_version("40.0.0");
//! let request = build_manifest_request(&config.update_url, &config, &NoPendingError);
//! assert_eq!(request.headers["expo-sdk-version"], "40.0.0");
//! ```

mod mock;
mod request;
mod transport;

pub use mock::MockTransport;
pub use request::{
    build_generic_request, build_manifest_request, HttpRequest, FATAL_ERROR_MAX_CHARS,
    HEADER_ACCEPT_SIGNATURE, HEADER_API_VERSION, HEADER_ENVIRONMENT, HEADER_FATAL_ERROR,
    HEADER_JSON_ERROR, HEADER_PLATFORM, HEADER_RELEASE_CHANNEL, HEADER_RUNTIME_VERSION,
    HEADER_SDK_VERSION, MANIFEST_ACCEPT, REQUEST_TIMEOUT,
};
pub use transport::{
    check_status, decode_body, fetch, HttpResponse, HttpTransport, ReqwestTransport,
    ResponseMetadata, TransportError,
};
