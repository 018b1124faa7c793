// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Response Transport
//!
//! Platform-agnostic abstraction for executing requests, plus the
//! status normalization shared by every transport.

use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use super::request::{HttpRequest, REQUEST_TIMEOUT};
use crate::error::{BoxError, FetchFailure, UpdatesError};

/// Metadata of a received response.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Final URL, after redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
}

impl ResponseMetadata {
    /// Looks up a response header.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Whether the status is in [200, 300).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A complete response: metadata plus the fully read body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status, headers and final URL.
    pub metadata: ResponseMetadata,
    /// Response body.
    pub body: Bytes,
}

/// Failure to obtain a complete response.
///
/// When the status line and headers arrived but the body could not be read,
/// `response` carries them.
#[derive(Debug)]
pub struct TransportError {
    /// Underlying client error.
    pub source: BoxError,
    /// Metadata of the partially received response.
    pub response: Option<ResponseMetadata>,
}

impl TransportError {
    /// Failure before any response was received.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
            response: None,
        }
    }

    /// Attach the metadata of the response whose body failed.
    pub fn with_response(mut self, response: ResponseMetadata) -> Self {
        self.response = Some(response);
        self
    }
}

impl<E> From<E> for TransportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        TransportError::new(error)
    }
}

impl From<TransportError> for FetchFailure {
    fn from(error: TransportError) -> Self {
        FetchFailure {
            error: UpdatesError::Transport(error.source),
            response: error.response,
        }
    }
}

/// Executes requests against some HTTP client.
///
/// Implementations follow redirects and return any response, whatever its
/// status. Only failures to obtain a complete response are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes the request and reads the whole body.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Executes `request` and normalizes non-2xx statuses into errors.
pub async fn fetch(
    transport: &dyn HttpTransport,
    request: &HttpRequest,
) -> Result<(Bytes, ResponseMetadata), FetchFailure> {
    let response = transport.execute(request).await?;
    check_status(response)
}

/// Splits a response into body and metadata, or turns a non-2xx status
/// into [`UpdatesError::HttpStatus`] carrying the decoded body.
pub fn check_status(response: HttpResponse) -> Result<(Bytes, ResponseMetadata), FetchFailure> {
    let HttpResponse { metadata, body } = response;
    if metadata.is_success() {
        return Ok((body, metadata));
    }

    let message = decode_body(&body, &metadata.headers);
    debug!(status = metadata.status, url = %metadata.url, "request failed with HTTP status");
    Err(FetchFailure::with_response(
        UpdatesError::HttpStatus {
            status: metadata.status,
            message,
        },
        metadata,
    ))
}

/// Decodes a body with the charset declared in `Content-Type`.
///
/// Falls back to UTF-8 when no charset is declared or the label is unknown.
pub fn decode_body(body: &[u8], headers: &HeaderMap) -> String {
    let encoding = declared_charset(headers)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the fixed request timeout.
    pub fn new() -> Result<Self, UpdatesError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("updates-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpdatesError::Transport(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (e.g. one shared with the host).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(&request.url)
            .headers(request.wire_headers())
            .timeout(request.timeout)
            .send()
            .await?;

        let metadata = ResponseMetadata {
            url: response.url().to_string(),
            status: response.status().as_u16(),
            headers: response.headers().clone(),
        };
        match response.bytes().await {
            Ok(body) => Ok(HttpResponse { metadata, body }),
            Err(e) => {
                debug!(status = metadata.status, url = %metadata.url, "response body read failed");
                Err(TransportError::new(e).with_response(metadata))
            }
        }
    }
}
