// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Scripted in-memory transport for tests. Replies are served in the order
//! they were queued and every executed request is recorded.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::request::HttpRequest;
use super::transport::{HttpResponse, HttpTransport, ResponseMetadata, TransportError};

enum Reply {
    Response {
        status: u16,
        headers: HeaderMap,
        body: Bytes,
    },
    BodyError {
        status: u16,
        headers: HeaderMap,
        message: String,
    },
    Error(String),
}

/// Mock transport for testing.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response. Invalid header pairs are ignored.
    pub fn push_response(&self, status: u16, headers: &[(&str, &str)], body: impl Into<Bytes>) {
        self.lock_replies().push_back(Reply::Response {
            status,
            headers: header_map(headers),
            body: body.into(),
        });
    }

    /// Queues a response whose body fails after the headers arrived.
    pub fn push_body_error(&self, status: u16, headers: &[(&str, &str)], message: impl Into<String>) {
        self.lock_replies().push_back(Reply::BodyError {
            status,
            headers: header_map(headers),
            message: message.into(),
        });
    }

    /// Queues a 200 response with a JSON body.
    pub fn push_json(&self, body: &str) {
        self.push_response(
            200,
            &[("content-type", "application/json")],
            body.to_string(),
        );
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock_replies().push_back(Reply::Error(message.into()));
    }

    /// Requests executed so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests executed so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let reply = self.lock_replies().pop_front();
        match reply {
            Some(Reply::Response {
                status,
                headers,
                body,
            }) => Ok(HttpResponse {
                metadata: ResponseMetadata {
                    url: request.url.clone(),
                    status,
                    headers,
                },
                body,
            }),
            Some(Reply::BodyError {
                status,
                headers,
                message,
            }) => Err(TransportError::new(message).with_response(ResponseMetadata {
                url: request.url.clone(),
                status,
                headers,
            })),
            Some(Reply::Error(message)) => Err(TransportError::new(message)),
            None => Err(TransportError::new(format!(
                "no scripted response for {}",
                request.url
            ))),
        }
    }
}

fn header_map(headers: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            map.append(name, value);
        }
    }
    map
}
