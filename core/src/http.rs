//! HTTP transport types and the pluggable network layer.
//!
//! # Design
//! Requests and responses are plain data. `HttpClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and normalises the returned
//! `HttpResponse`, so the request/response logic stays deterministic and a
//! test can swap the network for anything that implements `Transport`.
//!
//! `UreqTransport` is the default. It disables ureq's status-as-error
//! behaviour so 4xx/5xx responses come back as data and status
//! interpretation happens in one place.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Methods that carry a JSON body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built per call by `HttpClient::build_request` and dropped once the call
/// returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Upper bound for the whole round trip, enforced by the transport.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for 204, an explicit `Content-Length: 0`, or an empty body.
    pub fn is_empty(&self) -> bool {
        self.status == 204
            || self.header("content-length").map(str::trim) == Some("0")
            || self.body.is_empty()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes one `HttpRequest` and returns whatever the server answered.
///
/// Implementations report every status as `Ok`; only failures below HTTP
/// (DNS, connect, timeout, I/O) are `ApiError::Transport`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// Response bodies are read as bytes and decoded lossily, so a body that is
/// not UTF-8 never hides the status behind a transport error. Body size is
/// unbounded unless `with_body_limit` sets a cap.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Fail with `ApiError::Transport` when a response body exceeds `bytes`.
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    fn send(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match request.method {
            HttpMethod::Get => {
                let builder = with_timeout(self.agent.get(&request.url), request.timeout);
                with_headers(builder, &request.headers).call()
            }
            HttpMethod::Delete => {
                let builder = with_timeout(self.agent.delete(&request.url), request.timeout);
                with_headers(builder, &request.headers).call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let builder = if request.method == HttpMethod::Post {
                    self.agent.post(&request.url)
                } else {
                    self.agent.put(&request.url)
                };
                let builder = with_headers(with_timeout(builder, request.timeout), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut response = self
            .send(request)
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn with_timeout<B>(builder: ureq::RequestBuilder<B>, timeout: Option<Duration>) -> ureq::RequestBuilder<B> {
    match timeout {
        Some(limit) => builder.config().timeout_global(Some(limit)).build(),
        None => builder,
    }
}
