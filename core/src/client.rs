//! Generic JSON-over-HTTP client bound to one base URL.
//!
//! # Design
//! `HttpClient` holds an immutable `base_url`, immutable default headers and
//! a `Transport`. Every verb goes through the same three steps:
//! `build_request` (pure), `Transport::execute` (I/O), `parse_response`
//! (pure). Nothing is cached or retried; one call is one request.
//!
//! Headers are layered per call: defaults, then the automatic
//! `Accept`/`Content-Type` headers, then caller headers. Later layers
//! replace earlier ones by case-insensitive name.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

const JSON: &str = "application/json";

/// Per-call options. Method and body are chosen by the verb, never here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// JSON HTTP client for one base URL.
///
/// Successful calls return `Ok(Some(value))`, or `Ok(None)` when the server
/// sent no content. Safe to share between threads: calls never mutate the
/// client.
#[derive(Debug, Clone)]
pub struct HttpClient<T = UreqTransport> {
    base_url: String,
    default_headers: Vec<(String, String)>,
    transport: T,
}

impl HttpClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Vec::new(), UreqTransport::new())
    }

    pub fn with_default_headers(base_url: &str, default_headers: Vec<(String, String)>) -> Self {
        Self::with_transport(base_url, default_headers, UreqTransport::new())
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(base_url: &str, default_headers: Vec<(String, String)>, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<Option<R>, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, None, options);
        self.send(request)
    }

    pub fn post<B, R>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let request = self.build_request(HttpMethod::Post, path, Some(body), options);
        self.send(request)
    }

    pub fn put<B, R>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let request = self.build_request(HttpMethod::Put, path, Some(body), options);
        self.send(request)
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<Option<R>, ApiError> {
        let request = self.build_request(HttpMethod::Delete, path, None, options);
        self.send(request)
    }

    /// Describe a request without sending it.
    ///
    /// `path` is appended verbatim to the base URL. `body` must already be
    /// JSON text; it is attached only for methods that carry a body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        options: &RequestOptions,
    ) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        overlay(&mut headers, "Accept", JSON);
        if method.has_body() {
            overlay(&mut headers, "Content-Type", JSON);
        }
        for (name, value) in &options.headers {
            overlay(&mut headers, name, value);
        }

        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body: body.filter(|_| method.has_body()),
            timeout: options.timeout,
        }
    }

    fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<Option<R>, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let result = self
            .transport
            .execute(&request)
            .and_then(parse_response::<R>);
        if let Err(e) = &result {
            tracing::warn!(method = %request.method, url = %request.url, "request failed: {e}");
        }
        result
    }
}

/// Normalise a raw response into decoded JSON, "no content", or an error.
pub fn parse_response<R: DeserializeOwned>(response: HttpResponse) -> Result<Option<R>, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            status: response.status,
            body: response.body,
        });
    }
    if response.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Set `name` to `value`, replacing an existing header of the same name.
fn overlay(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use super::*;

    /// Records every request and answers with a canned response.
    struct CannedTransport {
        response: Result<HttpResponse, String>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.clone().map_err(ApiError::Transport)
        }
    }

    fn client(transport: CannedTransport) -> HttpClient<CannedTransport> {
        HttpClient::with_transport(
            "https://example.test/api",
            vec![("X-Client".to_string(), "notices".to_string())],
            transport,
        )
    }

    fn header_map(request: &HttpRequest) -> BTreeMap<String, String> {
        request
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect()
    }

    #[test]
    fn get_returns_parsed_json() {
        let c = client(CannedTransport::answering(200, r#"{"totalResults":3}"#));
        let value: Value = c.get("/", &RequestOptions::new()).unwrap().unwrap();
        assert_eq!(value, json!({ "totalResults": 3 }));

        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://example.test/api/");
        assert!(req.body.is_none());
    }

    #[test]
    fn no_content_is_none() {
        let c = client(CannedTransport::answering(204, ""));
        let value: Option<Value> = c.delete("/items/1", &RequestOptions::new()).unwrap();
        assert!(value.is_none());

        let c = client(CannedTransport::answering(200, ""));
        let value: Option<Value> = c.get("/empty", &RequestOptions::new()).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn non_success_status_is_http_error() {
        let c = client(CannedTransport::answering(404, "no such company"));
        let err = c.get::<Value>("/0000000-0", &RequestOptions::new()).unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such company");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[test]
    fn transport_failure_is_propagated() {
        let c = client(CannedTransport::failing("connection refused"));
        let err = c.get::<Value>("/", &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref m) if m == "connection refused"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn bad_json_is_deserialization_error() {
        let c = client(CannedTransport::answering(200, "not json"));
        let err = c.get::<Value>("/", &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn post_serializes_body_and_sets_content_type() {
        let c = client(CannedTransport::answering(201, r#"{"ok":true}"#));
        let _: Option<Value> = c
            .post("/items", &json!({ "name": "Oy Esimerkki Ab" }), &RequestOptions::new())
            .unwrap();

        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Post);
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Oy Esimerkki Ab");
        let headers = header_map(&req);
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["x-client"], "notices");
    }

    #[test]
    fn caller_content_type_overrides_automatic_one() {
        let c = client(CannedTransport::answering(200, "{}"));
        let options = RequestOptions::new().header("content-type", "application/merge-patch+json");
        let _: Option<Value> = c.put("/items/1", &json!({}), &options).unwrap();

        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.header("Content-Type"), Some("application/merge-patch+json"));
        assert_eq!(
            req.headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .count(),
            1
        );
    }

    #[test]
    fn caller_headers_win_over_defaults() {
        let c = client(CannedTransport::answering(200, "{}"));
        let options = RequestOptions::new()
            .header("x-client", "override")
            .header("X-Trace", "abc");
        let req = c.build_request(HttpMethod::Get, "/", None, &options);
        let headers = header_map(&req);
        assert_eq!(headers["x-client"], "override");
        assert_eq!(headers["x-trace"], "abc");
        assert_eq!(req.headers[0].0, "X-Client");
    }

    #[test]
    fn read_methods_have_no_content_type() {
        let c = client(CannedTransport::answering(200, "{}"));
        for method in [HttpMethod::Get, HttpMethod::Delete] {
            let req = c.build_request(method, "/", Some("{}".to_string()), &RequestOptions::new());
            assert!(req.header("content-type").is_none());
            assert!(req.body.is_none());
        }
    }

    #[test]
    fn default_content_type_is_replaced_for_writes() {
        let c = HttpClient::with_transport(
            "https://example.test",
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            CannedTransport::answering(200, "{}"),
        );
        let req = c.build_request(HttpMethod::Post, "/", Some("{}".to_string()), &RequestOptions::new());
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn timeout_is_passed_to_transport() {
        let c = client(CannedTransport::answering(200, "{}"));
        let options = RequestOptions::new().timeout(Duration::from_secs(5));
        let _: Option<Value> = c.get("/", &options).unwrap();
        assert_eq!(c.transport().last().timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = HttpClient::with_transport("https://example.test/v3/", Vec::new(), CannedTransport::answering(200, "{}"));
        assert_eq!(c.base_url(), "https://example.test/v3");
        let req = c.build_request(HttpMethod::Get, "/description", None, &RequestOptions::new());
        assert_eq!(req.url, "https://example.test/v3/description");
    }

    #[test]
    fn concurrent_calls_share_one_client() {
        let c = client(CannedTransport::answering(200, r#"{"n":1}"#));
        std::thread::scope(|s| {
            for i in 0..4 {
                let c = &c;
                s.spawn(move || {
                    let value: Value = c.get(&format!("/{i}"), &RequestOptions::new()).unwrap().unwrap();
                    assert_eq!(value["n"], 1);
                });
            }
        });
        assert_eq!(c.transport().seen.lock().unwrap().len(), 4);
    }
}
