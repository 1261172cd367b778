//! Runtime configuration resolved from command line flags and environment.

use std::time::Duration;

use anyhow::{bail, Context};
use notices_core::{HttpClient, RegisteredNotices, RequestOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(base_url: &str, raw_headers: &[String], timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let headers = raw_headers
            .iter()
            .map(|raw| parse_header(raw).with_context(|| format!("invalid header {raw:?}")))
            .collect::<anyhow::Result<_>>()?;
        Ok(Self {
            base_url: base_url.to_string(),
            headers,
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }

    /// Names of the configured headers; values may be credentials.
    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn notices(&self) -> RegisteredNotices {
        let http = HttpClient::with_default_headers(&self.base_url, self.headers.clone());
        let mut options = RequestOptions::new();
        options.timeout = self.timeout;
        RegisteredNotices::with_client(http).with_options(options)
    }
}

/// Parse a `Name: Value` header argument.
fn parse_header(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("expected `Name: Value`");
    };
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        bail!("header name must be a single non-empty token");
    }
    Ok((name.to_string(), value.trim().to_string()))
}
