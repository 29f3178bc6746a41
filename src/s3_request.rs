use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Request, Url};

use crate::error::Result;

/// Owned snapshot of the parts of a request that take part in signing.
///
/// Signing never mutates a snapshot in place: a signer returns a new value, so
/// two signings of the same input can be compared with `==`.
#[derive(Debug, Clone, PartialEq)]
pub struct SigningRequest {
    pub method: Method,
    /// Host as it appears in the URL, including `:port` when one is given.
    pub host: String,
    /// Percent-decoded path, kept as raw bytes: `%FF` decodes to `0xFF`.
    pub path: Vec<u8>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl SigningRequest {
    #[inline]
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            host: host.into(),
            path: path.into(),
            query: vec![],
            headers: HeaderMap::new(),
        }
    }

    #[inline]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header value. Repeating a name keeps every value in insertion order.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Snapshot a `reqwest` request.
    pub fn build(req: &Request) -> Self {
        Self::from_url(req.method().clone(), req.url(), req.headers().clone())
    }

    pub fn from_url(method: Method, url: &Url, headers: HeaderMap) -> Self {
        let path = percent_decode_str(url.path()).collect();
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            method,
            host: host_with_port(url),
            path,
            query,
            headers,
        }
    }

    /// Write the signed headers back onto the request, replacing the old ones.
    #[inline]
    pub fn apply(self, req: &mut Request) {
        *req.headers_mut() = self.headers;
    }

    /// Raw bytes of a header. Only the first value of a repeated header is returned.
    pub fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        self.headers.get(name).map(HeaderValue::as_bytes)
    }

    /// Header value as text, `None` when absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Everything about one signing attempt that does not come from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub time: DateTime<Utc>,
    /// Endpoint host (and port) that path-style requests are addressed to.
    pub base_endpoint: String,
    pub force_path_style: bool,
}

impl SigningContext {
    #[inline]
    pub fn new(time: DateTime<Utc>, base_endpoint: impl Into<String>) -> Self {
        Self {
            time,
            base_endpoint: base_endpoint.into(),
            force_path_style: false,
        }
    }

    #[inline]
    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }
}

pub(crate) fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
