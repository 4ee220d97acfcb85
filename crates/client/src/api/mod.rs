//! Endpoint layer: one type per API operation.
//!
//! Every operation builds a [`RequestDescriptor`] from typed arguments and maps the
//! response status code to one of its declared outcomes. Both transports
//! ([`crate::Client`] and [`crate::BlockingClient`]) go through the same functions here,
//! so only the network call differs between them.

pub mod runs;
pub mod tools;

use crate::error::{ClientError, ModelError, Result};
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

/// Everything needed to issue one HTTP request, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the API base, with path parameters already percent-encoded.
    pub path: String,
    /// Query pairs in send order. Unset parameters are never present.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a query pair when `value` is set.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if sent.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve against the API base URL. The path is appended to the base path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the joined URL does not parse.
    pub fn url(&self, base_url: &Url) -> Result<Url> {
        let url = format!("{}{}", base_url.as_str().trim_end_matches('/'), self.path);
        let mut url = Url::parse(&url)
            .map_err(|e| ClientError::Config(format!("Invalid request URL '{url}': {e}")))?;

        if !self.query.is_empty() {
            let mut query = String::new();
            for (i, (key, value)) in self.query.iter().enumerate() {
                if i > 0 {
                    query.push('&');
                }
                query.push_str(&encode_component(key));
                query.push('=');
                query.push_str(&encode_component(value));
            }
            url.set_query(Some(&query));
        }

        Ok(url)
    }
}

/// Percent-encode a path parameter. Only RFC 3986 unreserved bytes pass through,
/// so `/`, `?` and `#` cannot change the shape of the path.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    encode_component(segment)
}

fn encode_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

/// An API operation.
pub trait Endpoint {
    /// The typed outcome for declared status codes.
    type Output;

    /// Operation id, used in logs.
    const NAME: &'static str;

    fn request(&self) -> RequestDescriptor;

    /// Map a response to its declared outcome; `Ok(None)` for undeclared status codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body of a declared status code does not decode.
    fn parse_response(status: u16, body: &[u8]) -> std::result::Result<Option<Self::Output>, ModelError>;
}

/// A response together with its parsed outcome.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// `None` when the status code is not declared by the operation.
    pub parsed: Option<T>,
}

/// Shared response mapping for both transports.
pub(crate) fn build_response<E: Endpoint>(
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    raise_on_unexpected_status: bool,
) -> Result<Response<E::Output>> {
    let parsed = E::parse_response(status.as_u16(), &body)?;
    if parsed.is_none() {
        tracing::warn!(
            operation = E::NAME,
            status = status.as_u16(),
            "undeclared response status"
        );
        if raise_on_unexpected_status {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
    }
    Ok(Response {
        status,
        headers,
        body,
        parsed,
    })
}
