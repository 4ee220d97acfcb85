//! Client configuration shared by both transports.

use crate::error::{ClientError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const ENV_API_URL: &str = "SUPERGLUE_API_URL";
pub const ENV_API_KEY: &str = "SUPERGLUE_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "SUPERGLUE_TIMEOUT_SECS";
pub const ENV_RAISE_ON_UNEXPECTED_STATUS: &str = "SUPERGLUE_RAISE_ON_UNEXPECTED_STATUS";

/// Connection settings. Read-only once a client is built from it.
#[derive(Clone)]
pub struct ClientConfig {
    /// API root; operation paths are appended to its path.
    pub base_url: Url,
    /// Bearer token. `None` sends no auth header.
    pub token: Option<String>,
    pub auth_header_name: String,
    /// Prepended to the token with a space. Empty sends the bare token.
    pub auth_prefix: String,
    /// Per-request timeout enforced by the transport. `None` = no timeout.
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// Turn undeclared status codes into [`ClientError::UnexpectedStatus`] instead of an
    /// empty result.
    pub raise_on_unexpected_status: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_header_name", &self.auth_header_name)
            .field("auth_prefix", &self.auth_prefix)
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .field("raise_on_unexpected_status", &self.raise_on_unexpected_status)
            .finish()
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `base_url` is not an absolute `http(s)` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        let scheme = base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ClientError::Config(format!(
                "Unsupported base URL scheme '{scheme}'"
            )));
        }
        Ok(Self {
            base_url,
            token: None,
            auth_header_name: "Authorization".to_string(),
            auth_prefix: "Bearer".to_string(),
            timeout: None,
            headers: Vec::new(),
            raise_on_unexpected_status: false,
        })
    }

    /// Build from `SUPERGLUE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `SUPERGLUE_API_URL` is missing or any variable is
    /// malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config(format!("{ENV_API_URL} is not set")))?;
        let mut cfg = Self::new(base_url.trim())?;

        if let Some(token) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            cfg.token = Some(token);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{raw}'"))
            })?;
            cfg.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_RAISE_ON_UNEXPECTED_STATUS) {
            cfg.raise_on_unexpected_status = parse_bool(&raw).ok_or_else(|| {
                ClientError::Config(format!(
                    "{ENV_RAISE_ON_UNEXPECTED_STATUS} must be a boolean, got '{raw}'"
                ))
            })?;
        }
        Ok(cfg)
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_auth_header(mut self, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self.auth_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn raise_on_unexpected_status(mut self, raise: bool) -> Self {
        self.raise_on_unexpected_status = raise;
        self
    }

    /// Headers attached to every request: the extra headers, then auth.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] if a name or value is not valid HTTP.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            map.insert(header_name(name)?, header_value(name, value)?);
        }
        if let Some(token) = &self.token {
            let value = if self.auth_prefix.is_empty() {
                token.clone()
            } else {
                format!("{} {token}", self.auth_prefix)
            };
            let mut value = header_value(&self.auth_header_name, &value)?;
            value.set_sensitive(true);
            map.insert(header_name(&self.auth_header_name)?, value);
        }
        Ok(map)
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidHeader(format!("invalid header name '{name}'")))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidHeader(format!("invalid value for header '{name}'")))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, ENV_API_KEY, ENV_API_URL, ENV_RAISE_ON_UNEXPECTED_STATUS, ENV_TIMEOUT_SECS};
    use crate::error::ClientError;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(ClientConfig::new("ftp://x"), Err(ClientError::Config(_))));
        assert!(matches!(ClientConfig::new("not a url"), Err(ClientError::Config(_))));
    }

    #[test]
    fn reads_env_values() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, " https://api.example.com/v1 "),
            (ENV_API_KEY, "sk_test"),
            (ENV_TIMEOUT_SECS, "30"),
            (ENV_RAISE_ON_UNEXPECTED_STATUS, "true"),
        ]))
        .expect("config");
        assert_eq!(cfg.base_url.as_str(), "https://api.example.com/v1");
        assert_eq!(cfg.token.as_deref(), Some("sk_test"));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
        assert!(cfg.raise_on_unexpected_status);
    }

    #[test]
    fn env_requires_base_url_and_valid_numbers() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "http://x"), (ENV_TIMEOUT_SECS, "soon")])),
            Err(ClientError::Config(_))
        ));
        let cfg = ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "http://x"), (ENV_TIMEOUT_SECS, "0")]))
            .expect("zero timeout");
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn auth_header_uses_prefix() {
        let cfg = ClientConfig::new("http://x")
            .expect("config")
            .with_token("abc")
            .with_header("x-org", "org-1");
        let headers = cfg.default_headers().expect("headers");
        assert_eq!(headers.get("authorization").map(|v| v.to_str().ok()), Some(Some("Bearer abc")));
        assert_eq!(headers.get("x-org").and_then(|v| v.to_str().ok()), Some("org-1"));

        let bare = cfg.with_auth_header("X-Api-Key", "");
        let headers = bare.default_headers().expect("headers");
        assert_eq!(headers.get("x-api-key").and_then(|v| v.to_str().ok()), Some("abc"));
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn invalid_header_is_reported() {
        let cfg = ClientConfig::new("http://x")
            .expect("config")
            .with_header("bad header", "v");
        assert!(matches!(cfg.default_headers(), Err(ClientError::InvalidHeader(_))));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ClientConfig::new("http://x").expect("config").with_token("secret-token");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
