//! Client configuration, passed explicitly to `HttpCronClient`.

use std::fmt;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Connection settings shared by every request a client issues. Read-only once the
/// client is built.
#[derive(Clone)]
pub struct ClientConfig {
    /// Scheme, host and optional path prefix; endpoint paths are appended to it.
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>`. Takes precedence over basic auth.
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Extra headers added to every request.
    pub headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            username: None,
            password: None,
            headers: Vec::new(),
        }
    }

    /// Reads `CRON_API_URL`, `CRON_API_TOKEN`, `CRON_API_USERNAME`, `CRON_API_PASSWORD`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CRON_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            token: std::env::var("CRON_API_TOKEN").ok(),
            username: std::env::var("CRON_API_USERNAME").ok(),
            password: std::env::var("CRON_API_PASSWORD").ok(),
            headers: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers.len())
            .finish()
    }
}
