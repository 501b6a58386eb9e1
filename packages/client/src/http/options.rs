//! The options record describing one request
//!
//! `RequestOptions` is a plain record: the engine reads it and never mutates
//! it. Callers build it directly, through the `with_*` record-copy builders,
//! or through the composable fragments of the `fhttp` façade.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{DEFAULT_METHOD, DEFAULT_SOCKET_TIMEOUT};
use crate::connect::Agent;
use crate::http::body::RequestBody;

/// Description of one HTTP request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// URI scheme including the trailing colon, e.g. `"https:"`.
    pub protocol: Option<String>,
    /// Credentials as `user:password`, sent as basic authorization.
    pub auth: Option<String>,
    /// Host, optionally with a port (`example.com:8080`).
    pub host: Option<String>,
    /// Explicit port; overrides a port given in `host`.
    pub port: Option<u16>,
    /// Path and query string.
    pub path: Option<String>,
    /// Fragment; kept for traceability, never sent.
    pub hash: Option<String>,
    /// HTTP method, `GET` when absent.
    pub method: Option<String>,
    /// Request headers. Keys are kept exactly as given.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: RequestBody,
    /// Unix domain socket to connect to instead of `host`.
    pub socket_path: Option<PathBuf>,
    /// Connection source shared across requests.
    pub agent: Option<Agent>,
    /// Bound on connection establishment.
    pub conn_timeout: Option<Duration>,
    /// Idle watchdog armed when the request is issued.
    pub idle_timeout: Option<Duration>,
}

impl RequestOptions {
    /// Empty options: `GET /` against `localhost` over plain HTTP.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    /// Effective request target.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => "/",
        }
    }

    /// Effective connect timeout.
    #[must_use]
    pub fn conn_timeout(&self) -> Duration {
        self.conn_timeout.unwrap_or(DEFAULT_SOCKET_TIMEOUT)
    }

    /// Effective idle timeout.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout.unwrap_or(DEFAULT_SOCKET_TIMEOUT)
    }

    /// Look up a request header by its exact key.
    #[must_use]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Returns true if a header with this name is present, ignoring ASCII case.
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|key| key.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    #[must_use]
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set one header, replacing any value stored under the same key.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the whole header mapping.
    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_socket_path(mut self, socket_path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(socket_path.into());
        self
    }

    #[must_use]
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    #[must_use]
    pub fn with_conn_timeout(mut self, timeout: Duration) -> Self {
        self.conn_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let options = RequestOptions::new();
        assert_eq!(options.method(), "GET");
        assert_eq!(options.path(), "/");
        assert_eq!(options.conn_timeout(), Duration::from_millis(60_000));
        assert_eq!(options.idle_timeout(), Duration::from_millis(60_000));
        assert!(options.body.is_empty());
    }

    #[test]
    fn header_keys_keep_their_case() {
        let options = RequestOptions::new()
            .with_header("X-Trace-Id", "abc")
            .with_header("x-trace-id", "def");

        assert_eq!(options.header("X-Trace-Id"), Some("abc"));
        assert_eq!(options.header("x-trace-id"), Some("def"));
        assert_eq!(options.headers.len(), 2);
        assert!(options.has_header("X-TRACE-ID"));
    }

    #[test]
    fn builders_copy_without_touching_the_original() {
        let base = RequestOptions::new().with_host("example.com");
        let posted = base.clone().with_method("POST");

        assert_eq!(base.method(), "GET");
        assert_eq!(posted.method(), "POST");
        assert_eq!(posted.host.as_deref(), Some("example.com"));
    }
}
