//! HTTP client configuration and construction

use std::time::Duration;

use super::HttpClient;
use crate::config::{ConfigResult, HttpConfig};
use crate::connect::Agent;

/// HTTP client builder for configuration
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpConfig,
    connector: Option<Agent>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    #[must_use]
    pub fn tcp_nodelay(mut self, enable: bool) -> Self {
        self.config.tcp.nodelay = enable;
        self
    }

    /// Trust the platform's native roots in addition to the webpki roots
    #[must_use]
    pub fn tls_native_roots(mut self, enable: bool) -> Self {
        self.config.tls.use_native_certs = enable;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Use `connector` instead of direct connections
    #[must_use]
    pub fn connector(mut self, connector: Agent) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Validate the configuration and build the client
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`HttpConfig::validate`].
    pub fn build(self) -> ConfigResult<HttpClient> {
        self.config.validate()?;
        Ok(match self.connector {
            Some(connector) => HttpClient::with_config_and_connector(self.config, connector),
            None => HttpClient::with_config(self.config),
        })
    }
}

impl HttpClient {
    /// Start configuring a client
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_settings() {
        let client = HttpClient::builder()
            .connect_timeout(Duration::from_secs(2))
            .idle_timeout(Duration::from_secs(3))
            .tcp_nodelay(false)
            .user_agent("fhttp/0.1")
            .build()
            .expect("valid configuration");

        assert_eq!(client.config().connect_timeout, Duration::from_secs(2));
        assert_eq!(client.config().idle_timeout, Duration::from_secs(3));
        assert!(!client.config().tcp_nodelay());
        assert_eq!(client.config().user_agent.as_deref(), Some("fhttp/0.1"));
    }

    #[test]
    fn builder_rejects_zero_timeouts() {
        assert!(HttpClient::builder()
            .connect_timeout(Duration::ZERO)
            .build()
            .is_err());
    }
}
