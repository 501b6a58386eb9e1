//! Core HTTP client implementation
//!
//! An [`HttpClient`] binds a configuration, a default connection source and a
//! set of statistics. Cloning a client shares all three.

use std::sync::Arc;

use super::stats::ClientStats;
use crate::config::HttpConfig;
use crate::connect::{Agent, DirectConnector};
use crate::http::options::RequestOptions;
use crate::http::response::{DecodedResponse, ResponseHead};
use crate::operations::request::request_task;
use crate::operations::stream::stream_task;
use crate::operations::verbs::Verb;
use crate::task::Task;

/// HTTP client executing requests described by [`RequestOptions`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: Arc<HttpConfig>,
    connector: Agent,
    stats: Arc<ClientStats>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create HttpClient with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Create HttpClient with custom configuration
    ///
    /// The configuration is used as given; see
    /// [`HttpClientBuilder`](super::HttpClientBuilder) for a validating path.
    #[must_use]
    pub fn with_config(config: HttpConfig) -> Self {
        let connector = Agent::new(DirectConnector::from_config(&config));
        Self::with_config_and_connector(config, connector)
    }

    /// Create HttpClient with custom configuration and connection source
    #[must_use]
    pub fn with_config_and_connector(config: HttpConfig, connector: Agent) -> Self {
        Self {
            config: Arc::new(config),
            connector,
            stats: Arc::new(ClientStats::default()),
        }
    }

    /// Get client statistics for monitoring
    #[inline]
    pub fn stats(&self) -> Arc<ClientStats> {
        Arc::clone(&self.stats)
    }

    /// Get current configuration
    #[inline]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Connection source used when the options carry no agent
    #[inline]
    pub fn connector(&self) -> &Agent {
        &self.connector
    }

    /// Stream a request.
    ///
    /// The task resolves with the response head and its live body once a
    /// status in `[200, 400)` arrives. Nothing happens until it is forked.
    #[must_use]
    pub fn stream(&self, options: RequestOptions) -> Task<ResponseHead> {
        stream_task(self.clone(), options)
    }

    /// Run a request and buffer and decode its response.
    #[must_use]
    pub fn request(&self, options: RequestOptions) -> Task<DecodedResponse> {
        request_task(self.clone(), options)
    }

    /// Buffered request with `verb` as its method.
    #[must_use]
    pub fn verb(&self, verb: Verb, options: RequestOptions) -> Task<DecodedResponse> {
        self.request(verb.apply(options))
    }

    /// Streaming request with `verb` as its method.
    #[must_use]
    pub fn stream_verb(&self, verb: Verb, options: RequestOptions) -> Task<ResponseHead> {
        self.stream(verb.apply(options))
    }

    #[must_use]
    pub fn get(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Get, options)
    }

    #[must_use]
    pub fn put(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Put, options)
    }

    #[must_use]
    pub fn post(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Post, options)
    }

    #[must_use]
    pub fn delete(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Delete, options)
    }

    #[must_use]
    pub fn patch(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Patch, options)
    }

    #[must_use]
    pub fn head(&self, options: RequestOptions) -> Task<DecodedResponse> {
        self.verb(Verb::Head, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configuration_errors_fail_without_connecting() {
        let client = HttpClient::new();
        let err = client
            .request(RequestOptions::new().with_protocol("ftp:"))
            .await
            .expect_err("ftp is not supported");

        assert!(err.is_configuration());
        assert_eq!(err.options().and_then(|o| o.protocol.as_deref()), Some("ftp:"));
        let stats = client.stats().snapshot();
        assert_eq!(stats.connections_total, 0);
        assert_eq!(stats.requests_failed, 1);
    }

    #[test]
    fn clones_share_statistics() {
        let client = HttpClient::new();
        let clone = client.clone();
        clone.stats().execution_started();
        assert_eq!(client.stats().snapshot().requests_total, 1);
    }
}
