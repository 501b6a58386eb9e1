//! Client configuration
//!
//! Defaults applied to requests whose options leave a setting out, plus the
//! socket and TLS settings of the default connector.

use std::time::Duration;

pub mod validation;

pub use validation::{ConfigResult, ConfigValidator, ConfigurationError};

/// Method used when the options name none.
pub const DEFAULT_METHOD: &str = "GET";

/// Connect and idle timeout used when the options name none.
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_millis(60_000);

/// TCP socket configuration
#[derive(Debug, Clone)]
pub struct TcpConfig {
    pub nodelay: bool,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self { nodelay: true }
    }
}

/// TLS configuration
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Trust the platform's native roots in addition to the bundled webpki roots.
    pub use_native_certs: bool,
}

/// HTTP-specific configuration for client behavior
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bound on connection establishment for options without `conn_timeout`.
    pub connect_timeout: Duration,
    /// Idle watchdog for options without `idle_timeout`.
    pub idle_timeout: Duration,

    pub tcp: TcpConfig,
    pub tls: TlsConfig,

    /// `User-Agent` sent when the options carry none. Nothing is sent when unset.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_SOCKET_TIMEOUT,
            idle_timeout: DEFAULT_SOCKET_TIMEOUT,
            tcp: TcpConfig::default(),
            tls: TlsConfig::default(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn tcp_nodelay(&self) -> bool {
        self.tcp.nodelay
    }

    #[must_use]
    pub fn use_native_certs(&self) -> bool {
        self.tls.use_native_certs
    }

    /// Check the configuration for unusable values.
    ///
    /// # Errors
    /// `ConfigurationError::InvalidTimeout` for a zero timeout and
    /// `ConfigurationError::InvalidParameter` for a user agent that is not a
    /// valid header value.
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.connect_timeout, "connect_timeout")?;
        ConfigValidator::validate_timeout(self.idle_timeout, "idle_timeout")?;
        if let Some(user_agent) = &self.user_agent {
            ConfigValidator::validate_header_value(user_agent, "user_agent")?;
        }
        Ok(())
    }
}
