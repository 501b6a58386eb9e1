//! Configuration validation

use std::time::Duration;

use http::HeaderValue;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the timeout is zero.
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }
        Ok(())
    }

    /// Validate a value that will be sent as a header
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if `value` contains
    /// characters not allowed in a header value.
    pub fn validate_header_value(value: &str, name: &str) -> ConfigResult<()> {
        HeaderValue::from_str(value).map(drop).map_err(|_| {
            ConfigurationError::InvalidParameter(format!("{name} is not a valid header value"))
        })
    }
}
