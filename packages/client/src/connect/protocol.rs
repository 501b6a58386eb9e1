//! Protocol selection
//!
//! Maps the scheme of an options record to the transport used to reach the
//! server. Pure; performs no I/O.

use crate::error::{self, Result};

/// Transport used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Cleartext HTTP/1.1.
    Plain,
    /// HTTP/1.1 over TLS.
    Tls,
}

impl Transport {
    /// Port assumed when neither the options nor the host name one.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Transport::Plain => 80,
            Transport::Tls => 443,
        }
    }

    /// Scheme of the transport, with its trailing colon.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Transport::Plain => "http:",
            Transport::Tls => "https:",
        }
    }
}

/// Choose the transport for a protocol scheme.
///
/// # Arguments
/// * `protocol` - Scheme including its trailing colon, as stored in the options
///
/// # Returns
/// * `Ok(Transport::Plain)` - For `"http:"`, an empty scheme, or no scheme
/// * `Ok(Transport::Tls)` - For `"https:"`
///
/// # Errors
/// `ConfigurationError` carrying the scheme for anything else.
pub fn transport_for(protocol: Option<&str>) -> Result<Transport> {
    match protocol {
        None | Some("" | "http:") => Ok(Transport::Plain),
        Some("https:") => Ok(Transport::Tls),
        Some(other) => Err(error::unrecognized_protocol(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes_select_their_transport() {
        assert_eq!(transport_for(Some("http:")).ok(), Some(Transport::Plain));
        assert_eq!(transport_for(Some("https:")).ok(), Some(Transport::Tls));
    }

    #[test]
    fn missing_scheme_defaults_to_plain() {
        assert_eq!(transport_for(None).ok(), Some(Transport::Plain));
        assert_eq!(transport_for(Some("")).ok(), Some(Transport::Plain));
    }

    #[test]
    fn unknown_scheme_is_a_configuration_error() {
        let err = transport_for(Some("ftp:")).expect_err("ftp is not supported");
        assert!(err.is_configuration());
        assert_eq!(err.offending_value(), Some("ftp:"));
        assert_eq!(err.message(), "Unrecognized protocol ftp:");
    }

    #[test]
    fn scheme_matching_is_exact() {
        assert!(transport_for(Some("HTTP:")).is_err());
        assert!(transport_for(Some("https")).is_err());
    }
}
