use std::error::Error as StdError;
use std::io;

use http::{HeaderMap, StatusCode};

use super::helpers::TimedOut;
use super::types::{AbortReason, Error, ErrorBody, Kind};

impl Error {
    /// Returns true for a `ConfigurationError`.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self.inner.kind, Kind::Configuration { .. })
    }

    /// Returns true for a `ConnectionError`.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.inner.kind, Kind::Connection)
    }

    /// Returns true for a `StatusCodeError`.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.inner.kind, Kind::Status { .. })
    }

    /// Returns true for a `StreamReadError`.
    #[must_use]
    pub fn is_stream_read(&self) -> bool {
        matches!(self.inner.kind, Kind::StreamRead)
    }

    /// Returns true if the operation was aborted, either explicitly or by the idle watchdog.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        matches!(self.inner.kind, Kind::Aborted(_))
    }

    /// The abort reason, if the operation was aborted.
    #[must_use]
    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self.inner.kind {
            Kind::Aborted(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns true if the error is related to a timeout.
    ///
    /// Covers the idle watchdog, connect timeouts, and timed-out I/O anywhere
    /// in the cause chain.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.inner.kind, Kind::Aborted(AbortReason::IdleTimeout)) {
            return true;
        }

        for cause in &self.inner.causes {
            let mut source: Option<&(dyn StdError + 'static)> = Some(&**cause);
            while let Some(err) = source {
                if err.is::<TimedOut>() {
                    return true;
                }
                if let Some(io) = err.downcast_ref::<io::Error>()
                    && io.kind() == io::ErrorKind::TimedOut
                {
                    return true;
                }
                if let Some(nested) = err.downcast_ref::<Error>()
                    && nested.is_timeout()
                {
                    return true;
                }
                source = err.source();
            }
        }

        false
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Status { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns the response headers, if the error was generated from a response.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        match &self.inner.kind {
            Kind::Status { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// Returns the drained error body, if the error was generated from a
    /// response and the body could be read.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorBody> {
        match &self.inner.kind {
            Kind::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns the offending value of a `ConfigurationError`.
    #[must_use]
    pub fn offending_value(&self) -> Option<&str> {
        match &self.inner.kind {
            Kind::Configuration { value } => Some(value),
            _ => None,
        }
    }

    /// Finds the first chained cause that is itself a structured [`Error`].
    #[must_use]
    pub fn nested(&self) -> Option<&Error> {
        self.inner
            .causes
            .iter()
            .find_map(|cause| cause.downcast_ref::<Error>())
    }
}
