use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::http::options::RequestOptions;

/// A Result alias where the Err case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Shared, clonable handle to a lower-level failure.
pub type Cause = Arc<dyn StdError + Send + Sync>;

/// Structured failure produced by every layer of the engine.
///
/// Errors are immutable once built. They carry a [`Kind`] with the
/// kind-specific context, a human-readable message, the originating
/// options when known, and an ordered list of chained causes.
#[derive(Clone)]
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

#[derive(Clone)]
pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) message: String,
    pub(crate) options: Option<Arc<RequestOptions>>,
    pub(crate) causes: Vec<Cause>,
}

/// The closed set of failure classifications.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Unrecognized protocol, malformed body, or otherwise unusable options.
    Configuration {
        /// The offending value, rendered for diagnostics.
        value: String,
    },
    /// Transport-level failure before any response was received.
    Connection,
    /// The server answered with a status outside `[200, 400)`.
    Status {
        status: StatusCode,
        headers: HeaderMap,
        /// Best-effort drained error body; absent when draining failed.
        body: Option<ErrorBody>,
    },
    /// A readable stream failed before it ended.
    StreamRead,
    /// The operation was abandoned before a response head was obtained.
    ///
    /// This is not one of the failure classifications: it is how a cancelled
    /// or timed-out operation resolves.
    Aborted(AbortReason),
}

/// Why an operation was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The caller invoked the abort handle.
    Cancelled,
    /// The idle watchdog elapsed before the response head arrived.
    IdleTimeout,
}

/// Drained body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// Body of a textual content type, decoded as UTF-8.
    Text(String),
    /// Raw bytes of any other content type.
    Bytes(Bytes),
}

impl ErrorBody {
    /// Text view of the body, if it was decoded.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorBody::Text(text) => Some(text),
            ErrorBody::Bytes(_) => None,
        }
    }

    /// Raw bytes of the body regardless of how it was classified.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ErrorBody::Text(text) => text.as_bytes(),
            ErrorBody::Bytes(bytes) => bytes,
        }
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(self.as_bytes())
    }
}

impl Error {
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                message: message.into(),
                options: None,
                causes: Vec::new(),
            }),
        }
    }

    /// Append a cause to the chain.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, cause: E) -> Error {
        self.inner.causes.push(Arc::from(cause.into()));
        self
    }

    /// Append an already shared cause to the chain.
    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with_cause(mut self, cause: Cause) -> Error {
        self.inner.causes.push(cause);
        self
    }

    /// Attach the originating options for traceability.
    #[must_use]
    pub fn with_options(mut self, options: Arc<RequestOptions>) -> Error {
        self.inner.options = Some(options);
        self
    }

    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Options of the request that failed, if known.
    #[must_use]
    pub fn options(&self) -> Option<&RequestOptions> {
        self.inner.options.as_deref()
    }

    /// Chained causes, in the order they were attached.
    #[must_use]
    pub fn causes(&self) -> &[Cause] {
        &self.inner.causes
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("fhttp_client::Error");

        f.field("kind", &self.inner.kind);
        f.field("message", &self.inner.message);

        if !self.inner.causes.is_empty() {
            f.field("causes", &self.inner.causes);
        }

        if let Some(ref options) = self.inner.options {
            f.field("options", options);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.inner.kind {
            Kind::Configuration { .. } => "ConfigurationError",
            Kind::Connection => "ConnectionError",
            Kind::Status { .. } => "StatusCodeError",
            Kind::StreamRead => "StreamReadError",
            Kind::Aborted(_) => "Aborted",
        };
        write!(f, "{name}: {}", self.inner.message)?;
        for cause in &self.inner.causes {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .causes
            .first()
            .map(|cause| &**cause as &(dyn StdError + 'static))
    }
}
