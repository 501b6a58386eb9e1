//! Request bodies and the body sender
//!
//! A request body is absent, an in-memory buffer, or a live readable stream.
//! `prepare_body` turns it into the framing hyper writes to the connection.

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::Frame;

use crate::error::{self, BoxError, ConsumedBody, Result};

/// Body type written to the connection.
pub type OutgoingBody = UnsyncBoxBody<Bytes, BoxError>;

/// Request body carried by the options record.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body; the request is terminated without writing bytes.
    #[default]
    Empty,
    /// In-memory buffer written in full.
    Bytes(Bytes),
    /// Live readable stream piped into the request.
    Stream(BodyStream),
    /// Structured value awaiting encoding.
    ///
    /// The body sender refuses it; the `json_encode` middleware of the
    /// façade turns it into [`RequestBody::Bytes`].
    Json(serde_json::Value),
}

impl RequestBody {
    /// Returns true for [`RequestBody::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// Length of a buffer body.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            RequestBody::Bytes(bytes) => Some(bytes.len()),
            _ => None,
        }
    }

    /// Name of the body shape, used in diagnostics.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Bytes(_) => "buffer",
            RequestBody::Stream(_) => "stream",
            RequestBody::Json(_) => "json value",
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(bytes: &'static [u8]) -> Self {
        RequestBody::Bytes(Bytes::from_static(bytes))
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Bytes(Bytes::from(text))
    }
}

impl From<BodyStream> for RequestBody {
    fn from(stream: BodyStream) -> Self {
        RequestBody::Stream(stream)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Shared handle to a readable byte stream used as a request body.
///
/// Cloning the handle shares the stream. It can be sent once: a second
/// execution of the same options finds it consumed.
#[derive(Clone)]
pub struct BodyStream {
    inner: Arc<Mutex<Option<BoxStream<'static, std::result::Result<Bytes, BoxError>>>>>,
}

impl BodyStream {
    /// Wrap a stream of byte chunks.
    pub fn new<S, E>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Some(stream.map_err(Into::<BoxError>::into).boxed()))),
        }
    }

    /// Stream over a fixed list of chunks.
    #[must_use]
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        Self::new(futures::stream::iter(chunks.into_iter().map(Ok::<_, Infallible>)))
    }

    /// Returns true once the stream has been taken for sending.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.inner.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }

    fn take(&self) -> Option<BoxStream<'static, std::result::Result<Bytes, BoxError>>> {
        self.inner.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream")
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

/// Turn the options' body into the body hyper writes.
///
/// Runs before any connection is opened, so a rejected body never causes
/// bytes to be written.
///
/// # Errors
/// `ConfigurationError` when the body is neither absent, a buffer, nor a
/// stream, or when a stream body was already sent.
pub fn prepare_body(body: &RequestBody) -> Result<OutgoingBody> {
    match body {
        RequestBody::Empty => Ok(Empty::<Bytes>::new()
            .map_err(|never: Infallible| match never {})
            .boxed_unsync()),
        RequestBody::Bytes(bytes) => Ok(Full::new(bytes.clone())
            .map_err(|never: Infallible| match never {})
            .boxed_unsync()),
        RequestBody::Stream(stream) => {
            let chunks = stream.take().ok_or_else(|| {
                error::configuration("stream", "Body stream was already consumed").with(ConsumedBody)
            })?;
            Ok(StreamBody::new(chunks.map_ok(Frame::data)).boxed_unsync())
        }
        other => Err(error::invalid_body(other.shape())),
    }
}
