//! Response types produced by the engine
//!
//! A [`ResponseHead`] is what the stream executor resolves with: the status
//! line, the headers and a live body stream that owns the connection. Buffering
//! the body gives a [`BufferedResponse`], which holds no stream at all.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode, Version};
use http_body_util::BodyStream;
use hyper::body::Incoming;

use crate::connect::ConnectionGuard;
use crate::error::BoxError;
use crate::http::decode::DEFAULT_CONTENT_TYPE;
use crate::http::options::RequestOptions;

/// Status line, headers and originating options of a response.
#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub status: StatusCode,
    /// Reason phrase sent by the server, or the canonical one for the status.
    pub status_message: String,
    pub headers: HeaderMap,
    pub version: Version,
    pub options: Arc<RequestOptions>,
}

impl ResponseParts {
    #[must_use]
    pub fn new(
        status: StatusCode,
        status_message: impl Into<String>,
        headers: HeaderMap,
        version: Version,
        options: Arc<RequestOptions>,
    ) -> Self {
        Self {
            status,
            status_message: status_message.into(),
            headers,
            version,
            options,
        }
    }

    /// Value of a response header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Declared content type, `application/octet-stream` when absent.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.header(CONTENT_TYPE.as_str()).unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Live response body.
///
/// Yields the data frames of the response in arrival order. The body owns the
/// connection it is read from: dropping it before the end closes that
/// connection.
pub struct ResponseBody {
    chunks: BoxStream<'static, Result<Bytes, BoxError>>,
    connection: Option<ConnectionGuard>,
}

impl ResponseBody {
    pub(crate) fn new(incoming: Incoming, connection: ConnectionGuard) -> Self {
        let chunks = BodyStream::new(incoming)
            .map_err(Into::<BoxError>::into)
            .try_filter_map(|frame| future::ready(Ok(frame.into_data().ok())))
            .boxed();
        Self {
            chunks,
            connection: Some(connection),
        }
    }

    /// Body backed by an arbitrary chunk stream, detached from any connection.
    pub fn from_stream<S, E>(chunks: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            chunks: chunks.map_err(Into::<BoxError>::into).boxed(),
            connection: None,
        }
    }

    /// Body that ends immediately.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(stream::empty::<Result<Bytes, BoxError>>())
    }
}

impl Stream for ResponseBody {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.chunks.poll_next_unpin(cx)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody")
            .field("attached", &self.connection.is_some())
            .finish()
    }
}

/// Response whose head has arrived and whose body is still on the wire.
#[derive(Debug)]
pub struct ResponseHead {
    parts: ResponseParts,
    body: ResponseBody,
}

impl ResponseHead {
    #[must_use]
    pub fn new(parts: ResponseParts, body: ResponseBody) -> Self {
        Self { parts, body }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.parts.status_message
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.header(name)
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.parts.version
    }

    /// Options of the request this response answers.
    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.parts.options
    }

    #[must_use]
    pub fn parts(&self) -> &ResponseParts {
        &self.parts
    }

    /// Mutable access to the live body.
    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    /// Split into the head and the live body.
    #[must_use]
    pub fn into_parts(self) -> (ResponseParts, ResponseBody) {
        (self.parts, self.body)
    }

    /// Take the live body, discarding the head.
    #[must_use]
    pub fn into_body(self) -> ResponseBody {
        self.body
    }
}

/// Response whose body has been read into one contiguous buffer.
///
/// `text` is filled in by the response decoder for textual content types;
/// the raw `buffer` is always kept.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    pub parts: ResponseParts,
    pub buffer: Bytes,
    pub text: Option<String>,
}

/// A buffered response that went through the response decoder.
pub type DecodedResponse = BufferedResponse;

impl BufferedResponse {
    #[must_use]
    pub fn new(parts: ResponseParts, buffer: Bytes) -> Self {
        Self {
            parts,
            buffer,
            text: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.parts.status_message
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.header(name)
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        self.parts.content_type()
    }

    #[must_use]
    pub fn options(&self) -> &RequestOptions {
        &self.parts.options
    }

    /// Raw body bytes.
    #[must_use]
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Decoded text, present only for textual content types.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Deserialize the body as JSON, whatever its declared content type.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;
    use crate::http::decode::decode_response;

    fn parts(content_type: Option<&'static str>) -> ResponseParts {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        ResponseParts::new(
            StatusCode::OK,
            "OK",
            headers,
            Version::HTTP_11,
            Arc::new(RequestOptions::new()),
        )
    }

    #[test]
    fn content_type_defaults_to_octet_stream() {
        let response = BufferedResponse::new(parts(None), Bytes::from_static(b"\x00\x01"));
        assert_eq!(response.content_type(), "application/octet-stream");
    }

    #[test]
    fn binary_body_decodes_to_itself() {
        let response = BufferedResponse::new(parts(Some("image/png")), Bytes::from_static(b"\x89PNG"));
        let decoded = decode_response(response.clone());
        assert_eq!(decoded.buffer, response.buffer);
        assert!(decoded.text.is_none());

        let again = decode_response(decoded.clone());
        assert_eq!(again.buffer, decoded.buffer);
        assert!(again.text.is_none());
    }

    #[test]
    fn json_body_gains_text_and_keeps_buffer() {
        let body = Bytes::from_static("{\"name\":\"café\"}".as_bytes());
        let response = BufferedResponse::new(parts(Some("application/json")), body.clone());
        let decoded = decode_response(response);

        assert_eq!(decoded.text(), Some(r#"{"name":"café"}"#));
        assert_eq!(decoded.buffer, body);

        let value: serde_json::Value = decoded.json().expect("valid json");
        assert_eq!(value["name"], "café");

        let again = decode_response(decoded.clone());
        assert_eq!(again.text, decoded.text);
    }

    #[test]
    fn malformed_utf8_is_replaced_not_rejected() {
        let response = BufferedResponse::new(parts(Some("text/plain")), Bytes::from_static(b"ok\xff"));
        let decoded = decode_response(response);
        assert_eq!(decoded.text(), Some("ok\u{fffd}"));
    }

    #[tokio::test]
    async fn detached_body_yields_its_chunks() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"a")),
            Ok(Bytes::from_static(b"b")),
        ];
        let body = ResponseBody::from_stream(stream::iter(chunks));
        let collected: Vec<Bytes> = body.try_collect().await.expect("no faults");
        assert_eq!(collected, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    }
}
