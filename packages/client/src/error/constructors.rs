use std::sync::Arc;

use http::{HeaderMap, StatusCode};

use super::types::{AbortReason, Error, ErrorBody, Kind};
use crate::http::options::RequestOptions;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Creates a `ConfigurationError` for an unusable option value.
pub fn configuration(value: impl Into<String>, message: impl Into<String>) -> Error {
    Error::new(Kind::Configuration { value: value.into() }, message)
}

/// Creates a `ConfigurationError` for an unrecognized protocol scheme.
pub fn unrecognized_protocol(proto: &str) -> Error {
    configuration(proto, format!("Unrecognized protocol {proto}"))
}

/// Creates a `ConfigurationError` for a body that is neither a buffer nor a stream.
pub fn invalid_body(shape: impl Into<String>) -> Error {
    configuration(shape, "Body must be a buffer or stream")
}

/// Creates a `ConnectionError` wrapping the transport fault.
pub fn connection<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Connection, "Unable to communicate with remote server").with(e.into())
}

/// Creates a `StreamReadError` wrapping the stream's own fault.
pub fn stream_read<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::StreamRead, "Unable to read from stream").with(e.into())
}

/// Creates a `StatusCodeError` for a response outside `[200, 400)`.
pub fn status_code(
    options: Arc<RequestOptions>,
    status: StatusCode,
    headers: HeaderMap,
    body: Option<ErrorBody>,
) -> Error {
    Error::new(
        Kind::Status {
            status,
            headers,
            body,
        },
        format!("Server responded with {}", status.as_u16()),
    )
    .with_options(options)
}

/// Creates the result of an aborted operation.
pub fn aborted(reason: AbortReason) -> Error {
    let message = match reason {
        AbortReason::Cancelled => "Request was cancelled",
        AbortReason::IdleTimeout => "Request aborted after idle timeout",
    };
    let error = Error::new(Kind::Aborted(reason), message);
    match reason {
        AbortReason::Cancelled => error.with(super::helpers::OperationCanceled),
        AbortReason::IdleTimeout => error.with(super::helpers::TimedOut),
    }
}
