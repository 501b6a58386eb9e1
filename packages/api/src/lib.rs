//! fhttp public API
//!
//! A functional HTTP client toolkit. Requests are described by a plain
//! [`RequestOptions`] record, built from composable [`dsl`] fragments, and
//! executed as lazy, cancellable [`Task`]s. [`middleware`] wraps requestors
//! to adjust options on the way in and outcomes on the way out.
//!
//! ```no_run
//! use fhttp::dsl::{accept_json, conf, json_body, method, uri};
//!
//! # async fn run() -> fhttp::Result<()> {
//! let options = conf([
//!     method("POST"),
//!     uri("https://api.example.com/v1/items")?,
//!     accept_json(),
//!     json_body(serde_json::json!({"name": "fhttp"})),
//! ]);
//!
//! let response = fhttp::json()(options).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod dsl;
pub mod middleware;

pub use middleware::{Middleware, Requestor};

// Re-export the request engine
pub use fhttp_client::{
    AbortReason, Agent, BodyStream, BufferedResponse, DecodedResponse, Error, ErrorBody,
    HttpClient, HttpClientBuilder, HttpConfig, Kind, RequestBody, RequestOptions, ResponseHead,
    Result, Running, Task, Verb, buffer_response, delete, error, get, head, patch, post, put,
    request, stream, streaming,
};
pub use http;

/// Requestors bound to one [`HttpClient`]
#[derive(Debug, Clone)]
pub struct Fhttp {
    client: HttpClient,
}

impl Fhttp {
    #[must_use]
    pub fn with_client(client: &HttpClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Buffered requests through this client.
    #[must_use]
    pub fn requestor(&self) -> Requestor<DecodedResponse> {
        let client = self.client.clone();
        middleware::requestor(move |options| client.request(options))
    }

    /// Streaming requests through this client.
    #[must_use]
    pub fn stream_requestor(&self) -> Requestor<ResponseHead> {
        let client = self.client.clone();
        middleware::requestor(move |options| client.stream(options))
    }

    /// Buffered requests with structured bodies sent as JSON.
    #[must_use]
    pub fn json(&self) -> Requestor<DecodedResponse> {
        middleware::json_encode(self.requestor())
    }
}

/// Buffered requests through the global client.
#[must_use]
pub fn requestor() -> Requestor<DecodedResponse> {
    middleware::requestor(request)
}

/// Streaming requests through the global client.
#[must_use]
pub fn stream_requestor() -> Requestor<ResponseHead> {
    middleware::requestor(stream)
}

/// Buffered requests through the global client with structured bodies sent
/// as JSON.
#[must_use]
pub fn json() -> Requestor<DecodedResponse> {
    middleware::json_encode(requestor())
}
