//! # fhttp client
//!
//! Asynchronous HTTP/1.1 request execution over TCP, Unix domain sockets and
//! rustls, driven by a plain options record.
//!
//! ## Features
//!
//! - **Cold tasks**: building a request performs no I/O; every fork is an
//!   independent execution that can be aborted
//! - **Streaming or buffered** responses, with text decoding for textual
//!   content types
//! - **Status classification**: responses outside `[200, 400)` fail with a
//!   `StatusCodeError` carrying the drained error body
//! - **Structured errors** with a kind, the originating options and a cause chain
//! - **Idle and connect timeouts** per request
//! - **Agents** for supplying your own connection source
//!
//! ## Usage
//!
//! ```no_run
//! use fhttp_client::{RequestOptions, get};
//!
//! # async fn run() -> fhttp_client::Result<()> {
//! let options = RequestOptions::new()
//!     .with_host("example.com")
//!     .with_path("/status");
//!
//! let response = get(options).await?;
//! println!("{} {}", response.status(), response.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ### Streaming
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use fhttp_client::{RequestOptions, streaming};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let head = streaming::get(RequestOptions::new().with_host("example.com")).await?;
//! let mut body = head.into_body();
//! while let Some(chunk) = body.try_next().await? {
//!     println!("{} bytes", chunk.len());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;
use std::sync::OnceLock;

pub mod client;
pub mod config;
pub mod connect;
pub mod error;
pub mod http;
pub mod operations;
pub mod task;

pub mod prelude;

pub use crate::prelude::*;
pub use crate::http::decode::{decode_response, is_text_format};
pub use crate::http::body::prepare_body;
pub use crate::http::buffer::buffer_stream;
pub use crate::connect::transport_for;
pub use crate::operations::{
    buffer_response, delete, get, head, patch, post, put, request, stream, streaming,
};

static GLOBAL_CLIENT: OnceLock<Arc<HttpClient>> = OnceLock::new();

/// Get the global HTTP client instance
///
/// Backs the free functions of [`operations`]. Initialized with the default
/// configuration on first use unless [`init_global_client`] ran before.
pub fn global_client() -> Arc<HttpClient> {
    GLOBAL_CLIENT
        .get_or_init(|| Arc::new(HttpClient::default()))
        .clone()
}

/// Get statistics of the global client
#[must_use]
pub fn connection_stats() -> ClientStatsSnapshot {
    global_client().stats().snapshot()
}

/// Initialize the global HTTP client with custom configuration
///
/// An invalid configuration, or a global client that is already in use, is
/// logged and leaves the existing client in place.
pub fn init_global_client(config: HttpConfig) {
    if let Err(e) = validate_and_init_client(config) {
        tracing::error!(
            "Failed to initialize HTTP client with custom config: {}, using default client",
            e
        );
    }
}

fn validate_and_init_client(
    config: HttpConfig,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;
    GLOBAL_CLIENT
        .set(Arc::new(HttpClient::with_config(config)))
        .map_err(|_| "Global client already initialized")?;
    Ok(())
}
