//! fhttp client prelude
//!
//! The types end users need to describe requests and consume responses.

// Describing requests
pub use crate::connect::{Agent, Connect, ConnectTarget, Transport};
pub use crate::http::body::{BodyStream, RequestBody};
pub use crate::http::options::RequestOptions;

// Responses
pub use crate::http::response::{
    BufferedResponse, DecodedResponse, ResponseBody, ResponseHead, ResponseParts,
};

// Running requests
pub use crate::client::{ClientStats, ClientStatsSnapshot, HttpClient, HttpClientBuilder};
pub use crate::config::HttpConfig;
pub use crate::operations::verbs::Verb;
pub use crate::task::{Running, Task};

// Error types
pub use crate::error::{AbortReason, Error, ErrorBody, Kind, Result};

// HTTP standard types from http crate
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Version};
