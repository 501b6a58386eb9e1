//! High-level request
//!
//! Streams a request, buffers the whole body and decodes it.

use std::sync::Arc;

use crate::client::{ClientStats, HttpClient};
use crate::error::Result;
use crate::http::buffer::buffer_stream;
use crate::http::decode::decode_response;
use crate::http::options::RequestOptions;
use crate::http::response::{BufferedResponse, DecodedResponse, ResponseHead};
use crate::operations::stream::stream_task;
use crate::task::Task;

/// Run a request through the global client and buffer its response.
///
/// Failures of the stream executor pass through unchanged. A fault while
/// reading the body fails with `StreamReadError`. Aborting the task while the
/// body is being read closes the connection.
#[must_use]
pub fn request(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().request(options)
}

pub(crate) fn request_task(client: HttpClient, options: RequestOptions) -> Task<DecodedResponse> {
    let stats = client.stats();
    stream_task(client, options)
        .and_then(move |head| buffer_counted(head, Arc::clone(&stats)))
        .map(decode_response)
}

async fn buffer_counted(head: ResponseHead, stats: Arc<ClientStats>) -> Result<BufferedResponse> {
    let buffered = buffer_response(head).await?;
    stats.body_buffered(buffered.buffer.len() as u64);
    Ok(buffered)
}

/// Read the body of `head` to its end, dropping the stream handle.
///
/// # Errors
/// `StreamReadError` if the body fails before it ends.
pub async fn buffer_response(head: ResponseHead) -> Result<BufferedResponse> {
    let (parts, body) = head.into_parts();
    let buffer = buffer_stream(body).await?;
    Ok(BufferedResponse::new(parts, buffer))
}
