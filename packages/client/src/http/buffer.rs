//! Draining a readable byte stream into one contiguous buffer

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::error::{self, BoxError, Result};

/// Accumulate every chunk of `stream`, in arrival order, into one buffer.
///
/// A stream that ends without producing bytes yields an empty buffer. A
/// single chunk is returned as-is without copying.
///
/// # Errors
/// `StreamReadError` wrapping the stream's own fault if it fails before ending.
pub async fn buffer_stream<S, E>(stream: S) -> Result<Bytes>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<BoxError>,
{
    let mut stream = std::pin::pin!(stream);
    let mut single: Option<Bytes> = None;
    let mut joined: Option<BytesMut> = None;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(error::stream_read)?;
        if let Some(acc) = joined.as_mut() {
            acc.extend_from_slice(&chunk);
        } else if let Some(head) = single.take() {
            let mut acc = BytesMut::with_capacity(head.len() + chunk.len());
            acc.extend_from_slice(&head);
            acc.extend_from_slice(&chunk);
            joined = Some(acc);
        } else {
            single = Some(chunk);
        }
    }

    Ok(joined.map(BytesMut::freeze).or(single).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::io;

    use futures::stream;

    use super::*;

    fn chunks(parts: &[&'static str]) -> Vec<std::result::Result<Bytes, io::Error>> {
        parts.iter().map(|p| Ok(Bytes::from_static(p.as_bytes()))).collect()
    }

    #[tokio::test]
    async fn concatenates_in_emission_order() {
        let buffered = buffer_stream(stream::iter(chunks(&["he", "ll", "o", " ", "world"])))
            .await
            .expect("stream ends cleanly");
        assert_eq!(buffered, Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_buffer() {
        let buffered = buffer_stream(stream::iter(chunks(&[])))
            .await
            .expect("stream ends cleanly");
        assert!(buffered.is_empty());
    }

    #[tokio::test]
    async fn empty_chunks_do_not_disturb_order() {
        let buffered = buffer_stream(stream::iter(chunks(&["", "a", "", "b", ""])))
            .await
            .expect("stream ends cleanly");
        assert_eq!(buffered, Bytes::from_static(b"ab"));
    }

    #[tokio::test]
    async fn stream_fault_becomes_stream_read_error() {
        let mut parts = chunks(&["partial"]);
        parts.push(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")));

        let err = buffer_stream(stream::iter(parts))
            .await
            .expect_err("stream fails before ending");
        assert!(err.is_stream_read());
        assert_eq!(err.message(), "Unable to read from stream");
        let cause = err.causes()[0]
            .downcast_ref::<io::Error>()
            .expect("io fault is kept as the cause");
        assert_eq!(cause.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn large_chunk_sequences_keep_every_byte() {
        let parts: Vec<std::result::Result<Bytes, io::Error>> = (0u8..=255)
            .map(|b| Ok(Bytes::from(vec![b; usize::from(b) + 1])))
            .collect();
        let expected: Vec<u8> = (0u8..=255)
            .flat_map(|b| std::iter::repeat_n(b, usize::from(b) + 1))
            .collect();

        let buffered = buffer_stream(stream::iter(parts)).await.expect("stream ends cleanly");
        assert_eq!(buffered.as_ref(), expected.as_slice());
    }
}
