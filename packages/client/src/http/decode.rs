//! Content-type aware decoding of buffered responses

use http::HeaderMap;
use http::header::CONTENT_TYPE;

use crate::http::response::BufferedResponse;

/// Content type assumed when a response carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns true if `content_type` names a textual format: `text/*`,
/// `application/json`, or `application/*+json`.
///
/// Media type parameters are ignored and matching is case-insensitive.
#[must_use]
pub fn is_text_format(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };
    if subtype.is_empty() || subtype.contains('/') {
        return false;
    }

    match kind {
        "text" => true,
        "application" => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Returns true if the `content-type` header of `headers` is textual.
///
/// An absent or unreadable header is never textual.
#[must_use]
pub fn has_text_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(is_text_format)
}

/// Attach a UTF-8 text view to a buffered response with a textual content type.
///
/// Additive and lenient: the raw buffer is retained, malformed UTF-8 is
/// replaced rather than reported, and other content types pass through
/// unchanged. Applying it twice gives the same response.
#[must_use]
pub fn decode_response(mut response: BufferedResponse) -> BufferedResponse {
    if is_text_format(response.content_type()) {
        let text = String::from_utf8_lossy(&response.buffer).into_owned();
        response.text = Some(text);
    }
    response
}
