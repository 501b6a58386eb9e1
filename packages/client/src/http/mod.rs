//! HTTP request and response types
//!
//! The options record describing a request, the request bodies and the body
//! sender, the stream buffer, the response types and the response decoder.

pub mod body;
pub mod buffer;
pub mod decode;
pub mod options;
pub mod response;

pub use body::{BodyStream, OutgoingBody, RequestBody, prepare_body};
pub use buffer::buffer_stream;
pub use decode::{DEFAULT_CONTENT_TYPE, decode_response, has_text_content, is_text_format};
pub use options::RequestOptions;
pub use response::{BufferedResponse, DecodedResponse, ResponseBody, ResponseHead, ResponseParts};
