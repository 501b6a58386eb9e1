//! Request operations
//!
//! The stream executor, the high-level buffered request built on it, and the
//! per-verb bindings of both.

pub mod request;
pub mod stream;
pub mod verbs;

pub use request::{buffer_response, request};
pub use stream::stream;
pub use verbs::{Verb, delete, get, head, patch, post, put, streaming};
