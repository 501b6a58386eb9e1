//! Verb bindings
//!
//! Each binding sets the method on the options record and delegates: the
//! functions at the top of this module to the high-level request, those in
//! [`streaming`] to the stream executor. All of them use the global client;
//! [`HttpClient`](crate::HttpClient) offers the same bindings per client.

use std::fmt;

use http::Method;

use crate::http::options::RequestOptions;
use crate::http::response::DecodedResponse;
use crate::task::Task;

/// The supported HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
}

impl Verb {
    /// Every verb, in table order.
    pub const ALL: [Verb; 6] = [
        Verb::Get,
        Verb::Put,
        Verb::Post,
        Verb::Delete,
        Verb::Patch,
        Verb::Head,
    ];

    /// Method token sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Head => "HEAD",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
            Verb::Patch => Method::PATCH,
            Verb::Head => Method::HEAD,
        }
    }

    /// `options` with this verb as its method.
    #[must_use]
    pub fn apply(self, options: RequestOptions) -> RequestOptions {
        options.with_method(self.as_str())
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buffered `GET`.
#[must_use]
pub fn get(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Get, options)
}

/// Buffered `PUT`.
#[must_use]
pub fn put(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Put, options)
}

/// Buffered `POST`.
#[must_use]
pub fn post(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Post, options)
}

/// Buffered `DELETE`.
#[must_use]
pub fn delete(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Delete, options)
}

/// Buffered `PATCH`.
#[must_use]
pub fn patch(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Patch, options)
}

/// Buffered `HEAD`.
#[must_use]
pub fn head(options: RequestOptions) -> Task<DecodedResponse> {
    crate::global_client().verb(Verb::Head, options)
}

/// Streaming bindings, resolving with the response head and its live body.
pub mod streaming {
    use super::Verb;
    use crate::http::options::RequestOptions;
    use crate::http::response::ResponseHead;
    use crate::task::Task;

    #[must_use]
    pub fn get(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Get, options)
    }

    #[must_use]
    pub fn put(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Put, options)
    }

    #[must_use]
    pub fn post(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Post, options)
    }

    #[must_use]
    pub fn delete(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Delete, options)
    }

    #[must_use]
    pub fn patch(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Patch, options)
    }

    #[must_use]
    pub fn head(options: RequestOptions) -> Task<ResponseHead> {
        crate::global_client().stream_verb(Verb::Head, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_each_verb_once() {
        let names: Vec<&str> = Verb::ALL.iter().map(|verb| verb.as_str()).collect();
        assert_eq!(names, ["GET", "PUT", "POST", "DELETE", "PATCH", "HEAD"]);
    }

    #[test]
    fn apply_overrides_the_method_only() {
        let options = RequestOptions::new()
            .with_method("OPTIONS")
            .with_path("/things");
        for verb in Verb::ALL {
            let applied = verb.apply(options.clone());
            assert_eq!(applied.method(), verb.as_str());
            assert_eq!(applied.method().parse::<Method>().ok(), Some(verb.method()));
            assert_eq!(applied.path(), "/things");
        }
    }
}
