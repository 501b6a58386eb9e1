//! Requestor middleware
//!
//! A [`Requestor`] turns options into a lazy [`Task`]. Middleware wraps a
//! requestor into another one, adjusting the options on the way in or the
//! outcome on the way out. Wrapping never starts a request.

use std::future::IntoFuture;
use std::sync::Arc;

use bytes::Bytes;
use fhttp_client::error;
use fhttp_client::{Error, RequestBody, RequestOptions, Result, Task};

use crate::dsl::JSON_UTF8;

/// Something that executes requests.
pub type Requestor<T> = Arc<dyn Fn(RequestOptions) -> Task<T> + Send + Sync>;

/// A requestor transformer.
pub type Middleware<T> = Arc<dyn Fn(Requestor<T>) -> Requestor<T> + Send + Sync>;

/// Wrap a plain function as a [`Requestor`].
pub fn requestor<T, F>(f: F) -> Requestor<T>
where
    F: Fn(RequestOptions) -> Task<T> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run `pre` on the options before handing them to `next`.
///
/// A failure of `pre` fails the request without calling `next`.
pub fn before<T, P, Fut>(pre: P, next: Requestor<T>) -> Requestor<T>
where
    T: Send + 'static,
    P: Fn(RequestOptions) -> Fut + Send + Sync + 'static,
    Fut: IntoFuture<Output = Result<RequestOptions>>,
    Fut::IntoFuture: Send + 'static,
{
    let pre = Arc::new(pre);
    Arc::new(move |options: RequestOptions| {
        let pre = Arc::clone(&pre);
        let next = Arc::clone(&next);
        Task::new(move || {
            let prepared = pre(options.clone()).into_future();
            let next = Arc::clone(&next);
            async move { next(prepared.await?).run().await }
        })
    })
}

/// Run `post` on the successful outcome of `next`.
pub fn after<T, U, P, Fut>(post: P, next: Requestor<T>) -> Requestor<U>
where
    T: Send + 'static,
    U: Send + 'static,
    P: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: IntoFuture<Output = Result<U>>,
    Fut::IntoFuture: Send + 'static,
{
    let post = Arc::new(post);
    Arc::new(move |options: RequestOptions| {
        let post = Arc::clone(&post);
        next(options).and_then(move |value| post(value))
    })
}

/// Let `handler` turn a failure of `next` into an outcome.
pub fn recover<T, H, Fut>(handler: H, next: Requestor<T>) -> Requestor<T>
where
    T: Send + 'static,
    H: Fn(Error) -> Fut + Send + Sync + 'static,
    Fut: IntoFuture<Output = Result<T>>,
    Fut::IntoFuture: Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |options: RequestOptions| {
        let handler = Arc::clone(&handler);
        next(options).or_else(move |err| handler(err))
    })
}

/// [`before`] and [`after`] around the same requestor.
pub fn bracket<T, U, P, PFut, Q, QFut>(pre: P, post: Q, next: Requestor<T>) -> Requestor<U>
where
    T: Send + 'static,
    U: Send + 'static,
    P: Fn(RequestOptions) -> PFut + Send + Sync + 'static,
    PFut: IntoFuture<Output = Result<RequestOptions>>,
    PFut::IntoFuture: Send + 'static,
    Q: Fn(T) -> QFut + Send + Sync + 'static,
    QFut: IntoFuture<Output = Result<U>>,
    QFut::IntoFuture: Send + 'static,
{
    after(post, before(pre, next))
}

/// Apply a stack of middleware to `next`, the first entry outermost.
pub fn compile<T, I>(stack: I, next: Requestor<T>) -> Requestor<T>
where
    I: IntoIterator<Item = Middleware<T>>,
    I::IntoIter: DoubleEndedIterator,
{
    stack
        .into_iter()
        .rev()
        .fold(next, |inner, middleware| middleware(inner))
}

/// Encode a structured body as JSON bytes and set the JSON content type.
///
/// The `Content-Type` header is set to [`JSON_UTF8`] whatever the body is,
/// replacing any value already present, including the one set by
/// [`form_body`](crate::dsl::form_body). Buffer, stream and empty bodies are
/// sent as they are.
pub fn json_encode<T: Send + 'static>(next: Requestor<T>) -> Requestor<T> {
    before(|options| std::future::ready(encode_json_body(options)), next)
}

/// [`json_encode`] as a stack entry for [`compile`].
#[must_use]
pub fn json_encoder<T: Send + 'static>() -> Middleware<T> {
    Arc::new(json_encode::<T>)
}

fn encode_json_body(options: RequestOptions) -> Result<RequestOptions> {
    let options = options.with_header("Content-Type", JSON_UTF8);
    let RequestBody::Json(value) = &options.body else {
        return Ok(options);
    };
    let encoded = serde_json::to_vec(value)
        .map_err(|e| error::configuration("json value", "Unable to encode JSON body").with(e))?;
    log::debug!("Encoded JSON request body ({} bytes)", encoded.len());
    Ok(options.with_body(Bytes::from(encoded)))
}
