//! Lazy, cancellable asynchronous operations
//!
//! A [`Task`] describes an operation without starting it. Every call to
//! [`Task::fork`] starts one independent execution on the tokio runtime and
//! returns a [`Running`] handle that resolves with its outcome and can abort it.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::task::{AbortHandle, JoinHandle};

use crate::error::{self, AbortReason, Error, Result};

type Factory<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Cold description of an asynchronous operation.
///
/// Building or cloning a task performs no work. Each execution re-runs the
/// operation from the start.
pub struct Task<T> {
    factory: Factory<T>,
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Task<T> {
    /// Task running the future produced by `factory` on every execution.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || factory().boxed()),
        }
    }

    /// Task that fails with `error` on every execution.
    #[must_use]
    pub fn failed(error: Error) -> Self {
        Self::new(move || future::ready(Err(error.clone())))
    }

    /// Start one execution on the current tokio runtime.
    ///
    /// Dropping the returned handle before it resolves aborts the execution.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    #[must_use = "dropping a Running aborts it"]
    pub fn fork(&self) -> Running<T> {
        Running {
            handle: tokio::spawn(self.run()),
        }
    }

    /// The operation as a plain future, without spawning or abort handling.
    pub fn run(&self) -> BoxFuture<'static, Result<T>> {
        (self.factory)()
    }

    /// Transform the success value.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Task<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Task::new(move || {
            let f = Arc::clone(&f);
            self.run().map(move |result| result.map(|value| f(value)))
        })
    }

    /// Continue with `f` once this one succeeds.
    ///
    /// `f` may return a [`Task`] or any future resolving to a [`Result`].
    #[must_use]
    pub fn and_then<U, F, Fut>(self, f: F) -> Task<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: IntoFuture<Output = Result<U>>,
        Fut::IntoFuture: Send + 'static,
    {
        let f = Arc::new(f);
        Task::new(move || {
            let f = Arc::clone(&f);
            let first = self.run();
            async move { f(first.await?).await }
        })
    }

    /// Continue with `f` if this one fails.
    #[must_use]
    pub fn or_else<F, Fut>(self, f: F) -> Task<T>
    where
        F: Fn(Error) -> Fut + Send + Sync + 'static,
        Fut: IntoFuture<Output = Result<T>>,
        Fut::IntoFuture: Send + 'static,
    {
        let f = Arc::new(f);
        Task::new(move || {
            let f = Arc::clone(&f);
            let first = self.run();
            async move {
                match first.await {
                    Ok(value) => Ok(value),
                    Err(err) => f(err).await,
                }
            }
        })
    }

    /// Transform the failure.
    #[must_use]
    pub fn map_err<F>(self, f: F) -> Task<T>
    where
        F: Fn(Error) -> Error + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Task::new(move || {
            let f = Arc::clone(&f);
            self.run().map(move |result| result.map_err(|err| f(err)))
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Task<T> {
    /// Task that succeeds with `value` on every execution.
    #[must_use]
    pub fn ok(value: T) -> Self {
        Self::new(move || future::ready(Ok(value.clone())))
    }
}

impl<T: Send + 'static> IntoFuture for Task<T> {
    type Output = Result<T>;
    type IntoFuture = Running<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.fork()
    }
}

impl<T: Send + 'static> IntoFuture for &Task<T> {
    type Output = Result<T>;
    type IntoFuture = Running<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.fork()
    }
}

/// One started execution of a [`Task`].
///
/// Resolves with the outcome of the execution, or with an
/// [`AbortReason::Cancelled`] error if it was aborted first.
pub struct Running<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T> Running<T> {
    /// Abort the execution, dropping its in-flight work.
    ///
    /// No effect once the execution has completed.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Handle that aborts this execution from elsewhere.
    #[must_use]
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Returns true once the execution has completed or been aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for Running<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join)) if join.is_cancelled() => {
                Poll::Ready(Err(error::aborted(AbortReason::Cancelled)))
            }
            Poll::Ready(Err(join)) => std::panic::resume_unwind(join.into_panic()),
        }
    }
}

impl<T> Drop for Running<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl<T> fmt::Debug for Running<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Running")
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
