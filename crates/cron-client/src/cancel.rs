//! Cooperative cancellation of in-flight calls.

use cron_types::CronApiError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

/// A call that can be cancelled from elsewhere through its [`CancelHandle`].
///
/// Once cancelled, the wrapped call is dropped (aborting its HTTP exchange) and the
/// wrapper resolves to `CronApiError::Cancelled`; the call's own outcome is never
/// delivered. Simply dropping a `Cancelable` cancels it as well.
pub struct Cancelable<'a, T> {
    inner: Pin<Box<dyn Future<Output = Result<T, CronApiError>> + Send + 'a>>,
    token: CancellationToken,
}

impl<'a, T: Send + 'a> Cancelable<'a, T> {
    pub fn new<F>(call: F) -> Self
    where
        F: Future<Output = Result<T, CronApiError>> + Send + 'a,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let inner = Box::pin(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => Err(CronApiError::Cancelled),
                result = call => result,
            }
        });
        Self { inner, token }
    }
}

impl<T> Cancelable<'_, T> {
    pub fn handle(&self) -> CancelHandle {
        CancelHandle(self.token.clone())
    }
}

impl<T> Future for Cancelable<'_, T> {
    type Output = Result<T, CronApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

/// Cancels the [`Cancelable`] it came from. Cloneable and usable from any task.
#[derive(Debug, Clone)]
pub struct CancelHandle(CancellationToken);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// `call.cancelable()` for any call future.
pub trait CancelableExt<'a, T>: Future<Output = Result<T, CronApiError>> + Send + Sized + 'a {
    fn cancelable(self) -> Cancelable<'a, T>;
}

impl<'a, T, F> CancelableExt<'a, T> for F
where
    T: Send + 'a,
    F: Future<Output = Result<T, CronApiError>> + Send + 'a,
{
    fn cancelable(self) -> Cancelable<'a, T> {
        Cancelable::new(self)
    }
}
