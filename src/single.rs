//! Turning a fallible future into a future of a [`Try`] value.
//!
//! A single-value source is any `Future<Output = Result<T, E>>`: it eventually
//! produces exactly one value or one error. The transformed future produces
//! exactly one [`Try`] and never fails. Dropping it before completion drops
//! the upstream future and nothing is produced.
use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{ready, Context, Poll},
};

use futures_util::future::FusedFuture;
use pin_project::pin_project;
use tracing::trace;

use crate::Try;

/// Future returned by [`to_try_single`].
///
/// Resolves to `Try::Success(v)` if the upstream resolves to `Ok(v)`, and to
/// `Try::Failure(e)` if it resolves to `Err(e)`. The upstream is polled in
/// place, on the task that polls this future.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToTrySingle<F> {
    /// `None` once terminated
    #[pin]
    inner: Option<F>,
}

impl<F> ToTrySingle<F> {
    pub(crate) fn new(inner: F) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<F> fmt::Debug for ToTrySingle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToTrySingle")
            .field("terminated", &self.inner.is_none())
            .finish()
    }
}

impl<F, T, E> Future for ToTrySingle<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Try<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        let inner = this.inner.as_mut().as_pin_mut().unwrap_or_else(|| {
            panic!("ToTrySingle must not be polled after it returned `Poll::Ready`")
        });
        let output = ready!(inner.poll(cx));
        this.inner.set(None);
        Poll::Ready(match output {
            Ok(value) => Try::Success(value),
            Err(error) => {
                trace!("upstream failed, resolving to failure");
                Try::Failure(error)
            }
        })
    }
}

impl<F, T, E> FusedFuture for ToTrySingle<F>
where
    F: Future<Output = Result<T, E>>,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Future returned by [`to_try_single_if`].
///
/// Errors accepted by the predicate resolve to `Ok(Try::Failure(e))`, rejected
/// errors resolve to `Err(e)`.
#[pin_project]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ToTrySingleIf<F, P> {
    #[pin]
    inner: Option<F>,
    predicate: P,
}

impl<F, P> ToTrySingleIf<F, P> {
    pub(crate) fn new(inner: F, predicate: P) -> Self {
        Self {
            inner: Some(inner),
            predicate,
        }
    }
}

impl<F, P> fmt::Debug for ToTrySingleIf<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToTrySingleIf")
            .field("terminated", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}

impl<F, P, T, E> Future for ToTrySingleIf<F, P>
where
    F: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    type Output = Result<Try<T, E>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        let inner = this.inner.as_mut().as_pin_mut().unwrap_or_else(|| {
            panic!("ToTrySingleIf must not be polled after it returned `Poll::Ready`")
        });
        let output = ready!(inner.poll(cx));
        this.inner.set(None);
        Poll::Ready(match output {
            Ok(value) => Ok(Try::Success(value)),
            Err(error) if (this.predicate)(&error) => {
                trace!("upstream failed with accepted error, resolving to failure");
                Ok(Try::Failure(error))
            }
            Err(error) => Err(error),
        })
    }
}

impl<F, P, T, E> FusedFuture for ToTrySingleIf<F, P>
where
    F: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Wrap a fallible future so that it never fails.
///
/// # Example
///
/// ```
/// # futures_lite::future::block_on(async {
/// use to_try::{to_try_single, Try};
///
/// let ok = to_try_single(async { Ok::<_, String>(5) }).await;
/// assert_eq!(ok, Try::Success(5));
/// let failed = to_try_single(async { Err::<u8, _>("boom") }).await;
/// assert_eq!(failed, Try::Failure("boom"));
/// # });
/// ```
pub fn to_try_single<F, T, E>(future: F) -> ToTrySingle<F>
where
    F: Future<Output = Result<T, E>>,
{
    ToTrySingle::new(future)
}

/// Wrap a fallible future so that errors accepted by `predicate` become values.
pub fn to_try_single_if<F, P, T, E>(future: F, predicate: P) -> ToTrySingleIf<F, P>
where
    F: Future<Output = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    ToTrySingleIf::new(future, predicate)
}

#[cfg(test)]
mod tests {
    use std::{
        future::{pending, ready},
        io,
    };

    use futures_lite::future;
    use futures_util::FutureExt;

    use super::*;

    #[test]
    fn success() {
        let x = future::block_on(to_try_single(ready(Ok::<_, ()>(5))));
        assert_eq!(x, Try::Success(5));
    }

    #[test]
    fn failure() {
        let x = future::block_on(to_try_single(ready(Err::<u8, _>(io::ErrorKind::NotFound))));
        assert_eq!(x, Try::Failure(io::ErrorKind::NotFound));
    }

    #[test]
    fn terminated_after_ready() {
        let mut f = to_try_single(ready(Ok::<_, ()>(1)));
        assert!(!f.is_terminated());
        assert_eq!((&mut f).now_or_never(), Some(Try::Success(1)));
        assert!(f.is_terminated());
    }

    #[test]
    #[should_panic(expected = "must not be polled after")]
    fn poll_after_ready_panics() {
        let mut f = to_try_single(ready(Ok::<_, ()>(1)));
        let _ = (&mut f).now_or_never();
        let _ = (&mut f).now_or_never();
    }

    #[test]
    fn pending_upstream() {
        let mut f = to_try_single(pending::<Result<u8, ()>>());
        assert_eq!((&mut f).now_or_never(), None);
        assert!(!f.is_terminated());
    }

    #[test]
    fn selective() {
        let accepted =
            future::block_on(to_try_single_if(ready(Err::<u8, _>(1)), |e: &u8| *e == 1));
        assert_eq!(accepted, Ok(Try::Failure(1)));
        let rejected =
            future::block_on(to_try_single_if(ready(Err::<u8, _>(2)), |e: &u8| *e == 1));
        assert_eq!(rejected, Err(2));
    }
}
