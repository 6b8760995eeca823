//! Turning a fallible stream into a stream of [`Try`] values.
//!
//! A fallible stream here is any `Stream<Item = Result<T, E>>`. The first
//! `Err` it yields is treated as its terminal error signal: the transformed
//! stream emits it as a single [`Try::Failure`] and then ends, dropping the
//! upstream without polling it again.
//!
//! The adapters own no tasks, buffers or locks. All work happens inside
//! `poll_next`, on whatever task polls the transformed stream, and every
//! upstream item produces at most one downstream item before `poll_next`
//! returns. Cancellation is dropping the transformed stream, which drops the
//! upstream with it.
use std::{
    fmt,
    pin::Pin,
    task::{ready, Context, Poll},
};

use futures_lite::Stream;
use futures_util::stream::FusedStream;
use pin_project::pin_project;
use tracing::trace;

use crate::Try;

/// Stream returned by [`to_try_stream`].
///
/// Yields every upstream `Ok(v)` as `Try::Success(v)`, in order. If the
/// upstream yields `Err(e)`, yields `Try::Failure(e)` and ends. If the
/// upstream ends, ends without yielding anything extra. Never fails.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct ToTryStream<S> {
    /// `None` once terminated
    #[pin]
    inner: Option<S>,
}

impl<S> ToTryStream<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner: Some(inner) }
    }

    /// True if the upstream is still alive, i.e. the stream has not terminated yet
    pub fn is_subscribed(&self) -> bool {
        self.inner.is_some()
    }

    /// Get a reference to the upstream, if it has not been dropped yet
    pub fn get_ref(&self) -> Option<&S> {
        self.inner.as_ref()
    }
}

impl<S> fmt::Debug for ToTryStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToTryStream")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

impl<S, T, E> Stream for ToTryStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Try<T, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(inner) = this.inner.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };
        match ready!(inner.poll_next(cx)) {
            Some(Ok(value)) => Poll::Ready(Some(Try::Success(value))),
            Some(Err(error)) => {
                trace!("upstream failed, emitting terminal failure");
                this.inner.set(None);
                Poll::Ready(Some(Try::Failure(error)))
            }
            None => {
                trace!("upstream completed");
                this.inner.set(None);
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            // an error ends the stream early, so the lower bound does not survive
            Some(inner) => (0, inner.size_hint().1),
            None => (0, Some(0)),
        }
    }
}

impl<S, T, E> FusedStream for ToTryStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Stream returned by [`to_try_stream_if`].
///
/// Like [`ToTryStream`], but only errors accepted by the predicate are turned
/// into `Ok(Try::Failure(e))`. Rejected errors are forwarded as `Err(e)`. In
/// both cases the error ends the stream.
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct ToTryStreamIf<S, P> {
    #[pin]
    inner: Option<S>,
    predicate: P,
}

impl<S, P> ToTryStreamIf<S, P> {
    pub(crate) fn new(inner: S, predicate: P) -> Self {
        Self {
            inner: Some(inner),
            predicate,
        }
    }

    /// True if the upstream is still alive, i.e. the stream has not terminated yet
    pub fn is_subscribed(&self) -> bool {
        self.inner.is_some()
    }
}

impl<S, P> fmt::Debug for ToTryStreamIf<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToTryStreamIf")
            .field("subscribed", &self.is_subscribed())
            .finish_non_exhaustive()
    }
}

impl<S, P, T, E> Stream for ToTryStreamIf<S, P>
where
    S: Stream<Item = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    type Item = Result<Try<T, E>, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(inner) = this.inner.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };
        let item = match ready!(inner.poll_next(cx)) {
            Some(Ok(value)) => return Poll::Ready(Some(Ok(Try::Success(value)))),
            Some(Err(error)) if (this.predicate)(&error) => {
                trace!("upstream failed with accepted error, emitting terminal failure");
                Some(Ok(Try::Failure(error)))
            }
            Some(Err(error)) => {
                trace!("upstream failed with rejected error, forwarding it");
                Some(Err(error))
            }
            None => None,
        };
        this.inner.set(None);
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(inner) => (0, inner.size_hint().1),
            None => (0, Some(0)),
        }
    }
}

impl<S, P, T, E> FusedStream for ToTryStreamIf<S, P>
where
    S: Stream<Item = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Wrap a fallible stream so that it never fails.
///
/// Every `Ok(v)` becomes `Try::Success(v)`. The first `Err(e)` becomes a final
/// `Try::Failure(e)` after which the stream ends.
///
/// # Example
///
/// ```
/// # futures_lite::future::block_on(async {
/// use futures_lite::{stream, StreamExt};
/// use to_try::{to_try_stream, Try};
///
/// let source = stream::iter(vec![Ok(1), Ok(2), Err("boom"), Ok(3)]);
/// let items: Vec<_> = to_try_stream(source).collect().await;
/// assert_eq!(items, vec![Try::Success(1), Try::Success(2), Try::Failure("boom")]);
/// # });
/// ```
pub fn to_try_stream<S, T, E>(stream: S) -> ToTryStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    ToTryStream::new(stream)
}

/// Wrap a fallible stream so that errors accepted by `predicate` become values.
///
/// Errors rejected by `predicate` are forwarded as `Err`. Either way the first
/// error ends the stream.
pub fn to_try_stream_if<S, P, T, E>(stream: S, predicate: P) -> ToTryStreamIf<S, P>
where
    S: Stream<Item = Result<T, E>>,
    P: FnMut(&E) -> bool,
{
    ToTryStreamIf::new(stream, predicate)
}
