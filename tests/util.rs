use std::{
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Duration,
};

use futures_lite::Stream;
use pin_project::{pin_project, pinned_drop};

/// Error type used by the test sources
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SourceError {
    #[display("connection reset")]
    Reset,
    #[display("timeout after {_0}ms")]
    Timeout(u64),
}

impl std::error::Error for SourceError {}

/// Observes what happens to a [`Probe`]d source
#[derive(Debug, Clone, Default)]
pub struct ProbeState {
    polls: Arc<AtomicUsize>,
    dropped: Arc<AtomicBool>,
}

#[allow(unused)]
impl ProbeState {
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Wraps a stream, counting polls and recording when it is dropped
#[pin_project(PinnedDrop)]
pub struct Probe<S> {
    #[pin]
    inner: S,
    state: ProbeState,
}

#[allow(unused)]
pub fn probe<S>(inner: S) -> (Probe<S>, ProbeState) {
    let state = ProbeState::default();
    (
        Probe {
            inner,
            state: state.clone(),
        },
        state,
    )
}

impl<S: Stream> Stream for Probe<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.state.polls.fetch_add(1, Ordering::SeqCst);
        this.inner.poll_next(cx)
    }
}

#[pinned_drop]
impl<S> PinnedDrop for Probe<S> {
    fn drop(self: Pin<&mut Self>) {
        self.state.dropped.store(true, Ordering::SeqCst);
    }
}

/// A source whose items are produced on another task and delivered through a flume channel
#[allow(unused)]
pub fn flume_source<T: Send + 'static>(
    items: Vec<T>,
    delay: Duration,
) -> impl Stream<Item = T> + Send + 'static {
    let (send, recv) = flume::bounded(1);
    tokio::task::spawn(async move {
        for item in items {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if send.send_async(item).await.is_err() {
                tracing::debug!("receiver dropped");
                break;
            }
        }
    });
    recv.into_stream()
}
