//! Driving sources on the tokio runtime.
use std::{error, fmt, future::Future};

use futures_lite::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

use super::{Observer, Signal, SingleObserver};

/// Error returned by [`Subscription::join`]
#[derive(Debug)]
pub enum SubscriptionError {
    /// The subscription was cancelled before the source terminated
    Cancelled,
    /// An observer callback panicked
    Panicked,
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "subscription was cancelled"),
            Self::Panicked => write!(f, "observer panicked"),
        }
    }
}

impl error::Error for SubscriptionError {}

/// How the driving task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Terminated,
    Cancelled,
}

/// Handle to a running subscription.
///
/// Dropping the handle detaches the subscription, it keeps running. Use
/// [`Subscription::cancel`] or [`Subscription::cancel_on_drop`] to stop it.
#[derive(Debug)]
#[must_use = "dropping a subscription detaches it, use `cancel` to stop it"]
pub struct Subscription {
    token: CancellationToken,
    task: JoinHandle<Termination>,
}

impl Subscription {
    /// Cancel the subscription.
    ///
    /// The source is not polled again and no callback is started once the
    /// driving task observes the cancellation. That happens asynchronously:
    /// a callback that is already running completes, and if the task has
    /// already passed its cancellation check for the current signal, that
    /// callback may still start after this returns.
    ///
    /// Use [`Subscription::cancel_and_join`] if no signal may be delivered
    /// after the call.
    pub fn cancel(&self) {
        debug!("cancelling subscription");
        self.token.cancel();
    }

    /// True if [`Subscription::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True if the driving task has ended, for whatever reason
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the subscription to end.
    ///
    /// Returns `Ok(())` if the source terminated and the terminal signal was
    /// delivered, [`SubscriptionError::Cancelled`] if the subscription was
    /// cancelled first.
    pub async fn join(self) -> Result<(), SubscriptionError> {
        match self.task.await {
            Ok(Termination::Terminated) => Ok(()),
            Ok(Termination::Cancelled) => Err(SubscriptionError::Cancelled),
            Err(cause) if cause.is_panic() => Err(SubscriptionError::Panicked),
            Err(_) => Err(SubscriptionError::Cancelled),
        }
    }

    /// Cancel and wait for the driving task to end.
    ///
    /// Once this returns, no callback is running and none will be started.
    pub async fn cancel_and_join(self) -> Result<(), SubscriptionError> {
        self.cancel();
        self.join().await
    }

    /// Turn the handle into a guard that cancels the subscription when dropped.
    ///
    /// The handle is consumed, so the subscription can no longer be joined.
    /// Dropping the guard only requests the cancellation, the same way
    /// [`Subscription::cancel`] does; the driving task ends shortly after.
    pub fn cancel_on_drop(self) -> DropGuard {
        self.token.drop_guard()
    }
}

/// Subscribe `observer` to a stream.
///
/// The first error signal the stream yields is delivered via
/// [`Observer::on_error`] and ends the subscription; the end of the stream is
/// delivered via [`Observer::on_complete`].
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn subscribe<S, O>(source: S, mut observer: O) -> Subscription
where
    S: Stream + Send + 'static,
    S::Item: Signal + Send,
    O: Observer<<S::Item as Signal>::Value, <S::Item as Signal>::Error> + Send + 'static,
{
    let token = CancellationToken::new();
    let cancel = token.clone();
    let task = tokio::spawn(async move {
        debug!("subscribed");
        tokio::pin!(source);
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("subscription cancelled");
                    return Termination::Cancelled;
                }
                next = source.next() => next,
            };
            // cancelled while the item was being produced
            if cancel.is_cancelled() {
                debug!("subscription cancelled");
                return Termination::Cancelled;
            }
            match next.map(Signal::into_signal) {
                Some(Ok(value)) => observer.on_next(value),
                Some(Err(error)) => {
                    trace!("delivering error");
                    observer.on_error(error);
                    break;
                }
                None => {
                    trace!("delivering completion");
                    observer.on_complete();
                    break;
                }
            }
        }
        debug!("subscription terminated");
        Termination::Terminated
    });
    Subscription { token, task }
}

/// Subscribe `observer` to a future.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn subscribe_single<F, O>(source: F, mut observer: O) -> Subscription
where
    F: Future + Send + 'static,
    F::Output: Signal + Send,
    O: SingleObserver<<F::Output as Signal>::Value, <F::Output as Signal>::Error>
        + Send
        + 'static,
{
    let token = CancellationToken::new();
    let cancel = token.clone();
    let task = tokio::spawn(async move {
        debug!("subscribed");
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("subscription cancelled");
                return Termination::Cancelled;
            }
            output = source => output,
        };
        if cancel.is_cancelled() {
            debug!("subscription cancelled");
            return Termination::Cancelled;
        }
        match output.into_signal() {
            Ok(value) => observer.on_success(value),
            Err(error) => {
                trace!("delivering error");
                observer.on_error(error)
            }
        }
        debug!("subscription terminated");
        Termination::Terminated
    });
    Subscription { token, task }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        sync::{Arc, Mutex},
    };

    use futures_lite::stream;

    use super::*;
    use crate::{observer::observer_fn, prelude::*};

    #[derive(Debug, Clone, PartialEq)]
    enum Event<T, E> {
        Next(T),
        Error(E),
        Complete,
    }

    fn recorder<T: Send + 'static, E: Send + 'static>(
    ) -> (Arc<Mutex<Vec<Event<T, E>>>>, impl Observer<T, E> + Send + 'static) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (events.clone(), events.clone(), events.clone());
        let observer = observer_fn(
            move |v: T| a.lock().unwrap().push(Event::Next(v)),
            move |e: E| b.lock().unwrap().push(Event::Error(e)),
            move || c.lock().unwrap().push(Event::Complete),
        );
        (events, observer)
    }

    #[tokio::test]
    async fn raw_source_errors() -> testresult::TestResult<()> {
        let (events, observer) = recorder::<u8, &str>();
        subscribe(stream::iter([Ok(1), Err("boom"), Ok(2)]), observer)
            .join()
            .await?;
        assert_eq!(
            *events.lock().unwrap(),
            vec![Event::Next(1), Event::Error("boom")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn transformed_source_never_errors() -> testresult::TestResult<()> {
        let (events, observer) = recorder::<Try<u8, &str>, Infallible>();
        let source = stream::iter([Ok(1), Err("boom"), Ok(2)]).to_try();
        subscribe(source, observer).join().await?;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Event::Next(Try::Success(1)),
                Event::Next(Try::Failure("boom")),
                Event::Complete
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn cancel_pending_source() {
        let (events, observer) = recorder::<u8, ()>();
        let subscription = subscribe(stream::pending::<Result<u8, ()>>(), observer);
        assert!(!subscription.is_cancelled());
        subscription.cancel();
        assert!(subscription.is_cancelled());
        let res = subscription.join().await;
        assert!(matches!(res, Err(SubscriptionError::Cancelled)));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_success() -> testresult::TestResult<()> {
        let value = Arc::new(Mutex::new(None));
        struct Slot(Arc<Mutex<Option<Try<u8, &'static str>>>>);
        impl SingleObserver<u8, &'static str> for Slot {
            fn on_success(&mut self, value: u8) {
                *self.0.lock().unwrap() = Some(Try::Success(value));
            }
            fn on_error(&mut self, error: &'static str) {
                *self.0.lock().unwrap() = Some(Try::Failure(error));
            }
        }
        subscribe_single(async { Err::<u8, _>("boom") }, Slot(value.clone()))
            .join()
            .await?;
        assert_eq!(*value.lock().unwrap(), Some(Try::Failure("boom")));
        Ok(())
    }
}
