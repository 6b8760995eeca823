//! Recording observer for tests.
//!
//! [`TestObserver`] records every signal it receives and provides assertions
//! in the style of rx test observers. It can be fed by `observer::subscribe`
//! and `observer::subscribe_single`, or directly with [`test_stream`] and
//! [`test_single`], which drive the source to termination on the current task.
//!
//! All assertions panic with a description of what was recorded.
use std::{
    fmt::Debug,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_lite::{Stream, StreamExt};

use crate::observer::{Observer, Signal, SingleObserver};

#[derive(Debug)]
struct Recorded<T, E> {
    values: Vec<T>,
    errors: Vec<E>,
    completions: usize,
}

impl<T, E> Default for Recorded<T, E> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            errors: Vec::new(),
            completions: 0,
        }
    }
}

/// An observer that records what it receives.
///
/// Clones share the recording, so one clone can be handed to a subscription
/// while another is used for the assertions.
#[derive(Debug)]
pub struct TestObserver<T, E> {
    inner: Arc<Mutex<Recorded<T, E>>>,
}

impl<T, E> Clone for TestObserver<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for TestObserver<T, E> {
    fn default() -> Self {
        Self {
            inner: Default::default(),
        }
    }
}

impl<T, E> TestObserver<T, E> {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded<T, E>> {
        // an assertion that panicked while holding the lock must not hide the recording
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of values received so far
    pub fn value_count(&self) -> usize {
        self.lock().values.len()
    }

    /// True once an error or a completion has been received
    pub fn is_terminated(&self) -> bool {
        let recorded = self.lock();
        recorded.completions > 0 || !recorded.errors.is_empty()
    }
}

impl<T: Clone, E: Clone> TestObserver<T, E> {
    /// The values received so far
    pub fn values(&self) -> Vec<T> {
        self.lock().values.clone()
    }

    /// The errors received so far
    pub fn errors(&self) -> Vec<E> {
        self.lock().errors.clone()
    }
}

impl<T: Debug + PartialEq, E: Debug + PartialEq> TestObserver<T, E> {
    /// Assert that no error was received
    #[track_caller]
    pub fn assert_no_errors(&self) -> &Self {
        let recorded = self.lock();
        assert!(
            recorded.errors.is_empty(),
            "expected no errors, got {:?}",
            recorded.errors
        );
        self
    }

    /// Assert that exactly one error was received and that it equals `error`
    #[track_caller]
    pub fn assert_error(&self, error: E) -> &Self {
        let recorded = self.lock();
        assert_eq!(recorded.errors, [error], "unexpected errors");
        self
    }

    /// Assert that exactly one value was received and that it equals `value`
    #[track_caller]
    pub fn assert_value(&self, value: T) -> &Self {
        let recorded = self.lock();
        assert_eq!(recorded.values, [value], "unexpected values");
        self
    }

    /// Assert that exactly `values` were received, in this order
    #[track_caller]
    pub fn assert_values(&self, values: impl IntoIterator<Item = T>) -> &Self {
        let expected = values.into_iter().collect::<Vec<_>>();
        let recorded = self.lock();
        assert_eq!(recorded.values, expected, "unexpected values");
        self
    }

    /// Assert the number of values received
    #[track_caller]
    pub fn assert_value_count(&self, count: usize) -> &Self {
        let recorded = self.lock();
        assert_eq!(
            recorded.values.len(),
            count,
            "unexpected value count, values: {:?}",
            recorded.values
        );
        self
    }

    /// Assert that exactly one completion was received
    #[track_caller]
    pub fn assert_complete(&self) -> &Self {
        let recorded = self.lock();
        assert_eq!(
            recorded.completions, 1,
            "expected exactly one completion, errors: {:?}",
            recorded.errors
        );
        self
    }

    /// Assert that no completion was received
    #[track_caller]
    pub fn assert_not_complete(&self) -> &Self {
        let recorded = self.lock();
        assert_eq!(recorded.completions, 0, "expected no completion");
        self
    }

    /// Assert that nothing at all was received
    #[track_caller]
    pub fn assert_empty(&self) -> &Self {
        let recorded = self.lock();
        assert!(
            recorded.values.is_empty() && recorded.errors.is_empty() && recorded.completions == 0,
            "expected no signals, got {recorded:?}"
        );
        self
    }
}

impl<T, E> Observer<T, E> for TestObserver<T, E> {
    fn on_next(&mut self, value: T) {
        self.lock().values.push(value);
    }

    fn on_error(&mut self, error: E) {
        self.lock().errors.push(error);
    }

    fn on_complete(&mut self) {
        self.lock().completions += 1;
    }
}

/// A single success is recorded as a value followed by a completion.
impl<T, E> SingleObserver<T, E> for TestObserver<T, E> {
    fn on_success(&mut self, value: T) {
        let mut recorded = self.lock();
        recorded.values.push(value);
        recorded.completions += 1;
    }

    fn on_error(&mut self, error: E) {
        self.lock().errors.push(error);
    }
}

/// The [`TestObserver`] matching the items of a source
pub type TestObserverFor<I> = TestObserver<<I as Signal>::Value, <I as Signal>::Error>;

/// Drive `source` to termination on the current task and record its signals.
///
/// Like `observer::subscribe`, the first error signal ends the recording.
/// Does not need a runtime, so it can be used with `futures_lite::future::block_on`.
pub async fn test_stream<S>(source: S) -> TestObserverFor<S::Item>
where
    S: Stream,
    S::Item: Signal,
{
    let mut observer = TestObserver::new();
    let mut source = std::pin::pin!(source);
    while let Some(item) = source.next().await {
        match item.into_signal() {
            Ok(value) => Observer::on_next(&mut observer, value),
            Err(error) => {
                Observer::on_error(&mut observer, error);
                return observer;
            }
        }
    }
    observer.on_complete();
    observer
}

/// Drive `source` to completion on the current task and record its signal.
pub async fn test_single<F>(source: F) -> TestObserverFor<F::Output>
where
    F: Future,
    F::Output: Signal,
{
    let mut observer = TestObserver::new();
    match source.await.into_signal() {
        Ok(value) => observer.on_success(value),
        Err(error) => SingleObserver::on_error(&mut observer, error),
    }
    observer
}

#[cfg(test)]
mod tests {
    use futures_lite::{future, stream};

    use super::*;
    use crate::Try;

    #[test]
    fn records_raw_stream() {
        let source = stream::iter([Ok(1), Ok(2), Err("boom")]);
        let observer = future::block_on(test_stream(source));
        observer
            .assert_values([1, 2])
            .assert_error("boom")
            .assert_not_complete();
        assert!(observer.is_terminated());
    }

    #[test]
    fn records_try_stream() {
        let source = stream::iter([Try::<u8, u8>::Success(1)]);
        let observer = future::block_on(test_stream(source));
        observer
            .assert_no_errors()
            .assert_value(Try::Success(1))
            .assert_complete();
    }

    #[test]
    fn records_single() {
        let observer = future::block_on(test_single(async { Ok::<_, ()>(5) }));
        observer.assert_no_errors().assert_value(5).assert_complete();
    }

    #[test]
    #[should_panic(expected = "expected no errors")]
    fn assert_no_errors_fails() {
        let observer = future::block_on(test_single(async { Err::<u8, _>("boom") }));
        observer.assert_no_errors();
    }

    #[test]
    fn clones_share_recording() {
        let observer = TestObserver::<u8, ()>::new();
        let mut feeder = observer.clone();
        observer.assert_empty();
        Observer::on_next(&mut feeder, 1);
        assert_eq!(observer.value_count(), 1);
        assert_eq!(observer.values(), vec![1]);
        assert!(!observer.is_terminated());
    }
}
