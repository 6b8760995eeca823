//! Callback based subscriptions.
//!
//! For code that prefers `on_next` / `on_error` / `on_complete` callbacks over
//! polling, `subscribe` drives a stream on the tokio runtime and delivers its
//! signals to an [`Observer`]. `subscribe_single` does the same for a future
//! and a [`SingleObserver`]. Both need the `observer` feature.
//!
//! Signals are delivered from a single task, in the order the source produced
//! them. At most one terminal signal (`on_error` or `on_complete`) is delivered
//! and nothing after it.
//!
//! What counts as an error is decided by the item type through [`Signal`]: a
//! `Result` item is a value or an error, a [`Try`] item is always a value. A
//! source transformed with [`to_try_stream`](crate::to_try_stream) or
//! [`to_try_single`](crate::to_try_single) is therefore observed with an
//! error type of [`Infallible`], and `on_error` can not be called.
//!
//! # Example
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::convert::Infallible;
//!
//! use futures_lite::stream;
//! use to_try::{observer::{observer_fn, subscribe}, prelude::*};
//!
//! let source = stream::iter(vec![Ok(1), Err("boom")]).to_try();
//! let subscription = subscribe(
//!     source,
//!     observer_fn(
//!         |item: Try<i32, &str>| println!("{item}"),
//!         |never: Infallible| match never {},
//!         || println!("done"),
//!     ),
//! );
//! subscription.join().await?;
//! # Ok(())
//! # }
//! ```
use std::{convert::Infallible, fmt};

use crate::Try;

#[cfg(feature = "observer")]
#[cfg_attr(totry_docsrs, doc(cfg(feature = "observer")))]
mod subscription;
#[cfg(feature = "observer")]
#[cfg_attr(totry_docsrs, doc(cfg(feature = "observer")))]
pub use subscription::{subscribe, subscribe_single, Subscription, SubscriptionError};

/// Classifies an emitted item as a value or an error signal
pub trait Signal {
    /// What [`Observer::on_next`] / [`SingleObserver::on_success`] receive
    type Value;
    /// What `on_error` receives
    type Error;

    /// Split into the value or error channel
    fn into_signal(self) -> Result<Self::Value, Self::Error>;
}

impl<T, E> Signal for Result<T, E> {
    type Value = T;
    type Error = E;

    fn into_signal(self) -> Result<T, E> {
        self
    }
}

impl<T, E> Signal for Try<T, E> {
    type Value = Try<T, E>;
    type Error = Infallible;

    fn into_signal(self) -> Result<Self::Value, Infallible> {
        Ok(self)
    }
}

/// Receiver of the signals of a multi-value source
pub trait Observer<T, E> {
    /// A value was produced
    fn on_next(&mut self, value: T);
    /// The source terminated with an error
    fn on_error(&mut self, error: E);
    /// The source completed normally
    fn on_complete(&mut self);
}

/// Receiver of the signal of a single-value source
pub trait SingleObserver<T, E> {
    /// The source produced its value
    fn on_success(&mut self, value: T);
    /// The source failed
    fn on_error(&mut self, error: E);
}

impl<T, E, O: Observer<T, E> + ?Sized> Observer<T, E> for Box<O> {
    fn on_next(&mut self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&mut self, error: E) {
        (**self).on_error(error)
    }

    fn on_complete(&mut self) {
        (**self).on_complete()
    }
}

impl<T, E, O: SingleObserver<T, E> + ?Sized> SingleObserver<T, E> for Box<O> {
    fn on_success(&mut self, value: T) {
        (**self).on_success(value)
    }

    fn on_error(&mut self, error: E) {
        (**self).on_error(error)
    }
}

/// An [`Observer`] made of three closures, see [`observer_fn`]
pub struct FnObserver<N, Er, C> {
    on_next: N,
    on_error: Er,
    on_complete: C,
}

impl<N, Er, C> fmt::Debug for FnObserver<N, Er, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

impl<T, E, N, Er, C> Observer<T, E> for FnObserver<N, Er, C>
where
    N: FnMut(T),
    Er: FnMut(E),
    C: FnMut(),
{
    fn on_next(&mut self, value: T) {
        (self.on_next)(value)
    }

    fn on_error(&mut self, error: E) {
        (self.on_error)(error)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// Build an [`Observer`] from closures
pub fn observer_fn<N, Er, C>(on_next: N, on_error: Er, on_complete: C) -> FnObserver<N, Er, C> {
    FnObserver {
        on_next,
        on_error,
        on_complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_items_split_into_channels() {
        assert_eq!(Ok::<u8, &str>(1).into_signal(), Ok(1));
        assert_eq!(Err::<u8, &str>("boom").into_signal(), Err("boom"));
    }

    #[test]
    fn try_items_are_always_values() {
        let failure = Try::<u8, &str>::Failure("boom");
        assert_eq!(failure.into_signal(), Ok(Try::Failure("boom")));
    }

    #[test]
    fn fn_observer_forwards() {
        let mut seen = Vec::new();
        {
            let mut observer = observer_fn(
                |v: u8| seen.push(v),
                |_: ()| unreachable!(),
                || {},
            );
            observer.on_next(1);
            observer.on_next(2);
            observer.on_complete();
        }
        assert_eq!(seen, vec![1, 2]);
    }
}
