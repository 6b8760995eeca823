//! Method syntax for the transformers.
//!
//! These traits are blanket-implemented for every fallible stream and future,
//! so bringing them into scope (e.g. via [`crate::prelude`]) is enough.
use std::{future::Future, pin::Pin};

use futures_lite::Stream;

use crate::{
    single::{to_try_single, to_try_single_if, ToTrySingle, ToTrySingleIf},
    stream::{to_try_stream, to_try_stream_if, ToTryStream, ToTryStreamIf},
    Try,
};

/// Boxed stream of [`Try`] values
pub type BoxTryStream<'a, T, E> = Pin<Box<dyn Stream<Item = Try<T, E>> + Send + 'a>>;

/// Boxed future of a [`Try`] value
pub type BoxTrySingle<'a, T, E> = Pin<Box<dyn Future<Output = Try<T, E>> + Send + 'a>>;

/// Extension methods for `Stream<Item = Result<T, E>>`
pub trait StreamToTryExt<T, E>: Stream<Item = Result<T, E>> + Sized {
    /// See [`to_try_stream`]
    fn to_try(self) -> ToTryStream<Self> {
        to_try_stream(self)
    }

    /// See [`to_try_stream_if`]
    fn to_try_if<P>(self, predicate: P) -> ToTryStreamIf<Self, P>
    where
        P: FnMut(&E) -> bool,
    {
        to_try_stream_if(self, predicate)
    }

    /// Transform and box in one go, to hand the result across an API boundary
    fn boxed_try<'a>(self) -> BoxTryStream<'a, T, E>
    where
        Self: Send + 'a,
    {
        Box::pin(to_try_stream(self))
    }
}

impl<S, T, E> StreamToTryExt<T, E> for S where S: Stream<Item = Result<T, E>> {}

/// Extension methods for `Future<Output = Result<T, E>>`
pub trait FutureToTryExt<T, E>: Future<Output = Result<T, E>> + Sized {
    /// See [`to_try_single`]
    fn to_try(self) -> ToTrySingle<Self> {
        to_try_single(self)
    }

    /// See [`to_try_single_if`]
    fn to_try_if<P>(self, predicate: P) -> ToTrySingleIf<Self, P>
    where
        P: FnMut(&E) -> bool,
    {
        to_try_single_if(self, predicate)
    }

    /// Transform and box in one go, to hand the result across an API boundary
    fn boxed_try<'a>(self) -> BoxTrySingle<'a, T, E>
    where
        Self: Send + 'a,
    {
        Box::pin(to_try_single(self))
    }
}

impl<F, T, E> FutureToTryExt<T, E> for F where F: Future<Output = Result<T, E>> {}
