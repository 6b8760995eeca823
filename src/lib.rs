//! Turn fallible streams and futures into infallible ones
//!
//! A fallible stream (`Stream<Item = Result<T, E>>`) signals its end either by
//! running out of items or by yielding an error. This crate converts such a
//! stream into a `Stream<Item = Try<T, E>>` that never signals an error: every
//! value becomes a [`Try::Success`], and the terminating error becomes one
//! final [`Try::Failure`], after which the stream ends normally. The same is
//! available for fallible futures.
//!
//! Failures can then be buffered, logged or forwarded using the same
//! combinators as ordinary values, and consumers handle them by matching on
//! [`Try`] instead of wiring up separate error handling.
//!
//! The transformers do not spawn tasks or hop threads. They do their work
//! inside `poll`, on whatever task polls them, and preserve the order of the
//! upstream signals.
//!
//! # Example
//! ```
//! # futures_lite::future::block_on(async {
//! use futures_lite::{stream, StreamExt};
//! use to_try::prelude::*;
//!
//! let source = stream::iter(vec![Ok(1), Ok(2), Err("connection reset")]);
//! let mut items = source.to_try();
//! while let Some(item) = items.next().await {
//!     match item {
//!         Try::Success(value) => println!("got {value}"),
//!         Try::Failure(cause) => println!("source failed: {cause}"),
//!     }
//! }
//!
//! let single = async { Err::<u32, _>("timeout") }.to_try().await;
//! assert_eq!(single, Try::Failure("timeout"));
//! # });
//! ```
//!
//! # Features
#![doc = document_features::document_features!()]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(totry_docsrs, feature(doc_cfg))]
pub mod ext;
pub mod observer;
pub mod result;
pub mod single;
pub mod stream;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(totry_docsrs, doc(cfg(feature = "test-utils")))]
pub mod test_utils;

pub use ext::{BoxTrySingle, BoxTryStream, FutureToTryExt, StreamToTryExt};
pub use result::Try;
pub use single::{to_try_single, to_try_single_if, ToTrySingle, ToTrySingleIf};
pub use stream::{to_try_stream, to_try_stream_if, ToTryStream, ToTryStreamIf};

/// Everything needed to use the transformers with method syntax
pub mod prelude {
    pub use crate::{FutureToTryExt, StreamToTryExt, Try};
}
