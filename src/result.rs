//! The [`Try`] value type.
//!
//! A [`Try`] is what the transformers in this crate emit instead of signalling
//! an error: either a [`Try::Success`] holding a value produced upstream, or a
//! [`Try::Failure`] holding the error the upstream terminated with.
use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// The outcome of an upstream signal, as an ordinary value.
///
/// Equality, ordering and hashing are derived and therefore per variant:
/// two `Success` values are equal iff their payloads are equal, two `Failure`
/// values are equal iff their errors are equal under `E: PartialEq`, and a
/// `Success` is never equal to a `Failure`.
///
/// Errors that have no notion of equality (e.g. `std::io::Error`) make the
/// whole `Try` non-comparable. If you need identity semantics, wrap the error
/// in an `Arc` and compare the failures with `Arc::ptr_eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[must_use = "this `Try` may be a `Failure`, which should be handled"]
pub enum Try<T, E> {
    /// A value produced by the source
    Success(T),
    /// The error the source terminated with
    Failure(E),
}

impl<T, E> Try<T, E> {
    /// Create a [`Try::Success`]
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Create a [`Try::Failure`]
    pub fn failure(error: E) -> Self {
        Self::Failure(error)
    }

    /// True if this is a [`Try::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True if this is a [`Try::Failure`]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The success value, if any
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The failure error, if any
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Borrow the payload of whichever variant is present.
    pub fn as_ref(&self) -> Try<&T, &E> {
        match self {
            Self::Success(value) => Try::Success(value),
            Self::Failure(error) => Try::Failure(error),
        }
    }

    /// Map the success value, leaving a failure untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Try<U, E> {
        match self {
            Self::Success(value) => Try::Success(f(value)),
            Self::Failure(error) => Try::Failure(error),
        }
    }

    /// Map the failure error, leaving a success untouched.
    pub fn map_failure<E2, F: FnOnce(E) -> E2>(self, f: F) -> Try<T, E2> {
        match self {
            Self::Success(value) => Try::Success(value),
            Self::Failure(error) => Try::Failure(f(error)),
        }
    }

    /// Convert back into a [`std::result::Result`], e.g. to use `?` on it.
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }
}

impl<T, E: Debug> Try<T, E> {
    /// Extract the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Try::Failure`], with a message containing the error.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => {
                panic!("called `Try::unwrap()` on a `Failure` value: {error:?}")
            }
        }
    }

    /// Extract the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Try::Failure`], with `msg` and the error.
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => panic!("{msg}: {error:?}"),
        }
    }
}

impl<T: Debug, E> Try<T, E> {
    /// Extract the failure error.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Try::Success`], with a message containing the value.
    #[track_caller]
    pub fn unwrap_failure(self) -> E {
        match self {
            Self::Success(value) => {
                panic!("called `Try::unwrap_failure()` on a `Success` value: {value:?}")
            }
            Self::Failure(error) => error,
        }
    }

    /// Extract the failure error.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Try::Success`], with `msg` and the value.
    #[track_caller]
    pub fn expect_failure(self, msg: &str) -> E {
        match self {
            Self::Success(value) => panic!("{msg}: {value:?}"),
            Self::Failure(error) => error,
        }
    }
}

impl<T, E> From<Result<T, E>> for Try<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<Try<T, E>> for Result<T, E> {
    fn from(value: Try<T, E>) -> Self {
        match value {
            Try::Success(value) => Ok(value),
            Try::Failure(error) => Err(error),
        }
    }
}

impl<T: Display, E: Display> Display for Try<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "Success({value})"),
            Self::Failure(error) => write!(f, "Failure({error})"),
        }
    }
}
