//! Lifting policies - turning fallible operations into total outcomes.
//!
//! Every function here takes an operation already bound to its receiver and
//! arguments (a zero-argument closure or a ready future) and applies one
//! policy:
//!
//! - [`result`]: success and failure pass through as values; a panic is
//!   captured and becomes [`OrmError::Panic`]. Total - never unwinds.
//! - [`maybe`]: the not-found condition becomes `Ok(None)`; any value
//!   becomes `Ok(Some(..))`; every other failure stays on the error channel.
//! - [`io_result`]: identical control flow to [`result`], but the outcome is
//!   sealed in an [`IoResult`] envelope that must be explicitly run.
//! - [`future_result`] / [`future_io_result`] (feature `async`): the same
//!   policies for the asynchronous calling convention, suspending exactly
//!   once at the await of the wrapped operation.
//!
//! # Examples
//!
//! ```rust
//! use ormlift::error::OrmError;
//! use ormlift::lift;
//!
//! // Failure as a value:
//! let outcome = lift::result(|| -> Result<i64, OrmError> { Err(OrmError::NotFound) });
//! assert_eq!(outcome, Err(OrmError::NotFound));
//!
//! // Absence as a value:
//! let absent = lift::maybe(|| -> Result<i64, OrmError> { Err(OrmError::NotFound) });
//! assert_eq!(absent, Ok(None));
//! ```

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::OrmError;
use crate::outcome::IoResult;

#[cfg(feature = "async")]
use std::future::Future;

#[cfg(feature = "async")]
use futures::FutureExt;

/// Extracts a readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `operation` under the sync-result policy.
///
/// A returned `Ok`/`Err` passes through unchanged; a panic is captured and
/// surfaced as [`OrmError::Panic`]. The caller can rely on this function
/// never unwinding.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::OrmError;
/// use ormlift::lift;
///
/// let outcome = lift::result(|| -> Result<i64, OrmError> { panic!("boom") });
/// assert!(matches!(outcome, Err(OrmError::Panic(message)) if message == "boom"));
/// ```
pub fn result<A, F>(operation: F) -> Result<A, OrmError>
where
    F: FnOnce() -> Result<A, OrmError>,
{
    match catch_unwind(AssertUnwindSafe(operation)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload);
            tracing::warn!(panic = %message, "captured panic in lifted call");
            Err(OrmError::Panic(message))
        }
    }
}

/// Runs `operation` under the sync-optional policy.
///
/// The not-found condition is absorbed into `Ok(None)`; a value becomes
/// `Ok(Some(value))`. Any other failure propagates as `Err` - absence and
/// failure are different things, and only the not-found class means
/// absence.
pub fn maybe<A, F>(operation: F) -> Result<Option<A>, OrmError>
where
    F: FnOnce() -> Result<A, OrmError>,
{
    match operation() {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error),
    }
}

/// Runs `operation` under the io-result policy.
///
/// Control flow is identical to [`result`], but the outcome comes back
/// sealed in an [`IoResult`]: the side effect has happened, and the caller
/// owes an explicit [`run`](IoResult::run) before acting on it.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::OrmError;
/// use ormlift::lift;
///
/// let envelope = lift::io_result(|| Ok::<_, OrmError>(42));
/// assert_eq!(envelope.run(), Ok(42));
/// ```
pub fn io_result<A, F>(operation: F) -> IoResult<A, OrmError>
where
    F: FnOnce() -> Result<A, OrmError>,
{
    IoResult::from_result(result(operation))
}

/// Awaits `operation` under the future-result policy.
///
/// Suspends exactly once, at the await of the wrapped future. Dropping the
/// returned future before completion cancels the wrapped operation exactly
/// as dropping it directly would; no outcome is constructed in that case.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::OrmError;
/// use ormlift::lift;
///
/// let outcome = futures::executor::block_on(async {
///     lift::future_result(async { Ok::<_, OrmError>(42) }).await
/// });
/// assert_eq!(outcome, Ok(42));
/// ```
#[cfg(feature = "async")]
pub async fn future_result<A, Fut>(operation: Fut) -> Result<A, OrmError>
where
    Fut: Future<Output = Result<A, OrmError>>,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload);
            tracing::warn!(panic = %message, "captured panic in lifted async call");
            Err(OrmError::Panic(message))
        }
    }
}

/// Awaits `operation` under the future-io-result policy.
///
/// The async counterpart of [`io_result`]: awaiting the returned future
/// yields a sealed [`IoResult`] envelope.
#[cfg(feature = "async")]
pub async fn future_io_result<A, Fut>(operation: Fut) -> IoResult<A, OrmError>
where
    Fut: Future<Output = Result<A, OrmError>>,
{
    IoResult::from_result(future_result(operation).await)
}

/// Awaits `operation` under the future-optional policy.
///
/// The async counterpart of [`maybe`]: not-found becomes `Ok(None)`, every
/// other failure stays on the error channel.
#[cfg(feature = "async")]
pub async fn future_maybe<A, Fut>(operation: Fut) -> Result<Option<A>, OrmError>
where
    Fut: Future<Output = Result<A, OrmError>>,
{
    match operation.await {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.is_not_found() => Ok(None),
        Err(error) => Err(error),
    }
}
