//! `IoResult` - the executed-effect envelope.
//!
//! An [`IoResult<A, E>`] seals the outcome of a side-effecting operation
//! that has already run. The seal is the point: code holding an `IoResult`
//! can compose further work on top of it with [`map`](IoResult::map),
//! [`map_failure`](IoResult::map_failure) and [`and_then`](IoResult::and_then),
//! but cannot branch on success or failure until it deliberately calls
//! [`run`](IoResult::run), which consumes the envelope and surfaces the
//! plain `Result`.
//!
//! # Design Philosophy
//!
//! The envelope defers *observation*, not execution. By the time an
//! `IoResult` exists the row store has already been touched; what the type
//! tracks is that somebody still owes an explicit acknowledgement of the
//! effect before acting on its outcome. `run` should be called at the edge
//! of the calling code, the same place a transaction scope would end.
//!
//! # Examples
//!
//! ```rust
//! use ormlift::outcome::IoResult;
//!
//! let envelope: IoResult<i64, String> = IoResult::success(21).map(|value| value * 2);
//!
//! // The only way to see the outcome:
//! assert_eq!(envelope.run(), Ok(42));
//! ```

use std::fmt;

use static_assertions::assert_impl_all;

use crate::error::OrmError;

/// The outcome of an executed side effect, sealed until explicitly run.
///
/// `IoResult<A, E>` holds either a success of type `A` or a failure of type
/// `E`. Unlike `Result`, it exposes no predicate or accessor for which of
/// the two it holds: inspection requires consuming the envelope with
/// [`run`](IoResult::run). The combinators compose new work into the
/// envelope without observing it.
///
/// # Type Parameters
///
/// - `A`: the success value.
/// - `E`: the failure value, [`OrmError`](crate::error::OrmError) by default.
#[must_use = "an IoResult seals an executed side effect; call `run` to observe it"]
pub struct IoResult<A, E = OrmError> {
    outcome: Result<A, E>,
}

impl<A, E> IoResult<A, E> {
    /// Seals a success value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormlift::outcome::IoResult;
    ///
    /// let envelope: IoResult<i64, String> = IoResult::success(42);
    /// assert_eq!(envelope.run(), Ok(42));
    /// ```
    #[inline]
    pub const fn success(value: A) -> Self {
        Self { outcome: Ok(value) }
    }

    /// Seals a failure value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormlift::outcome::IoResult;
    ///
    /// let envelope: IoResult<i64, String> = IoResult::failure("boom".to_string());
    /// assert_eq!(envelope.run(), Err("boom".to_string()));
    /// ```
    #[inline]
    pub const fn failure(error: E) -> Self {
        Self { outcome: Err(error) }
    }

    /// Seals an existing `Result`.
    #[inline]
    pub const fn from_result(outcome: Result<A, E>) -> Self {
        Self { outcome }
    }

    /// Transforms the success value without observing the outcome.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormlift::outcome::IoResult;
    ///
    /// let envelope: IoResult<i64, String> = IoResult::success(21).map(|value| value * 2);
    /// assert_eq!(envelope.run(), Ok(42));
    /// ```
    #[inline]
    pub fn map<B, F>(self, function: F) -> IoResult<B, E>
    where
        F: FnOnce(A) -> B,
    {
        IoResult {
            outcome: self.outcome.map(function),
        }
    }

    /// Transforms the failure value without observing the outcome.
    #[inline]
    pub fn map_failure<F2, F>(self, function: F) -> IoResult<A, F2>
    where
        F: FnOnce(E) -> F2,
    {
        IoResult {
            outcome: self.outcome.map_err(function),
        }
    }

    /// Chains another sealed computation onto a success.
    ///
    /// The chained function runs only if this envelope holds a success;
    /// a failure is carried through untouched. The combined envelope stays
    /// sealed either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormlift::outcome::IoResult;
    ///
    /// let envelope: IoResult<i64, String> =
    ///     IoResult::success(10).and_then(|value| IoResult::success(value + 5));
    /// assert_eq!(envelope.run(), Ok(15));
    /// ```
    #[inline]
    pub fn and_then<B, F>(self, function: F) -> IoResult<B, E>
    where
        F: FnOnce(A) -> IoResult<B, E>,
    {
        match self.outcome {
            Ok(value) => function(value),
            Err(error) => IoResult::failure(error),
        }
    }

    /// Recovers from a failure with another sealed computation.
    #[inline]
    pub fn or_else<F2, F>(self, function: F) -> IoResult<A, F2>
    where
        F: FnOnce(E) -> IoResult<A, F2>,
    {
        match self.outcome {
            Ok(value) => IoResult::success(value),
            Err(error) => function(error),
        }
    }

    /// Consumes the envelope and surfaces the outcome.
    ///
    /// This is the single observation point: the acknowledgement that the
    /// side effect happened and its result is now being acted upon.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormlift::outcome::IoResult;
    ///
    /// let envelope: IoResult<i64, String> = IoResult::failure("constraint".to_string());
    /// match envelope.run() {
    ///     Ok(_) => unreachable!(),
    ///     Err(error) => assert_eq!(error, "constraint"),
    /// }
    /// ```
    #[inline]
    pub fn run(self) -> Result<A, E> {
        self.outcome
    }
}

// The Debug form is deliberately opaque: success or failure must not leak
// through formatting before `run` is called.
impl<A, E> fmt::Debug for IoResult<A, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("IoResult(..)")
    }
}

impl<A, E> From<Result<A, E>> for IoResult<A, E> {
    fn from(outcome: Result<A, E>) -> Self {
        Self::from_result(outcome)
    }
}

assert_impl_all!(IoResult<i64, OrmError>: Send, Sync);
