//! # ormlift
//!
//! Outcome-typed lifting for ORM query and persistence operations.
//!
//! Operations on a row collection or row instance normally fail through an
//! error channel the caller is expected to short-circuit on. This crate
//! wraps such operations - without changing what they do - so their
//! outcomes become explicit, composable values:
//!
//! - **Total results**: `{name}_result` counterparts return every failure,
//!   including a panic from the wrapped call, as a value.
//! - **Optional accessors**: `first_maybe` / `last_maybe` turn the
//!   not-found condition into absence.
//! - **Sealed effects**: `{name}_ioresult` counterparts return an
//!   [`IoResult`](outcome::IoResult) envelope that must be explicitly run
//!   before the outcome can be observed.
//! - **Future variants** (feature `async`): the same policies for the
//!   asynchronous calling convention.
//!
//! The underlying ORM stays an external collaborator behind the
//! [`RowSet`](queryset::RowSet), `AsyncRowSet` and
//! [`ModelOps`](model::ModelOps) contracts; this crate adds no query
//! capability and no persistence semantics of its own.
//!
//! ## Feature Flags
//!
//! - `async` (default): the future-lifted surface (`futures`-based,
//!   runtime-agnostic).
//! - `serde`: serialization for the configuration enum and field values.
//!
//! ## Example
//!
//! ```rust
//! use ormlift::error::OrmError;
//! use ormlift::lift;
//!
//! // A bound operation that fails becomes a value, not an unwind:
//! let outcome = lift::result(|| -> Result<u64, OrmError> { Err(OrmError::NotFound) });
//! assert_eq!(outcome, Err(OrmError::NotFound));
//!
//! // The io-result policy seals the outcome until it is deliberately run:
//! let envelope = lift::io_result(|| Ok::<_, OrmError>(42));
//! let observed = envelope.map(|value| value + 1).run();
//! assert_eq!(observed, Ok(43));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the wrapper types, contracts and outcome containers. The
/// [`lift`] policy functions are deliberately not re-exported: their names
/// (`result`, `maybe`, ...) are meant to stay path-qualified.
///
/// # Usage
///
/// ```rust
/// use ormlift::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attr::*;

    pub use crate::config::*;

    pub use crate::error::*;

    pub use crate::manager::*;

    pub use crate::model::*;

    pub use crate::outcome::*;

    pub use crate::queryset::*;
}

pub mod attr;

pub mod config;

pub mod error;

pub mod lift;

pub mod manager;

pub mod model;

pub mod outcome;

pub mod queryset;
