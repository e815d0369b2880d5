//! The explicit name-resolution surface.
//!
//! Where the dynamic original intercepted attribute misses to conjure
//! `_safe`-suffixed methods, this module resolves names deliberately:
//! [`resolve`](super::LiftedSet::resolve) maps a requested name to an
//! ([`Op`], [`Policy`]) pair or fails loudly, and the resulting
//! [`Resolved`] handle is invoked exactly once with a uniform
//! [`QueryCall`] argument value.

use std::fmt;

use crate::config::OverrideWith;
use crate::error::{AttributeError, OrmError};
use crate::lift;
use crate::outcome::IoResult;

use super::{LiftedSet, RowSet};

/// The fixed operation vocabulary of the collection wrapper.
///
/// [`Op::UNSAFE`] is the unsafe-operation list - everything that can fail
/// under normal, expected conditions. [`Op::First`] and [`Op::Last`] are
/// the optional accessors; they participate in resolution but are lifted
/// under the optional policy by the override strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Unique fetch by filter.
    Get,
    /// Earliest row by event ordering.
    Earliest,
    /// Latest row by event ordering.
    Latest,
    /// First row by the set's defined ordering.
    First,
    /// Last row by the set's defined ordering.
    Last,
    /// Persist a single row.
    Create,
    /// Fetch-or-persist.
    GetOrCreate,
    /// Update-or-persist.
    UpdateOrCreate,
    /// Delete by filter.
    Delete,
    /// All-or-nothing batch persist.
    BulkCreate,
}

impl Op {
    /// Every operation the wrapper knows, resolution order.
    pub const ALL: [Self; 10] = [
        Self::Get,
        Self::Earliest,
        Self::Latest,
        Self::First,
        Self::Last,
        Self::Create,
        Self::GetOrCreate,
        Self::UpdateOrCreate,
        Self::Delete,
        Self::BulkCreate,
    ];

    /// The fixed unsafe-operation list (the accessors excluded).
    pub const UNSAFE: [Self; 8] = [
        Self::Get,
        Self::Earliest,
        Self::Latest,
        Self::Create,
        Self::GetOrCreate,
        Self::UpdateOrCreate,
        Self::Delete,
        Self::BulkCreate,
    ];

    /// The operation's canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Earliest => "earliest",
            Self::Latest => "latest",
            Self::First => "first",
            Self::Last => "last",
            Self::Create => "create",
            Self::GetOrCreate => "get_or_create",
            Self::UpdateOrCreate => "update_or_create",
            Self::Delete => "delete",
            Self::BulkCreate => "bulk_create",
        }
    }

    /// Looks an operation up by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether this operation is one of the optional accessors.
    #[inline]
    pub const fn is_accessor(self) -> bool {
        matches!(self, Self::First | Self::Last)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// The lifting policy a resolved name is invoked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// The original operation, raise-on-error behavior preserved.
    Passthrough,
    /// Sync-result: failures, including panics, become values.
    Checked,
    /// Io-result: the outcome comes back sealed in an envelope.
    Deferred,
    /// Sync-optional: not-found becomes absence.
    Optional,
}

/// Maps a plain operation name to the policy its strategy selects.
pub(crate) fn strategy_policy(op: Op, strategy: OverrideWith) -> Policy {
    match strategy {
        OverrideWith::None => Policy::Passthrough,
        _ if op.is_accessor() => Policy::Optional,
        OverrideWith::Safe => Policy::Checked,
        OverrideWith::Impure => Policy::Deferred,
    }
}

/// Maps a requested name to an operation and policy, or fails loudly.
pub(crate) fn resolve_name(
    owner: &'static str,
    name: &str,
    strategy: OverrideWith,
) -> Result<(Op, Policy), AttributeError> {
    if let Some(base) = name.strip_suffix("_safe") {
        return match Op::from_name(base) {
            Some(op) => Ok((op, Policy::Checked)),
            None => Err(AttributeError::new(owner, name)),
        };
    }

    match Op::from_name(name) {
        Some(op) => Ok((op, strategy_policy(op, strategy))),
        None => Err(AttributeError::new(owner, name)),
    }
}

/// Uniform argument value for dynamically resolved calls.
///
/// `F` is the collection's filter type, `N` its new-row payload. The
/// variant shape must match the resolved operation, otherwise the call
/// fails with [`OrmError::Unsupported`](crate::error::OrmError::Unsupported).
pub enum QueryCall<F, N> {
    /// Arguments for [`Op::Get`].
    Get(F),
    /// Arguments for [`Op::Earliest`].
    Earliest,
    /// Arguments for [`Op::Latest`].
    Latest,
    /// Arguments for [`Op::First`].
    First,
    /// Arguments for [`Op::Last`].
    Last,
    /// Arguments for [`Op::Create`].
    Create(N),
    /// Arguments for [`Op::GetOrCreate`].
    GetOrCreate(F, N),
    /// Arguments for [`Op::UpdateOrCreate`].
    UpdateOrCreate(F, N),
    /// Arguments for [`Op::Delete`].
    Delete(F),
    /// Arguments for [`Op::BulkCreate`].
    BulkCreate(Vec<N>),
}

impl<F, N> QueryCall<F, N> {
    /// The argument shape's name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Earliest => "earliest",
            Self::Latest => "latest",
            Self::First => "first",
            Self::Last => "last",
            Self::Create(_) => "create",
            Self::GetOrCreate(..) => "get_or_create",
            Self::UpdateOrCreate(..) => "update_or_create",
            Self::Delete(_) => "delete",
            Self::BulkCreate(_) => "bulk_create",
        }
    }
}

/// Uniform success value for dynamically resolved calls over rows of
/// type `R`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryReply<R> {
    /// A single row.
    Row(R),
    /// A row plus whether it was created.
    Matched {
        /// The fetched or persisted row.
        row: R,
        /// `true` if the operation created the row.
        created: bool,
    },
    /// A batch of rows.
    Rows(Vec<R>),
    /// A deletion count.
    Deleted(u64),
}

impl<R> QueryReply<R> {
    /// Extracts the single row, if this reply carries one.
    pub fn into_row(self) -> Option<R> {
        match self {
            Self::Row(row) | Self::Matched { row, .. } => Some(row),
            _ => None,
        }
    }

    /// Extracts the row/created pair, if this reply carries one.
    pub fn into_matched(self) -> Option<(R, bool)> {
        match self {
            Self::Matched { row, created } => Some((row, created)),
            _ => None,
        }
    }

    /// Extracts the batch of rows, if this reply carries one.
    pub fn into_rows(self) -> Option<Vec<R>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Extracts the deletion count, if this reply carries one.
    pub fn into_deleted(self) -> Option<u64> {
        match self {
            Self::Deleted(count) => Some(count),
            _ => None,
        }
    }
}

/// The outcome of a dynamically resolved call, shaped by its [`Policy`].
pub enum CallOutcome<R> {
    /// Outcome of the passthrough or sync-result policies.
    Checked(Result<QueryReply<R>, OrmError>),
    /// Outcome of the io-result policy, still sealed.
    Deferred(IoResult<QueryReply<R>, OrmError>),
    /// Outcome of the sync-optional policy.
    Optional(Result<Option<R>, OrmError>),
}

impl<R> CallOutcome<R> {
    /// Extracts the checked outcome, if that was the policy.
    pub fn checked(self) -> Option<Result<QueryReply<R>, OrmError>> {
        match self {
            Self::Checked(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Extracts the sealed outcome, if that was the policy.
    pub fn deferred(self) -> Option<IoResult<QueryReply<R>, OrmError>> {
        match self {
            Self::Deferred(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// Extracts the optional outcome, if that was the policy.
    pub fn optional(self) -> Option<Result<Option<R>, OrmError>> {
        match self {
            Self::Optional(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// A resolved derived method, ready to be invoked exactly once.
///
/// Owns a fresh wrapper over the collection it was resolved from; calling
/// it consumes the handle, matching the one-call-site ownership model of
/// the wrappers themselves.
pub struct Resolved<Q: RowSet> {
    set: LiftedSet<Q>,
    op: Op,
    policy: Policy,
}

impl<Q: RowSet> fmt::Debug for Resolved<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("op", &self.op)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<Q: RowSet> Resolved<Q> {
    pub(crate) fn new(set: LiftedSet<Q>, op: Op, policy: Policy) -> Self {
        Self { set, op, policy }
    }

    /// The operation this handle is bound to.
    #[inline]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// The policy this handle will apply.
    #[inline]
    pub const fn policy(&self) -> Policy {
        self.policy
    }

    /// Invokes the resolved operation with `call` under the resolved
    /// policy.
    pub fn call(self, call: QueryCall<Q::Filter, Q::NewRow>) -> CallOutcome<Q::Row> {
        let Self { set, op, policy } = self;
        match policy {
            Policy::Passthrough => CallOutcome::Checked(set.dispatch(op, call)),
            Policy::Checked => CallOutcome::Checked(lift::result(|| set.dispatch(op, call))),
            Policy::Deferred => CallOutcome::Deferred(lift::io_result(|| set.dispatch(op, call))),
            Policy::Optional => CallOutcome::Optional(
                lift::maybe(|| set.dispatch(op, call))
                    .map(|reply| reply.and_then(QueryReply::into_row)),
            ),
        }
    }
}
