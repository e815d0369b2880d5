//! Collection wrapper - lifted counterparts for row-collection operations.
//!
//! [`RowSet`] is the contract the underlying ORM's lazy row collection has
//! to satisfy: a fixed vocabulary of query and persistence operations, each
//! returning a domain value or failing with a typed
//! [`OrmError`](crate::error::OrmError). [`LiftedSet`] wraps any such
//! collection and adds, without touching the originals:
//!
//! - `{name}_result` - the sync-result lift of every unsafe operation,
//! - `{name}_ioresult` - the io-result lift of every unsafe operation,
//! - [`first_maybe`](LiftedSet::first_maybe) / [`last_maybe`](LiftedSet::last_maybe) -
//!   the optional accessors,
//! - [`resolve`](LiftedSet::resolve) - the explicit name-resolution surface
//!   implementing the `_safe` convention and the configured override
//!   strategy.
//!
//! # Examples
//!
//! ```rust,ignore
//! use ormlift::config::OverrideWith;
//! use ormlift::queryset::{LiftedSet, QueryCall};
//!
//! let tracks = LiftedSet::new(track_set);
//!
//! // Typed surface: originals untouched, lifted siblings alongside.
//! let row = tracks.get(&by_title("paranoid android"))?;
//! let outcome = tracks.create_result(new_track("airbag", 1997));
//! let newest = tracks.last_maybe()?;
//!
//! // Dynamic surface: deliberate lookup instead of attribute magic.
//! let handle = tracks.resolve("get_safe")?;
//! let outcome = handle.call(QueryCall::Get(by_title("airbag")));
//! ```

mod resolve;

#[cfg(feature = "async")]
mod async_set;

pub use resolve::{CallOutcome, Op, Policy, QueryCall, QueryReply, Resolved};

#[cfg(feature = "async")]
pub use async_set::{AsyncResolved, AsyncRowSet, LiftedAsyncSet};

use crate::config::OverrideWith;
use crate::error::{AttributeError, OrmError};
use crate::lift;
use crate::outcome::IoResult;

/// The row-collection contract of the underlying ORM.
///
/// Implementors are lazy collection handles bound to one store and one row
/// type. Every operation either returns a domain value or fails with a
/// typed [`OrmError`]; implementations must not panic for the expected
/// failure conditions.
///
/// Semantics the wrapper relies on:
///
/// - [`get`](Self::get) fails [`NotFound`](OrmError::NotFound) on zero
///   matches and [`MultipleRows`](OrmError::MultipleRows) on more than one.
/// - [`first`](Self::first) / [`last`](Self::last) order by the set's
///   defined ordering and fail [`NotFound`](OrmError::NotFound) on an empty
///   set; [`earliest`](Self::earliest) / [`latest`](Self::latest) do the
///   same over the set's event ordering.
/// - [`get_or_create`](Self::get_or_create) and
///   [`update_or_create`](Self::update_or_create) report whether they
///   created through the boolean.
/// - [`bulk_create`](Self::bulk_create) is all-or-nothing.
pub trait RowSet {
    /// The persisted row type.
    type Row;
    /// The not-yet-persisted row payload accepted by the write operations.
    type NewRow;
    /// The predicate type selecting rows out of the collection.
    type Filter;

    /// Fetches the single row matching `filter`.
    fn get(&self, filter: &Self::Filter) -> Result<Self::Row, OrmError>;

    /// Returns the row earliest in the set's event ordering.
    fn earliest(&self) -> Result<Self::Row, OrmError>;

    /// Returns the row latest in the set's event ordering.
    fn latest(&self) -> Result<Self::Row, OrmError>;

    /// Returns the first row by the set's defined ordering.
    fn first(&self) -> Result<Self::Row, OrmError>;

    /// Returns the last row by the set's defined ordering.
    fn last(&self) -> Result<Self::Row, OrmError>;

    /// Persists `row` and returns the stored form.
    fn create(&self, row: Self::NewRow) -> Result<Self::Row, OrmError>;

    /// Fetches the row matching `filter`, creating it from `defaults` when
    /// absent. The boolean reports whether a row was created.
    fn get_or_create(
        &self,
        filter: &Self::Filter,
        defaults: Self::NewRow,
    ) -> Result<(Self::Row, bool), OrmError>;

    /// Updates the row matching `filter` from `defaults`, creating it when
    /// absent. The boolean reports whether a row was created.
    fn update_or_create(
        &self,
        filter: &Self::Filter,
        defaults: Self::NewRow,
    ) -> Result<(Self::Row, bool), OrmError>;

    /// Deletes every row matching `filter`, returning the count removed.
    fn delete(&self, filter: &Self::Filter) -> Result<u64, OrmError>;

    /// Persists `rows` all-or-nothing, returning the stored forms.
    fn bulk_create(&self, rows: Vec<Self::NewRow>) -> Result<Vec<Self::Row>, OrmError>;
}

/// Generates the `{name}_result` / `{name}_ioresult` families for the
/// fixed unsafe-operation list. Lifting adds siblings: the passthrough
/// methods above stay untouched.
macro_rules! lifted_methods {
    ($( $name:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        paste::paste! {
            $(
                #[doc = concat!(
                    "Sync-result lift of [`RowSet::", stringify!($name),
                    "`]: every failure, including a panic, comes back as a value.",
                )]
                pub fn [<$name _result>](&self, $($arg: $ty),*) -> Result<$ret, OrmError> {
                    lift::result(|| self.inner.$name($($arg),*))
                }

                #[doc = concat!(
                    "Io-result lift of [`RowSet::", stringify!($name),
                    "`]: the outcome comes back sealed in an [`IoResult`] that must be run.",
                )]
                pub fn [<$name _ioresult>](&self, $($arg: $ty),*) -> IoResult<$ret, OrmError> {
                    lift::io_result(|| self.inner.$name($($arg),*))
                }
            )*
        }
    };
}

/// A row collection augmented with lifted operation counterparts.
///
/// One wrapper, parameterized by the [`OverrideWith`] strategy value - the
/// strategy only affects what plain names resolve to on the
/// [`resolve`](Self::resolve) surface. Instances are cheap, carry no state
/// beyond the collaborator handle and the strategy, and are meant to be
/// owned by the single call site that created them.
pub struct LiftedSet<Q> {
    inner: Q,
    strategy: OverrideWith,
}

impl<Q> LiftedSet<Q> {
    pub(crate) const TYPE_NAME: &'static str = "LiftedSet";

    /// Wraps `inner` with the default strategy ([`OverrideWith::None`]).
    pub fn new(inner: Q) -> Self {
        Self::with_strategy(inner, OverrideWith::default())
    }

    /// Wraps `inner` with an explicit strategy.
    pub fn with_strategy(inner: Q, strategy: OverrideWith) -> Self {
        Self { inner, strategy }
    }

    /// The strategy this wrapper resolves plain names under.
    #[inline]
    pub const fn strategy(&self) -> OverrideWith {
        self.strategy
    }

    /// Borrows the wrapped collection.
    #[inline]
    pub const fn inner(&self) -> &Q {
        &self.inner
    }

    /// Unwraps back into the underlying collection.
    #[inline]
    pub fn into_inner(self) -> Q {
        self.inner
    }
}

impl<Q: RowSet> LiftedSet<Q> {
    // Passthroughs: the wrapped collection under its original names, with
    // its original raise-on-error behavior.

    /// Passthrough to [`RowSet::get`].
    pub fn get(&self, filter: &Q::Filter) -> Result<Q::Row, OrmError> {
        self.inner.get(filter)
    }

    /// Passthrough to [`RowSet::earliest`].
    pub fn earliest(&self) -> Result<Q::Row, OrmError> {
        self.inner.earliest()
    }

    /// Passthrough to [`RowSet::latest`].
    pub fn latest(&self) -> Result<Q::Row, OrmError> {
        self.inner.latest()
    }

    /// Passthrough to [`RowSet::first`].
    pub fn first(&self) -> Result<Q::Row, OrmError> {
        self.inner.first()
    }

    /// Passthrough to [`RowSet::last`].
    pub fn last(&self) -> Result<Q::Row, OrmError> {
        self.inner.last()
    }

    /// Passthrough to [`RowSet::create`].
    pub fn create(&self, row: Q::NewRow) -> Result<Q::Row, OrmError> {
        self.inner.create(row)
    }

    /// Passthrough to [`RowSet::get_or_create`].
    pub fn get_or_create(
        &self,
        filter: &Q::Filter,
        defaults: Q::NewRow,
    ) -> Result<(Q::Row, bool), OrmError> {
        self.inner.get_or_create(filter, defaults)
    }

    /// Passthrough to [`RowSet::update_or_create`].
    pub fn update_or_create(
        &self,
        filter: &Q::Filter,
        defaults: Q::NewRow,
    ) -> Result<(Q::Row, bool), OrmError> {
        self.inner.update_or_create(filter, defaults)
    }

    /// Passthrough to [`RowSet::delete`].
    pub fn delete(&self, filter: &Q::Filter) -> Result<u64, OrmError> {
        self.inner.delete(filter)
    }

    /// Passthrough to [`RowSet::bulk_create`].
    pub fn bulk_create(&self, rows: Vec<Q::NewRow>) -> Result<Vec<Q::Row>, OrmError> {
        self.inner.bulk_create(rows)
    }

    lifted_methods! {
        get(filter: &Q::Filter) -> Q::Row;
        earliest() -> Q::Row;
        latest() -> Q::Row;
        create(row: Q::NewRow) -> Q::Row;
        get_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> (Q::Row, bool);
        update_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> (Q::Row, bool);
        delete(filter: &Q::Filter) -> u64;
        bulk_create(rows: Vec<Q::NewRow>) -> Vec<Q::Row>;
    }

    /// Optional lift of [`RowSet::first`]: `Ok(None)` when the set is
    /// empty, `Ok(Some(row))` otherwise. Failures other than not-found
    /// stay on the error channel.
    pub fn first_maybe(&self) -> Result<Option<Q::Row>, OrmError> {
        lift::maybe(|| self.inner.first())
    }

    /// Optional lift of [`RowSet::last`]; see [`first_maybe`](Self::first_maybe).
    pub fn last_maybe(&self) -> Result<Option<Q::Row>, OrmError> {
        lift::maybe(|| self.inner.last())
    }

    /// Resolves a derived method name into a callable handle.
    ///
    /// The deliberate counterpart of attribute-miss interception:
    ///
    /// - `"{base}_safe"` resolves to `base` under the sync-result policy;
    /// - a plain operation name resolves under the policy selected by this
    ///   wrapper's strategy (see [`OverrideWith`]);
    /// - anything else fails with an [`AttributeError`] carrying this
    ///   wrapper's type name and the exact requested name.
    ///
    /// The returned [`Resolved`] owns a fresh wrapper over the same
    /// collection and is invoked exactly once through
    /// [`call`](Resolved::call).
    pub fn resolve(&self, name: &str) -> Result<Resolved<Q>, AttributeError>
    where
        Q: Clone,
    {
        let (op, policy) = resolve::resolve_name(Self::TYPE_NAME, name, self.strategy)?;
        tracing::debug!(name, op = op.name(), ?policy, "resolved derived method");
        Ok(Resolved::new(
            Self::with_strategy(self.inner.clone(), self.strategy),
            op,
            policy,
        ))
    }

    pub(crate) fn dispatch(
        &self,
        op: Op,
        call: QueryCall<Q::Filter, Q::NewRow>,
    ) -> Result<QueryReply<Q::Row>, OrmError> {
        match (op, call) {
            (Op::Get, QueryCall::Get(filter)) => self.inner.get(&filter).map(QueryReply::Row),
            (Op::Earliest, QueryCall::Earliest) => self.inner.earliest().map(QueryReply::Row),
            (Op::Latest, QueryCall::Latest) => self.inner.latest().map(QueryReply::Row),
            (Op::First, QueryCall::First) => self.inner.first().map(QueryReply::Row),
            (Op::Last, QueryCall::Last) => self.inner.last().map(QueryReply::Row),
            (Op::Create, QueryCall::Create(row)) => self.inner.create(row).map(QueryReply::Row),
            (Op::GetOrCreate, QueryCall::GetOrCreate(filter, defaults)) => self
                .inner
                .get_or_create(&filter, defaults)
                .map(|(row, created)| QueryReply::Matched { row, created }),
            (Op::UpdateOrCreate, QueryCall::UpdateOrCreate(filter, defaults)) => self
                .inner
                .update_or_create(&filter, defaults)
                .map(|(row, created)| QueryReply::Matched { row, created }),
            (Op::Delete, QueryCall::Delete(filter)) => {
                self.inner.delete(&filter).map(QueryReply::Deleted)
            }
            (Op::BulkCreate, QueryCall::BulkCreate(rows)) => {
                self.inner.bulk_create(rows).map(QueryReply::Rows)
            }
            (op, call) => Err(OrmError::unsupported(format!(
                "`{}` does not accept `{}` arguments",
                op.name(),
                call.kind()
            ))),
        }
    }
}
