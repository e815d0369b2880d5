//! Async collection wrapper - the future-lifted calling convention.
//!
//! [`AsyncRowSet`] mirrors [`RowSet`](super::RowSet) with `async fn`
//! operations; [`LiftedAsyncSet`] mirrors [`LiftedSet`](super::LiftedSet)
//! with the future policies. The single suspension point of every lifted
//! method is the await of the wrapped operation; dropping a lifted future
//! before completion cancels the operation exactly as dropping the
//! unwrapped future would, and constructs no outcome container.
//!
//! The dynamic resolver keeps the original naming convention for async
//! operations: the async spelling of a base name is `a{base}`, so
//! `"aget_safe"` resolves to the future-result lift of
//! [`AsyncRowSet::get`].

use crate::config::OverrideWith;
use crate::error::{AttributeError, OrmError};
use crate::lift;
use crate::outcome::IoResult;

use super::resolve::{self, CallOutcome, Op, Policy, QueryCall, QueryReply};

/// The asynchronous row-collection contract of the underlying ORM.
///
/// Operation semantics are identical to [`RowSet`](super::RowSet); only
/// the calling convention differs.
#[allow(async_fn_in_trait)]
pub trait AsyncRowSet {
    /// The persisted row type.
    type Row;
    /// The not-yet-persisted row payload accepted by the write operations.
    type NewRow;
    /// The predicate type selecting rows out of the collection.
    type Filter;

    /// Fetches the single row matching `filter`.
    async fn get(&self, filter: &Self::Filter) -> Result<Self::Row, OrmError>;

    /// Returns the row earliest in the set's event ordering.
    async fn earliest(&self) -> Result<Self::Row, OrmError>;

    /// Returns the row latest in the set's event ordering.
    async fn latest(&self) -> Result<Self::Row, OrmError>;

    /// Returns the first row by the set's defined ordering.
    async fn first(&self) -> Result<Self::Row, OrmError>;

    /// Returns the last row by the set's defined ordering.
    async fn last(&self) -> Result<Self::Row, OrmError>;

    /// Persists `row` and returns the stored form.
    async fn create(&self, row: Self::NewRow) -> Result<Self::Row, OrmError>;

    /// Fetches the row matching `filter`, creating it from `defaults` when
    /// absent. The boolean reports whether a row was created.
    async fn get_or_create(
        &self,
        filter: &Self::Filter,
        defaults: Self::NewRow,
    ) -> Result<(Self::Row, bool), OrmError>;

    /// Updates the row matching `filter` from `defaults`, creating it when
    /// absent. The boolean reports whether a row was created.
    async fn update_or_create(
        &self,
        filter: &Self::Filter,
        defaults: Self::NewRow,
    ) -> Result<(Self::Row, bool), OrmError>;

    /// Deletes every row matching `filter`, returning the count removed.
    async fn delete(&self, filter: &Self::Filter) -> Result<u64, OrmError>;

    /// Persists `rows` all-or-nothing, returning the stored forms.
    async fn bulk_create(&self, rows: Vec<Self::NewRow>) -> Result<Vec<Self::Row>, OrmError>;
}

/// Generates the future-lifted `{name}_result` / `{name}_ioresult`
/// families for the fixed unsafe-operation list.
macro_rules! lifted_async_methods {
    ($( $name:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        paste::paste! {
            $(
                #[doc = concat!(
                    "Future-result lift of [`AsyncRowSet::", stringify!($name),
                    "`]: every failure, including a panic, comes back as a value.",
                )]
                pub async fn [<$name _result>](&self, $($arg: $ty),*) -> Result<$ret, OrmError> {
                    lift::future_result(self.inner.$name($($arg),*)).await
                }

                #[doc = concat!(
                    "Future-io-result lift of [`AsyncRowSet::", stringify!($name),
                    "`]: the outcome comes back sealed in an [`IoResult`] that must be run.",
                )]
                pub async fn [<$name _ioresult>](&self, $($arg: $ty),*) -> IoResult<$ret, OrmError> {
                    lift::future_io_result(self.inner.$name($($arg),*)).await
                }
            )*
        }
    };
}

/// An asynchronous row collection augmented with future-lifted
/// counterparts.
///
/// The async twin of [`LiftedSet`](super::LiftedSet): same ownership
/// model, same strategy semantics, future policies throughout.
pub struct LiftedAsyncSet<Q> {
    inner: Q,
    strategy: OverrideWith,
}

impl<Q> LiftedAsyncSet<Q> {
    pub(crate) const TYPE_NAME: &'static str = "LiftedAsyncSet";

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

impl<Q: AsyncRowSet> LiftedAsyncSet<Q> {
    /// Passthrough to [`AsyncRowSet::get`].
    pub async fn get(&self, filter: &Q::Filter) -> Result<Q::Row, OrmError> {
        self.inner.get(filter).await
    }

    /// Passthrough to [`AsyncRowSet::earliest`].
    pub async fn earliest(&self) -> Result<Q::Row, OrmError> {
        self.inner.earliest().await
    }

    /// Passthrough to [`AsyncRowSet::latest`].
    pub async fn latest(&self) -> Result<Q::Row, OrmError> {
        self.inner.latest().await
    }

    /// Passthrough to [`AsyncRowSet::first`].
    pub async fn first(&self) -> Result<Q::Row, OrmError> {
        self.inner.first().await
    }

    /// Passthrough to [`AsyncRowSet::last`].
    pub async fn last(&self) -> Result<Q::Row, OrmError> {
        self.inner.last().await
    }

    /// Passthrough to [`AsyncRowSet::create`].
    pub async fn create(&self, row: Q::NewRow) -> Result<Q::Row, OrmError> {
        self.inner.create(row).await
    }

    /// Passthrough to [`AsyncRowSet::get_or_create`].
    pub async fn get_or_create(
        &self,
        filter: &Q::Filter,
        defaults: Q::NewRow,
    ) -> Result<(Q::Row, bool), OrmError> {
        self.inner.get_or_create(filter, defaults).await
    }

    /// Passthrough to [`AsyncRowSet::update_or_create`].
    pub async fn update_or_create(
        &self,
        filter: &Q::Filter,
        defaults: Q::NewRow,
    ) -> Result<(Q::Row, bool), OrmError> {
        self.inner.update_or_create(filter, defaults).await
    }

    /// Passthrough to [`AsyncRowSet::delete`].
    pub async fn delete(&self, filter: &Q::Filter) -> Result<u64, OrmError> {
        self.inner.delete(filter).await
    }

    /// Passthrough to [`AsyncRowSet::bulk_create`].
    pub async fn bulk_create(&self, rows: Vec<Q::NewRow>) -> Result<Vec<Q::Row>, OrmError> {
        self.inner.bulk_create(rows).await
    }

    lifted_async_methods! {
        get(filter: &Q::Filter) -> Q::Row;
        earliest() -> Q::Row;
        latest() -> Q::Row;
        create(row: Q::NewRow) -> Q::Row;
        get_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> (Q::Row, bool);
        update_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> (Q::Row, bool);
        delete(filter: &Q::Filter) -> u64;
        bulk_create(rows: Vec<Q::NewRow>) -> Vec<Q::Row>;
    }

    /// Future-optional lift of [`AsyncRowSet::first`]; see
    /// [`LiftedSet::first_maybe`](super::LiftedSet::first_maybe).
    pub async fn first_maybe(&self) -> Result<Option<Q::Row>, OrmError> {
        lift::future_maybe(self.inner.first()).await
    }

    /// Future-optional lift of [`AsyncRowSet::last`]; see
    /// [`LiftedSet::last_maybe`](super::LiftedSet::last_maybe).
    pub async fn last_maybe(&self) -> Result<Option<Q::Row>, OrmError> {
        lift::future_maybe(self.inner.last()).await
    }

    /// Resolves a derived async method name into a callable handle.
    ///
    /// Accepts the async spellings of the naming convention: `a{base}` for
    /// a plain operation (policy selected by the strategy, future
    /// semantics) and `a{base}_safe` for the future-result lift. Anything
    /// else fails with an [`AttributeError`] carrying this wrapper's type
    /// name and the exact requested name.
    pub fn resolve(&self, name: &str) -> Result<AsyncResolved<Q>, AttributeError>
    where
        Q: Clone,
    {
        let (op, policy) = resolve_async_name(Self::TYPE_NAME, name, self.strategy)?;
        tracing::debug!(name, op = op.name(), ?policy, "resolved derived async method");
        Ok(AsyncResolved {
            set: Self::with_strategy(self.inner.clone(), self.strategy),
            op,
            policy,
        })
    }

    pub(crate) async fn dispatch(
        &self,
        op: Op,
        call: QueryCall<Q::Filter, Q::NewRow>,
    ) -> Result<QueryReply<Q::Row>, OrmError> {
        match (op, call) {
            (Op::Get, QueryCall::Get(filter)) => {
                self.inner.get(&filter).await.map(QueryReply::Row)
            }
            (Op::Earliest, QueryCall::Earliest) => {
                self.inner.earliest().await.map(QueryReply::Row)
            }
            (Op::Latest, QueryCall::Latest) => self.inner.latest().await.map(QueryReply::Row),
            (Op::First, QueryCall::First) => self.inner.first().await.map(QueryReply::Row),
            (Op::Last, QueryCall::Last) => self.inner.last().await.map(QueryReply::Row),
            (Op::Create, QueryCall::Create(row)) => {
                self.inner.create(row).await.map(QueryReply::Row)
            }
            (Op::GetOrCreate, QueryCall::GetOrCreate(filter, defaults)) => self
                .inner
                .get_or_create(&filter, defaults)
                .await
                .map(|(row, created)| QueryReply::Matched { row, created }),
            (Op::UpdateOrCreate, QueryCall::UpdateOrCreate(filter, defaults)) => self
                .inner
                .update_or_create(&filter, defaults)
                .await
                .map(|(row, created)| QueryReply::Matched { row, created }),
            (Op::Delete, QueryCall::Delete(filter)) => {
                self.inner.delete(&filter).await.map(QueryReply::Deleted)
            }
            (Op::BulkCreate, QueryCall::BulkCreate(rows)) => {
                self.inner.bulk_create(rows).await.map(QueryReply::Rows)
            }
            (op, call) => Err(OrmError::unsupported(format!(
                "`{}` does not accept `{}` arguments",
                op.name(),
                call.kind()
            ))),
        }
    }
}

/// Resolves an async derived name: `a{base}` or `a{base}_safe`.
fn resolve_async_name(
    owner: &'static str,
    name: &str,
    strategy: OverrideWith,
) -> Result<(Op, Policy), AttributeError> {
    if let Some(base) = name.strip_suffix("_safe") {
        if let Some(op) = base.strip_prefix('a').and_then(Op::from_name) {
            return Ok((op, Policy::Checked));
        }
        return Err(AttributeError::new(owner, name));
    }

    match name.strip_prefix('a').and_then(Op::from_name) {
        Some(op) => Ok((op, resolve::strategy_policy(op, strategy))),
        None => Err(AttributeError::new(owner, name)),
    }
}

/// A resolved derived async method, ready to be awaited exactly once.
pub struct AsyncResolved<Q: AsyncRowSet> {
    set: LiftedAsyncSet<Q>,
    op: Op,
    policy: Policy,
}

impl<Q: AsyncRowSet> std::fmt::Debug for AsyncResolved<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncResolved")
            .field("op", &self.op)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<Q: AsyncRowSet> AsyncResolved<Q> {
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
    /// policy, with future semantics.
    pub async fn call(self, call: QueryCall<Q::Filter, Q::NewRow>) -> CallOutcome<Q::Row> {
        let Self { set, op, policy } = self;
        match policy {
            Policy::Passthrough => CallOutcome::Checked(set.dispatch(op, call).await),
            Policy::Checked => {
                CallOutcome::Checked(lift::future_result(set.dispatch(op, call)).await)
            }
            Policy::Deferred => {
                CallOutcome::Deferred(lift::future_io_result(set.dispatch(op, call)).await)
            }
            Policy::Optional => CallOutcome::Optional(
                lift::future_maybe(set.dispatch(op, call))
                    .await
                    .map(|reply| reply.and_then(QueryReply::into_row)),
            ),
        }
    }
}
