//! Row-collection manager - the explicit entry-point factory.
//!
//! Where the dynamic original installed a manager singleton on an abstract
//! base model, [`Manager`] is constructed explicitly from a collaborator
//! handle and an [`OverrideWith`] strategy, wherever a model needs one.
//! Every access goes through a freshly constructed
//! [`LiftedSet`](crate::queryset::LiftedSet) carrying the manager's
//! strategy; the manager itself holds no other state.

use crate::config::OverrideWith;
use crate::error::{AttributeError, OrmError};
use crate::outcome::IoResult;
use crate::queryset::{LiftedSet, Resolved, RowSet};

/// Delegates an operation through a freshly constructed wrapper.
macro_rules! delegated {
    ($( $name:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty; )*) => {
        $(
            #[doc = concat!(
                "Delegates [`LiftedSet::", stringify!($name),
                "`] through a fresh wrapper.",
            )]
            pub fn $name(&self, $($arg: $ty),*) -> $ret {
                self.get_queryset().$name($($arg),*)
            }
        )*
    };
}

/// The entry-point type a model hands out for collection access.
///
/// Owns the collaborator handle and the strategy value, both set at
/// construction and never mutated. Each operation and each
/// [`resolve`](Self::resolve) goes through a fresh wrapper, so wrapper
/// instances stay owned by their single call site.
///
/// # Examples
///
/// ```rust,ignore
/// use ormlift::config::OverrideWith;
/// use ormlift::manager::Manager;
///
/// let tracks = Manager::with_override(track_set, OverrideWith::Safe);
/// let outcome = tracks.get_result(&by_title("airbag"));
/// ```
pub struct Manager<Q> {
    rowset: Q,
    override_with: OverrideWith,
}

impl<Q> Manager<Q> {
    pub(crate) const TYPE_NAME: &'static str = "Manager";

    /// Builds a manager with the default strategy ([`OverrideWith::None`]).
    pub fn new(rowset: Q) -> Self {
        Self::with_override(rowset, OverrideWith::default())
    }

    /// Builds a manager with an explicit strategy.
    pub fn with_override(rowset: Q, override_with: OverrideWith) -> Self {
        Self {
            rowset,
            override_with,
        }
    }

    /// The strategy this manager hands to the wrappers it constructs.
    #[inline]
    pub const fn override_with(&self) -> OverrideWith {
        self.override_with
    }
}

impl<Q: RowSet + Clone> Manager<Q> {
    /// Constructs a fresh wrapper over the collection, carrying this
    /// manager's strategy.
    pub fn get_queryset(&self) -> LiftedSet<Q> {
        tracing::debug!(strategy = %self.override_with, "constructing lifted queryset");
        LiftedSet::with_strategy(self.rowset.clone(), self.override_with)
    }

    /// Resolves a derived method name through a fresh wrapper.
    ///
    /// Names starting with an underscore are private to the manager and
    /// fail with an [`AttributeError`] naming the manager type; everything
    /// else is delegated to
    /// [`LiftedSet::resolve`](crate::queryset::LiftedSet::resolve).
    pub fn resolve(&self, name: &str) -> Result<Resolved<Q>, AttributeError> {
        if name.starts_with('_') {
            return Err(AttributeError::new(Self::TYPE_NAME, name));
        }
        self.get_queryset().resolve(name)
    }

    delegated! {
        get(filter: &Q::Filter) -> Result<Q::Row, OrmError>;
        get_result(filter: &Q::Filter) -> Result<Q::Row, OrmError>;
        get_ioresult(filter: &Q::Filter) -> IoResult<Q::Row, OrmError>;
        earliest() -> Result<Q::Row, OrmError>;
        earliest_result() -> Result<Q::Row, OrmError>;
        earliest_ioresult() -> IoResult<Q::Row, OrmError>;
        latest() -> Result<Q::Row, OrmError>;
        latest_result() -> Result<Q::Row, OrmError>;
        latest_ioresult() -> IoResult<Q::Row, OrmError>;
        first() -> Result<Q::Row, OrmError>;
        last() -> Result<Q::Row, OrmError>;
        first_maybe() -> Result<Option<Q::Row>, OrmError>;
        last_maybe() -> Result<Option<Q::Row>, OrmError>;
        create(row: Q::NewRow) -> Result<Q::Row, OrmError>;
        create_result(row: Q::NewRow) -> Result<Q::Row, OrmError>;
        create_ioresult(row: Q::NewRow) -> IoResult<Q::Row, OrmError>;
        get_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> Result<(Q::Row, bool), OrmError>;
        get_or_create_result(filter: &Q::Filter, defaults: Q::NewRow) -> Result<(Q::Row, bool), OrmError>;
        get_or_create_ioresult(filter: &Q::Filter, defaults: Q::NewRow) -> IoResult<(Q::Row, bool), OrmError>;
        update_or_create(filter: &Q::Filter, defaults: Q::NewRow) -> Result<(Q::Row, bool), OrmError>;
        update_or_create_result(filter: &Q::Filter, defaults: Q::NewRow) -> Result<(Q::Row, bool), OrmError>;
        update_or_create_ioresult(filter: &Q::Filter, defaults: Q::NewRow) -> IoResult<(Q::Row, bool), OrmError>;
        delete(filter: &Q::Filter) -> Result<u64, OrmError>;
        delete_result(filter: &Q::Filter) -> Result<u64, OrmError>;
        delete_ioresult(filter: &Q::Filter) -> IoResult<u64, OrmError>;
        bulk_create(rows: Vec<Q::NewRow>) -> Result<Vec<Q::Row>, OrmError>;
        bulk_create_result(rows: Vec<Q::NewRow>) -> Result<Vec<Q::Row>, OrmError>;
        bulk_create_ioresult(rows: Vec<Q::NewRow>) -> IoResult<Vec<Q::Row>, OrmError>;
    }
}
