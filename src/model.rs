//! Row wrapper - lifted counterparts for row-instance operations.
//!
//! [`ModelOps`] is the instance-level contract of the underlying ORM: the
//! fixed list of operations that mutate persisted state or validate
//! in-memory state. [`ModelLift`] is the static rendition of the original's
//! per-instance method attachment: a blanket extension trait whose
//! provided `*_result` methods exist on every [`ModelOps`] implementor
//! from birth, instead of being injected into a live object's method
//! table.

use crate::error::OrmError;
use crate::lift;

/// The row-instance contract of the underlying ORM.
///
/// Side effects happen exactly once, inside these methods; the lifted
/// counterparts observe the outcome after the fact. [`save`](Self::save)
/// must not implicitly validate - validation is
/// [`validate`](Self::validate)'s job, invoked deliberately.
pub trait ModelOps {
    /// Persists this instance's state (insert or update).
    fn save(&mut self) -> Result<(), OrmError>;

    /// Deletes the persisted row behind this instance.
    fn delete(&mut self) -> Result<(), OrmError>;

    /// Checks field- and model-level constraints against the in-memory
    /// state without writing anything.
    fn validate(&self) -> Result<(), OrmError>;

    /// Reloads this instance's state from the store.
    fn reload(&mut self) -> Result<(), OrmError>;
}

/// Lifted counterparts of the [`ModelOps`] operations.
///
/// Blanket-implemented for every [`ModelOps`] type: the lifted methods are
/// pure added capability, and the originals keep their raise-on-error
/// behavior.
///
/// # Examples
///
/// ```rust,ignore
/// use ormlift::model::{ModelLift, ModelOps};
///
/// let mut reading = Reading::new(&db, -5);
/// assert!(reading.validate_result().is_err());
/// // save does not implicitly validate:
/// assert!(reading.save_result().is_ok());
/// ```
pub trait ModelLift: ModelOps {
    /// Sync-result lift of [`ModelOps::save`].
    fn save_result(&mut self) -> Result<(), OrmError> {
        lift::result(|| self.save())
    }

    /// Sync-result lift of [`ModelOps::delete`].
    fn delete_result(&mut self) -> Result<(), OrmError> {
        lift::result(|| self.delete())
    }

    /// Sync-result lift of [`ModelOps::validate`].
    fn validate_result(&self) -> Result<(), OrmError> {
        lift::result(|| self.validate())
    }

    /// Sync-result lift of [`ModelOps::reload`].
    fn reload_result(&mut self) -> Result<(), OrmError> {
        lift::result(|| self.reload())
    }
}

impl<T: ModelOps + ?Sized> ModelLift for T {}
