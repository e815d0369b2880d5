//! Error types for the lifted row-store contract.
//!
//! The collaborator behind [`RowSet`](crate::queryset::RowSet) and
//! [`ModelOps`](crate::model::ModelOps) signals failure through [`OrmError`],
//! the closed vocabulary of conditions a lifted operation can observe.
//! Name-resolution misses on the dynamic surface are a programmer error and
//! use the distinct [`AttributeError`] type instead: they are raised loudly,
//! never folded into an outcome container.

use std::fmt;

/// The typed failure vocabulary of the row-store collaborator.
///
/// Every operation on a row collection or row instance either returns a
/// domain value or fails with one of these conditions. Lifted methods turn
/// the failure into a value; unlifted methods leave it on the error channel
/// for the caller to propagate.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::OrmError;
///
/// let error = OrmError::NotFound;
/// assert!(error.is_not_found());
/// assert_eq!(format!("{error}"), "no row matched the query");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrmError {
    /// A unique fetch matched zero rows.
    NotFound,
    /// A unique fetch matched more than one row.
    MultipleRows,
    /// A uniqueness or other integrity constraint rejected a write.
    Integrity(String),
    /// Field- or model-level validation rejected the in-memory state.
    Validation(ValidationError),
    /// A deletion was blocked by a referential-integrity guard.
    Protected(String),
    /// A panic captured by a lifted call.
    Panic(String),
    /// A dynamic call whose arguments do not fit the resolved operation.
    Unsupported(String),
}

impl OrmError {
    /// Builds an [`OrmError::Integrity`] from any displayable message.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// Builds an [`OrmError::Protected`] from any displayable message.
    pub fn protected(message: impl Into<String>) -> Self {
        Self::Protected(message.into())
    }

    /// Builds an [`OrmError::Unsupported`] from any displayable message.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Returns `true` if this is the not-found condition.
    ///
    /// The optional lifting policy treats exactly this condition as
    /// absence; every other variant stays a failure.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns `true` if this is an integrity-constraint failure.
    #[inline]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Returns `true` if this is a validation failure.
    #[inline]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` if this is a protected-reference failure.
    #[inline]
    pub const fn is_protected(&self) -> bool {
        matches!(self, Self::Protected(_))
    }

    /// Returns `true` if this failure is a captured panic.
    #[inline]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panic(_))
    }
}

impl fmt::Display for OrmError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(formatter, "no row matched the query"),
            Self::MultipleRows => write!(formatter, "more than one row matched the query"),
            Self::Integrity(message) => write!(formatter, "integrity constraint violated: {message}"),
            Self::Validation(error) => write!(formatter, "{error}"),
            Self::Protected(message) => {
                write!(formatter, "delete blocked by protected reference: {message}")
            }
            Self::Panic(message) => write!(formatter, "operation panicked: {message}"),
            Self::Unsupported(message) => write!(formatter, "unsupported call: {message}"),
        }
    }
}

impl std::error::Error for OrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ValidationError> for OrmError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

/// A field- or model-level validation failure detected before a write.
///
/// `field` is `None` for model-level constraints that span fields.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::ValidationError;
///
/// let error = ValidationError::field("value", "cannot be negative");
/// assert_eq!(
///     format!("{error}"),
///     "validation failed on 'value': cannot be negative"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The offending field, or `None` for a model-level constraint.
    pub field: Option<String>,
    /// Human-readable description of the violated constraint.
    pub message: String,
}

impl ValidationError {
    /// Builds a validation error scoped to a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Builds a model-level validation error.
    pub fn model(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(formatter, "validation failed on '{field}': {}", self.message),
            None => write!(formatter, "validation failed: {}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A name-resolution miss on a dynamic lookup surface.
///
/// Carries the type that refused the lookup and the exact requested name.
/// Resolution misses are programmer errors, distinct from the domain
/// outcomes in [`OrmError`]: a lifted method never returns one as a
/// failure value.
///
/// # Examples
///
/// ```rust
/// use ormlift::error::AttributeError;
///
/// let error = AttributeError::new("LiftedSet", "frobnicate_safe");
/// assert_eq!(
///     format!("{error}"),
///     "`LiftedSet` has no attribute `frobnicate_safe`"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeError {
    /// The type name of the wrapper that rejected the lookup.
    pub owner: &'static str,
    /// The exact name that failed to resolve.
    pub name: String,
}

impl AttributeError {
    /// Builds an attribute error for `owner` rejecting `name`.
    pub fn new(owner: &'static str, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "`{}` has no attribute `{}`", self.owner, self.name)
    }
}

impl std::error::Error for AttributeError {}
