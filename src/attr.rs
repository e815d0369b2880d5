//! Attribute-access helper - lifted by-name field reads.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AttributeError;

/// A dynamically-typed field value produced by a by-name read.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// An absent/null field.
    Null,
    /// A boolean field.
    Bool(bool),
    /// An integer field.
    Int(i64),
    /// A floating-point field.
    Float(f64),
    /// A text field.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

/// By-name field access on a row type.
///
/// A read returns `Some(Value)` for every field the row has - including
/// nullable fields, which read as [`Value::Null`] - and `None` for names
/// the row does not know. Implementations must not do more work than the
/// direct accessor would; in particular, reading a relation field returns
/// its stored key, it does not load the related rows.
pub trait FieldAccess {
    /// The type's name as reported in attribute errors.
    const TYPE_NAME: &'static str;

    /// Reads the field named `name`, if the row has one.
    fn field(&self, name: &str) -> Option<Value>;
}

/// Lifts a by-name field read into a result.
///
/// `Ok(value)` for any field the row has, `Err(AttributeError)` - carrying
/// the row's type name and the exact requested name - otherwise.
///
/// # Examples
///
/// ```rust
/// use ormlift::attr::{getattr_safe, FieldAccess, Value};
///
/// struct Track {
///     title: String,
/// }
///
/// impl FieldAccess for Track {
///     const TYPE_NAME: &'static str = "Track";
///
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "title" => Some(Value::Text(self.title.clone())),
///             _ => None,
///         }
///     }
/// }
///
/// let track = Track { title: "airbag".to_string() };
/// assert_eq!(
///     getattr_safe(&track, "title"),
///     Ok(Value::Text("airbag".to_string()))
/// );
///
/// let error = getattr_safe(&track, "tempo").unwrap_err();
/// assert_eq!(format!("{error}"), "`Track` has no attribute `tempo`");
/// ```
pub fn getattr_safe<T: FieldAccess>(row: &T, name: &str) -> Result<Value, AttributeError> {
    row.field(name)
        .ok_or_else(|| AttributeError::new(T::TYPE_NAME, name))
}
