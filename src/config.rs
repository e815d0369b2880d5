//! Configuration surface for the lifting strategies.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which lifting strategy a manager hands to the wrappers it constructs.
///
/// The value is read once at manager construction and never mutated. It
/// only affects what *plain* operation names resolve to on the dynamic
/// [`resolve`](crate::queryset::LiftedSet::resolve) surface; the typed
/// methods are always all available and never change behavior.
///
/// - [`OverrideWith::None`] (default): plain names resolve to the original
///   passthrough operations; lifted behavior is reached through the
///   `_safe` convention and the typed `*_result` / `*_ioresult` methods.
/// - [`OverrideWith::Safe`]: plain names resolve under the sync-result
///   policy. Experimental - callers expecting raise-on-error dispatch get
///   total outcomes instead.
/// - [`OverrideWith::Impure`]: plain names resolve under the io-result
///   policy, sealing every outcome in an envelope. Equally experimental.
///
/// # Examples
///
/// ```rust
/// use ormlift::config::OverrideWith;
///
/// let strategy: OverrideWith = "impure".parse().unwrap();
/// assert_eq!(strategy, OverrideWith::Impure);
/// assert_eq!(strategy.to_string(), "impure");
/// assert_eq!(OverrideWith::default(), OverrideWith::None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OverrideWith {
    /// Plain names keep their original raise-on-error behavior.
    #[default]
    None,
    /// Plain names resolve under the sync-result policy.
    Safe,
    /// Plain names resolve under the io-result policy.
    Impure,
}

impl OverrideWith {
    /// Canonical configuration spelling of the value.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Safe => "safe",
            Self::Impure => "impure",
        }
    }
}

impl fmt::Display for OverrideWith {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`OverrideWith`] spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOverrideWithError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseOverrideWithError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "unknown override strategy `{}` (expected one of: none, safe, impure)",
            self.input
        )
    }
}

impl std::error::Error for ParseOverrideWithError {}

impl FromStr for OverrideWith {
    type Err = ParseOverrideWithError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "none" => Ok(Self::None),
            "safe" => Ok(Self::Safe),
            "impure" => Ok(Self::Impure),
            _ => Err(ParseOverrideWithError {
                input: input.to_string(),
            }),
        }
    }
}
