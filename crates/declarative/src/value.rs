//! Three-state attribute values
//!
//! Every attribute flowing through a plan carries one of three states:
//! known to be absent, not yet determined, or a concrete value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown for values that will only be known once a change is applied
pub const UNKNOWN_DISPLAY: &str = "(known after apply)";

/// An attribute value that may be null, unknown, or known
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value<T> {
    /// Known to be absent
    Null,
    /// Not yet determined (resolved during apply)
    Unknown,
    /// A concrete value
    Known(T),
}

impl<T> Value<T> {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the value is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Check if the value is concrete
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the concrete value, if any
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the concrete value, if any
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the inner value
    pub fn as_ref(&self) -> Value<&T> {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(v) => Value::Known(v),
        }
    }

    /// Map the concrete value, preserving null and unknown
    pub fn map<U, F>(self, f: F) -> Value<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(v) => Value::Known(f(v)),
        }
    }

    /// Replace null with a default; unknown stays unknown
    pub fn or_default_with<F>(self, default: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Null => Self::Known(default()),
            other => other,
        }
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Null,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Unknown => write!(f, "{UNKNOWN_DISPLAY}"),
            Self::Known(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_states() {
        let null: Value<u32> = Value::Null;
        let unknown: Value<u32> = Value::Unknown;
        let known = Value::Known(7);

        assert!(null.is_null() && !null.is_known());
        assert!(unknown.is_unknown() && !unknown.is_null());
        assert!(known.is_known());
        assert_eq!(known.as_known(), Some(&7));
        assert_eq!(unknown.as_known(), None);
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(Some("a")), Value::Known("a"));
        assert_eq!(Value::<&str>::from(None), Value::Null);
    }

    #[test]
    fn test_value_map_keeps_markers() {
        assert_eq!(Value::Known(2).map(|v| v * 2), Value::Known(4));
        assert_eq!(Value::<i32>::Unknown.map(|v| v * 2), Value::Unknown);
        assert_eq!(Value::<i32>::Null.map(|v| v * 2), Value::Null);
    }

    #[test]
    fn test_or_default_with_only_fills_null() {
        assert_eq!(Value::Null.or_default_with(|| true), Value::Known(true));
        assert_eq!(Value::Unknown.or_default_with(|| true), Value::Unknown);
        assert_eq!(Value::Known(false).or_default_with(|| true), Value::Known(false));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Known("x").to_string(), "x");
        assert_eq!(Value::<&str>::Unknown.to_string(), UNKNOWN_DISPLAY);
        assert_eq!(Value::<&str>::Null.to_string(), "null");
    }
}
