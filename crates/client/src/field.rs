//! Tri-state optional field: absent, explicit `null`, or a value.
//!
//! Wire payloads distinguish "key not sent" from "key sent as `null`"; a plain
//! `Option<T>` cannot, so records use [`Field`] for every optional member.

/// An optional record field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// The key is absent from the wire object.
    #[default]
    Unset,
    /// The key is present with JSON `null`.
    Null,
    /// The key is present with a value.
    Value(T),
}

impl<T> Field<T> {
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Borrow the value, collapsing `Unset` and `Null` to `None`.
    #[must_use]
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Null => None,
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unset | Self::Null => None,
        }
    }

    #[must_use]
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Unset => Field::Unset,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl Field<serde_json::Value> {
    /// Wrap an arbitrary JSON value; JSON `null` becomes [`Field::Null`].
    ///
    /// `Field::Value(Value::Null)` encodes as `null` and decodes back as `Field::Null`,
    /// so JSON-valued fields should be built through this.
    #[must_use]
    pub fn from_json_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            other => Self::Value(other),
        }
    }
}

impl From<&str> for Field<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}
