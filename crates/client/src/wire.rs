//! JSON wire mapping for API records.
//!
//! Records are decoded through an explicit per-entity key table: declared keys
//! are popped from the incoming object with [`WireReader`], and whatever remains
//! becomes the record's additional-properties bag. Encoding goes the other way
//! with [`WireWriter`], starting from the bag so unknown keys survive a round trip.

use crate::error::ModelError;
use crate::field::Field;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A record with a camelCase JSON object representation.
pub trait WireModel: Sized {
    /// Schema name, used in error messages.
    const NAME: &'static str;

    /// Encode into a JSON object. `Unset` fields are omitted.
    fn to_wire(&self) -> Map<String, Value>;

    /// Decode from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing, a field has the wrong JSON type, an enum
    /// literal is unknown, or a timestamp is not ISO-8601.
    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError>;

    /// Decode from any JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] for non-object values, otherwise as [`WireModel::from_wire`].
    fn from_json(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(object) => Self::from_wire(object),
            other => Err(ModelError::schema(format!(
                "expected {} object, got {}",
                Self::NAME,
                json_type(&other)
            ))),
        }
    }

    /// Decode from raw response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if the bytes are not JSON, otherwise as
    /// [`WireModel::from_json`].
    fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::schema(format!("invalid JSON body: {e}")))?;
        Self::from_json(value)
    }

    fn to_json(&self) -> Value {
        Value::Object(self.to_wire())
    }
}

/// A single field value with a JSON representation.
pub trait WireValue: Sized {
    fn to_wire_value(&self) -> Value;

    /// # Errors
    ///
    /// Returns an error if `value` does not have the expected shape.
    fn from_wire_value(value: Value) -> Result<Self, ModelError>;
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, got: &Value) -> ModelError {
    ModelError::schema(format!("expected {expected}, got {}", json_type(got)))
}

impl WireValue for String {
    fn to_wire_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl WireValue for bool {
    fn to_wire_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl WireValue for i64 {
    fn to_wire_value(&self) -> Value {
        Value::from(*self)
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        value.as_i64().ok_or_else(|| mismatch("integer", &value))
    }
}

impl WireValue for Value {
    fn to_wire_value(&self) -> Value {
        self.clone()
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        Ok(value)
    }
}

impl WireValue for Map<String, Value> {
    fn to_wire_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl WireValue for BTreeMap<String, String> {
    fn to_wire_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        let Value::Object(object) = value else {
            return Err(mismatch("object of strings", &value));
        };
        object
            .into_iter()
            .map(|(k, v)| {
                let v = String::from_wire_value(v).map_err(|e| e.at(&k))?;
                Ok((k, v))
            })
            .collect()
    }
}

impl<T: WireValue> WireValue for Vec<T> {
    fn to_wire_value(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire_value).collect())
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        let Value::Array(items) = value else {
            return Err(mismatch("array", &value));
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| T::from_wire_value(item).map_err(|e| e.at(&format!("[{i}]"))))
            .collect()
    }
}

/// Timestamps keep the offset they were sent with.
impl WireValue for DateTime<FixedOffset> {
    fn to_wire_value(&self) -> Value {
        Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }

    fn from_wire_value(value: Value) -> Result<Self, ModelError> {
        let Value::String(s) = value else {
            return Err(mismatch("timestamp string", &value));
        };
        parse_timestamp(&s)
    }
}

/// Parse an ISO-8601 timestamp. A value without an offset is taken as UTC, a bare
/// date as midnight UTC.
///
/// # Errors
///
/// Returns [`ModelError::InvalidTimestamp`] if `s` is neither RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` date-time, nor a `YYYY-MM-DD` date.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, ModelError> {
    let rfc_err = match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => return Ok(ts),
        Err(e) => e,
    };
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ModelError::InvalidTimestamp {
            value: s.to_string(),
            message: rfc_err.to_string(),
        })
}

/// Pops declared keys out of an incoming object.
pub(crate) struct WireReader {
    object: Map<String, Value>,
}

impl WireReader {
    pub(crate) fn new(object: Map<String, Value>) -> Self {
        Self { object }
    }

    pub(crate) fn required<T: WireValue>(&mut self, key: &str) -> Result<T, ModelError> {
        match self.object.shift_remove(key) {
            None => Err(ModelError::schema("missing required field").at(key)),
            Some(Value::Null) => Err(ModelError::schema("required field is null").at(key)),
            Some(value) => T::from_wire_value(value).map_err(|e| e.at(key)),
        }
    }

    pub(crate) fn optional<T: WireValue>(&mut self, key: &str) -> Result<Field<T>, ModelError> {
        match self.object.shift_remove(key) {
            None => Ok(Field::Unset),
            Some(Value::Null) => Ok(Field::Null),
            Some(value) => T::from_wire_value(value)
                .map(Field::Value)
                .map_err(|e| e.at(key)),
        }
    }

    /// Everything not claimed by a declared field, in original order.
    pub(crate) fn finish(self) -> Map<String, Value> {
        self.object
    }
}

/// Builds an outgoing object on top of a record's additional properties.
pub(crate) struct WireWriter {
    object: Map<String, Value>,
}

impl WireWriter {
    pub(crate) fn new(additional_properties: &Map<String, Value>) -> Self {
        Self {
            object: additional_properties.clone(),
        }
    }

    pub(crate) fn required<T: WireValue>(mut self, key: &str, value: &T) -> Self {
        self.object.insert(key.to_string(), value.to_wire_value());
        self
    }

    pub(crate) fn optional<T: WireValue>(mut self, key: &str, value: &Field<T>) -> Self {
        match value {
            Field::Unset => {}
            Field::Null => {
                self.object.insert(key.to_string(), Value::Null);
            }
            Field::Value(v) => {
                self.object.insert(key.to_string(), v.to_wire_value());
            }
        }
        self
    }

    pub(crate) fn finish(self) -> Map<String, Value> {
        self.object
    }
}

/// Implement [`WireValue`] and serde for records that implement [`WireModel`].
macro_rules! wire_model_serde {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::wire::WireValue for $ty {
            fn to_wire_value(&self) -> serde_json::Value {
                serde_json::Value::Object($crate::wire::WireModel::to_wire(self))
            }

            fn from_wire_value(
                value: serde_json::Value,
            ) -> Result<Self, $crate::error::ModelError> {
                <$ty as $crate::wire::WireModel>::from_json(value)
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&$crate::wire::WireModel::to_wire(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::wire::WireModel>::from_json(value).map_err(serde::de::Error::custom)
            }
        }
    )+};
}

/// Declare a closed string enum with its wire literals.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every declared literal, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok($name::$variant),)+
                    other => Err($crate::error::ModelError::InvalidEnumValue {
                        enum_name: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl $crate::wire::WireValue for $name {
            fn to_wire_value(&self) -> serde_json::Value {
                serde_json::Value::String(self.as_str().to_string())
            }

            fn from_wire_value(
                value: serde_json::Value,
            ) -> Result<Self, $crate::error::ModelError> {
                match value {
                    serde_json::Value::String(s) => s.parse(),
                    other => Err($crate::error::ModelError::Schema {
                        path: String::new(),
                        message: format!(
                            "expected {} string, got {}",
                            stringify!($name),
                            $crate::wire::json_type(&other)
                        ),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use wire_enum;
pub(crate) use wire_model_serde;
