//! Extracted field values
//!
//! A field read out of a node is either absent, a single scalar, or a
//! sequence of scalars. The shape is decided once, at extraction time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Renders a date the way it is used as a group key or distinct value:
/// ISO-8601, millisecond precision, `Z` suffix.
pub fn iso_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single value read from a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Any JSON value (objects and nested arrays included)
    Json(Value),
    /// A date produced by an earlier resolver
    Date(DateTime<Utc>),
}

impl Scalar {
    /// Returns true for JSON null
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Json(Value::Null))
    }

    /// JSON form, with dates as ISO-8601 strings
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Json(value) => value.clone(),
            Scalar::Date(date) => Value::String(iso_string(date)),
        }
    }

    /// String key used for grouping, ordering and identifier lookups.
    ///
    /// Strings are their own key; dates use [`iso_string`]; everything else
    /// uses its JSON text.
    pub fn key(&self) -> String {
        match self {
            Scalar::Json(Value::String(s)) => s.clone(),
            Scalar::Json(value) => value.to_string(),
            Scalar::Date(date) => iso_string(date),
        }
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        Scalar::Json(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(date: DateTime<Utc>) -> Self {
        Scalar::Date(date)
    }
}

/// The value of a field: absent, one scalar, or a sequence of scalars.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
}

impl FieldValue {
    /// Classifies a JSON value. Arrays become sequences (one level only).
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Array(items) => FieldValue::Sequence(items.into_iter().map(Scalar::Json).collect()),
            other => FieldValue::Scalar(Scalar::Json(other)),
        }
    }

    /// A sequence of dates
    pub fn dates(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        FieldValue::Sequence(dates.into_iter().map(Scalar::Date).collect())
    }

    /// Null, or a scalar holding JSON null
    pub fn is_null(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Scalar(scalar) => scalar.is_null(),
            FieldValue::Sequence(_) => false,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldValue::Sequence(_))
    }

    /// Non-null scalars; a sequence contributes each element
    pub fn scalars(&self) -> Vec<&Scalar> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Scalar(scalar) => {
                if scalar.is_null() {
                    Vec::new()
                } else {
                    vec![scalar]
                }
            }
            FieldValue::Sequence(items) => items.iter().filter(|s| !s.is_null()).collect(),
        }
    }

    /// JSON form, with dates as ISO-8601 strings
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Scalar(scalar) => scalar.to_json(),
            FieldValue::Sequence(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from_json(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(date: DateTime<Utc>) -> Self {
        FieldValue::Scalar(Scalar::Date(date))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
