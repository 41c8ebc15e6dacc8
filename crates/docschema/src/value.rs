// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory document values.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A value held by a document property.
///
/// Complex properties are `Map`s keyed by field local name. Repeated
/// properties are either an ordered `List` (the shape produced by
/// instantiation and editing) or a native `Array` (the shape produced by
/// decoding a textual default value).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,

    // Scalars
    Boolean(bool),
    Long(i64),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),

    // Containers
    Map(HashMap<String, Value>),
    List(Vec<Value>),
    Array(Vec<Value>),
}

impl Value {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if value is a list or a native array.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::List(_) | Self::Array(_))
    }

    /// Short name of the value shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Binary(_) => "binary",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Array(_) => "array",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as UTC timestamp.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map.
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as list or array elements.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get a map entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Set a map entry. Returns false if this value is not a map.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Map(entries) => {
                entries.insert(key.into(), value);
                true
            }
            _ => false,
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Long(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_values() {
        let v = Value::from(42i64);
        assert_eq!(v.as_long(), Some(42));
        assert_eq!(v.as_double(), None);

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert_eq!(v.kind_name(), "string");

        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn test_map_value() {
        let mut v = Value::Map(HashMap::new());
        assert!(v.set("title", "Report".into()));
        assert_eq!(v.get("title").and_then(Value::as_str), Some("Report"));
        assert!(v.get("missing").is_none());

        let mut scalar = Value::Long(1);
        assert!(!scalar.set("x", Value::Null));
    }

    #[test]
    fn test_sequence_value() {
        let v = Value::from(vec![1i64, 2, 3]);
        assert!(v.is_sequence());
        let seq = v.as_sequence().expect("sequence");
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[1].as_long(), Some(2));

        let arr = Value::Array(vec![Value::Boolean(true)]);
        assert_eq!(arr.as_sequence().map(<[Value]>::len), Some(1));
    }
}
