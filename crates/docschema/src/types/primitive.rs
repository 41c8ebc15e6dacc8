// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builtin primitive types and their codecs.
//!
//! Primitives are the leaves of every supertype chain. Simple, complex and
//! list types never carry a codec of their own: scalar decoding, encoding,
//! conversion and default values all end up here.

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Schema name under which builtin primitives are registered.
pub const BUILTIN_SCHEMA: &str = "system";

/// Builtin primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Boolean,
    /// 32-bit range, held as [`Value::Long`].
    Integer,
    Long,
    Double,
    /// ISO-8601 text, held as a UTC [`Value::Date`]. A bare `YYYY-MM-DD`
    /// is midnight UTC.
    Date,
    /// Raw content; text decodes to its UTF-8 bytes.
    Binary,
    /// Accepts any value; decodes to a string.
    Any,
}

impl PrimitiveKind {
    /// All builtin kinds, in registration order.
    pub const ALL: [PrimitiveKind; 8] = [
        Self::String,
        Self::Boolean,
        Self::Integer,
        Self::Long,
        Self::Double,
        Self::Date,
        Self::Binary,
        Self::Any,
    ];

    /// Type name of the primitive.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Date => "date",
            Self::Binary => "binary",
            Self::Any => "any",
        }
    }

    /// Look up a primitive kind by type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A primitive type: a leaf type owning its codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveType {
    kind: PrimitiveKind,
}

impl PrimitiveType {
    pub(crate) fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    /// The primitive kind.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Check a non-null value against the primitive.
    pub fn validate(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (_, Value::Null) | (PrimitiveKind::Any, _) => true,
            (PrimitiveKind::String, Value::String(_)) => true,
            (PrimitiveKind::Boolean, Value::Boolean(_)) => true,
            (PrimitiveKind::Integer, Value::Long(v)) => i32::try_from(*v).is_ok(),
            (PrimitiveKind::Long, Value::Long(_)) => true,
            (PrimitiveKind::Double, Value::Double(_) | Value::Long(_)) => true,
            (PrimitiveKind::Date, Value::Date(_)) => true,
            (PrimitiveKind::Binary, Value::Binary(_)) => true,
            _ => false,
        }
    }

    /// Decode text into a value. `None` decodes to `Null`.
    pub fn decode(&self, text: Option<&str>) -> Result<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        let decoded = match self.kind {
            PrimitiveKind::String | PrimitiveKind::Any => Some(Value::String(text.to_string())),
            PrimitiveKind::Boolean => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Boolean(true)),
                "false" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
            PrimitiveKind::Integer => text
                .trim()
                .parse::<i32>()
                .ok()
                .map(|v| Value::Long(i64::from(v))),
            PrimitiveKind::Long => text.trim().parse::<i64>().ok().map(Value::Long),
            PrimitiveKind::Double => text.trim().parse::<f64>().ok().map(Value::Double),
            PrimitiveKind::Date => parse_date(text.trim()).map(Value::Date),
            PrimitiveKind::Binary => Some(Value::Binary(text.as_bytes().to_vec())),
        };
        decoded.ok_or_else(|| Error::Decode {
            type_name: self.kind.name().to_string(),
            text: text.to_string(),
        })
    }

    /// Encode a scalar value as text. `Null` and containers encode to `None`.
    pub fn encode(&self, value: &Value) -> Option<String> {
        match value {
            Value::Boolean(v) => Some(v.to_string()),
            Value::Long(v) => Some(v.to_string()),
            Value::Double(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Date(v) => Some(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Binary(v) => String::from_utf8(v.clone()).ok(),
            Value::Null | Value::Map(_) | Value::List(_) | Value::Array(_) => None,
        }
    }

    /// Convert a value into the representation of this primitive.
    pub fn convert(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let converted = match (self.kind, value) {
            (PrimitiveKind::Any, v) => Ok(v),
            (PrimitiveKind::String, v @ Value::String(_)) => Ok(v),
            (
                PrimitiveKind::String,
                v @ (Value::Boolean(_) | Value::Long(_) | Value::Double(_) | Value::Date(_)),
            ) => Ok(Value::String(self.encode(&v).unwrap_or_default())),
            (PrimitiveKind::Boolean, v @ Value::Boolean(_)) => Ok(v),
            (PrimitiveKind::Integer, Value::Long(v)) => i32::try_from(v)
                .map(|_| Value::Long(v))
                .map_err(|_| Value::Long(v)),
            (PrimitiveKind::Integer | PrimitiveKind::Long, Value::Double(v))
                if v.fract() == 0.0 && v.is_finite() =>
            {
                // Saturating cast, then range-checked for Integer below.
                #[allow(clippy::cast_possible_truncation)]
                let long = v as i64;
                self.convert(Value::Long(long)).map_err(|_| Value::Double(v))
            }
            (PrimitiveKind::Long, v @ Value::Long(_)) => Ok(v),
            (PrimitiveKind::Double, v @ Value::Double(_)) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            (PrimitiveKind::Double, Value::Long(v)) => Ok(Value::Double(v as f64)),
            (PrimitiveKind::Date, v @ Value::Date(_)) => Ok(v),
            // Milliseconds since the epoch.
            (PrimitiveKind::Date, Value::Long(millis)) => Utc
                .timestamp_millis_opt(millis)
                .single()
                .map(Value::Date)
                .ok_or(Value::Long(millis)),
            (PrimitiveKind::Binary, v @ Value::Binary(_)) => Ok(v),
            (_, Value::String(text)) => self.decode(Some(text.as_str())).map_err(|_| Value::String(text)),
            (_, other) => Err(other),
        };
        converted.map_err(|rejected| {
            Error::TypeMismatch(format!(
                "cannot convert {} value to {}",
                rejected.kind_name(),
                self.kind.name()
            ))
        })
    }

    /// Default value for a fresh instance.
    pub fn new_instance(&self) -> Value {
        match self.kind {
            PrimitiveKind::String => Value::String(String::new()),
            PrimitiveKind::Boolean => Value::Boolean(false),
            PrimitiveKind::Integer | PrimitiveKind::Long => Value::Long(0),
            PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::Date | PrimitiveKind::Binary | PrimitiveKind::Any => Value::Null,
        }
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    let midnight = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}
