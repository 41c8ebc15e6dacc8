// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fields: named, typed slots of complex types.

use crate::error::Result;
use crate::types::{QualifiedName, Type, TypeRef};
use crate::value::Value;
use std::ops::BitOr;
use std::sync::Arc;

/// Field flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct FieldFlags(pub u16);

impl FieldFlags {
    /// Field accepts an explicit null.
    pub const NILLABLE: Self = Self(0x0001);

    /// Field value is fixed to its default.
    pub const CONSTANT: Self = Self(0x0002);

    /// Empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }
}

impl BitOr for FieldFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Occurrence bound meaning "unbounded".
pub const UNBOUNDED: i32 = -1;

/// A named, typed slot declared by a complex type.
///
/// A field belongs to exactly one declaring type but is visible on every
/// subtype of it. The default value is kept as text and decoded through the
/// field type on demand.
#[derive(Debug, Clone)]
pub struct Field {
    name: QualifiedName,
    field_type: TypeRef,
    declaring_type: TypeRef,
    default_value: Option<String>,
    flags: FieldFlags,
    min_occurs: i32,
    max_occurs: i32,
}

impl Field {
    /// Create a field occurring exactly once.
    pub fn new(
        name: QualifiedName,
        field_type: TypeRef,
        declaring_type: TypeRef,
        default_value: Option<String>,
        flags: FieldFlags,
    ) -> Self {
        Self {
            name,
            field_type,
            declaring_type,
            default_value,
            flags,
            min_occurs: 1,
            max_occurs: 1,
        }
    }

    /// Set occurrence bounds ([`UNBOUNDED`] for no upper bound).
    pub fn with_occurs(mut self, min_occurs: i32, max_occurs: i32) -> Self {
        self.min_occurs = min_occurs;
        self.max_occurs = max_occurs;
        self
    }

    /// Qualified name.
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Local part of the name.
    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Resolve the field type.
    pub fn field_type(&self) -> Option<Arc<Type>> {
        self.field_type.resolve()
    }

    /// Unresolved handle on the field type.
    pub fn field_type_ref(&self) -> &TypeRef {
        &self.field_type
    }

    /// Resolve the type declaring this field.
    pub fn declaring_type(&self) -> Option<Arc<Type>> {
        self.declaring_type.resolve()
    }

    /// Unresolved handle on the declaring type.
    pub fn declaring_type_ref(&self) -> &TypeRef {
        &self.declaring_type
    }

    /// Default value as written.
    pub fn default_value_text(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Default value decoded through the field type.
    ///
    /// `Null` when there is no default or the type cannot be resolved.
    pub fn default_value(&self) -> Result<Value> {
        match (&self.default_value, self.field_type()) {
            (Some(text), Some(ty)) => ty.decode(Some(text)),
            _ => Ok(Value::Null),
        }
    }

    /// Field flags.
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Check if the field accepts an explicit null.
    pub fn is_nillable(&self) -> bool {
        self.flags.contains(FieldFlags::NILLABLE)
    }

    /// Check if the field value is fixed.
    pub fn is_constant(&self) -> bool {
        self.flags.contains(FieldFlags::CONSTANT)
    }

    /// Minimum number of occurrences.
    pub fn min_occurs(&self) -> i32 {
        self.min_occurs
    }

    /// Maximum number of occurrences ([`UNBOUNDED`] for none).
    pub fn max_occurs(&self) -> i32 {
        self.max_occurs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn long_field(default: Option<&str>) -> Field {
        let long = Type::primitive(PrimitiveKind::Long);
        Field::new(
            QualifiedName::new("dc", "count"),
            TypeRef::direct(&long),
            TypeRef::null(),
            default.map(str::to_string),
            FieldFlags::NILLABLE | FieldFlags::CONSTANT,
        )
    }

    #[test]
    fn test_flags() {
        let f = long_field(None);
        assert!(f.is_nillable());
        assert!(f.is_constant());
        assert!(!FieldFlags::empty().contains(FieldFlags::NILLABLE));
    }

    #[test]
    fn test_default_value_decoded_through_type() {
        let f = long_field(Some("12"));
        assert_eq!(f.default_value_text(), Some("12"));
        assert_eq!(f.default_value().unwrap(), Value::Long(12));

        assert!(long_field(None).default_value().unwrap().is_null());
        assert!(long_field(Some("x")).default_value().is_err());
    }

    #[test]
    fn test_occurs() {
        let f = long_field(None);
        assert_eq!((f.min_occurs(), f.max_occurs()), (1, 1));

        let f = f.with_occurs(0, UNBOUNDED);
        assert_eq!(f.min_occurs(), 0);
        assert_eq!(f.max_occurs(), UNBOUNDED);
        assert_eq!(f.local_name(), "count");
    }

    #[test]
    fn test_unresolvable_type_has_null_default() {
        let f = Field::new(
            QualifiedName::new("", "x"),
            TypeRef::null(),
            TypeRef::null(),
            Some("1".into()),
            FieldFlags::empty(),
        );
        assert!(f.field_type().is_none());
        assert!(f.default_value().unwrap().is_null());
    }
}
