// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for complex and list types.

use crate::types::list::ListParams;
use crate::types::{FieldFlags, Namespace, Type, TypeFlags, TypeInfo, TypeRef};
use std::sync::Arc;

#[derive(Debug)]
struct PendingField {
    name: String,
    field_type: TypeRef,
    default_value: Option<String>,
    flags: FieldFlags,
    min_occurs: i32,
    max_occurs: i32,
}

/// Builder for complex types and schemas.
#[derive(Debug)]
pub struct ComplexTypeBuilder {
    info: TypeInfo,
    namespace: Namespace,
    unstructured: Option<bool>,
    fields: Vec<PendingField>,
}

impl ComplexTypeBuilder {
    /// Create a builder for a complex type.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            info: TypeInfo::new(schema, name),
            namespace: Namespace::none(),
            unstructured: None,
            fields: Vec::new(),
        }
    }

    /// Create a builder for a schema (named after itself).
    pub fn schema(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }

    /// Set the namespace of the declared fields.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the supertype. Its fields are copied in first.
    pub fn extending(mut self, super_type: TypeRef) -> Self {
        self.info.super_type = super_type;
        self
    }

    /// Set type flags.
    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.info.flags = flags;
        self
    }

    /// Declare instances unstructured (or not), instead of deriving it.
    pub fn unstructured(mut self, unstructured: bool) -> Self {
        self.unstructured = Some(unstructured);
        self
    }

    /// Add a field of a built type.
    pub fn field(self, name: impl Into<String>, field_type: &Arc<Type>) -> Self {
        self.field_ref(name, TypeRef::direct(field_type))
    }

    /// Add a field through a type reference.
    pub fn field_ref(self, name: impl Into<String>, field_type: TypeRef) -> Self {
        self.field_with(name, field_type, None, FieldFlags::empty())
    }

    /// Add a field with a textual default value.
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        field_type: TypeRef,
        default_value: impl Into<String>,
    ) -> Self {
        self.field_with(
            name,
            field_type,
            Some(default_value.into()),
            FieldFlags::empty(),
        )
    }

    /// Add a field with default value and flags.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        field_type: TypeRef,
        default_value: Option<String>,
        flags: FieldFlags,
    ) -> Self {
        self.fields.push(PendingField {
            name: name.into(),
            field_type,
            default_value,
            flags,
            min_occurs: 1,
            max_occurs: 1,
        });
        self
    }

    /// Set occurrence bounds of the last added field.
    pub fn occurs(mut self, min_occurs: i32, max_occurs: i32) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.min_occurs = min_occurs;
            last.max_occurs = max_occurs;
        }
        self
    }

    /// Build the type.
    pub fn build(self) -> Arc<Type> {
        let ty = Type::complex_with(self.info, self.namespace, self.unstructured);
        if let Some(complex) = ty.as_complex() {
            for f in self.fields {
                complex.add_field_with_occurs(
                    &f.name,
                    f.field_type,
                    f.default_value,
                    f.flags,
                    f.min_occurs,
                    f.max_occurs,
                );
            }
        }
        ty
    }
}

/// Builder for list types.
#[derive(Debug)]
pub struct ListTypeBuilder {
    info: TypeInfo,
    params: ListParams,
}

impl ListTypeBuilder {
    /// Create a builder for an array of `item_type`.
    pub fn new(schema: impl Into<String>, name: impl Into<String>, item_type: TypeRef) -> Self {
        Self::from_info(TypeInfo::new(schema, name), item_type)
    }

    pub(crate) fn from_info(info: TypeInfo, item_type: TypeRef) -> Self {
        Self {
            info,
            params: ListParams::new(item_type),
        }
    }

    /// Name the item field. Named lists are not arrays.
    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.params.item_name = Some(name.into());
        self
    }

    /// Set the textual default (space separated items).
    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.params.default_value = Some(text.into());
        self
    }

    /// Set item occurrence bounds (default `0..UNBOUNDED`).
    pub fn occurs(mut self, min_occurs: i32, max_occurs: i32) -> Self {
        self.params.min_occurs = min_occurs;
        self.params.max_occurs = max_occurs;
        self
    }

    /// Set the supertype.
    pub fn extending(mut self, super_type: TypeRef) -> Self {
        self.info.super_type = super_type;
        self
    }

    /// Set type flags.
    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.info.flags = flags;
        self
    }

    /// Build the type.
    pub fn build(self) -> Arc<Type> {
        Type::list_with(self.info, self.params)
    }
}
