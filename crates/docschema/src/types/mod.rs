// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document schema types.
//!
//! A [`Type`] describes the acceptable shape of a document value. Every type
//! has an immutable identity (`schema`, `name`), an optional supertype held
//! as a lazily resolved [`TypeRef`], a set of [`TypeFlags`] and a
//! [`TypeKind`] carrying the variant-specific state:
//!
//! | Kind | Holds | Codec |
//! |------|-------|-------|
//! | [`PrimitiveType`] | nothing | its own |
//! | [`SimpleType`] | constraints | forwarded to the primitive |
//! | [`ComplexType`] | named [`Field`]s | none |
//! | [`CompositeType`] | several schemas, merged on demand | none |
//! | [`ListType`] | one repeated item [`Field`] | item codec, space separated |
//!
//! Types are always shared as `Arc<Type>` and are treated as immutable once
//! schema loading is done, apart from write-once memoized caches and the
//! merged indexes of composite types.

mod builder;
mod complex;
mod composite;
mod constraint;
mod field;
mod list;
mod primitive;
mod qname;
mod simple;
mod type_ref;

pub use builder::{ComplexTypeBuilder, ListTypeBuilder};
pub use complex::{ComplexType, CONTENT_TYPE_NAME};
pub use composite::{CompositeType, MergedSchemas};
pub use constraint::{
    Constraint, EnumConstraint, LengthConstraint, NumericIntervalConstraint, PatternConstraint,
};
pub use field::{Field, FieldFlags, UNBOUNDED};
pub use list::{ListType, DEFAULT_ITEM_NAME};
pub use primitive::{PrimitiveKind, PrimitiveType, BUILTIN_SCHEMA};
pub use qname::{Namespace, QualifiedName};
pub use simple::SimpleType;
pub use type_ref::{TypeRef, TypeResolver};

use crate::error::{Error, Result};
use crate::value::Value;
use std::ops::BitOr;
use std::sync::Arc;

/// Type flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct TypeFlags(pub u16);

impl TypeFlags {
    /// Values of this type cannot be modified.
    pub const READONLY: Self = Self(0x0001);

    /// `Null` is not a valid value.
    pub const NOTNULL: Self = Self(0x0002);

    /// Empty flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Check if flag is set
    pub const fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }
}

impl BitOr for TypeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Identity and inheritance of a type under construction.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    /// Schema the type belongs to.
    pub schema: String,
    /// Type name, unique within the schema.
    pub name: String,
    /// Supertype (null for none).
    pub super_type: TypeRef,
    /// Type flags.
    pub flags: TypeFlags,
}

impl TypeInfo {
    /// Create type info without supertype or flags.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            super_type: TypeRef::null(),
            flags: TypeFlags::empty(),
        }
    }

    /// Set the supertype.
    pub fn extending(mut self, super_type: TypeRef) -> Self {
        self.super_type = super_type;
        self
    }

    /// Set flags.
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Variant-specific part of a [`Type`].
#[derive(Debug)]
pub enum TypeKind {
    /// Leaf scalar type owning a codec.
    Primitive(PrimitiveType),
    /// Constrained scalar type derived from a primitive.
    Simple(SimpleType),
    /// Structured type with named fields.
    Complex(ComplexType),
    /// Merged view over several schemas.
    Composite(CompositeType),
    /// Repeated sequence of an item type.
    List(ListType),
}

/// A named description of an acceptable value shape.
#[derive(Debug)]
pub struct Type {
    schema: String,
    name: String,
    super_type: TypeRef,
    flags: TypeFlags,
    kind: TypeKind,
}

impl Type {
    // ===================================================================
    // Construction
    // ===================================================================

    /// Create a builtin primitive type (schema [`BUILTIN_SCHEMA`]).
    pub fn primitive(kind: PrimitiveKind) -> Arc<Type> {
        Arc::new(Type {
            schema: BUILTIN_SCHEMA.to_string(),
            name: kind.name().to_string(),
            super_type: TypeRef::null(),
            flags: TypeFlags::empty(),
            kind: TypeKind::Primitive(PrimitiveType::new(kind)),
        })
    }

    /// Create a simple type layering `constraints` over its supertype.
    ///
    /// # Panics
    ///
    /// Panics if `info` has no supertype: a simple type always derives
    /// from another simple or primitive type.
    pub fn simple(info: TypeInfo, constraints: Vec<Arc<dyn Constraint>>) -> Arc<Type> {
        assert!(
            !info.super_type.is_null(),
            "simple type {}:{} requires a supertype",
            info.schema,
            info.name
        );
        Arc::new(Type {
            schema: info.schema,
            name: info.name,
            super_type: info.super_type,
            flags: info.flags,
            kind: TypeKind::Simple(SimpleType::new(constraints)),
        })
    }

    /// Create an empty complex type.
    ///
    /// Fields of the (resolvable) supertype are copied in at construction.
    pub fn complex(info: TypeInfo, namespace: Namespace) -> Arc<Type> {
        Self::complex_with(info, namespace, None)
    }

    /// Create an empty complex type with an explicit unstructured setting
    /// (`None` = derived from the fields on first use).
    pub fn complex_with(
        info: TypeInfo,
        namespace: Namespace,
        unstructured: Option<bool>,
    ) -> Arc<Type> {
        Arc::new_cyclic(|owner| {
            let this = TypeRef::owner(&info.schema, &info.name, owner.clone());
            let complex = ComplexType::new(&info.super_type, namespace, unstructured, this);
            Type {
                schema: info.schema,
                name: info.name,
                super_type: info.super_type,
                flags: info.flags,
                kind: TypeKind::Complex(complex),
            }
        })
    }

    /// Create an empty schema: a complex type named after its schema.
    pub fn schema(name: impl Into<String>, namespace: Namespace) -> Arc<Type> {
        let name = name.into();
        Self::complex(TypeInfo::new(name.clone(), name), namespace)
    }

    /// Create a composite type over `schemas`.
    pub fn composite(info: TypeInfo, schemas: Vec<TypeRef>) -> Arc<Type> {
        let composite = CompositeType::new();
        for schema in schemas {
            composite.add_schema(schema);
        }
        Arc::new(Type {
            schema: info.schema,
            name: info.name,
            super_type: info.super_type,
            flags: info.flags,
            kind: TypeKind::Composite(composite),
        })
    }

    /// Create an array of `item_type` with default occurrence bounds.
    ///
    /// Use [`ListTypeBuilder`] for named items, defaults and bounds.
    pub fn list(info: TypeInfo, item_type: TypeRef) -> Arc<Type> {
        ListTypeBuilder::from_info(info, item_type).build()
    }

    pub(crate) fn list_with(info: TypeInfo, params: list::ListParams) -> Arc<Type> {
        Arc::new_cyclic(|owner| {
            let this = TypeRef::owner(&info.schema, &info.name, owner.clone());
            Type {
                schema: info.schema,
                name: info.name,
                super_type: info.super_type,
                flags: info.flags,
                kind: TypeKind::List(ListType::new(params, this)),
            }
        })
    }

    // ===================================================================
    // Identity
    // ===================================================================

    /// Schema the type belongs to.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type flags.
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Check the `READONLY` flag.
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(TypeFlags::READONLY)
    }

    /// Check the `NOTNULL` flag.
    pub fn is_not_null(&self) -> bool {
        self.flags.contains(TypeFlags::NOTNULL)
    }

    /// Variant-specific state.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Unresolved handle on the supertype.
    pub fn super_type_ref(&self) -> &TypeRef {
        &self.super_type
    }

    /// Resolve the supertype. `None` at the root of the chain or when the
    /// supertype is not (yet) resolvable.
    pub fn super_type(&self) -> Option<Arc<Type>> {
        self.super_type.resolve()
    }

    /// Check if `self` is `other` or one of its supertypes.
    ///
    /// Compares object identity, not names: two distinct types sharing a
    /// name are unrelated. The chain is assumed acyclic.
    pub fn is_super_type_of(&self, other: &Type) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let mut next = other.super_type();
        while let Some(ty) = next {
            if std::ptr::eq(self, Arc::as_ptr(&ty)) {
                return true;
            }
            next = ty.super_type();
        }
        false
    }

    // ===================================================================
    // Classification
    // ===================================================================

    /// Primitive or simple type.
    pub fn is_simple_type(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_) | TypeKind::Simple(_))
    }

    /// Primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Complex type. Composite types are *not* complex types.
    pub fn is_complex_type(&self) -> bool {
        matches!(self.kind, TypeKind::Complex(_))
    }

    /// Composite type.
    pub fn is_composite_type(&self) -> bool {
        matches!(self.kind, TypeKind::Composite(_))
    }

    /// List type.
    pub fn is_list_type(&self) -> bool {
        matches!(self.kind, TypeKind::List(_))
    }

    /// The `any` primitive.
    pub fn is_any_type(&self) -> bool {
        matches!(&self.kind, TypeKind::Primitive(p) if p.kind() == PrimitiveKind::Any)
    }

    /// Primitive state, if this is a primitive type.
    pub fn as_primitive(&self) -> Option<&PrimitiveType> {
        match &self.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Simple state, if this is a simple type.
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match &self.kind {
            TypeKind::Simple(s) => Some(s),
            _ => None,
        }
    }

    /// Complex state, if this is a complex type.
    pub fn as_complex(&self) -> Option<&ComplexType> {
        match &self.kind {
            TypeKind::Complex(c) => Some(c),
            _ => None,
        }
    }

    /// Composite state, if this is a composite type.
    pub fn as_composite(&self) -> Option<&CompositeType> {
        match &self.kind {
            TypeKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// List state, if this is a list type.
    pub fn as_list(&self) -> Option<&ListType> {
        match &self.kind {
            TypeKind::List(l) => Some(l),
            _ => None,
        }
    }

    // ===================================================================
    // Primitive resolution
    // ===================================================================

    /// The primitive at the end of a simple type's chain.
    ///
    /// A primitive returns itself. Simple types memoize the answer on first
    /// success. Other kinds have no primitive.
    pub fn primitive_type(self: &Arc<Self>) -> Option<Arc<Type>> {
        match &self.kind {
            TypeKind::Primitive(_) => Some(Arc::clone(self)),
            _ => self.resolve_primitive(),
        }
    }

    fn resolve_primitive(&self) -> Option<Arc<Type>> {
        let TypeKind::Simple(simple) = &self.kind else {
            return None;
        };
        if let Some(primitive) = simple.cached_primitive() {
            return Some(primitive);
        }
        let primitive = self.super_type()?.primitive_type()?;
        Some(simple.cache_primitive(primitive))
    }

    fn codec(&self) -> Option<PrimitiveType> {
        match &self.kind {
            TypeKind::Primitive(p) => Some(*p),
            TypeKind::Simple(_) => self
                .resolve_primitive()
                .and_then(|p| p.as_primitive().copied()),
            _ => None,
        }
    }

    // ===================================================================
    // Values
    // ===================================================================

    /// Check a value against the type.
    ///
    /// Never fails: a rejected value yields `false`.
    pub fn validate(&self, value: &Value) -> bool {
        match &self.kind {
            TypeKind::Composite(_) => true,
            _ if value.is_null() => !self.is_not_null(),
            TypeKind::Primitive(p) => p.validate(value),
            TypeKind::Simple(simple) => {
                simple.check_constraints(value)
                    && self.super_type().map_or(true, |sup| sup.validate(value))
            }
            TypeKind::Complex(_) => true,
            TypeKind::List(_) => value.is_sequence(),
        }
    }

    /// Decode a textual (default) value. `None` decodes to `Null`.
    ///
    /// Structured types have no textual form and decode to `Null`.
    pub fn decode(&self, text: Option<&str>) -> Result<Value> {
        match &self.kind {
            TypeKind::Primitive(_) | TypeKind::Simple(_) => match self.codec() {
                Some(codec) => codec.decode(text),
                None => Ok(Value::Null),
            },
            TypeKind::List(list) => list.decode(text),
            TypeKind::Complex(_) | TypeKind::Composite(_) => Ok(Value::Null),
        }
    }

    /// Encode a value as text, if the type has a textual form.
    pub fn encode(&self, value: &Value) -> Option<String> {
        match &self.kind {
            TypeKind::Primitive(_) | TypeKind::Simple(_) => self.codec()?.encode(value),
            TypeKind::List(list) => list.encode(value),
            TypeKind::Complex(_) | TypeKind::Composite(_) => None,
        }
    }

    /// Convert a value to the representation expected by this type.
    pub fn convert(&self, value: Value) -> Result<Value> {
        match &self.kind {
            TypeKind::Primitive(_) | TypeKind::Simple(_) => match self.codec() {
                Some(codec) => codec.convert(value),
                None => Ok(value),
            },
            TypeKind::Complex(complex) => complex.convert(value),
            TypeKind::Composite(composite) => composite.convert(value),
            TypeKind::List(list) => list.convert(value),
        }
    }

    /// Create the default value of a fresh instance.
    pub fn new_instance(&self) -> Value {
        match &self.kind {
            TypeKind::Primitive(_) | TypeKind::Simple(_) => self
                .codec()
                .map_or(Value::Null, |codec| codec.new_instance()),
            // Blob holders have no default map shape.
            TypeKind::Complex(_) if self.name == CONTENT_TYPE_NAME => Value::Null,
            TypeKind::Complex(complex) => complex.new_instance(),
            TypeKind::Composite(composite) => composite.new_instance(),
            TypeKind::List(list) => list.new_instance(),
        }
    }

    // ===================================================================
    // Fields
    // ===================================================================

    /// Look up a field by (possibly prefixed) name.
    pub fn field(&self, name: &str) -> Option<Arc<Field>> {
        match &self.kind {
            TypeKind::Complex(complex) => complex.field(name),
            TypeKind::Composite(composite) => composite.field(name),
            _ => None,
        }
    }

    /// Check if a field is visible under `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// All visible fields.
    pub fn fields(&self) -> Vec<Arc<Field>> {
        match &self.kind {
            TypeKind::Complex(complex) => complex.fields(),
            TypeKind::Composite(composite) => composite.fields().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Check if the type has at least one field.
    pub fn has_fields(&self) -> bool {
        match &self.kind {
            TypeKind::Complex(complex) => complex.has_fields(),
            TypeKind::Composite(composite) => composite.has_fields(),
            _ => false,
        }
    }

    /// Declare a field on a complex type.
    ///
    /// Composite types reject this: their fields come from their schemas.
    pub fn add_field(
        &self,
        name: &str,
        field_type: TypeRef,
        default_value: Option<String>,
        flags: FieldFlags,
    ) -> Result<Arc<Field>> {
        match &self.kind {
            TypeKind::Complex(complex) => {
                Ok(complex.add_field(name, field_type, default_value, flags))
            }
            TypeKind::Composite(composite) => composite.add_field(name),
            _ => Err(Error::Unsupported(format!(
                "{}:{} is not a complex type",
                self.schema, self.name
            ))),
        }
    }
}
