// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazily resolved references between types.
//!
//! Types point at each other (supertypes, field types, list items, the
//! schemas of a composite) through [`TypeRef`] handles instead of owning
//! pointers. A named reference is resolved through a [`TypeResolver`] on
//! every access, so:
//!
//! - a type can be built before the types it refers to are registered,
//! - reference cycles never keep types alive,
//! - a type redefined in the resolver is seen by every existing reference.
//!
//! A reference that cannot be resolved yields `None`. Callers treat that as
//! "absent" (end of a supertype chain, unknown field type), never as an
//! error, so partially loaded schema graphs stay usable.

use crate::error::{Error, Result};
use crate::types::Type;
use std::fmt;
use std::sync::{Arc, Weak};

/// Capability that resolves types and schemas by name.
///
/// Implemented by [`SchemaRegistry`](crate::SchemaRegistry); any other
/// store can be plugged in by implementing this trait.
pub trait TypeResolver: Send + Sync {
    /// Look up a type by schema name and type name.
    ///
    /// Returns `None` if the type is unknown.
    fn resolve_type(&self, schema: &str, name: &str) -> Option<Arc<Type>>;

    /// Look up a schema (a named complex type) by name.
    ///
    /// Returns `None` if the schema is unknown.
    fn resolve_schema(&self, name: &str) -> Option<Arc<Type>>;
}

#[derive(Clone)]
enum Target {
    Null,
    Named {
        schema: String,
        name: String,
        resolver: Weak<dyn TypeResolver>,
    },
    Schema {
        name: String,
        resolver: Weak<dyn TypeResolver>,
    },
    Direct(Arc<Type>),
    Owner {
        schema: String,
        name: String,
        owner: Weak<Type>,
    },
}

/// Handle to a [`Type`] that is resolved on demand.
#[derive(Clone)]
pub struct TypeRef {
    target: Target,
}

impl TypeRef {
    /// The null reference (no supertype, no type).
    pub fn null() -> Self {
        Self {
            target: Target::Null,
        }
    }

    /// Reference a type by `(schema, name)` through `resolver`.
    ///
    /// Only a weak handle on the resolver is kept.
    pub fn named<R>(schema: impl Into<String>, name: impl Into<String>, resolver: &Arc<R>) -> Self
    where
        R: TypeResolver + 'static,
    {
        let resolver: Arc<dyn TypeResolver> = resolver.clone();
        Self {
            target: Target::Named {
                schema: schema.into(),
                name: name.into(),
                resolver: Arc::downgrade(&resolver),
            },
        }
    }

    /// Reference a schema by name through `resolver`.
    pub fn schema<R>(name: impl Into<String>, resolver: &Arc<R>) -> Self
    where
        R: TypeResolver + 'static,
    {
        let resolver: Arc<dyn TypeResolver> = resolver.clone();
        Self {
            target: Target::Schema {
                name: name.into(),
                resolver: Arc::downgrade(&resolver),
            },
        }
    }

    /// Reference an already built type directly.
    pub fn direct(ty: &Arc<Type>) -> Self {
        Self {
            target: Target::Direct(ty.clone()),
        }
    }

    /// Back-reference to the type that owns the referencing object.
    pub(crate) fn owner(schema: &str, name: &str, owner: Weak<Type>) -> Self {
        Self {
            target: Target::Owner {
                schema: schema.to_string(),
                name: name.to_string(),
                owner,
            },
        }
    }

    /// Check if this is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(self.target, Target::Null)
    }

    /// Resolve the reference.
    ///
    /// Returns `None` for the null reference, for an unknown name, and when
    /// the resolver or owning type has been dropped.
    pub fn resolve(&self) -> Option<Arc<Type>> {
        match &self.target {
            Target::Null => None,
            Target::Named {
                schema,
                name,
                resolver,
            } => resolver.upgrade()?.resolve_type(schema, name),
            Target::Schema { name, resolver } => resolver.upgrade()?.resolve_schema(name),
            Target::Direct(ty) => Some(ty.clone()),
            Target::Owner { owner, .. } => owner.upgrade(),
        }
    }

    /// Resolve the reference, failing with [`Error::UnknownType`] when it
    /// cannot be resolved.
    pub fn require(&self) -> Result<Arc<Type>> {
        self.resolve().ok_or_else(|| Error::UnknownType {
            schema: self.schema_name().unwrap_or_default().to_string(),
            name: self.type_name().unwrap_or_default().to_string(),
        })
    }

    /// Schema name of the referenced type (`None` for the null reference).
    pub fn schema_name(&self) -> Option<&str> {
        match &self.target {
            Target::Null => None,
            Target::Named { schema, .. } | Target::Owner { schema, .. } => Some(schema),
            Target::Schema { name, .. } => Some(name),
            Target::Direct(ty) => Some(ty.schema_name()),
        }
    }

    /// Name of the referenced type (`None` for the null reference).
    ///
    /// For a schema reference this is the schema name.
    pub fn type_name(&self) -> Option<&str> {
        match &self.target {
            Target::Null => None,
            Target::Named { name, .. }
            | Target::Owner { name, .. }
            | Target::Schema { name, .. } => Some(name),
            Target::Direct(ty) => Some(ty.name()),
        }
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::null()
    }
}

impl From<&Arc<Type>> for TypeRef {
    fn from(ty: &Arc<Type>) -> Self {
        Self::direct(ty)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never format the target type itself: references may be cyclic.
        match (self.schema_name(), self.type_name()) {
            (Some(schema), Some(name)) => write!(f, "TypeRef({}:{})", schema, name),
            _ => f.write_str("TypeRef(null)"),
        }
    }
}
