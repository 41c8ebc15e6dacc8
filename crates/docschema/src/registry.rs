// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry.
//!
//! [`SchemaRegistry`] is the store behind named [`TypeRef`]s. It holds the
//! builtin primitives (schema [`BUILTIN_SCHEMA`]), user types, schemas
//! indexed by name and prefix, and facets: composite types over a set of
//! schemas.
//!
//! # Example
//!
//! ```
//! use docschema::{ComplexTypeBuilder, Namespace, SchemaRegistry, BUILTIN_SCHEMA};
//!
//! let registry = SchemaRegistry::new();
//! let schema = ComplexTypeBuilder::schema("dublincore")
//!     .namespace(Namespace::new("http://purl.org/dc", "dc"))
//!     .field_ref("title", registry.type_ref(BUILTIN_SCHEMA, "string"))
//!     .build();
//! registry.register_schema(schema).unwrap();
//!
//! let facet = registry.register_facet("Titled", &["dublincore"]);
//! assert!(facet.has_field("dc:title"));
//! assert!(registry.field("dc:title").is_some());
//! ```

use crate::error::{Error, Result};
use crate::types::{
    Field, PrimitiveKind, QualifiedName, Type, TypeInfo, TypeRef, TypeResolver, BUILTIN_SCHEMA,
};
use crate::xpath;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use std::sync::Arc;

/// Schema under which facets are registered as types.
pub const FACETS_SCHEMA: &str = "facets";

/// Concurrent store of types, schemas and facets.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: DashMap<(String, String), Arc<Type>>,
    schemas: DashMap<String, Arc<Type>>,
    prefixes: DashMap<String, String>,
    facets: DashMap<String, Arc<Type>>,
    /// Top-level field lookups. Replaced, not cleared, on schema changes.
    field_cache: ArcSwap<DashMap<String, Arc<Field>>>,
}

impl SchemaRegistry {
    /// Create a registry holding the builtin primitives.
    pub fn new() -> Arc<Self> {
        let registry = Self::default();
        for kind in PrimitiveKind::ALL {
            registry.register_type(Type::primitive(kind));
        }
        Arc::new(registry)
    }

    // ===================================================================
    // References
    // ===================================================================

    /// Lazy reference to `(schema, name)` in this registry.
    pub fn type_ref(self: &Arc<Self>, schema: &str, name: &str) -> TypeRef {
        TypeRef::named(schema, name, self)
    }

    /// Lazy reference to a schema of this registry.
    pub fn schema_ref(self: &Arc<Self>, name: &str) -> TypeRef {
        TypeRef::schema(name, self)
    }

    /// Lazy reference to a builtin primitive.
    pub fn builtin_ref(self: &Arc<Self>, kind: PrimitiveKind) -> TypeRef {
        self.type_ref(BUILTIN_SCHEMA, kind.name())
    }

    // ===================================================================
    // Types
    // ===================================================================

    /// Register (or redefine) a type under its schema and name.
    ///
    /// Existing references to the same `(schema, name)` see the new type.
    pub fn register_type(&self, ty: Arc<Type>) {
        let schema = ty.schema_name().to_string();
        let name = ty.name().to_string();
        if self.types.insert((schema.clone(), name.clone()), ty).is_some() {
            log::debug!("[registry] Redefined type: {}:{}", schema, name);
        }
    }

    /// Look up a type.
    pub fn lookup_type(&self, schema: &str, name: &str) -> Option<Arc<Type>> {
        self.types
            .get(&(schema.to_string(), name.to_string()))
            .map(|t| t.value().clone())
    }

    /// Builtin primitive of `kind`.
    pub fn builtin(&self, kind: PrimitiveKind) -> Option<Arc<Type>> {
        self.lookup_type(BUILTIN_SCHEMA, kind.name())
    }

    /// Number of registered types (builtins included).
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ===================================================================
    // Schemas
    // ===================================================================

    /// Register (or redefine) a schema.
    ///
    /// Facets containing a schema of the same name rebuild their merged
    /// fields on next access.
    pub fn register_schema(&self, schema: Arc<Type>) -> Result<()> {
        let Some(complex) = schema.as_complex() else {
            return Err(Error::Unsupported(format!(
                "schema {} must be a complex type",
                schema.name()
            )));
        };
        let name = schema.name().to_string();
        let prefix = complex.namespace().prefix.clone();

        if let Some(previous) = self.schemas.get(&name).map(|s| s.value().clone()) {
            if let Some(old) = previous.as_complex() {
                self.prefixes
                    .remove_if(&old.namespace().prefix, |_, owner| *owner == name);
            }
        }
        if !prefix.is_empty() {
            if let Some(owner) = self.prefixes.insert(prefix.clone(), name.clone()) {
                if owner != name {
                    log::warn!(
                        "[registry] prefix {} moved from schema {} to {}",
                        prefix,
                        owner,
                        name
                    );
                }
            }
        }
        self.types
            .insert((schema.schema_name().to_string(), name.clone()), schema.clone());
        self.schemas.insert(name.clone(), schema);
        self.schemas_changed(&name);
        log::info!("[registry] Registered schema: {}", name);
        Ok(())
    }

    /// Remove a schema. Returns false if it was not registered.
    pub fn unregister_schema(&self, name: &str) -> bool {
        let Some((_, schema)) = self.schemas.remove(name) else {
            return false;
        };
        if let Some(complex) = schema.as_complex() {
            self.prefixes
                .remove_if(&complex.namespace().prefix, |_, owner| owner == name);
        }
        self.types
            .remove(&(schema.schema_name().to_string(), name.to_string()));
        self.schemas_changed(name);
        log::info!("[registry] Unregistered schema: {}", name);
        true
    }

    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> Option<Arc<Type>> {
        self.schemas.get(name).map(|s| s.value().clone())
    }

    /// Look up the schema declaring `prefix`.
    pub fn schema_by_prefix(&self, prefix: &str) -> Option<Arc<Type>> {
        let name = self.prefixes.get(prefix)?.value().clone();
        self.schema(&name)
    }

    /// Registered schema names, sorted.
    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn schemas_changed(&self, name: &str) {
        self.field_cache.store(Arc::new(DashMap::new()));
        for facet in self.facets.iter() {
            if let Some(composite) = facet.value().as_composite() {
                if composite.has_schema(name) {
                    log::debug!("[registry] facet {} invalidated by {}", facet.key(), name);
                    composite.invalidate();
                }
            }
        }
    }

    // ===================================================================
    // Facets
    // ===================================================================

    /// Register (or redefine) a facet over `schema_names`.
    ///
    /// Schemas are referenced lazily: unknown names are accepted and
    /// picked up once registered.
    pub fn register_facet(self: &Arc<Self>, name: &str, schema_names: &[&str]) -> Arc<Type> {
        for schema in schema_names {
            if !self.schemas.contains_key(*schema) {
                log::warn!(
                    "[registry] facet {} references unknown schema {}",
                    name,
                    schema
                );
            }
        }
        let refs = schema_names.iter().map(|s| self.schema_ref(s)).collect();
        let facet = Type::composite(TypeInfo::new(FACETS_SCHEMA, name), refs);
        self.facets.insert(name.to_string(), facet.clone());
        self.types
            .insert((FACETS_SCHEMA.to_string(), name.to_string()), facet.clone());
        log::info!("[registry] Registered facet: {}", name);
        facet
    }

    /// Look up a facet by name.
    pub fn facet(&self, name: &str) -> Option<Arc<Type>> {
        self.facets.get(name).map(|f| f.value().clone())
    }

    /// Registered facet names, sorted.
    pub fn facet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.facets.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    // ===================================================================
    // Fields
    // ===================================================================

    /// Resolve a field from a prefixed property path (`dc:title`,
    /// `files:files/*/file`).
    ///
    /// The first segment selects the schema by prefix (or by name when no
    /// schema declares that prefix). Top-level lookups are cached until the
    /// next schema change.
    pub fn field(&self, xpath: &str) -> Option<Arc<Field>> {
        let canonical = xpath::canonical_xpath(xpath);
        match canonical.split_once('/') {
            Some((head, rest)) => {
                let root = self.top_level_field(head)?;
                xpath::resolve_path(root, &rest.split('/').collect::<Vec<_>>())
            }
            None => self.top_level_field(&canonical),
        }
    }

    fn top_level_field(&self, name: &str) -> Option<Arc<Field>> {
        // Loaded before the schema lookup: a lookup racing a schema change
        // fills a cache that has already been replaced.
        let cache = self.field_cache.load_full();
        if let Some(cached) = cache.get(name) {
            return Some(cached.value().clone());
        }
        let qname = QualifiedName::parse(name, "");
        let schema = self
            .schema_by_prefix(qname.prefix())
            .or_else(|| self.schema(qname.prefix()))?;
        let field = schema.field(qname.local_name())?;
        cache.insert(name.to_string(), field.clone());
        Some(field)
    }
}

impl TypeResolver for SchemaRegistry {
    fn resolve_type(&self, schema: &str, name: &str) -> Option<Arc<Type>> {
        self.lookup_type(schema, name)
    }

    fn resolve_schema(&self, name: &str) -> Option<Arc<Type>> {
        self.schema(name)
    }
}
