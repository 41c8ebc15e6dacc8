// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # docschema - Document schema type system
//!
//! Runtime type descriptions for a document store: the shapes document
//! properties may take, how textual default values decode into runtime
//! values, and how several schemas merge into one document type.
//!
//! ## Quick Start
//!
//! ```rust
//! use docschema::{
//!     ComplexTypeBuilder, ListTypeBuilder, Namespace, PrimitiveKind, SchemaRegistry, Value,
//! };
//!
//! let registry = SchemaRegistry::new();
//!
//! // Types may reference each other before they are registered.
//! let schema = ComplexTypeBuilder::schema("dublincore")
//!     .namespace(Namespace::new("http://purl.org/dc/elements/1.1/", "dc"))
//!     .field_with_default("title", registry.builtin_ref(PrimitiveKind::String), "Untitled")
//!     .field_ref("subjects", registry.type_ref("dublincore", "subjects"))
//!     .build();
//! registry.register_schema(schema).unwrap();
//! registry.register_type(
//!     ListTypeBuilder::new("dublincore", "subjects", registry.builtin_ref(PrimitiveKind::String))
//!         .build(),
//! );
//!
//! let document = registry.register_facet("Note", &["dublincore"]);
//! let instance = document.new_instance();
//! assert_eq!(instance.get("title"), Some(&Value::from("Untitled")));
//!
//! let subjects = registry.field("dc:subjects").unwrap().field_type().unwrap();
//! assert_eq!(subjects.decode(Some("a b")).unwrap(), Value::Array(vec!["a".into(), "b".into()]));
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Type`] | A named value shape: primitive, simple, complex, composite or list |
//! | [`TypeRef`] | Lazily resolved handle between types |
//! | [`Field`] | Named, typed slot of a complex type |
//! | [`CompositeType`] | Merged view over several schemas, rebuilt on demand |
//! | [`SchemaRegistry`] | Store of types, schemas and facets |
//! | [`Value`] | Runtime value produced by decoding and instantiation |
//!
//! ## Modules Overview
//!
//! - [`types`] - Type hierarchy, fields and constraints (start here)
//! - [`registry`] - Schema registry and facet management
//! - [`xpath`] - Property path canonicalization and resolution
//! - [`loader`] - YAML schema definitions (feature `schema-loaders`)

/// Error types.
pub mod error;
/// Schema definition loaders (YAML).
pub mod loader;
/// Schema registry: types, schemas, prefixes and facets.
pub mod registry;
/// Type hierarchy, fields and constraints.
pub mod types;
/// Runtime values.
pub mod value;
/// Property path utilities.
pub mod xpath;

pub use error::{Error, Result};
pub use registry::{SchemaRegistry, FACETS_SCHEMA};
pub use types::{
    ComplexType, ComplexTypeBuilder, CompositeType, Constraint, Field, FieldFlags, ListType,
    ListTypeBuilder, Namespace, PrimitiveKind, QualifiedName, Type, TypeFlags, TypeInfo,
    TypeKind, TypeRef, TypeResolver, BUILTIN_SCHEMA, UNBOUNDED,
};
pub use value::Value;
pub use xpath::{canonical_xpath, resolve_field};

/// docschema version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
