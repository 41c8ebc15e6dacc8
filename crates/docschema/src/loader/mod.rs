// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema definition loaders.
//!
//! Schemas, simple types and facets can be declared in a YAML document and
//! applied to a [`SchemaRegistry`](crate::SchemaRegistry) at runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use docschema::loader::YamlSchemaLoader;
//! use docschema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::new();
//! YamlSchemaLoader::load_into("schemas.yaml", &registry)?;
//! let title = registry.field("dc:title");
//! ```

#[cfg(feature = "schema-loaders")]
pub mod yaml;

#[cfg(feature = "schema-loaders")]
pub use yaml::{YamlField, YamlSchema, YamlSchemaDocument, YamlSchemaLoader, YamlSimpleType};
