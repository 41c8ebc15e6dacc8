// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML schema loader.
//!
//! # Example YAML
//!
//! ```yaml
//! schemas:
//!   dublincore:
//!     prefix: dc
//!     uri: http://purl.org/dc/elements/1.1/
//!     types:
//!       shortTitle:
//!         base: string
//!         max_length: 40
//!     fields:
//!       title: { type: shortTitle, default: Untitled }
//!       subjects: { type: string, list: true, default: [misc] }
//!       rating: { type: "common:rating" }
//!       address:
//!         fields:
//!           city: { type: string }
//!
//! facets:
//!   Publishable: [dublincore, common]
//! ```
//!
//! Field types name a local simple type, a builtin primitive, a type
//! already in the registry, or `schema:type` for any other schema. The
//! qualified form is resolved lazily and may point at schemas declared
//! later in the same document.
//!
//! Inline `fields:` blocks and `list: true` fields get anonymous types
//! named after the field path: `#address`, `#address/city`, `#tags#list`.
//! `#` is reserved for these names and rejected in declared type names.

use crate::error::{Error, Result};
use crate::registry::SchemaRegistry;
use crate::types::{
    ComplexTypeBuilder, Constraint, EnumConstraint, FieldFlags, LengthConstraint,
    ListTypeBuilder, Namespace, NumericIntervalConstraint, PatternConstraint, PrimitiveKind, Type,
    TypeFlags, TypeInfo, TypeRef, BUILTIN_SCHEMA, UNBOUNDED,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Leading mark of anonymous type names.
const ANONYMOUS_MARK: char = '#';

/// YAML schema loader.
pub struct YamlSchemaLoader;

/// Root YAML document structure.
#[derive(Debug, Deserialize, Default)]
pub struct YamlSchemaDocument {
    /// Schemas by name, applied in document order.
    #[serde(default)]
    pub schemas: IndexMap<String, YamlSchema>,

    /// Facets by name: the schemas each one merges.
    #[serde(default)]
    pub facets: IndexMap<String, Vec<String>>,
}

/// A single schema in YAML format.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlSchema {
    /// Field name prefix
    pub prefix: Option<String>,

    /// Namespace URI
    pub uri: Option<String>,

    /// Simple types local to the schema
    pub types: IndexMap<String, YamlSimpleType>,

    /// Fields, in declaration order
    pub fields: IndexMap<String, YamlField>,
}

/// A simple type in YAML format.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlSimpleType {
    /// Supertype name
    pub base: String,

    /// Allowed literals
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<serde_yaml::Value>>,

    /// Minimum string length
    pub min_length: Option<usize>,

    /// Maximum string length
    pub max_length: Option<usize>,

    /// Full-match regular expression
    pub pattern: Option<String>,

    /// Inclusive numeric lower bound
    pub min: Option<f64>,

    /// Inclusive numeric upper bound
    pub max: Option<f64>,

    /// Reject null values
    pub not_null: bool,
}

/// A field in YAML format.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlField {
    /// Field type name (omitted for inline complex fields)
    #[serde(rename = "type")]
    pub type_name: Option<String>,

    /// Inline complex type fields
    pub fields: IndexMap<String, YamlField>,

    /// Field holds a list of `type`
    pub list: bool,

    /// List item name (lists without one are arrays)
    pub item_name: Option<String>,

    /// Default value (a sequence for lists)
    pub default: Option<serde_yaml::Value>,

    /// Field accepts an explicit null
    pub nillable: bool,

    /// Field value is fixed to its default
    pub constant: bool,

    /// Minimum occurrences
    pub min_occurs: Option<i32>,

    /// Maximum occurrences (-1 for unbounded)
    pub max_occurs: Option<i32>,
}

impl YamlField {
    fn flags(&self) -> FieldFlags {
        let mut flags = FieldFlags::empty();
        if self.nillable {
            flags = flags | FieldFlags::NILLABLE;
        }
        if self.constant {
            flags = flags | FieldFlags::CONSTANT;
        }
        flags
    }

    fn default_text(&self) -> Option<String> {
        match self.default.as_ref()? {
            serde_yaml::Value::Sequence(items) => {
                let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
                Some(parts.join(" "))
            }
            other => scalar_text(other),
        }
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Per-schema state while applying a document.
struct SchemaScope<'a> {
    registry: &'a Arc<SchemaRegistry>,
    name: &'a str,
    namespace: Namespace,
    local_types: &'a IndexMap<String, YamlSimpleType>,
    qualified: Vec<TypeRef>,
    /// Types built so far, registered once the whole document is valid.
    pending: Vec<Arc<Type>>,
}

impl SchemaScope<'_> {
    fn resolve(&mut self, type_name: &str) -> Result<TypeRef> {
        if let Some((schema, name)) = type_name.split_once(':') {
            let r = self.registry.type_ref(schema, name);
            self.qualified.push(r.clone());
            return Ok(r);
        }
        if self.local_types.contains_key(type_name)
            || self.registry.lookup_type(self.name, type_name).is_some()
        {
            return Ok(self.registry.type_ref(self.name, type_name));
        }
        if PrimitiveKind::from_name(type_name).is_some() {
            return Ok(self.registry.type_ref(BUILTIN_SCHEMA, type_name));
        }
        Err(Error::Load(format!(
            "schema {}: unknown type {}",
            self.name, type_name
        )))
    }

    fn simple_type(&mut self, name: &str, def: &YamlSimpleType) -> Result<Arc<Type>> {
        let base = self.resolve(&def.base)?;
        let mut constraints: Vec<Arc<dyn Constraint>> = Vec::new();
        if let Some(values) = &def.enumeration {
            constraints.push(Arc::new(EnumConstraint::new(
                values.iter().filter_map(scalar_text),
            )));
        }
        if def.min_length.is_some() || def.max_length.is_some() {
            constraints.push(Arc::new(LengthConstraint::new(
                def.min_length,
                def.max_length,
            )));
        }
        if let Some(pattern) = &def.pattern {
            constraints.push(Arc::new(PatternConstraint::new(pattern)?));
        }
        if def.min.is_some() || def.max.is_some() {
            constraints.push(Arc::new(NumericIntervalConstraint::inclusive(
                def.min, def.max,
            )));
        }
        let flags = if def.not_null {
            TypeFlags::NOTNULL
        } else {
            TypeFlags::empty()
        };
        let info = TypeInfo::new(self.name, name)
            .extending(base)
            .with_flags(flags);
        Ok(Type::simple(info, constraints))
    }

    /// Type of a field at `path` (`/`-joined field names).
    fn field_type(&mut self, path: &str, field: &YamlField) -> Result<TypeRef> {
        let item = if field.fields.is_empty() {
            let type_name = field.type_name.as_deref().ok_or_else(|| {
                Error::Load(format!(
                    "schema {}: field {} has neither type nor fields",
                    self.name, path
                ))
            })?;
            self.resolve(type_name)?
        } else {
            let type_name = format!("{}{}", ANONYMOUS_MARK, path);
            let mut builder =
                ComplexTypeBuilder::new(self.name, &type_name).namespace(self.namespace.clone());
            for (name, sub) in &field.fields {
                builder = self.add_field(builder, &format!("{}/{}", path, name), name, sub)?;
            }
            self.pending.push(builder.build());
            self.registry.type_ref(self.name, &type_name)
        };

        if !field.list {
            return Ok(item);
        }
        let list_name = format!("{}{}{}list", ANONYMOUS_MARK, path, ANONYMOUS_MARK);
        let mut builder = ListTypeBuilder::new(self.name, &list_name, item).occurs(
            field.min_occurs.unwrap_or(0),
            field.max_occurs.unwrap_or(UNBOUNDED),
        );
        if let Some(item_name) = &field.item_name {
            builder = builder.item_name(item_name);
        }
        if let Some(default) = field.default_text() {
            builder = builder.default_value(default);
        }
        self.pending.push(builder.build());
        Ok(self.registry.type_ref(self.name, &list_name))
    }

    fn add_field(
        &mut self,
        builder: ComplexTypeBuilder,
        path: &str,
        name: &str,
        field: &YamlField,
    ) -> Result<ComplexTypeBuilder> {
        let field_type = self.field_type(path, field)?;
        if field.list {
            // Default and bounds live on the list type.
            return Ok(builder.field_with(name, field_type, None, field.flags()));
        }
        Ok(builder
            .field_with(name, field_type, field.default_text(), field.flags())
            .occurs(field.min_occurs.unwrap_or(1), field.max_occurs.unwrap_or(1)))
    }
}

impl YamlSchemaLoader {
    /// Load YAML document from file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<YamlSchemaDocument> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse YAML string.
    pub fn parse_yaml(yaml_content: &str) -> Result<YamlSchemaDocument> {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| Error::Load(format!("Failed to parse YAML: {}", e)))
    }

    /// Register every schema, type and facet of `doc`.
    ///
    /// The whole document is built and checked first: on error nothing is
    /// registered. Qualified `schema:type` references must name a type of
    /// the document or one already in the registry.
    pub fn apply(doc: &YamlSchemaDocument, registry: &Arc<SchemaRegistry>) -> Result<()> {
        let mut qualified = Vec::new();
        let mut pending = Vec::new();
        let mut schemas = Vec::with_capacity(doc.schemas.len());
        for (name, schema) in &doc.schemas {
            if let Some(reserved) = schema.types.keys().find(|t| t.contains(ANONYMOUS_MARK)) {
                return Err(Error::Load(format!(
                    "schema {}: type name {} contains reserved '{}'",
                    name, reserved, ANONYMOUS_MARK
                )));
            }
            let mut scope = SchemaScope {
                registry,
                name,
                namespace: Namespace::new(
                    schema.uri.clone().unwrap_or_default(),
                    schema.prefix.clone().unwrap_or_default(),
                ),
                local_types: &schema.types,
                qualified: Vec::new(),
                pending: Vec::new(),
            };
            for (type_name, def) in &schema.types {
                let ty = scope.simple_type(type_name, def)?;
                scope.pending.push(ty);
            }
            let mut builder = ComplexTypeBuilder::schema(name.as_str())
                .namespace(scope.namespace.clone());
            for (field_name, field) in &schema.fields {
                builder = scope.add_field(builder, field_name, field_name, field)?;
            }
            schemas.push(builder.build());
            qualified.append(&mut scope.qualified);
            pending.append(&mut scope.pending);
            log::debug!(
                "[loader] schema {}: {} types, {} fields",
                name,
                schema.types.len(),
                schema.fields.len()
            );
        }

        for r in &qualified {
            let declared = |ty: &Arc<Type>| {
                r.schema_name() == Some(ty.schema_name()) && r.type_name() == Some(ty.name())
            };
            if !pending.iter().chain(&schemas).any(declared) {
                r.require()?;
            }
        }

        for ty in pending {
            registry.register_type(ty);
        }
        for schema in schemas {
            registry.register_schema(schema)?;
        }

        for (facet, schemas) in &doc.facets {
            let names: Vec<&str> = schemas.iter().map(String::as_str).collect();
            registry.register_facet(facet, &names);
        }
        Ok(())
    }

    /// Load a YAML file and apply it to `registry`.
    pub fn load_into<P: AsRef<Path>>(path: P, registry: &Arc<SchemaRegistry>) -> Result<()> {
        let doc = Self::load_from_file(path)?;
        Self::apply(&doc, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn load(yaml: &str) -> Result<Arc<SchemaRegistry>> {
        let registry = SchemaRegistry::new();
        let doc = YamlSchemaLoader::parse_yaml(yaml)?;
        YamlSchemaLoader::apply(&doc, &registry)?;
        Ok(registry)
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
schemas:
  common:
    fields:
      icon: { type: string }
"#;
        let doc = YamlSchemaLoader::parse_yaml(yaml).expect("valid YAML should parse");
        assert!(doc.schemas.contains_key("common"));
        assert!(doc.facets.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let registry = load("{}").expect("empty document applies");
        assert!(registry.schema_names().is_empty());
    }

    #[test]
    fn test_simple_type_constraints() {
        let yaml = r#"
schemas:
  dublincore:
    prefix: dc
    types:
      shortTitle: { base: string, max_length: 5 }
      code: { base: shortTitle, pattern: "[A-Z]+" }
      level: { base: long, min: 1, max: 3, not_null: true }
      state: { base: string, enum: [draft, final] }
    fields:
      code: { type: code }
"#;
        let registry = load(yaml).expect("loads");
        let code = registry.lookup_type("dublincore", "code").unwrap();
        assert!(code.validate(&"ABC".into()));
        assert!(!code.validate(&"ABCDEF".into()));
        assert!(!code.validate(&"abc".into()));

        let level = registry.lookup_type("dublincore", "level").unwrap();
        assert!(level.validate(&Value::Long(2)));
        assert!(!level.validate(&Value::Long(4)));
        assert!(!level.validate(&Value::Null));

        let state = registry.lookup_type("dublincore", "state").unwrap();
        assert!(state.validate(&"final".into()));
        assert!(!state.validate(&"gone".into()));
    }

    #[test]
    fn test_fields_lists_and_nested() {
        let yaml = r#"
schemas:
  doc:
    prefix: doc
    fields:
      count: { type: long, default: 3, nillable: true }
      tags: { type: string, list: true, default: [a, b] }
      address:
        fields:
          city: { type: string, default: Paris }
"#;
        let registry = load(yaml).expect("loads");
        let schema = registry.schema("doc").unwrap();

        let count = schema.field("count").unwrap();
        assert!(count.is_nillable());
        assert_eq!(count.default_value().unwrap(), Value::Long(3));

        let tags = schema.field("tags").unwrap().field_type().unwrap();
        assert!(tags.as_list().is_some_and(|l| l.is_array()));
        assert_eq!(
            tags.new_instance(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );

        let instance = schema.new_instance();
        let city = instance.get("address").and_then(|a| a.get("city"));
        assert_eq!(city, Some(&Value::from("Paris")));
        assert!(registry.field("doc:address/city").is_some());
    }

    #[test]
    fn test_unknown_type_fails() {
        let yaml = r#"
schemas:
  broken:
    fields:
      x: { type: nosuchtype }
"#;
        assert!(matches!(load(yaml), Err(Error::Load(_))));

        let missing_type = r#"
schemas:
  broken:
    fields:
      x: { default: 1 }
"#;
        assert!(matches!(load(missing_type), Err(Error::Load(_))));
    }

    #[test]
    fn test_qualified_references_resolve_across_schemas() {
        let yaml = r#"
schemas:
  first:
    fields:
      rating: { type: "second:rating" }
  second:
    types:
      rating: { base: integer, min: 0, max: 5 }
facets:
  Rated: [first, second]
"#;
        let registry = load(yaml).expect("forward reference resolves");
        let facet = registry.facet("Rated").unwrap();
        let rating = facet.field("rating").unwrap().field_type().unwrap();
        assert!(rating.validate(&Value::Long(5)));
        assert!(!rating.validate(&Value::Long(6)));

        let dangling = r#"
schemas:
  first:
    fields:
      rating: { type: "nowhere:rating" }
"#;
        assert!(matches!(load(dangling), Err(Error::UnknownType { .. })));
    }

    #[test]
    fn test_failed_document_registers_nothing() {
        let registry = SchemaRegistry::new();
        let builtins = registry.type_count();
        let yaml = r#"
schemas:
  good:
    types:
      code: { base: string, max_length: 3 }
    fields:
      address:
        fields:
          city: { type: string }
      tags: { type: code, list: true }
  bad:
    fields:
      x: { type: nosuchtype }
facets:
  Both: [good, bad]
"#;
        let doc = YamlSchemaLoader::parse_yaml(yaml).unwrap();
        assert!(matches!(
            YamlSchemaLoader::apply(&doc, &registry),
            Err(Error::Load(_))
        ));
        assert_eq!(registry.type_count(), builtins);
        assert!(registry.schema_names().is_empty());
        assert!(registry.facet_names().is_empty());

        let dangling = r#"
schemas:
  good:
    fields:
      rating: { type: "nowhere:rating" }
"#;
        let doc = YamlSchemaLoader::parse_yaml(dangling).unwrap();
        assert!(YamlSchemaLoader::apply(&doc, &registry).is_err());
        assert!(registry.schema("good").is_none());
    }

    #[test]
    fn test_anonymous_types_do_not_shadow_declared_types() {
        let yaml = r#"
schemas:
  doc:
    types:
      addressType: { base: string, max_length: 8 }
      tagsList: { base: string }
    fields:
      label: { type: addressType }
      address:
        fields:
          city: { type: string }
      tags: { type: string, list: true }
"#;
        let registry = load(yaml).expect("loads");
        let declared = registry.lookup_type("doc", "addressType").unwrap();
        assert!(declared.is_simple_type());
        assert!(registry.lookup_type("doc", "tagsList").unwrap().is_simple_type());
        assert!(registry
            .lookup_type("doc", "#address")
            .is_some_and(|t| t.is_complex_type()));
        assert!(registry
            .lookup_type("doc", "#tags#list")
            .is_some_and(|t| t.is_list_type()));

        let reserved = r##"
schemas:
  doc:
    types:
      "#address": { base: string }
"##;
        assert!(matches!(load(reserved), Err(Error::Load(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            YamlSchemaLoader::parse_yaml("schemas: [unclosed"),
            Err(Error::Load(_))
        ));
    }
}
