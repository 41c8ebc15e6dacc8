// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Complex types: named collections of fields.

use crate::error::{Error, Result};
use crate::types::{Field, FieldFlags, Namespace, QualifiedName, TypeRef};
use crate::value::Value;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name of the blob holder type. Its fresh instances are `Null`, not maps.
pub const CONTENT_TYPE_NAME: &str = "content";

/// State of a complex type.
///
/// Fields are keyed by qualified name and keep declaration order, with the
/// supertype's fields copied in first. Lookups by plain string go through a
/// concurrent cache filled on first use and replaced whenever a field is
/// declared.
#[derive(Debug)]
pub struct ComplexType {
    namespace: Namespace,
    unstructured: Option<bool>,
    unstructured_memo: OnceLock<bool>,
    fields: RwLock<IndexMap<QualifiedName, Arc<Field>>>,
    fields_by_name: ArcSwap<DashMap<String, Arc<Field>>>,
    this: TypeRef,
}

impl ComplexType {
    pub(crate) fn new(
        super_type: &TypeRef,
        namespace: Namespace,
        unstructured: Option<bool>,
        this: TypeRef,
    ) -> Self {
        let inherited = super_type
            .resolve()
            .and_then(|sup| sup.as_complex().map(|c| c.fields.read().clone()))
            .unwrap_or_default();
        Self {
            namespace,
            unstructured,
            unstructured_memo: OnceLock::new(),
            fields: RwLock::new(inherited),
            fields_by_name: ArcSwap::from_pointee(DashMap::new()),
            this,
        }
    }

    /// Namespace of the declared field names.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Declare a field occurring exactly once.
    ///
    /// An unprefixed `name` is qualified with the namespace prefix.
    /// Redeclaring a name replaces the previous field in place.
    pub fn add_field(
        &self,
        name: &str,
        field_type: TypeRef,
        default_value: Option<String>,
        flags: FieldFlags,
    ) -> Arc<Field> {
        self.add_field_with_occurs(name, field_type, default_value, flags, 1, 1)
    }

    /// Declare a field with explicit occurrence bounds.
    pub fn add_field_with_occurs(
        &self,
        name: &str,
        field_type: TypeRef,
        default_value: Option<String>,
        flags: FieldFlags,
        min_occurs: i32,
        max_occurs: i32,
    ) -> Arc<Field> {
        let qname = QualifiedName::parse(name, &self.namespace.prefix);
        let field = Arc::new(
            Field::new(
                qname.clone(),
                field_type,
                self.this.clone(),
                default_value,
                flags,
            )
            .with_occurs(min_occurs, max_occurs),
        );
        if self.unstructured_memo.get().is_some() {
            log::warn!(
                "[complex] field {} added after unstructured flag was frozen",
                qname
            );
        }
        self.fields.write().insert(qname, field.clone());
        self.fields_by_name.store(Arc::new(DashMap::new()));
        field
    }

    /// Look up a field by local or prefixed name.
    pub fn field(&self, name: &str) -> Option<Arc<Field>> {
        // Loaded before `fields`: a lookup racing `add_field` fills a
        // cache that has already been replaced.
        let cache = self.fields_by_name.load_full();
        if let Some(cached) = cache.get(name) {
            return Some(cached.value().clone());
        }
        let qname = QualifiedName::parse(name, &self.namespace.prefix);
        let field = {
            let fields = self.fields.read();
            match fields.get(&qname) {
                Some(field) => field.clone(),
                // Inherited fields keep the prefix of their declaring schema.
                None if !name.contains(':') => fields
                    .values()
                    .find(|f| f.local_name() == name)
                    .cloned()?,
                None => return None,
            }
        };
        cache.insert(name.to_string(), field.clone());
        Some(field)
    }

    /// Check if a field is declared under `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// All fields, in declaration order.
    pub fn fields(&self) -> Vec<Arc<Field>> {
        self.fields.read().values().cloned().collect()
    }

    /// Qualified names of all fields, in declaration order.
    pub fn field_names(&self) -> Vec<QualifiedName> {
        self.fields.read().keys().cloned().collect()
    }

    /// Check if at least one field is declared.
    pub fn has_fields(&self) -> bool {
        !self.fields.read().is_empty()
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }

    /// Check if instances accept arbitrary content.
    ///
    /// Without an explicit setting, a type is unstructured when it declares
    /// no fields. The answer is frozen on first call.
    pub fn is_unstructured(&self) -> bool {
        *self
            .unstructured_memo
            .get_or_init(|| self.unstructured.unwrap_or_else(|| !self.has_fields()))
    }

    pub(crate) fn new_instance(&self) -> Value {
        instantiate(self.fields.read().values())
    }

    pub(crate) fn convert(&self, value: Value) -> Result<Value> {
        convert_map(value, |name| self.field(name))
    }
}

/// Build a map holding the default of every field.
pub(crate) fn instantiate<'a>(fields: impl IntoIterator<Item = &'a Arc<Field>>) -> Value {
    let mut map = HashMap::new();
    for field in fields {
        let value = match field.field_type() {
            Some(ty) if ty.is_list_type() => Value::List(Vec::new()),
            Some(ty) if !ty.is_simple_type() => ty.new_instance(),
            _ => field.default_value().unwrap_or_else(|e| {
                log::warn!(
                    "[complex] default value of {} ignored: {}",
                    field.name(),
                    e
                );
                Value::Null
            }),
        };
        map.insert(field.local_name().to_string(), value);
    }
    Value::Map(map)
}

/// Convert every entry of a map through the type of the matching field.
/// A field whose type cannot be resolved keeps its value unchanged.
pub(crate) fn convert_map<F>(value: Value, lookup: F) -> Result<Value>
where
    F: Fn(&str) -> Option<Arc<Field>>,
{
    match value {
        Value::Null => Ok(Value::Null),
        Value::Map(entries) => {
            let mut converted = HashMap::with_capacity(entries.len());
            for (key, entry) in entries {
                let field = lookup(&key)
                    .ok_or_else(|| Error::TypeMismatch(format!("no field named {}", key)))?;
                let entry = match field.field_type() {
                    Some(ty) => ty.convert(entry)?,
                    None => entry,
                };
                converted.insert(key, entry);
            }
            Ok(Value::Map(converted))
        }
        other => Err(Error::TypeMismatch(format!(
            "expected map, got {}",
            other.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{FieldFlags, Namespace, PrimitiveKind, Type, TypeInfo, TypeRef};
    use crate::value::Value;
    use std::sync::Arc;

    fn dublincore() -> (Arc<Type>, Arc<Type>) {
        let string = Type::primitive(PrimitiveKind::String);
        let schema = Type::schema("dublincore", Namespace::new("http://dc", "dc"));
        let complex = schema.as_complex().expect("complex");
        complex.add_field(
            "title",
            TypeRef::direct(&string),
            Some("Untitled".into()),
            FieldFlags::empty(),
        );
        complex.add_field("description", TypeRef::direct(&string), None, FieldFlags::empty());
        (schema, string)
    }

    #[test]
    fn test_field_lookup_by_local_and_prefixed_name() {
        let (schema, _) = dublincore();
        let complex = schema.as_complex().unwrap();

        let by_local = complex.field("title").expect("local name");
        let by_prefixed = complex.field("dc:title").expect("prefixed name");
        assert!(Arc::ptr_eq(&by_local, &by_prefixed));
        assert_eq!(by_local.name().prefixed_name(), "dc:title");
        assert!(complex.field("other:title").is_none());
    }

    #[test]
    fn test_declaring_type_is_owner() {
        let (schema, _) = dublincore();
        let field = schema.field("title").unwrap();
        let owner = field.declaring_type().expect("owner alive");
        assert!(Arc::ptr_eq(&owner, &schema));
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let (schema, _) = dublincore();
        let names: Vec<String> = schema
            .as_complex()
            .unwrap()
            .field_names()
            .iter()
            .map(|q| q.local_name().to_string())
            .collect();
        assert_eq!(names, ["title", "description"]);
    }

    #[test]
    fn test_redeclared_field_replaces_cached_lookup() {
        let (schema, string) = dublincore();
        let complex = schema.as_complex().unwrap();
        assert!(complex.field("title").is_some());

        complex.add_field("title", TypeRef::direct(&string), None, FieldFlags::NILLABLE);
        assert_eq!(complex.field_count(), 2);
        assert!(complex.field("title").unwrap().is_nillable());
    }

    #[test]
    fn test_late_cache_fill_does_not_outlive_redeclaration() {
        let (schema, string) = dublincore();
        let complex = schema.as_complex().unwrap();
        let raced_cache = complex.fields_by_name.load_full();
        let old_title = complex.field("title").unwrap();

        let new_title =
            complex.add_field("title", TypeRef::direct(&string), None, FieldFlags::CONSTANT);
        raced_cache.insert("title".to_string(), old_title);
        assert!(Arc::ptr_eq(&complex.field("title").unwrap(), &new_title));
    }

    #[test]
    fn test_unstructured_derived_from_fields() {
        let empty = Type::complex(TypeInfo::new("s", "empty"), Namespace::none());
        assert!(empty.as_complex().unwrap().is_unstructured());

        let (schema, _) = dublincore();
        assert!(!schema.as_complex().unwrap().is_unstructured());

        let explicit =
            Type::complex_with(TypeInfo::new("s", "open"), Namespace::none(), Some(false));
        assert!(!explicit.as_complex().unwrap().is_unstructured());
    }

    #[test]
    fn test_new_instance_and_convert() {
        let (schema, _) = dublincore();
        let instance = schema.new_instance();
        assert_eq!(instance.get("title"), Some(&Value::from("Untitled")));
        assert_eq!(instance.get("description"), Some(&Value::Null));

        let mut input = Value::Map(Default::default());
        input.set("title", Value::Long(3));
        let converted = schema.convert(input).unwrap();
        assert_eq!(converted.get("title"), Some(&Value::from("3")));

        assert!(schema.convert(Value::Long(1)).is_err());

        let mut unknown = Value::Map(Default::default());
        unknown.set("nope", Value::Long(1));
        assert!(matches!(
            schema.convert(unknown),
            Err(crate::Error::TypeMismatch(_))
        ));
    }
}
