// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite types: merged views over several schemas.
//!
//! A composite type (a document type or a facet) holds an ordered list of
//! schema references. Its field indexes are derived from them lazily:
//!
//! ```text
//! add_schema()/invalidate()      reader (field, fields, ...)
//!        |                               |
//!   requested += 1            wanted = requested
//!                             snapshot covers wanted? --yes--> load
//!                                    |no
//!                              lock recompute
//!                              covered meanwhile? --yes--> unlock, load
//!                                    |no
//!                              rebuild, store snapshot
//! ```
//!
//! Every rebuild is published as one immutable [`MergedSchemas`] snapshot,
//! so a reader sees the fields of one consistent schema list, never a
//! half-built index. A read that starts after `add_schema` returns waits
//! for a snapshot covering that schema, even when another reader is
//! already rebuilding.

use crate::error::{Error, Result};
use crate::types::complex::{convert_map, instantiate};
use crate::types::{Field, Type, TypeRef};
use crate::value::Value;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One published generation of a composite type's merged indexes.
#[derive(Debug)]
pub struct MergedSchemas {
    generation: u64,
    revision: u64,
    schemas: Vec<Arc<Type>>,
    prefix_to_schema: HashMap<String, Arc<Type>>,
    fields_by_name: HashMap<String, Arc<Field>>,
    fields: Arc<[Arc<Field>]>,
}

impl MergedSchemas {
    fn empty() -> Self {
        Self {
            generation: 0,
            revision: 0,
            schemas: Vec::new(),
            prefix_to_schema: HashMap::new(),
            fields_by_name: HashMap::new(),
            fields: Arc::from(Vec::new()),
        }
    }

    /// Rebuild counter (0 before the first rebuild).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolved schemas, in registration order.
    pub fn schemas(&self) -> &[Arc<Type>] {
        &self.schemas
    }

    /// Schema declaring `prefix`.
    pub fn schema_by_prefix(&self, prefix: &str) -> Option<&Arc<Type>> {
        self.prefix_to_schema.get(prefix)
    }

    /// Field visible under a local or prefixed name.
    pub fn field(&self, name: &str) -> Option<&Arc<Field>> {
        self.fields_by_name.get(name)
    }

    /// Fields of all schemas, in schema then declaration order.
    pub fn fields(&self) -> &Arc<[Arc<Field>]> {
        &self.fields
    }
}

#[derive(Debug, Default)]
struct Registered {
    refs: IndexMap<String, TypeRef>,
}

/// State of a composite type.
#[derive(Debug)]
pub struct CompositeType {
    registered: RwLock<Registered>,
    /// Bumped after every change; snapshots record the value they cover.
    requested: AtomicU64,
    recompute_lock: Mutex<()>,
    merged: ArcSwap<MergedSchemas>,
}

impl CompositeType {
    pub(crate) fn new() -> Self {
        Self {
            registered: RwLock::new(Registered::default()),
            requested: AtomicU64::new(1),
            recompute_lock: Mutex::new(()),
            merged: ArcSwap::from_pointee(MergedSchemas::empty()),
        }
    }

    /// Register a schema.
    ///
    /// On a name conflict between schemas, the field of the schema
    /// registered last wins. Re-adding a schema name replaces its
    /// reference but keeps its position.
    pub fn add_schema(&self, schema: TypeRef) {
        let Some(name) = schema.type_name().map(str::to_string) else {
            log::warn!("[composite] null schema reference ignored");
            return;
        };
        self.registered.write().refs.insert(name, schema);
        self.requested.fetch_add(1, Ordering::AcqRel);
    }

    /// Force a rebuild of the merged indexes on next access.
    ///
    /// Call when a registered schema was redefined under the same name.
    pub fn invalidate(&self) {
        self.requested.fetch_add(1, Ordering::AcqRel);
    }

    /// Check if a schema name is registered. Does not resolve anything.
    pub fn has_schema(&self, name: &str) -> bool {
        self.registered.read().refs.contains_key(name)
    }

    /// Registered schema names, in registration order.
    pub fn schema_names(&self) -> Vec<String> {
        self.registered.read().refs.keys().cloned().collect()
    }

    /// Resolve a registered schema by name.
    pub fn schema(&self, name: &str) -> Option<Arc<Type>> {
        let schema = self.registered.read().refs.get(name)?.clone();
        schema.resolve()
    }

    /// Resolved schemas, in registration order. Unresolvable ones are
    /// skipped.
    pub fn schemas(&self) -> Vec<Arc<Type>> {
        self.snapshot().schemas.clone()
    }

    /// Schema declaring `prefix`.
    pub fn schema_by_prefix(&self, prefix: &str) -> Option<Arc<Type>> {
        self.snapshot().prefix_to_schema.get(prefix).cloned()
    }

    /// Field visible under a local or prefixed name.
    pub fn field(&self, name: &str) -> Option<Arc<Field>> {
        self.snapshot().fields_by_name.get(name).cloned()
    }

    /// Check if a field is visible under `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.snapshot().fields_by_name.contains_key(name)
    }

    /// Fields of all schemas.
    pub fn fields(&self) -> Arc<[Arc<Field>]> {
        self.snapshot().fields.clone()
    }

    /// Check if any registered schema has fields.
    pub fn has_fields(&self) -> bool {
        !self.snapshot().fields.is_empty()
    }

    /// Current merged indexes, rebuilt first if stale.
    pub fn snapshot(&self) -> Arc<MergedSchemas> {
        self.ensure_current();
        self.merged.load_full()
    }

    pub(crate) fn add_field(&self, name: &str) -> Result<Arc<Field>> {
        Err(Error::Unsupported(format!(
            "cannot add field {}: composite types are compositions, not field containers",
            name
        )))
    }

    pub(crate) fn new_instance(&self) -> Value {
        instantiate(self.snapshot().fields.iter())
    }

    pub(crate) fn convert(&self, value: Value) -> Result<Value> {
        let merged = self.snapshot();
        convert_map(value, |name| merged.fields_by_name.get(name).cloned())
    }

    fn ensure_current(&self) {
        let wanted = self.requested.load(Ordering::Acquire);
        if self.merged.load().revision >= wanted {
            return;
        }
        let _guard = self.recompute_lock.lock();
        if self.merged.load().revision >= wanted {
            return;
        }
        // Loaded before the schema list: every change counted here is
        // already visible in `registered`.
        let revision = self.requested.load(Ordering::Acquire);
        self.recompute(revision);
    }

    fn recompute(&self, revision: u64) {
        let refs: Vec<(String, TypeRef)> = self
            .registered
            .read()
            .refs
            .iter()
            .map(|(name, r)| (name.clone(), r.clone()))
            .collect();

        let mut schemas = Vec::with_capacity(refs.len());
        let mut prefix_to_schema = HashMap::new();
        let mut fields_by_name = HashMap::new();
        let mut fields = Vec::new();

        for (name, schema_ref) in refs {
            let Some(schema) = schema_ref.resolve() else {
                log::warn!("[composite] schema {} cannot be resolved, skipped", name);
                continue;
            };
            if let Some(complex) = schema.as_complex() {
                if complex.namespace().has_prefix() {
                    prefix_to_schema.insert(complex.namespace().prefix.clone(), schema.clone());
                }
            }
            for field in schema.fields() {
                fields_by_name.insert(field.local_name().to_string(), field.clone());
                fields_by_name.insert(field.name().prefixed_name(), field.clone());
                fields.push(field);
            }
            schemas.push(schema);
        }

        let generation = self.merged.load().generation + 1;
        log::debug!(
            "[composite] merged {} schemas, {} fields (generation {})",
            schemas.len(),
            fields.len(),
            generation
        );
        self.merged.store(Arc::new(MergedSchemas {
            generation,
            revision,
            schemas,
            prefix_to_schema,
            fields_by_name,
            fields: fields.into(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::types::{FieldFlags, Namespace, PrimitiveKind, Type, TypeInfo, TypeRef};
    use std::sync::Arc;

    fn schema_with(name: &str, prefix: &str, fields: &[&str]) -> Arc<Type> {
        let string = Type::primitive(PrimitiveKind::String);
        let schema = Type::schema(name, Namespace::new("", prefix));
        for field in fields {
            schema
                .add_field(field, TypeRef::direct(&string), None, FieldFlags::empty())
                .expect("complex schema");
        }
        schema
    }

    #[test]
    fn test_merges_fields_of_all_schemas() {
        let dc = schema_with("dublincore", "dc", &["title", "creator"]);
        let file = schema_with("file", "file", &["content"]);
        let doc = Type::composite(
            TypeInfo::new("doctypes", "File"),
            vec![TypeRef::direct(&dc), TypeRef::direct(&file)],
        );
        let composite = doc.as_composite().unwrap();

        assert_eq!(composite.fields().len(), 3);
        assert!(composite.has_field("dc:title"));
        assert!(composite.has_field("content"));
        assert_eq!(composite.schema_names(), ["dublincore", "file"]);
        let by_prefix = composite.schema_by_prefix("file").expect("prefix known");
        assert!(Arc::ptr_eq(&by_prefix, &file));
        assert!(!doc.is_complex_type());
    }

    #[test]
    fn test_last_registered_schema_wins_conflicts() {
        let first = schema_with("first", "a", &["title"]);
        let second = schema_with("second", "b", &["title"]);
        let doc = Type::composite(
            TypeInfo::new("doctypes", "Note"),
            vec![TypeRef::direct(&first), TypeRef::direct(&second)],
        );

        let title = doc.field("title").unwrap();
        assert_eq!(title.name().prefix(), "b");
        // Prefixed names stay unambiguous.
        assert_eq!(doc.field("a:title").unwrap().name().prefix(), "a");
    }

    #[test]
    fn test_add_schema_triggers_one_rebuild() {
        let doc = Type::composite(TypeInfo::new("doctypes", "Folder"), vec![]);
        let composite = doc.as_composite().unwrap();
        assert!(!composite.has_fields());
        let before = composite.snapshot().generation();

        composite.add_schema(TypeRef::direct(&schema_with("common", "", &["icon"])));
        assert!(composite.has_field("icon"));
        assert_eq!(composite.snapshot().generation(), before + 1);
        // No change, no rebuild.
        assert_eq!(composite.snapshot().generation(), before + 1);
    }

    #[test]
    fn test_null_schema_ref_is_ignored() {
        let dc = schema_with("dublincore", "dc", &["title"]);
        let doc = Type::composite(
            TypeInfo::new("doctypes", "File"),
            vec![TypeRef::direct(&dc), TypeRef::null()],
        );
        let composite = doc.as_composite().unwrap();
        assert_eq!(composite.schemas().len(), 1);
        assert!(composite.has_field("title"));
    }

    #[test]
    fn test_add_field_is_unsupported() {
        let doc = Type::composite(TypeInfo::new("doctypes", "File"), vec![]);
        let string = Type::primitive(PrimitiveKind::String);
        let err = doc
            .add_field("x", TypeRef::direct(&string), None, FieldFlags::empty())
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_validate_is_always_true() {
        let doc = Type::composite(TypeInfo::new("doctypes", "File"), vec![]);
        assert!(doc.validate(&crate::Value::Null));
        assert!(doc.validate(&crate::Value::Long(1)));
    }
}
