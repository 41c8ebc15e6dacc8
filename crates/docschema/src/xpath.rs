// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Document property paths.
//!
//! A path addresses a property inside a document: `dc:title`,
//! `files/3/file`, `files/*/file`. Two forms exist for list elements,
//! `name[3]` and `3`; the canonical form only uses the second one and has
//! no leading slash.

use crate::types::{Field, Type, TypeKind};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Segment that addresses every element of a list.
pub const WILDCARD: &str = "*";

fn indexed_segment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^/\[\]]+\[(\d+|\*)\]").expect("valid literal pattern"))
}

/// Canonical form of a property path.
///
/// Strips one leading `/` and rewrites every `name[i]` segment to `i`
/// (`name[*]` to `*`).
///
/// ```
/// use docschema::canonical_xpath;
///
/// assert_eq!(canonical_xpath("/files/file[2]/name"), "files/2/name");
/// assert_eq!(canonical_xpath("dc:subjects[*]"), "*");
/// ```
pub fn canonical_xpath(xpath: &str) -> String {
    let stripped = xpath.strip_prefix('/').unwrap_or(xpath);
    indexed_segment().replace_all(stripped, "$1").into_owned()
}

/// Check if a segment addresses list elements (an index or `*`).
pub fn is_list_index(segment: &str) -> bool {
    segment == WILDCARD || segment.parse::<i64>().is_ok()
}

/// Resolve the field addressed by `xpath` from a root complex or
/// composite type.
///
/// List elements are addressed by index or `*`. A path ending on an
/// element resolves to the list's item field.
pub fn resolve_field(root: &Type, xpath: &str) -> Option<Arc<Field>> {
    let canonical = canonical_xpath(xpath);
    let mut segments = canonical.split('/');
    let first = root.field(segments.next()?)?;
    resolve_path(first, &segments.collect::<Vec<_>>())
}

/// Walk `segments` down from an already resolved field.
pub(crate) fn resolve_path(mut field: Arc<Field>, segments: &[&str]) -> Option<Arc<Field>> {
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        field = sub_field(&field, segment, last)?;
    }
    Some(field)
}

fn sub_field(parent: &Arc<Field>, segment: &str, last: bool) -> Option<Arc<Field>> {
    let ty = parent.field_type()?;
    match ty.kind() {
        TypeKind::List(list) if is_list_index(segment) => {
            if last {
                Some(list.item_field().clone())
            } else {
                // The element itself: the next segment names one of its fields.
                Some(parent.clone())
            }
        }
        TypeKind::List(list) => {
            let item = list.item_type()?;
            if item.is_complex_type() {
                item.field(segment)
            } else if list.item_field().local_name() == segment {
                Some(list.item_field().clone())
            } else {
                None
            }
        }
        TypeKind::Complex(_) | TypeKind::Composite(_) => ty.field(segment),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ComplexTypeBuilder, ListTypeBuilder, Namespace, PrimitiveKind, TypeRef,
    };

    #[test]
    fn test_canonical_xpath() {
        assert_eq!(canonical_xpath("dc:title"), "dc:title");
        assert_eq!(canonical_xpath("/dc:title"), "dc:title");
        assert_eq!(canonical_xpath("files/file[3]/name"), "files/3/name");
        assert_eq!(canonical_xpath("files/file[*]/name"), "files/*/name");
        assert_eq!(canonical_xpath("a[1]/b[2]"), "1/2");
        // Only one leading slash is stripped.
        assert_eq!(canonical_xpath("//x"), "/x");
        assert_eq!(canonical_xpath("files/0/name"), "files/0/name");
    }

    #[test]
    fn test_list_index() {
        assert!(is_list_index("*"));
        assert!(is_list_index("12"));
        assert!(!is_list_index("file"));
    }

    fn files_schema() -> Arc<Type> {
        let string = Type::primitive(PrimitiveKind::String);
        let long = Type::primitive(PrimitiveKind::Long);
        let file = ComplexTypeBuilder::new("files", "file")
            .field("name", &string)
            .field("length", &long)
            .build();
        let files = ListTypeBuilder::new("files", "files", TypeRef::direct(&file))
            .item_name("file")
            .build();
        let tags = ListTypeBuilder::new("files", "tags", TypeRef::direct(&string)).build();
        ComplexTypeBuilder::schema("files")
            .namespace(Namespace::new("", "files"))
            .field("files", &files)
            .field("tags", &tags)
            .build()
    }

    #[test]
    fn test_resolve_through_complex_list() {
        let schema = files_schema();

        let name = resolve_field(&schema, "files/3/name").expect("indexed");
        assert_eq!(name.local_name(), "name");
        let name = resolve_field(&schema, "files:files/*/name").expect("wildcard");
        assert_eq!(name.local_name(), "name");
        let name = resolve_field(&schema, "/files/file[0]/name").expect("bracketed");
        assert_eq!(name.local_name(), "name");
        // Item names are optional between the list and the item fields.
        assert!(resolve_field(&schema, "files/length").is_some());

        let item = resolve_field(&schema, "files/0").expect("element");
        assert_eq!(item.local_name(), "file");
        assert!(resolve_field(&schema, "files/0/missing").is_none());
    }

    #[test]
    fn test_resolve_through_scalar_list() {
        let schema = files_schema();
        let item = resolve_field(&schema, "tags/*").expect("element");
        assert_eq!(item.local_name(), "item");
        assert!(resolve_field(&schema, "tags/item").is_some());
        assert!(resolve_field(&schema, "tags/0/x").is_none());
        assert!(resolve_field(&schema, "tags").is_some());
        assert!(resolve_field(&schema, "unknown/0").is_none());
    }
}
