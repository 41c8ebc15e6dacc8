// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end: YAML schema files applied to a registry.

use docschema::loader::YamlSchemaLoader;
use docschema::{Error, SchemaRegistry, Value};
use std::fs;

const SCHEMAS: &str = r#"
schemas:
  dublincore:
    prefix: dc
    uri: http://purl.org/dc/elements/1.1/
    types:
      shortTitle: { base: string, max_length: 12 }
    fields:
      title: { type: shortTitle, default: Untitled }
      subjects: { type: string, list: true, item_name: subject }
      created: { type: long, nillable: true }

  files:
    prefix: files
    fields:
      files:
        list: true
        item_name: file
        fields:
          name: { type: string }
          length: { type: long, default: 0 }

  common:
    fields:
      icon: { type: string, default: icon.png }
      size: { type: "dublincore:shortTitle" }

facets:
  File: [dublincore, files, common]
  Titled: [dublincore]
"#;

#[test]
fn test_load_file_into_registry() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("schemas.yaml");
    fs::write(&path, SCHEMAS).expect("write schemas");

    let registry = SchemaRegistry::new();
    YamlSchemaLoader::load_into(&path, &registry).expect("schemas load");

    assert_eq!(registry.schema_names(), ["common", "dublincore", "files"]);
    assert_eq!(registry.facet_names(), ["File", "Titled"]);

    let file = registry.facet("File").expect("facet");
    assert!(file.is_composite_type());
    assert!(file.has_field("dc:title"));
    assert!(file.has_field("files:files"));
    assert!(file.has_field("icon"));

    let instance = file.new_instance();
    assert_eq!(instance.get("title"), Some(&Value::from("Untitled")));
    assert_eq!(instance.get("icon"), Some(&Value::from("icon.png")));
    assert_eq!(instance.get("files"), Some(&Value::List(vec![])));
    assert_eq!(instance.get("created"), Some(&Value::Null));
}

#[test]
fn test_paths_through_loaded_lists() {
    let registry = SchemaRegistry::new();
    let doc = YamlSchemaLoader::parse_yaml(SCHEMAS).expect("valid YAML");
    YamlSchemaLoader::apply(&doc, &registry).expect("schemas load");

    let name = registry.field("files:files/*/name").expect("item field");
    assert_eq!(name.local_name(), "name");
    let length = registry.field("/files:files/file[1]/length").expect("bracketed path");
    assert_eq!(length.default_value().unwrap(), Value::Long(0));

    let subject = registry.field("dc:subjects/0").expect("scalar item");
    assert_eq!(subject.local_name(), "subject");
    let subjects = registry.field("dc:subjects").unwrap().field_type().unwrap();
    assert!(subjects.as_list().is_some_and(|l| l.is_scalar_list() && !l.is_array()));
}

#[test]
fn test_constraints_from_yaml() {
    let registry = SchemaRegistry::new();
    let doc = YamlSchemaLoader::parse_yaml(SCHEMAS).expect("valid YAML");
    YamlSchemaLoader::apply(&doc, &registry).expect("schemas load");

    let title = registry.field("dc:title").unwrap().field_type().unwrap();
    assert!(title.validate(&"short".into()));
    assert!(!title.validate(&"much too long a title".into()));
    assert!(title.primitive_type().is_some_and(|p| p.name() == "string"));

    // Without a prefix, the schema name selects the schema.
    let size = registry.field("common:size").expect("by schema name");
    // Cross-schema reference resolved lazily.
    assert_eq!(size.field_type().unwrap().name(), "shortTitle");
}

#[test]
fn test_reload_redefines_schema() {
    let registry = SchemaRegistry::new();
    let doc = YamlSchemaLoader::parse_yaml(SCHEMAS).expect("valid YAML");
    YamlSchemaLoader::apply(&doc, &registry).expect("schemas load");
    let titled = registry.facet("Titled").unwrap();
    assert!(titled.has_field("title"));

    let update = YamlSchemaLoader::parse_yaml(
        r#"
schemas:
  dublincore:
    prefix: dc
    fields:
      description: { type: string }
"#,
    )
    .expect("valid YAML");
    YamlSchemaLoader::apply(&update, &registry).expect("update loads");

    assert!(!titled.has_field("title"));
    assert!(titled.has_field("dc:description"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = YamlSchemaLoader::load_from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}
