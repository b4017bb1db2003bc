//! Tests for the fact index through the public API
//!
//! Tests cover:
//! - Indexing published entities from several headers
//! - JSON persistence through a temporary directory
//! - Generators reading straight from the index

use cppfacts::{
    codegen, export, ClassData, EnumData, FactError, FactIndex, MemberData, PublishedEntity,
    Visibility,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn published() -> Vec<(PublishedEntity, &'static str)> {
    vec![
        (
            PublishedEntity::from_enum(
                "foo::bar::Color",
                EnumData::new("Color")
                    .with_namespaces(vec!["foo".into(), "bar".into()])
                    .class_enum()
                    .with_identifiers(["red", "green", "blue"]),
            ),
            "colors.h",
        ),
        (
            PublishedEntity::from_enum(
                "Animals",
                EnumData::new("Animals").with_identifiers(["dog", "cat"]),
            ),
            "animals.h",
        ),
        (
            PublishedEntity::from_class(
                "geo::Address",
                ClassData::new("Address")
                    .with_namespaces(vec!["geo".into()])
                    .serializable()
                    .with_members(vec![
                        MemberData::new("std::string", "city")
                            .with_visibility(Visibility::Private)
                            .serializable()
                            .with_getter(),
                        MemberData::new("int", "zip").with_visibility(Visibility::Private),
                    ]),
            ),
            "address.h",
        ),
    ]
}

fn build_index() -> FactIndex {
    let mut index = FactIndex::new();
    for (entity, file) in published() {
        index.insert(entity, Path::new(file));
    }
    index
}

#[test]
fn test_index_counts_by_kind() {
    let index = build_index();
    assert_eq!(index.enum_count(), 2);
    assert_eq!(index.class_count(), 1);
    assert_eq!(index.len(), 3);
    assert!(!index.is_empty());
}

#[test]
fn test_enums_iterate_in_name_order() {
    let index = build_index();
    let names: Vec<_> = index.enums().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Animals", "foo::bar::Color"]);
}

#[test]
fn test_lookup_reports_defining_header() {
    let index = build_index();
    let address = index.get_class("geo::Address").unwrap();
    assert_eq!(address.defined_in, PathBuf::from("address.h"));
    assert_eq!(address.data.full_class_name(), "geo::Address");

    match index.get_enum("geo::Address") {
        Err(FactError::EntityNotFound { name }) => assert_eq!(name, "geo::Address"),
        other => panic!("expected EntityNotFound, got {other:?}"),
    }
}

#[test]
fn test_save_and_load_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("facts.json");

    let index = build_index();
    index.save_json(&path).unwrap();
    let loaded = FactIndex::load_json(&path).unwrap();

    assert_eq!(loaded, index);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = FactIndex::load_json(&temp_dir.path().join("missing.json"));
    assert!(matches!(result, Err(FactError::Io { .. })));
}

#[test]
fn test_exported_json_is_keyed_by_qualified_name() {
    let json = export::export_json(&build_index()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let color = &value["enums"]["foo::bar::Color"];
    assert_eq!(color["namespaces"], serde_json::json!(["foo", "bar"]));
    assert_eq!(color["identifiers"][2], "blue");
    assert_eq!(value["classes"]["geo::Address"]["members"][0]["type"], "std::string");
}

#[test]
fn test_codegen_from_index() {
    let index = build_index();

    let enums: Vec<_> = index
        .enums()
        .map(|(name, e)| (name.as_str(), &e.data))
        .collect();
    let source = codegen::generate_source(enums.iter().copied(), "enums_gen.h");
    assert!(source.contains("case foo::bar::Color::green:"));
    assert!(source.contains("case cat:"));

    let (_, address) = index.class_by_short_name("Address").unwrap();
    assert_eq!(
        codegen::getter_lines(&address.data),
        vec!["std::string getcity() const { return city; }"]
    );
    assert_eq!(codegen::save_lines(&address.data).len(), 5);
}
