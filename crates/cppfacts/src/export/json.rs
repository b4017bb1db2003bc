//! JSON format for the fact index.
//!
//! Produces an object with "enums" and "classes" maps keyed by fully
//! qualified name. Each entry carries a `definedIn` path next to the entity
//! fields, so downstream generators can find the header to include.

use crate::error::{FactError, Result};
use crate::index::FactIndex;
use serde_json::{json, Map, Value};

/// Export the whole index as pretty JSON
pub fn export_json(index: &FactIndex) -> Result<String> {
    serde_json::to_string_pretty(index)
        .map_err(|e| FactError::serialization("Failed to serialize fact index", Some(e)))
}

/// Export only entries whose fully qualified name passes `filter`
pub fn export_json_filtered(index: &FactIndex, filter: impl Fn(&str) -> bool) -> Result<String> {
    let mut enums = Map::new();
    for (name, entry) in index.enums() {
        if filter(name) {
            enums.insert(name.clone(), to_value(entry)?);
        }
    }

    let mut classes = Map::new();
    for (name, entry) in index.classes() {
        if filter(name) {
            classes.insert(name.clone(), to_value(entry)?);
        }
    }

    let result = json!({
        "enums": Value::Object(enums),
        "classes": Value::Object(classes),
    });

    serde_json::to_string_pretty(&result)
        .map_err(|e| FactError::serialization("Failed to serialize fact index", Some(e)))
}

/// Parse an index written by [`export_json`]
pub fn import_json(json: &str) -> Result<FactIndex> {
    serde_json::from_str(json)
        .map_err(|e| FactError::serialization("Failed to parse fact index", Some(e)))
}

fn to_value<T: serde::Serialize>(entry: &T) -> Result<Value> {
    serde_json::to_value(entry)
        .map_err(|e| FactError::serialization("Failed to serialize entry", Some(e)))
}
