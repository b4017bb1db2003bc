//! Mapper for inserting extracted facts into a FactIndex

use cppfacts::{Entity, FactIndex};
use cppfacts_parser_api::{FileFacts, FileInfo};
use std::time::Duration;

/// Insert every published entity into `index`, later entities replacing
/// earlier ones with the same qualified name.
///
/// Timing and size fields of the returned [`FileInfo`] are left at zero
/// for the caller to fill in.
pub fn facts_to_index(facts: &FileFacts, index: &mut FactIndex) -> FileInfo {
    let mut enums = Vec::new();
    let mut classes = Vec::new();

    for published in &facts.entities {
        match published.entity {
            Entity::Enum(_) => enums.push(published.qualified_name.clone()),
            Entity::Class(_) => classes.push(published.qualified_name.clone()),
        }
        index.insert(published.clone(), &facts.file_path);
    }

    FileInfo {
        file_path: facts.file_path.clone(),
        enums,
        classes,
        parse_time: Duration::ZERO,
        line_count: 0,
        byte_count: 0,
    }
}
