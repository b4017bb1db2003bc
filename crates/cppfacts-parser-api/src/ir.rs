use cppfacts::{ClassData, EnumData, PublishedEntity};
use std::path::PathBuf;

/// Everything published while parsing one file
///
/// This is the bridge between the event-driven drivers and the fact index.
/// Entities are kept in the order the drivers published them, which is
/// source order of each declaration's closing brace.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FileFacts {
    /// Source file path
    pub file_path: PathBuf,

    /// Published entities in publication order
    pub entities: Vec<PublishedEntity>,

    /// Driver transition problems that were tolerated
    pub violations: Vec<String>,
}

impl FileFacts {
    /// Create new empty facts for a file
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            ..Default::default()
        }
    }

    pub fn push(&mut self, entity: PublishedEntity) {
        self.entities.push(entity);
    }

    /// Enums with their fully qualified names
    pub fn enums(&self) -> impl Iterator<Item = (&str, &EnumData)> {
        self.entities
            .iter()
            .filter_map(|p| p.entity.as_enum().map(|e| (p.qualified_name.as_str(), e)))
    }

    /// Classes and structs with their fully qualified names
    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassData)> {
        self.entities
            .iter()
            .filter_map(|p| p.entity.as_class().map(|c| (p.qualified_name.as_str(), c)))
    }

    pub fn enum_count(&self) -> usize {
        self.enums().count()
    }

    pub fn class_count(&self) -> usize {
        self.classes().count()
    }

    /// Total number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
