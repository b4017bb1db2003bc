//! In-memory store of published entities keyed by fully qualified name.

use crate::error::{FactError, Result};
use crate::model::{short_name, ClassData, Entity, EnumData, PublishedEntity};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An entity plus the header it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indexed<T> {
    /// Header the declaration was parsed from
    pub defined_in: PathBuf,

    #[serde(flatten)]
    pub data: T,
}

impl<T> Indexed<T> {
    pub fn new(data: T, defined_in: impl Into<PathBuf>) -> Self {
        Self {
            defined_in: defined_in.into(),
            data,
        }
    }
}

/// Index of every enum and class seen across a set of headers.
///
/// Keys are fully qualified names (`ns::inner::Name`). Re-inserting a key
/// replaces the previous entry, so the last header parsed wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactIndex {
    enums: BTreeMap<String, Indexed<EnumData>>,
    classes: BTreeMap<String, Indexed<ClassData>>,
}

impl FactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a published entity. Returns `true` if an entry was replaced.
    pub fn insert(&mut self, published: PublishedEntity, defined_in: &Path) -> bool {
        let PublishedEntity {
            qualified_name,
            entity,
        } = published;
        match entity {
            Entity::Enum(data) => self.insert_enum(qualified_name, data, defined_in).is_some(),
            Entity::Class(data) => self.insert_class(qualified_name, data, defined_in).is_some(),
        }
    }

    /// Insert an enum, returning the entry it replaced
    pub fn insert_enum(
        &mut self,
        qualified_name: impl Into<String>,
        data: EnumData,
        defined_in: &Path,
    ) -> Option<Indexed<EnumData>> {
        let qualified_name = qualified_name.into();
        debug!("Adding enum {qualified_name}");
        let previous = self
            .enums
            .insert(qualified_name.clone(), Indexed::new(data, defined_in));
        if let Some(ref prev) = previous {
            warn!(
                "Enum {qualified_name} from {} replaces the one from {}",
                defined_in.display(),
                prev.defined_in.display()
            );
        }
        previous
    }

    /// Insert a class, returning the entry it replaced
    pub fn insert_class(
        &mut self,
        qualified_name: impl Into<String>,
        data: ClassData,
        defined_in: &Path,
    ) -> Option<Indexed<ClassData>> {
        let qualified_name = qualified_name.into();
        debug!("Adding class {qualified_name}");
        let previous = self
            .classes
            .insert(qualified_name.clone(), Indexed::new(data, defined_in));
        if let Some(ref prev) = previous {
            warn!(
                "Class {qualified_name} from {} replaces the one from {}",
                defined_in.display(),
                prev.defined_in.display()
            );
        }
        previous
    }

    /// Look up an enum by fully qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::EntityNotFound`] if no enum has that name.
    pub fn get_enum(&self, qualified_name: &str) -> Result<&Indexed<EnumData>> {
        self.enums
            .get(qualified_name)
            .ok_or_else(|| FactError::EntityNotFound {
                name: qualified_name.to_string(),
            })
    }

    /// Look up a class by fully qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`FactError::EntityNotFound`] if no class has that name.
    pub fn get_class(&self, qualified_name: &str) -> Result<&Indexed<ClassData>> {
        self.classes
            .get(qualified_name)
            .ok_or_else(|| FactError::EntityNotFound {
                name: qualified_name.to_string(),
            })
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.enums.contains_key(qualified_name) || self.classes.contains_key(qualified_name)
    }

    /// Enums ordered by fully qualified name
    pub fn enums(&self) -> impl Iterator<Item = (&String, &Indexed<EnumData>)> {
        self.enums.iter()
    }

    /// Classes ordered by fully qualified name
    pub fn classes(&self) -> impl Iterator<Item = (&String, &Indexed<ClassData>)> {
        self.classes.iter()
    }

    /// Find a class by its unqualified name.
    ///
    /// Line-oriented tooling only knows the class name it is inside of, not the
    /// namespace. With several matches the first in key order is returned.
    pub fn class_by_short_name(&self, name: &str) -> Option<(&String, &Indexed<ClassData>)> {
        self.classes.iter().find(|(key, _)| short_name(key) == name)
    }

    /// Drop everything that was indexed from `path`. Returns the number of
    /// entries removed.
    pub fn remove_file(&mut self, path: &Path) -> usize {
        let before = self.len();
        self.enums.retain(|_, e| e.defined_in != path);
        self.classes.retain(|_, c| c.defined_in != path);
        let removed = before - self.len();
        debug!("Removed {removed} entries defined in {}", path.display());
        removed
    }

    /// Merge `other` into this index. Entries in `other` win on collision.
    pub fn merge(&mut self, other: FactIndex) {
        for (name, entry) in other.enums {
            let defined_in = entry.defined_in;
            self.insert_enum(name, entry.data, &defined_in);
        }
        for (name, entry) in other.classes {
            let defined_in = entry.defined_in;
            self.insert_class(name, entry.data, &defined_in);
        }
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn len(&self) -> usize {
        self.enums.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.classes.is_empty()
    }

    /// Write the index as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = crate::export::export_json(self)?;
        std::fs::write(path, json).map_err(|e| FactError::io(path, e))
    }

    /// Read an index previously written with [`FactIndex::save_json`].
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| FactError::io(path, e))?;
        crate::export::import_json(&json)
    }
}
