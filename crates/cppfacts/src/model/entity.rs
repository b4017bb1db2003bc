use super::class_data::ClassData;
use super::enum_data::EnumData;
use serde::{Deserialize, Serialize};

/// A finalized declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Enum(EnumData),
    Class(ClassData),
}

impl Entity {
    pub fn as_enum(&self) -> Option<&EnumData> {
        match self {
            Entity::Enum(e) => Some(e),
            Entity::Class(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassData> {
        match self {
            Entity::Class(c) => Some(c),
            Entity::Enum(_) => None,
        }
    }
}

/// An entity together with the fully qualified name it was published under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEntity {
    pub qualified_name: String,
    pub entity: Entity,
}

impl PublishedEntity {
    pub fn new(qualified_name: impl Into<String>, entity: Entity) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            entity,
        }
    }

    pub fn from_enum(qualified_name: impl Into<String>, data: EnumData) -> Self {
        Self::new(qualified_name, Entity::Enum(data))
    }

    pub fn from_class(qualified_name: impl Into<String>, data: ClassData) -> Self {
        Self::new(qualified_name, Entity::Class(data))
    }
}
