//! Data model for extracted declarations.

pub mod class_data;
pub mod entity;
pub mod enum_data;
pub mod namespace;
pub mod visibility;

pub use class_data::{ClassData, MemberData, MethodData};
pub use entity::{Entity, PublishedEntity};
pub use enum_data::EnumData;
pub use namespace::{join_namespace, qualify, short_name, NamespaceEntry, PATH_SEPARATOR};
pub use visibility::Visibility;
