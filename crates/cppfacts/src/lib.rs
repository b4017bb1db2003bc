//! # cppfacts
//!
//! Structural facts extracted from C++ headers: namespaces, enums, classes
//! and structs, plus the index and generators built on top of them.
//!
//! ## Architecture
//!
//! ```text
//! Parsers (cppfacts-cpp)
//!     ↓
//! Parser API (FactParser, FileFacts)
//!     ↓
//! Fact Index (fully qualified name → entity)
//!     ↓
//! Export (JSON) / Codegen (enum strings, accessors)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cppfacts::{EnumData, FactIndex, PublishedEntity};
//! use std::path::Path;
//!
//! let mut index = FactIndex::new();
//! let color = EnumData::new("Color")
//!     .with_namespaces(vec!["foo".into(), "bar".into()])
//!     .class_enum()
//!     .with_identifiers(["red", "green", "blue"]);
//! index.insert(
//!     PublishedEntity::from_enum("foo::bar::Color", color),
//!     Path::new("colors.h"),
//! );
//!
//! assert!(index.get_enum("foo::bar::Color").is_ok());
//! ```

#![deny(unsafe_code)]

pub mod codegen;
pub mod error;
pub mod export;
pub mod index;
pub mod model;

// Re-export main types
pub use error::{FactError, Result};
pub use index::{FactIndex, Indexed};
pub use model::{
    join_namespace, qualify, short_name, ClassData, Entity, EnumData, MemberData, MethodData,
    NamespaceEntry, PublishedEntity, Visibility, PATH_SEPARATOR,
};
