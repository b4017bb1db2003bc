//! C++ header parser for cppfacts
//!
//! A single forward pass over header text that recognizes namespaces, enums
//! and class/struct declarations without parsing the rest of the language.
//! The pieces, leaves first:
//!
//! - [`lexical`]: cursor plus skipping of comments, `#pragma once`,
//!   `#include` and whitespace
//! - [`scope`]: tracked brace depth and balanced-group skipping
//! - [`grammar`]: the declaration grammar, driven by [`ParserDriver`]
//! - [`events`]: the [`ParseEvent`] stream and the [`EventBus`] carrying it
//! - [`drivers`]: listeners that rebuild namespace paths and publish
//!   [`EnumData`](cppfacts::EnumData) and [`ClassData`](cppfacts::ClassData)
//!
//! [`CppFactParser`] wires them together per file and fills a
//! [`FactIndex`](cppfacts::FactIndex).
//!
//! # Example
//!
//! ```rust
//! use cppfacts::FactIndex;
//! use cppfacts_cpp::CppFactParser;
//! use cppfacts_parser_api::FactParser;
//! use std::path::Path;
//!
//! let parser = CppFactParser::new();
//! let mut index = FactIndex::new();
//!
//! let source = r#"
//!     namespace foo::bar {
//!         enum class Color { red, green, blue };
//!     }
//! "#;
//!
//! let file_info = parser.parse_source(source, Path::new("color.h"), &mut index).unwrap();
//! assert_eq!(file_info.enums, vec!["foo::bar::Color"]);
//! assert!(index.get_enum("foo::bar::Color").unwrap().data.is_class_enum);
//! ```
//!
//! Drivers can also be attached to a [`ParserDriver`] directly:
//!
//! ```rust
//! use cppfacts::EnumData;
//! use cppfacts_cpp::{EnumDriver, ParseEvent, ParserDriver};
//!
//! let mut names = Vec::new();
//! {
//!     let mut enums = EnumDriver::new();
//!     enums.subscribe(|name: &str, _: &EnumData| names.push(name.to_string()));
//!     let mut parser = ParserDriver::new();
//!     parser.subscribe(|event: &ParseEvent| enums.handle(event));
//!     assert!(parser.parse("namespace a { enum E { x }; } enum F { y };").success);
//! }
//! assert_eq!(names, ["a::E", "F"]);
//! ```

pub mod annotation;
pub mod drivers;
pub mod events;
pub mod grammar;
pub mod lexical;
pub mod scope;

mod extractor;
mod mapper;
mod parser_impl;

pub use annotation::AnnotationFlags;
pub use drivers::{
    ClassDriver, ClassState, EnumDriver, EnumState, NamespaceStack, PendingFlags,
    TransitionError,
};
pub use events::{EventBus, EventKind, ParseEvent, ParseListener, SubscriptionId};
pub use extractor::extract;
pub use grammar::{ParseOutcome, ParserDriver};
pub use parser_impl::CppFactParser;
