//! Export module for persisting the fact index.
//!
//! The JSON form is what downstream generators read instead of reparsing
//! every header.

pub mod json;

pub use json::{export_json, export_json_filtered, import_json};
